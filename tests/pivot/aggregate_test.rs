//! Tests for aggregate resolution: overrides, exact keys, and ordered prefixes.

use tablecraft::aggregate::{
    AggregateFunction, AggregateOverride, AggregateOverrides, AggregateRule, AggregateRules,
};
use tablecraft::Error;

fn rules(entries: &[(&str, AggregateFunction)]) -> AggregateRules {
    AggregateRules::new(
        entries
            .iter()
            .map(|(prefix, f)| (prefix.to_string(), AggregateRule::new(*f))),
    )
}

fn resolve(rules: &AggregateRules, column: &str) -> AggregateFunction {
    rules
        .resolve_column(column, &AggregateOverrides::new())
        .unwrap()
        .function
}

#[test]
fn test_defaults_by_naming_convention() {
    let rules = AggregateRules::default();
    let cases = [
        ("first_seen", AggregateFunction::Min, "NULL"),
        ("least_latency", AggregateFunction::Min, "NULL"),
        ("most_recent_login", AggregateFunction::Max, "NULL"),
        ("longest_streak", AggregateFunction::Max, "NULL"),
        ("num_logins", AggregateFunction::Sum, "0"),
        ("total_time", AggregateFunction::Sum, "0"),
        ("list_devices", AggregateFunction::ListAgg, "NULL"),
        ("and_active", AggregateFunction::BoolAnd, "true"),
        ("bool_or_flagged", AggregateFunction::BoolOr, "NULL"),
    ];

    for (column, function, default) in cases {
        let rule = rules
            .resolve_column(column, &AggregateOverrides::new())
            .unwrap();
        assert_eq!(rule.function, function, "function for {column}");
        assert_eq!(rule.default_literal, default, "default for {column}");
    }
}

#[test]
fn test_override_short_circuits_naming() {
    let rules = AggregateRules::default();
    // every one of these would otherwise resolve by prefix, or not at all
    for column in ["num_logins", "first_seen", "list_x", "unconventional", "num"] {
        let overrides = AggregateOverrides::new().alias(column, "max");
        let rule = rules.resolve_column(column, &overrides).unwrap();
        assert_eq!(
            rule,
            AggregateRule::new(AggregateFunction::Max),
            "override for {column} must win"
        );
    }
}

#[test]
fn test_rule_override_is_used_verbatim() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new().rule(
        "num_logins",
        AggregateRule::with_default(AggregateFunction::Sum, "NULL"),
    );
    let rule = rules.resolve_column("num_logins", &overrides).unwrap();
    assert_eq!(rule.default_literal, "NULL");
}

#[test]
fn test_rule_order_decides_overlapping_prefixes() {
    let specific_first = rules(&[
        ("most_recent", AggregateFunction::Max),
        ("most", AggregateFunction::Min),
    ]);
    let general_first = rules(&[
        ("most", AggregateFunction::Min),
        ("most_recent", AggregateFunction::Max),
    ]);

    assert_eq!(resolve(&specific_first, "most_recent_login"), AggregateFunction::Max);
    assert_eq!(resolve(&general_first, "most_recent_login"), AggregateFunction::Min);
    // with agreeing functions the order is unobservable
    assert_eq!(resolve(&specific_first, "most_logins"), AggregateFunction::Min);
    assert_eq!(resolve(&general_first, "most_logins"), AggregateFunction::Min);
}

#[test]
fn test_exact_key_beats_earlier_prefix() {
    let rules = rules(&[("m", AggregateFunction::Min), ("m_x", AggregateFunction::Max)]);
    assert_eq!(resolve(&rules, "m_x"), AggregateFunction::Max);
    assert_eq!(resolve(&rules, "m_x_y"), AggregateFunction::Min);
}

#[test]
fn test_alias_resolves_one_level() {
    let rules = AggregateRules::default();

    let overrides = AggregateOverrides::new().alias("logins", "num");
    assert_eq!(
        rules.resolve_column("logins", &overrides).unwrap(),
        AggregateRule::new(AggregateFunction::Sum)
    );

    let overrides = AggregateOverrides::new().alias("active", "BOOL_AND");
    assert_eq!(
        rules.resolve_column("active", &overrides).unwrap(),
        AggregateRule::with_default(AggregateFunction::BoolAnd, "true")
    );

    // "num_logins" only matches by prefix; aliases are exact keys
    let overrides = AggregateOverrides::new().alias("logins", "num_logins");
    let err = rules.resolve_column("logins", &overrides).unwrap_err();
    assert!(matches!(err, Error::UnresolvedAggregate { .. }));
}

#[test]
fn test_unresolved_reports_column_and_overrides() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new().alias("a", "min");

    let err = rules.resolve_column("score", &overrides).unwrap_err();
    match err {
        Error::UnresolvedAggregate { column, overrides } => {
            assert_eq!(column, "score");
            assert_eq!(overrides, "{a: min}");
        }
        other => panic!("expected UnresolvedAggregate, got {other:?}"),
    }
}

#[test]
fn test_averages_are_rejected() {
    let err = "avg".parse::<AggregateFunction>().unwrap_err();
    assert!(err.contains("weighting"), "unexpected message: {err}");
    assert!(AggregateOverrides::parse_items(["x=AVG:0"]).is_err());
}

#[test]
fn test_parse_items_builds_overrides() {
    let overrides =
        AggregateOverrides::parse_items(["streak=most_recent", "flag=bool_or:false"]).unwrap();
    assert_eq!(
        overrides.get("streak"),
        Some(&AggregateOverride::Alias("most_recent".into()))
    );

    let rules = AggregateRules::default();
    assert_eq!(
        rules.resolve_column("streak", &overrides).unwrap().function,
        AggregateFunction::Max
    );
    assert_eq!(
        rules.resolve_column("flag", &overrides).unwrap(),
        AggregateRule::with_default(AggregateFunction::BoolOr, "false")
    );
}

#[test]
fn test_rules_deserialize_in_order() {
    let rules: AggregateRules = serde_json::from_str(
        r#"{"rules": [["peak", {"function": "max", "default_literal": "NULL"}],
                      ["pe", {"function": "SUM", "default_literal": "0"}]]}"#,
    )
    .unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(resolve(&rules, "peak_users"), AggregateFunction::Max);
    assert_eq!(resolve(&rules, "pe_ratio"), AggregateFunction::Sum);
}
