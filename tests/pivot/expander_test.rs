//! Tests for expanding one column into per-bucket aggregate expressions.

use tablecraft::aggregate::{AggregateOverrides, AggregateRules};
use tablecraft::pivot::PivotExpander;
use tablecraft::value::{Row, Value};
use tablecraft::{Dialect, Error};

fn month_rows(n: usize) -> Vec<Row> {
    (1..=n)
        .map(|m| vec![Value::from(format!("2023-{m:02}"))])
        .collect()
}

fn month() -> Vec<String> {
    vec!["month".to_string()]
}

#[test]
fn test_expression_count_with_and_without_overall() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();
    let excluded = vec!["num_logins".to_string()];

    for n in 0..=5 {
        let rows = month_rows(n);

        let with_overall = PivotExpander::new(&rules, &overrides, Dialect::Redshift)
            .expand("num_logins", &month(), &rows)
            .unwrap();
        assert_eq!(with_overall.len(), n + 1, "{n} buckets plus overall");
        assert!(with_overall.last().unwrap().case_test.is_none());

        let without = PivotExpander::new(&rules, &overrides, Dialect::Redshift)
            .exclude_from_overall(&excluded)
            .expand("num_logins", &month(), &rows)
            .unwrap();
        assert_eq!(without.len(), n, "{n} buckets only");
    }
}

#[test]
fn test_buckets_follow_distinct_row_order() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();
    let rows = vec![
        vec![Value::from("2023-03")],
        vec![Value::from("2023-01")],
        vec![Value::from("2023-02")],
    ];

    let aliases: Vec<String> = PivotExpander::new(&rules, &overrides, Dialect::Redshift)
        .expand("num_logins", &month(), &rows)
        .unwrap()
        .into_iter()
        .map(|e| e.alias)
        .collect();
    assert_eq!(
        aliases,
        [
            "num_logins_month_2023_03",
            "num_logins_month_2023_01",
            "num_logins_month_2023_02",
            "num_logins",
        ]
    );
}

#[test]
fn test_sanitized_alias_collision_rejected() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();
    let rows = vec![vec![Value::from("A-B")], vec![Value::from("A_B")]];

    let err = PivotExpander::new(&rules, &overrides, Dialect::Redshift)
        .expand("num_x", &["grp".to_string()], &rows)
        .unwrap_err();
    match err {
        Error::AliasCollision { column, alias } => {
            assert_eq!(column, "num_x");
            assert_eq!(alias, "num_x_grp_A_B");
        }
        other => panic!("expected AliasCollision, got {other:?}"),
    }
}

#[test]
fn test_mixed_value_kinds() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();
    let pivots = vec!["year".to_string(), "score".to_string(), "region".to_string()];
    let rows = vec![vec![Value::Int(2023), Value::Float(1.5), Value::from("eu-west")]];

    let exprs = PivotExpander::new(&rules, &overrides, Dialect::Postgres)
        .expand("first_seen", &pivots, &rows)
        .unwrap();
    assert_eq!(
        exprs[0].to_sql(Dialect::Postgres),
        "MIN(CASE WHEN year = 2023 AND score = 1.5 AND region = 'eu-west' THEN first_seen ELSE NULL END) \
         AS first_seen_year_2023_score_1_5_region_eu_west"
    );
    assert_eq!(exprs[1].to_sql(Dialect::Postgres), "MIN(first_seen) AS first_seen");
}

#[test]
fn test_quote_in_value_is_escaped() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();
    let rows = vec![vec![Value::from("it's")]];

    let exprs = PivotExpander::new(&rules, &overrides, Dialect::Redshift)
        .expand("num_x", &["label".to_string()], &rows)
        .unwrap();
    assert_eq!(
        exprs[0].to_sql(Dialect::Redshift),
        "SUM(CASE WHEN label = 'it''s' THEN num_x ELSE 0 END) AS num_x_label_it_s"
    );
}

#[test]
fn test_sqlite_remaps_list_and_booleans() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();
    let rows = month_rows(1);

    let list = PivotExpander::new(&rules, &overrides, Dialect::Sqlite)
        .expand("list_devices", &month(), &rows)
        .unwrap();
    assert_eq!(
        list[1].to_sql(Dialect::Sqlite),
        "GROUP_CONCAT(list_devices) AS list_devices"
    );

    let flags = PivotExpander::new(&rules, &overrides, Dialect::Sqlite)
        .expand("and_active", &month(), &rows)
        .unwrap();
    assert_eq!(
        flags[0].to_sql(Dialect::Sqlite),
        "MIN(CASE WHEN month = '2023-01' THEN and_active ELSE true END) AS and_active_month_2023_01"
    );
}

#[test]
fn test_unresolvable_column_fails() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();

    let err = PivotExpander::new(&rules, &overrides, Dialect::Redshift)
        .expand("score", &month(), &month_rows(2))
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedAggregate { ref column, .. } if column == "score"));
}

#[test]
fn test_listagg_rejected_on_postgres() {
    let rules = AggregateRules::default();
    let overrides = AggregateOverrides::new();

    let err = PivotExpander::new(&rules, &overrides, Dialect::Postgres)
        .expand("list_devices", &month(), &month_rows(1))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("LISTAGG")), "got {err:?}");

    // an override to a portable function resolves it
    let overrides = AggregateOverrides::new().alias("list_devices", "max");
    let expressions = PivotExpander::new(&rules, &overrides, Dialect::Postgres)
        .expand("list_devices", &month(), &month_rows(1))
        .unwrap();
    assert_eq!(expressions[1].to_sql(Dialect::Postgres), "MAX(list_devices) AS list_devices");

    let redshift = PivotExpander::new(&rules, &AggregateOverrides::new(), Dialect::Redshift)
        .expand("list_devices", &month(), &month_rows(1))
        .unwrap();
    assert_eq!(redshift[1].to_sql(Dialect::Redshift), "LISTAGG(list_devices) AS list_devices");
}
