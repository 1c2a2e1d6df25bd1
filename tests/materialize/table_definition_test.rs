//! Tests for CREATE TABLE generation from introspected columns and a design.

use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use tablecraft::design::{Columns, DistStyle, ForeignKey, TableDesign};
use tablecraft::materialize::{generate_table_definition, ColumnSpec};
use tablecraft::{Dialect, Error};

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("user_id", "integer"),
        ColumnSpec::new("month", "character varying(7)"),
        ColumnSpec::new("num_logins", "bigint"),
    ]
}

#[test]
fn test_plain_table() {
    let sql = generate_table_definition(
        "analytics",
        "logins",
        &columns(),
        &TableDesign::default(),
        Dialect::Postgres,
    )
    .unwrap();

    assert_eq!(
        sql,
        "CREATE TABLE \"analytics\".\"logins\" (\n\
         \x20   \"user_id\" integer,\n\
         \x20   \"month\" character varying(7),\n\
         \x20   \"num_logins\" bigint\n\
         )"
    );
    Parser::parse_sql(&PostgreSqlDialect {}, &sql).expect("should parse");
}

#[test]
fn test_keys_without_trailing_comma() {
    let design = TableDesign {
        primary_key: Some(Columns::from(vec!["user_id", "month"])),
        foreign_keys: vec![
            ForeignKey {
                columns: Columns::from("user_id"),
                references: "public.users".into(),
                reference_columns: Columns::from("id"),
            },
            ForeignKey {
                columns: Columns::from("month"),
                references: "months".into(),
                reference_columns: Columns::from("label"),
            },
        ],
        ..Default::default()
    };

    let sql =
        generate_table_definition("analytics", "logins", &columns(), &design, Dialect::Postgres)
            .unwrap();

    assert_eq!(
        sql,
        "CREATE TABLE \"analytics\".\"logins\" (\n\
         \x20   \"user_id\" integer,\n\
         \x20   \"month\" character varying(7),\n\
         \x20   \"num_logins\" bigint,\n\
         \x20   PRIMARY KEY(\"user_id\", \"month\"),\n\
         \x20   FOREIGN KEY(\"user_id\") REFERENCES \"public\".\"users\"(\"id\"),\n\
         \x20   FOREIGN KEY(\"month\") REFERENCES \"months\"(\"label\")\n\
         )"
    );
    Parser::parse_sql(&PostgreSqlDialect {}, &sql).expect("should parse");
}

#[test]
fn test_redshift_layout_clauses() {
    let design = TableDesign {
        primary_key: Some(Columns::from("user_id")),
        diststyle: Some(DistStyle::Key),
        distkey: Some("user_id".into()),
        sortkey: Some(Columns::from(vec!["user_id", "month"])),
        ..Default::default()
    };

    let sql =
        generate_table_definition("analytics", "logins", &columns(), &design, Dialect::Redshift)
            .unwrap();

    assert!(sql.ends_with(
        "    PRIMARY KEY(\"user_id\")\n\
         )\n\
         DISTSTYLE KEY\n\
         DISTKEY(\"user_id\")\n\
         COMPOUND SORTKEY(\"user_id\", \"month\")"
    ));
}

#[test]
fn test_single_sortkey() {
    let design = TableDesign {
        diststyle: Some(DistStyle::Even),
        sortkey: Some(Columns::from("month")),
        ..Default::default()
    };

    let sql =
        generate_table_definition("a", "t", &columns(), &design, Dialect::Redshift).unwrap();
    assert!(sql.ends_with(")\nDISTSTYLE EVEN\nSORTKEY(\"month\")"));
}

#[test]
fn test_layout_hints_ignored_elsewhere() {
    let design = TableDesign {
        diststyle: Some(DistStyle::All),
        sortkey: Some(Columns::from("month")),
        ..Default::default()
    };

    for dialect in [Dialect::Postgres, Dialect::Snowflake, Dialect::DuckDb, Dialect::Sqlite] {
        let sql = generate_table_definition("a", "t", &columns(), &design, dialect).unwrap();
        assert!(sql.ends_with("bigint\n)"), "{dialect}: {sql}");
        assert!(!sql.contains("SORTKEY"));
    }
}

#[test]
fn test_typeless_column() {
    let sql = generate_table_definition(
        "main",
        "t",
        &[ColumnSpec::new("a", "INT"), ColumnSpec::new("total", "")],
        &TableDesign::default(),
        Dialect::Sqlite,
    )
    .unwrap();
    assert_eq!(sql, "CREATE TABLE \"main\".\"t\" (\n    \"a\" INT,\n    \"total\"\n)");
}

#[test]
fn test_empty_columns_rejected() {
    let err = generate_table_definition(
        "analytics",
        "logins",
        &[],
        &TableDesign::default(),
        Dialect::Redshift,
    )
    .unwrap_err();
    assert!(matches!(err, Error::NoColumns(ref t) if t == "analytics.logins"));
}

#[test]
fn test_design_from_toml() {
    let design = TableDesign::from_toml_str(
        r#"
primary_key = "user_id"

[[foreign_keys]]
columns = ["user_id"]
references = "public.users"
reference_columns = ["id"]
"#,
    )
    .unwrap();

    let sql =
        generate_table_definition("analytics", "logins", &columns(), &design, Dialect::Postgres)
            .unwrap();
    assert!(sql.contains("PRIMARY KEY(\"user_id\"),\n"));
    assert!(sql.contains("REFERENCES \"public\".\"users\"(\"id\")\n)"));
}

#[test]
fn test_empty_foreign_key_columns_rejected() {
    let design = TableDesign::from_toml_str(
        r#"
[[foreign_keys]]
columns = []
references = "public.users"
reference_columns = []
"#,
    )
    .unwrap();

    let err =
        generate_table_definition("analytics", "logins", &columns(), &design, Dialect::Postgres)
            .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("public.users")), "got {err:?}");
}
