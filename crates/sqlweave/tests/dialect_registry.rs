use sqlweave::prelude::*;
use sqlweave::{DefaultAdapter, SqlBuilder, has_adapter, new_adapter, register_adapter, register_config};

#[test]
fn init_registers_mssql() {
    sqlweave::init();
    sqlweave::init();
    assert!(has_adapter("mssql"));
    assert!(has_adapter("MSSQL"));
    assert_eq!(new_adapter("mssql").name(), "mssql");
}

#[test]
fn unknown_dialect_uses_default_spelling() {
    let ds = Dialect::named("integration-unknown").from("entry");
    let (sql, _) = ds
        .where_(Expr::col("bool").is_true())
        .limit(10)
        .offset(5)
        .to_select_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT * FROM "entry" WHERE ("bool" IS TRUE) LIMIT 10 OFFSET 5"#
    );

    let (sql, _) = Dialect::named("integration-unknown")
        .from("entry")
        .returning(vec![Expr::col("id")])
        .to_insert_sql(&[Record::new().set("int", 1)])
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO "entry" ("int") VALUES (1) RETURNING "id""#);
}

#[test]
fn config_only_dialect_from_json() {
    let config = AdapterConfig::from_json(
        r#"{
            "quote_rune": "`",
            "placeholder_rune": "$",
            "include_placeholder_num": true,
            "supports_returning": false
        }"#,
    )
    .unwrap();
    register_config("integration-json", config);

    let ds = Dialect::named("integration-json").from("entry");
    let (sql, args) = ds
        .clone()
        .prepared(true)
        .where_(Expr::col("int").eq(3))
        .to_select_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `entry` WHERE (`int` = $1)");
    assert_eq!(args, vec![Value::Int(3)]);

    let err = ds
        .returning(vec![Expr::col("id")])
        .to_delete_sql()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "integration-json-adapter does not support \"RETURNING\""
    );
}

/// Writes ` FIRST n` instead of ` LIMIT n`.
#[derive(Debug)]
struct FirstAdapter(DefaultAdapter);

impl Adapter for FirstAdapter {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn config(&self) -> &AdapterConfig {
        self.0.config()
    }

    fn limit_sql(&mut self, buf: &mut SqlBuilder, limit: Option<u64>) -> Result<()> {
        if let Some(limit) = limit {
            buf.write_str(" FIRST ");
            self.literal_value(buf, &Value::from_u64_clamped(limit))?;
        }
        Ok(())
    }
}

#[test]
fn custom_adapter_overrides_one_callback() {
    register_adapter("integration-first", || {
        Box::new(FirstAdapter(DefaultAdapter::new("integration-first")))
    });

    let (sql, _) = Dialect::named("integration-first")
        .from("entry")
        .order(vec![Expr::col("id").desc()])
        .limit(3)
        .offset(6)
        .to_select_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT * FROM "entry" ORDER BY "id" DESC FIRST 3 OFFSET 6"#
    );
}

#[test]
fn bad_time_format_fails_the_statement() {
    let config = AdapterConfig::from_json(r#"{ "time_format": "%Y-%Q" }"#).unwrap();
    register_config("integration-bad-time", config);

    let err = Dialect::named("integration-bad-time")
        .from("entry")
        .to_insert_sql(&[Record::new().set("t", Value::Timestamp(0))])
        .unwrap_err();
    assert!(matches!(err, Error::Build(_)));
}

#[test]
fn non_utf8_bytes_fail_the_statement() {
    sqlweave::init();
    let err = Dialect::named("mssql")
        .from("entry")
        .to_insert_sql(&[Record::new().set("b", Value::Bytes(vec![0xff, 0x41]))])
        .unwrap_err();
    assert!(matches!(err, Error::Build(_)));
}
