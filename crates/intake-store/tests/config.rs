use std::collections::BTreeMap;
use std::path::PathBuf;

use intake_spec::{FlatRecord, GatewayError};
use intake_store::{ConfigError, GatewayKind, StoreConfig};
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<BTreeMap<_, _>>();
    move |key| map.get(key).cloned()
}

#[test]
fn parses_rest_section() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[gateway]
kind = "rest"
url = "https://example.supabase.co"
api_key = "anon-key"
timeout_secs = 5
"#,
    )
    .expect("write config");

    let config = StoreConfig::from_file(&path).expect("config");
    assert_eq!(config.gateway.kind, GatewayKind::Rest);
    assert_eq!(config.gateway.table, "questionnaire_responses");
    assert_eq!(config.gateway.timeout_secs, 5);
    assert_eq!(config.gateway.api_key.as_deref(), Some("anon-key"));
}

#[test]
fn empty_file_means_unconfigured() {
    let config = StoreConfig::from_toml_str("", &PathBuf::from("config.toml")).expect("config");
    assert_eq!(config, StoreConfig::default());
    assert_eq!(config.gateway.kind, GatewayKind::None);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = StoreConfig::load(Some(&dir.path().join("absent.toml"))).expect_err("missing");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_toml_names_the_file() {
    let err = StoreConfig::from_toml_str("[gateway\nkind=", &PathBuf::from("bad.toml"))
        .expect_err("parse error");
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn environment_overrides_select_gateway() {
    let mut config = StoreConfig::default();
    config.apply_overrides(env(&[
        ("INTAKE_GATEWAY_URL", "https://db.example.org"),
        ("INTAKE_GATEWAY_KEY", "secret"),
        ("INTAKE_GATEWAY_TABLE", "responses_v2"),
    ]));
    assert_eq!(config.gateway.kind, GatewayKind::Rest);
    assert_eq!(config.gateway.url.as_deref(), Some("https://db.example.org"));
    assert_eq!(config.gateway.table, "responses_v2");

    let mut file_config = StoreConfig::default();
    file_config.apply_overrides(env(&[("INTAKE_GATEWAY_FILE", "/tmp/responses.jsonl")]));
    assert_eq!(file_config.gateway.kind, GatewayKind::File);
}

#[test]
fn explicit_kind_wins_over_environment() {
    let mut config = StoreConfig::from_toml_str(
        "[gateway]\nkind = \"file\"\npath = \"out.jsonl\"\n",
        &PathBuf::from("config.toml"),
    )
    .expect("config");
    config.apply_overrides(env(&[("INTAKE_GATEWAY_URL", "https://db.example.org")]));
    assert_eq!(config.gateway.kind, GatewayKind::File);
    assert_eq!(config.gateway.url.as_deref(), Some("https://db.example.org"));
}

#[test]
fn blank_environment_values_are_ignored() {
    let mut config = StoreConfig::default();
    config.apply_overrides(env(&[("INTAKE_GATEWAY_URL", "  ")]));
    assert_eq!(config, StoreConfig::default());
}

#[tokio::test]
async fn unconfigured_gateway_reports_unavailable() {
    let gateway = StoreConfig::default().build_gateway().expect("gateway");
    let err = gateway.insert(&FlatRecord::new()).await.expect_err("unavailable");
    assert_eq!(
        err,
        GatewayError::Unavailable("no persistence gateway configured".into())
    );
}

#[tokio::test]
async fn rest_without_key_is_unconfigured() {
    let mut config = StoreConfig::default();
    config.gateway.kind = GatewayKind::Rest;
    config.gateway.url = Some("https://db.example.org".into());
    let gateway = config.build_gateway().expect("gateway");
    let err = gateway.insert(&FlatRecord::new()).await.expect_err("unavailable");
    assert!(matches!(err, GatewayError::Unavailable(_)));
}

#[test]
fn invalid_rest_url_is_a_config_error() {
    let mut config = StoreConfig::default();
    config.gateway.kind = GatewayKind::Rest;
    config.gateway.url = Some("not a url".into());
    config.gateway.api_key = Some("key".into());
    assert!(matches!(
        config.build_gateway(),
        Err(ConfigError::InvalidUrl { .. })
    ));
}
