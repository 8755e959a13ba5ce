use crate::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;

fn write_config(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gqlbind-cli-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("gqlbind.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_every_setting() {
    let path = write_config("full", r#"{
        "endpoint": "https://api.example.com/graphql",
        "subscription_endpoint": "wss://api.example.com/graphql",
        "headers": {"Authorization": "Bearer abc", "X-Client": "cli"},
        "timeout_secs": 5,
        "schema_files": ["schema.graphql", "/abs/extra.graphql"]
    }"#);

    let config = ClientConfig::load(&path).unwrap();

    assert_eq!(config.endpoint.as_deref(), Some("https://api.example.com/graphql"));
    assert_eq!(config.subscription_endpoint.as_deref(), Some("wss://api.example.com/graphql"));
    assert_eq!(
        config.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
        vec![("Authorization", "Bearer abc"), ("X-Client", "cli")],
    );
    assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    // Relative schema paths resolve against the config file's directory.
    assert_eq!(config.schema_files[0], path.parent().unwrap().join("schema.graphql"));
    assert_eq!(config.schema_files[1], PathBuf::from("/abs/extra.graphql"));
}

#[test]
fn missing_settings_default() {
    let path = write_config("empty", "{}");

    let config = ClientConfig::load(&path).unwrap();

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.timeout(), None);
}

#[test]
fn unknown_settings_are_rejected() {
    let path = write_config("unknown", r#"{"endpont": "https://typo.example.com"}"#);

    let err = ClientConfig::load(&path).unwrap_err();

    assert!(format!("{err:#}").contains("endpont"));
}
