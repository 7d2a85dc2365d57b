use device_repo::{Config, ConfigError};
use std::collections::HashMap;
use std::io::Write;

fn write_config(suffix: &str, text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_json() {
    let file = write_config(
        ".json",
        r#"{
            "endpoint": "http://store:8890/sparql",
            "graph": "http://iot.example/devices",
            "log_queries": true
        }"#,
    );
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.endpoint, "http://store:8890/sparql");
    assert_eq!(config.graph, "http://iot.example/devices");
    assert!(config.log_queries);
    // Missing keys keep their defaults
    assert_eq!(config.timeout_secs, Config::default().timeout_secs);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_yaml() {
    let file = write_config(
        ".yaml",
        "endpoint: http://store:8890/sparql\n\
         update_endpoint: http://store:8890/sparql-auth\n\
         user: admin\n\
         timeout_secs: 30\n",
    );
    let config = Config::load(file.path()).unwrap();
    assert_eq!(
        config.update_endpoint.as_deref(),
        Some("http://store:8890/sparql-auth")
    );
    assert_eq!(config.user.as_deref(), Some("admin"));
    assert_eq!(config.timeout_secs, 30);
}

#[test]
fn test_load_rejects_malformed_files() {
    let json = write_config(".json", "{ not json");
    assert!(matches!(Config::load(json.path()), Err(ConfigError::Json(_))));

    let yaml = write_config(".yml", "timeout_secs: [1, 2]\n");
    assert!(matches!(Config::load(yaml.path()), Err(ConfigError::Yaml(_))));

    assert!(matches!(
        Config::load("/nonexistent/device-repo.json"),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(
        ".json",
        r#"{ "graph": "http://iot.example/devices", "timeout_secs": 5 }"#,
    );
    let mut config = Config::load(file.path()).unwrap();

    let vars: HashMap<&str, &str> = [
        ("RDF_GRAPH", "http://iot.example/other"),
        ("SPARQL_TIMEOUT", "20"),
        ("RDF_PW", "secret"),
        ("SPARQL_VALIDATE", "yes"),
    ]
    .into_iter()
    .collect();
    config
        .apply_vars(|key| vars.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.graph, "http://iot.example/other");
    assert_eq!(config.timeout_secs, 20);
    assert_eq!(config.password.as_deref(), Some("secret"));
    assert!(config.validate_queries);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_values_are_reported() {
    let mut config = Config::default();
    let err = config
        .apply_vars(|key| (key == "SPARQL_LOG").then(|| "maybe".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "SPARQL_LOG", .. }));

    let config = Config {
        graph: "not an iri".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "graph", .. })
    ));
}
