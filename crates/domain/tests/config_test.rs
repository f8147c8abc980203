use rootwalk_domain::config::{default_root_servers, DEFAULT_ROOT_SERVERS};
use rootwalk_domain::{Candidate, CliOverrides, Config, ConfigError, RecordType};
use std::io::Write;
use std::net::IpAddr;

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.resolver.query_timeout_ms, 10_000);
    assert!(config.resolver.deadline_ms.is_none());
    assert_eq!(config.resolver.port, 53);
    assert_eq!(config.resolver.record_type, RecordType::A);
    assert_eq!(config.resolver.root_servers.len(), 13);
    assert_eq!(config.logging.level, "warn");
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_root_table_order() {
    let roots = default_root_servers();
    assert_eq!(roots[0].name, "a.root-servers.net");
    assert_eq!(roots[0].address.to_string(), "198.41.0.4");
    assert_eq!(roots[12].name, "m.root-servers.net");
    assert_eq!(roots.len(), DEFAULT_ROOT_SERVERS.len());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[resolver]
query_timeout_ms = 2500
deadline_ms = 30000
record_type = "AAAA"
root_servers = [ {{ name = "fake.root", address = "127.0.0.1" }} ]

[logging]
level = "debug"
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let config = Config::load(Some(path), CliOverrides::default()).unwrap();

    assert_eq!(config.resolver.query_timeout_ms, 2500);
    assert_eq!(config.resolver.deadline_ms, Some(30_000));
    assert_eq!(config.resolver.port, 53);
    assert_eq!(config.resolver.record_type, RecordType::AAAA);
    assert_eq!(
        config.resolver.root_servers,
        vec![Candidate::new("fake.root", "127.0.0.1".parse::<IpAddr>().unwrap())]
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_cli_overrides_win() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[resolver]\nquery_timeout_ms = 2500\n").unwrap();

    let overrides = CliOverrides {
        query_timeout_ms: Some(500),
        port: Some(5353),
        root_servers: Some(vec!["r=10.0.0.1".parse().unwrap()]),
        log_level: Some("trace".to_string()),
        ..Default::default()
    };
    let config = Config::load(Some(file.path().to_str().unwrap()), overrides).unwrap();

    assert_eq!(config.resolver.query_timeout_ms, 500);
    assert_eq!(config.resolver.port, 5353);
    assert_eq!(config.resolver.root_servers[0].name, "r");
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn test_validation_rejects_empty_root_table() {
    let overrides = CliOverrides {
        root_servers: Some(vec![]),
        ..Default::default()
    };
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file).unwrap();

    let err = Config::load(Some(file.path().to_str().unwrap()), overrides).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_validation_rejects_short_deadline() {
    let mut config = Config::default();
    config.resolver.deadline_ms = Some(1_000);
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_validation_rejects_non_address_type() {
    let mut config = Config::default();
    config.resolver.record_type = RecordType::NS;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_ipv6_root() {
    let overrides = CliOverrides {
        root_servers: Some(vec![
            "v6.root=::1".parse::<Candidate>().unwrap(),
            "v4.root=127.0.0.1".parse::<Candidate>().unwrap(),
        ]),
        ..Default::default()
    };
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file).unwrap();

    let err = Config::load(Some(file.path().to_str().unwrap()), overrides).unwrap_err();
    match err {
        ConfigError::Validation(msg) => assert!(msg.contains("v6.root")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_file_is_read_error() {
    let err = Config::load(Some("/nonexistent/rootwalk.toml"), CliOverrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileRead(_, _)));
}

#[test]
fn test_unparsable_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[resolver]\nport = \"fifty-three\"").unwrap();
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
