//! Configuration loading from INI files.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use project_exporter::{ConfigManager, ConfigurationError};

const FULL_CONFIG: &str = "\
[logger]
level = WARNING
log_dir = /var/log/project-exporter
file = exporter.log
when = MIDNIGHT
interval = 1
backup_count = 14

[mysql]
host = 10.0.0.12
port = 3307
user = exporter
password = s3cr3t-pass
database = apm
charset = utf8mb4
collation = utf8mb4_unicode_ci
connect_retries = 5
retry_delay_seconds = 2

[output]
yaml_file_path = /srv/installer/projects.yaml

[schedule]
interval_minutes = 30
check_interval_seconds = 2
";

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".ini")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn without_line(contents: &str, prefix: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.starts_with(prefix))
        .map(|line| format!("{line}\n"))
        .collect()
}

#[test]
fn full_config_is_loaded() {
    let file = config_file(FULL_CONFIG);
    let manager = ConfigManager::load_from_file(file.path()).expect("valid config");
    let config = manager.config();

    assert_eq!(config.logger.level, "WARNING");
    assert_eq!(
        config.logger.log_path(),
        PathBuf::from("/var/log/project-exporter/exporter.log")
    );
    assert_eq!(config.logger.when, "MIDNIGHT");
    assert_eq!(config.logger.backup_count, 14);
    assert_eq!(config.mysql.port, 3307);
    assert_eq!(config.mysql.collation, "utf8mb4_unicode_ci");
    assert_eq!(config.mysql.connect_retries, 5);
    assert_eq!(config.mysql.retry_delay(), Duration::from_secs(2));
    assert_eq!(config.schedule.interval(), Duration::from_secs(30 * 60));
    assert_eq!(config.schedule.check_interval(), Duration::from_secs(2));
}

#[test]
fn logger_section_is_optional() {
    let contents = FULL_CONFIG
        .split("[mysql]")
        .nth(1)
        .map(|rest| format!("[mysql]{rest}"))
        .expect("mysql section");
    let file = config_file(&contents);

    let manager = ConfigManager::load_from_file(file.path()).expect("valid config");
    let logger = &manager.config().logger;
    assert_eq!(logger.level, "INFO");
    assert_eq!(logger.log_path(), PathBuf::from("logs/app.log"));
    assert_eq!(logger.when, "D");
    assert_eq!(logger.backup_count, 7);
}

#[test]
fn missing_required_key_is_fatal() {
    for key in ["host", "user", "password", "charset", "collation", "yaml_file_path", "interval_minutes"] {
        let file = config_file(&without_line(FULL_CONFIG, &format!("{key} =")));
        let result = ConfigManager::load_from_file(file.path());
        assert!(
            matches!(result, Err(ConfigurationError::ParseError { .. })),
            "removing '{key}' should fail, got {result:?}"
        );
    }
}

#[test]
fn missing_section_is_fatal() {
    let contents = FULL_CONFIG
        .split("[output]")
        .next()
        .expect("head")
        .to_string();
    let file = config_file(&contents);
    assert!(ConfigManager::load_from_file(file.path()).is_err());
}

#[test]
fn non_numeric_interval_is_fatal() {
    let contents = FULL_CONFIG.replace("interval_minutes = 30", "interval_minutes = thirty");
    let file = config_file(&contents);
    assert!(matches!(
        ConfigManager::load_from_file(file.path()),
        Err(ConfigurationError::ParseError { .. })
    ));
}

#[test]
fn non_numeric_port_is_fatal() {
    let contents = FULL_CONFIG.replace("port = 3307", "port = mysql");
    let file = config_file(&contents);
    assert!(ConfigManager::load_from_file(file.path()).is_err());
}

#[test]
fn zero_interval_is_rejected_by_validation() {
    let contents = FULL_CONFIG.replace("interval_minutes = 30", "interval_minutes = 0");
    let file = config_file(&contents);
    assert!(matches!(
        ConfigManager::load_from_file(file.path()),
        Err(ConfigurationError::InvalidValue { .. })
    ));
}

#[test]
fn debug_config_never_contains_password() {
    let file = config_file(FULL_CONFIG);
    let manager = ConfigManager::load_from_file(file.path()).expect("valid config");
    let rendered = manager.debug_config().to_string();
    assert!(!rendered.contains("s3cr3t-pass"));
    assert!(rendered.contains("10.0.0.12"));
}
