use std::fs;

use mirrorgrid::config::{Config, ConfigSource, ModuleConfig, Units};
use mirrorgrid::constants::CONFIG_MISSING;
use mirrorgrid::logger::{self, LogBuffer, LogLevel};
use mirrorgrid::ui::Region;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.language, "en");
    assert_eq!(config.port, 8080);
    assert_eq!(config.time_format, 24);
    assert_eq!(config.units, Units::Metric);
    assert!(!config.log_level.contains(&LogLevel::Debug));
    assert!(config.layout.is_none());
    assert_eq!(config.modules.len(), 2);
    assert_eq!(config.modules[0].position, Some(Region::TopLeft));
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    config.time_format = 13;
    assert!(config.validate().is_err());

    // Reset and test an empty module name
    config.time_format = 12;
    config.modules.push(ModuleConfig::new(" "));
    assert!(config.validate().is_err());

    config.modules.pop();
    config.port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirrorgrid.toml");
    fs::write(
        &path,
        r#"
language = "nl"
log_level = ["ERROR", "DEBUG"]

[[modules]]
module = "helloworld"
position = "bottom_bar"
header = "Greeting"
classes = "small dimmed"

[modules.config]
text = "Hallo"

[[modules]]
module = "clock"
disabled = true
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.language, "nl");
    assert_eq!(config.port, 8080);
    assert_eq!(config.log_level, vec![LogLevel::Error, LogLevel::Debug]);
    assert_eq!(config.modules.len(), 2);

    let hello = &config.modules[0];
    assert_eq!(hello.position, Some(Region::BottomBar));
    assert_eq!(hello.header.as_deref(), Some("Greeting"));
    assert_eq!(hello.config.get("text"), Some(&json!("Hallo")));
    assert!(config.modules[1].disabled);
    assert_eq!(config.positioned_modules().count(), 1);
}

#[test]
fn test_invalid_layout_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirrorgrid.toml");
    fs::write(&path, "[layout.grid]\ncols = 0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("layout.grid"));
}

#[test]
fn test_unparseable_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirrorgrid.toml");
    fs::write(&path, "port = \"not a number\"").unwrap();

    assert!(Config::load_from_file(&path).is_err());
    assert!(Config::load_from_file(temp_dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_generated_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    Config::generate_default_config(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# mirrorgrid Configuration File"));

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.modules, Config::default().modules);
}

#[test]
fn test_missing_file_is_reported_once_logging_is_up() {
    let (config, source) = Config::load_or_default(None).unwrap();
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(config.modules, Config::default().modules);

    let buffer = LogBuffer::new();
    logger::dispatch(&LogLevel::default_levels(), &buffer, None)
        .unwrap()
        .apply()
        .unwrap();
    source.report();

    let expected = format!("ERROR {}", CONFIG_MISSING);
    assert!(buffer.get_logs().iter().any(|line| line.ends_with(&expected)));
}

#[test]
fn test_found_file_is_the_source() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirrorgrid.toml");
    fs::write(&path, "language = \"de\"\n").unwrap();

    let (config, source) = Config::load_or_default(Some(path.clone())).unwrap();
    assert_eq!(config.language, "de");
    assert_eq!(source, ConfigSource::File(path));
}
