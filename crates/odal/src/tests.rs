use std::fs;
use std::path::Path;

use serde::Deserialize;
use tempfile::tempdir;
use toml::Table;

use crate::{Config, Error, merge_tables};

// Test configurations for our unit tests
#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct TestConfig {
    address: String,
    speed: f64,
    robot: RobotConfig,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct RobotConfig {
    name: String,
    port: u16,
    stiffness: StiffnessConfig,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct StiffnessConfig {
    enabled: bool,
    value: f64,
    #[serde(default)]
    ramp: Option<f64>,
}

impl Config for TestConfig {
    const PATH: &'static str = "test_config.toml";
}

const MAIN: &str = r#"
address = "0.0.0.0:7000"
speed = 0.2

[robot]
name = "sam"
port = 9559

[robot.stiffness]
enabled = true
value = 1.0
"#;

fn write(dir: &Path, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(TestConfig::PATH), contents).unwrap();
}

#[test]
fn merge_nested_tables() {
    let main: Table = MAIN.parse().unwrap();
    let overlay: Table = r#"
        speed = 0.5

        [robot]
        port = 9600

        [robot.stiffness]
        ramp = 0.25
    "#
    .parse()
    .unwrap();

    let merged = merge_tables(main, overlay);

    assert_eq!(merged["address"].as_str(), Some("0.0.0.0:7000"));
    assert_eq!(merged["speed"].as_float(), Some(0.5));

    let robot = merged["robot"].as_table().unwrap();
    assert_eq!(robot["name"].as_str(), Some("sam"));
    assert_eq!(robot["port"].as_integer(), Some(9600));

    let stiffness = robot["stiffness"].as_table().unwrap();
    assert_eq!(stiffness["enabled"].as_bool(), Some(true));
    assert_eq!(stiffness["ramp"].as_float(), Some(0.25));
}

#[test]
fn merge_replaces_scalar_with_table() {
    let main: Table = "robot = 3".parse().unwrap();
    let overlay: Table = "[robot]\nname = \"moos\"".parse().unwrap();

    let merged = merge_tables(main, overlay);

    assert_eq!(merged["robot"]["name"].as_str(), Some("moos"));
}

#[test]
fn load_main_config() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("config");
    write(&config_dir, MAIN);

    let config = TestConfig::load(&config_dir).unwrap();

    assert_eq!(config.address, "0.0.0.0:7000");
    assert_eq!(config.robot.port, 9559);
    assert_eq!(config.robot.stiffness.ramp, None);
}

#[test]
fn load_with_overlay() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("config");
    let overlay_dir = config_dir.join("overlay/daphne");
    write(&config_dir, MAIN);
    write(
        &overlay_dir,
        r#"
        [robot]
        name = "daphne"

        [robot.stiffness]
        value = 0.8
        "#,
    );

    let config = TestConfig::load_with_overlay(&config_dir, &overlay_dir).unwrap();

    assert_eq!(config.address, "0.0.0.0:7000");
    assert_eq!(config.speed, 0.2);
    assert_eq!(config.robot.name, "daphne");
    assert_eq!(config.robot.port, 9559);
    assert!(config.robot.stiffness.enabled);
    assert_eq!(config.robot.stiffness.value, 0.8);
}

#[test]
fn missing_overlay_uses_main() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("config");
    write(&config_dir, MAIN);

    let config =
        TestConfig::load_with_overlay(&config_dir, config_dir.join("overlay/nobody")).unwrap();

    assert_eq!(config, TestConfig::load(&config_dir).unwrap());
}

#[test]
fn missing_main_config() {
    let temp_dir = tempdir().unwrap();

    let result = TestConfig::load(temp_dir.path());

    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn invalid_toml() {
    let temp_dir = tempdir().unwrap();
    write(temp_dir.path(), "speed = = 0.2");

    let result = TestConfig::load(temp_dir.path());

    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn unknown_overlay_key() {
    let temp_dir = tempdir().unwrap();
    let overlay_dir = temp_dir.path().join("overlay");
    write(temp_dir.path(), MAIN);
    write(&overlay_dir, "sped = 0.3");

    let result = TestConfig::load_with_overlay(temp_dir.path(), &overlay_dir);

    assert!(matches!(
        result,
        Err(Error::Deserialize {
            path: "test_config.toml",
            ..
        })
    ));
}
