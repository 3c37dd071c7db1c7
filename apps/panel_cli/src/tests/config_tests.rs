use super::{load_settings_with_env, Settings, SettingsOverrides, DEFAULT_SERVER_URL};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("tiering_panel_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = temp_dir("missing");
    let settings =
        load_settings_with_env(&dir.join("panel.toml"), env_from(&[])).expect("settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_url, DEFAULT_SERVER_URL);

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn file_values_are_read_and_env_wins() {
    let dir = temp_dir("file");
    let path = dir.join("panel.toml");
    fs::write(
        &path,
        "server_url = \"http://backend:8000\"\nregion = \"eu-west-1\"\nbucket_name = \"media\"\n",
    )
    .expect("write config");

    let settings = load_settings_with_env(
        &path,
        env_from(&[
            ("APP__BUCKET_NAME", "archive"),
            ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "http://backend:8000");
    assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
    assert_eq!(settings.bucket_name.as_deref(), Some("archive"));
    assert_eq!(settings.access_key.as_deref(), Some("AKIAEXAMPLE"));
    assert_eq!(settings.secret_key.as_deref(), Some("secret"));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn app_prefixed_env_overrides_plain_env() {
    let dir = temp_dir("env");
    let settings = load_settings_with_env(
        &dir.join("panel.toml"),
        env_from(&[
            ("PANEL_SERVER_URL", "http://one:1"),
            ("APP__SERVER_URL", "http://two:2"),
            ("AWS_REGION", "us-east-1"),
            ("APP__REGION", "us-west-2"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "http://two:2");
    assert_eq!(settings.region.as_deref(), Some("us-west-2"));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = temp_dir("malformed");
    let path = dir.join("panel.toml");
    fs::write(&path, "server_url = [").expect("write config");

    let err = load_settings_with_env(&path, env_from(&[])).expect_err("parse failure");
    assert!(err.to_string().contains("failed to parse config file"));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn credentials_in_file_are_rejected() {
    let dir = temp_dir("creds");
    let path = dir.join("panel.toml");
    fs::write(&path, "secret_key = \"nope\"\n").expect("write config");

    assert!(load_settings_with_env(&path, env_from(&[])).is_err());

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn cli_overrides_win_and_url_is_normalized() {
    let settings = Settings::default()
        .apply(SettingsOverrides {
            server_url: Some("https://panel.example.com/".into()),
            bucket_name: Some("cli-bucket".into()),
            ..Default::default()
        })
        .expect("valid overrides");

    assert_eq!(settings.server_url, "https://panel.example.com");
    assert_eq!(settings.bucket_name.as_deref(), Some("cli-bucket"));
    assert_eq!(settings.region, None);
}

#[test]
fn invalid_server_url_is_rejected() {
    let err = Settings::default()
        .apply(SettingsOverrides {
            server_url: Some("localhost:5000".into()),
            ..Default::default()
        })
        .expect_err("invalid url");
    assert!(err.to_string().contains("invalid server_url"));
}

#[test]
fn debug_output_redacts_secret() {
    let settings = Settings {
        secret_key: Some("hunter2".into()),
        ..Settings::default()
    };
    assert!(!format!("{settings:?}").contains("hunter2"));
}
