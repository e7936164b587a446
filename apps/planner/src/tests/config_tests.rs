use std::collections::HashMap;

use super::*;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = Settings::resolve(None, env_of(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_url().expect("url").path(), "/api/");
}

#[test]
fn file_overrides_defaults_and_env_overrides_file() {
    let file = r#"
        server_url = "https://trips.example.com/api/"
        authorization = "Basic from-file"
        snapshot_path = "data/trip.json"
    "#;
    let settings = Settings::resolve(
        Some(file),
        env_of(&[("PLANNER_AUTHORIZATION", "Basic from-env")]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "https://trips.example.com/api/");
    assert_eq!(settings.authorization, "Basic from-env");
    assert_eq!(settings.snapshot_path, Some(PathBuf::from("data/trip.json")));
}

#[test]
fn app_prefixed_env_wins_over_planner_prefix() {
    let settings = Settings::resolve(
        None,
        env_of(&[
            ("PLANNER_SERVER_URL", "http://one.test/"),
            ("APP__SERVER_URL", "http://two.test/"),
            ("APP__SNAPSHOT_PATH", "snap.json"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "http://two.test/");
    assert_eq!(settings.snapshot_path, Some(PathBuf::from("snap.json")));
}

#[test]
fn flags_are_the_last_layer() {
    let mut settings = Settings::resolve(None, env_of(&[("APP__SERVER_URL", "http://env.test/")]))
        .expect("settings");

    settings.apply_overrides(Some("http://flag.test/".into()), None, None);

    assert_eq!(settings.server_url, "http://flag.test/");
    assert_eq!(settings.authorization, Settings::default().authorization);
}

#[test]
fn malformed_or_unknown_keys_are_rejected() {
    assert!(Settings::resolve(Some("server_url = "), env_of(&[])).is_err());
    assert!(Settings::resolve(Some("bind_addr = \"x\""), env_of(&[])).is_err());
}

#[test]
fn server_url_must_be_http() {
    let mut settings = Settings::default();

    settings.server_url = "not a url".into();
    assert!(settings.server_url().is_err());

    settings.server_url = "ftp://files.example.com/".into();
    assert!(settings.server_url().is_err());
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(&dir.path().join("absent.toml")).expect("settings");
    assert_eq!(settings.server_url, Settings::default().server_url);
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("planner.toml");
    fs::write(&path, "authorization = \"Basic disk\"\n").expect("write config");

    let settings = load_settings(&path).expect("settings");

    assert_eq!(settings.authorization, "Basic disk");
}
