use super::*;

use std::{collections::HashMap, fs};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_target_local_service_with_video_gated_curtains() {
    let settings = Settings::default();
    assert_eq!(settings.server_url, "http://127.0.0.1:8000");
    assert_eq!(settings.curtain_policy(), CurtainPolicy::WhenVideoReady);
    assert_eq!(settings.theme, ThemePreset::Velvet);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
server_url = "http://dreams.local:9000"
theme = "starlight"
curtain_policy = "delay"
curtain_delay_ms = 2500
player_command = "mpv --fs"
color = false
"#,
    )
    .expect("valid toml");

    assert_eq!(settings.server_url, "http://dreams.local:9000");
    assert_eq!(settings.theme, ThemePreset::Starlight);
    assert_eq!(
        settings.curtain_policy(),
        CurtainPolicy::AfterDelay(Duration::from_millis(2500))
    );
    assert_eq!(settings.player_command.as_deref(), Some("mpv --fs"));
    assert!(!settings.color);
    assert_eq!(settings.request_timeout_secs, 600);
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "sever_url = \"typo\"").is_err());
    assert!(apply_file(&mut settings, "theme = \"sepia\"").is_err());
}

#[test]
fn namespaced_env_wins_over_legacy_env() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("DREAM_SERVER_URL", "http://legacy:8000"),
            ("DREAM_THEATER__SERVER_URL", "http://namespaced:8000"),
        ]),
    )
    .expect("overrides");
    assert_eq!(settings.server_url, "http://namespaced:8000");
}

#[test]
fn delay_env_switches_to_timed_curtains() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("DREAM_THEATER__CURTAIN_DELAY_MS", "800"),
            ("DREAM_THEATER__THEME", "Noir"),
            ("DREAM_THEATER__PLAYER", "  "),
            ("NO_COLOR", "1"),
        ]),
    )
    .expect("overrides");
    assert_eq!(
        settings.curtain_policy(),
        CurtainPolicy::AfterDelay(Duration::from_millis(800))
    );
    assert_eq!(settings.theme, ThemePreset::Noir);
    assert_eq!(settings.player_command, None);
    assert!(!settings.color);
}

#[test]
fn malformed_env_values_are_errors() {
    let mut settings = Settings::default();
    let err = apply_env_overrides(
        &mut settings,
        lookup_from(&[("DREAM_THEATER__CURTAIN_DELAY_MS", "soon")]),
    )
    .expect_err("not a number");
    assert!(format!("{err:#}").contains("DREAM_THEATER__CURTAIN_DELAY_MS"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("theater.toml");
    fs::write(&path, "request_timeout_secs = 42\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.request_timeout_secs, 42);
    assert_eq!(settings.request_timeout(), Duration::from_secs(42));
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let err = load_settings(Some(&path)).expect_err("missing file");
    assert!(format!("{err:#}").contains("absent.toml"));
}
