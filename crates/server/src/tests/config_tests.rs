use super::*;

#[test]
fn defaults_match_the_local_web_client_setup() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:8000");
    assert_eq!(settings.allowed_origins, vec!["http://localhost:3000"]);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_overrides_known_keys() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
bind_addr = "0.0.0.0:9000"
allowed_origins = "http://a.test, http://b.test/"
log_filter = "debug"
"#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(
        settings.allowed_origins,
        vec!["http://a.test", "http://b.test"]
    );
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn unparseable_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, "bind_addr = [not, a, string");
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_bind() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SERVER_BIND", "127.0.0.1:1111"),
        ("APP__BIND_ADDR", "127.0.0.1:2222"),
        ("APP__ALLOWED_ORIGINS", ""),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.server_bind, "127.0.0.1:2222");
    assert!(settings.allowed_origins.is_empty());
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn blank_log_filter_keeps_previous_value() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| {
        (key == "APP__LOG_FILTER").then(|| "   ".to_string())
    });
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn parse_origins_drops_blanks() {
    assert_eq!(
        parse_origins(" http://x.test ,, http://y.test/ ,"),
        vec!["http://x.test", "http://y.test"]
    );
}
