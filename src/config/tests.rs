use std::io::Write;

use serial_test::serial;

use super::*;

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr, "127.0.0.1:9000".parse().unwrap());
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.ttl, Duration::from_secs(600));
    assert_eq!(settings.cache.revalidate, Duration::from_secs(300));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.ttl_seconds = Some(60);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_ttl_seconds: Some(120),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.ttl, Duration::from_secs(120));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_durations_are_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.revalidate_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero revalidate window");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.revalidate_seconds",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.cache.ttl_seconds = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero ttl");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.ttl_seconds",
            ..
        }
    ));
}

#[test]
fn revalidate_longer_than_ttl_is_accepted() {
    let mut raw = RawSettings::default();
    raw.cache.ttl_seconds = Some(60);
    raw.cache.revalidate_seconds = Some(120);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.cache.revalidate, Duration::from_secs(120));
}

#[test]
fn invalid_host_is_reported() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("not a host".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid host");
    assert!(err.to_string().contains("server.addr"));
}

#[test]
fn invalid_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["swrcache"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "swrcache",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--cache-enabled",
        "false",
        "--cache-revalidate-seconds",
        "30",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(serve.overrides.cache_enabled, Some(false));
            assert_eq!(serve.overrides.cache_revalidate_seconds, Some(30));
        }
    }
}

#[test]
#[serial]
fn config_file_then_cli_precedence() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    writeln!(
        file,
        "[server]\nport = 9100\n\n[cache]\nttl_seconds = 900\nrevalidate_seconds = 60\n"
    )
    .expect("write config");

    let args = CliArgs::parse_from([
        "swrcache",
        "--config-file",
        file.path().to_str().expect("utf-8 path"),
        "serve",
        "--cache-revalidate-seconds",
        "45",
    ]);
    let settings = load(&args).expect("settings load");

    assert_eq!(settings.server.addr.port(), 9100);
    assert_eq!(settings.cache.ttl, Duration::from_secs(900));
    assert_eq!(settings.cache.revalidate, Duration::from_secs(45));
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    // SAFETY: serialized with other environment-touching tests.
    unsafe {
        std::env::set_var("SWRCACHE__CACHE__TTL_SECONDS", "1200");
    }

    let args = CliArgs::parse_from(["swrcache"]);
    let result = load(&args);

    unsafe {
        std::env::remove_var("SWRCACHE__CACHE__TTL_SECONDS");
    }

    let settings = result.expect("settings load");
    assert_eq!(settings.cache.ttl, Duration::from_secs(1200));
}
