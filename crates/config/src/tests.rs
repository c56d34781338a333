use std::path::PathBuf;
use std::time::Duration;

use figment::Jail;
use secrecy::{ExposeSecret, Secret};

use crate::{AppConfig, RoutingConfig};

#[test]
fn test_secret_redaction() {
    let secret = Secret::new("my_endpoint_key".to_string());
    let debug_output = format!("{:?}", secret);
    assert!(debug_output.contains("Secret([REDACTED"));
    assert!(!debug_output.contains("my_endpoint_key"));
}

#[test]
fn test_config_struct_redaction() {
    let config = RoutingConfig {
        model_dir: PathBuf::from("/var/azureml-app/models"),
        request_timeout_secs: None,
        endpoint_key: Some(Secret::new("super-secret-key".to_string())),
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("super-secret-key"));
    assert!(debug_output.contains("Secret([REDACTED"));
}

#[test]
fn test_defaults_without_sources() {
    Jail::expect_with(|_jail| {
        let config: AppConfig = AppConfig::figment(".").extract()?;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.routing.model_dir, PathBuf::from("models"));
        assert!(config.routing.request_timeout().is_none());
        assert!(config.is_development());
        Ok(())
    });
}

#[test]
fn test_toml_then_env_layering() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
                app_env = "production"

                [server]
                port = 5001

                [routing]
                model_dir = "/from/toml"
                request_timeout_secs = 30
            "#,
        )?;
        jail.set_env("MANYMODELS_SERVER__PORT", "9000");
        jail.set_env("MANYMODELS_ROUTING__ENDPOINT_KEY", "k3y");

        let config: AppConfig = AppConfig::figment(".").extract()?;
        assert!(config.is_production());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.routing.model_dir, PathBuf::from("/from/toml"));
        assert_eq!(config.routing.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.routing.endpoint_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("k3y")
        );
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        Ok(())
    });
}

#[test]
fn test_platform_model_dir_wins() {
    Jail::expect_with(|jail| {
        jail.set_env("MANYMODELS_ROUTING__MODEL_DIR", "/from/env");
        jail.set_env("AZUREML_MODEL_DIR", "/var/azureml-app/azureml-models");

        let config: AppConfig = AppConfig::figment(".").extract()?;
        assert_eq!(
            config.routing.model_dir,
            PathBuf::from("/var/azureml-app/azureml-models")
        );
        Ok(())
    });
}

#[test]
fn test_app_env_selects_overlay_file() {
    Jail::expect_with(|jail| {
        jail.create_file("default.toml", "[telemetry]\nlog_level = \"info\"")?;
        jail.create_file("staging.toml", "[telemetry]\nlog_level = \"debug\"\njson = true")?;
        jail.set_env("APP_ENV", "staging");

        let config: AppConfig = AppConfig::figment(".").extract()?;
        assert_eq!(config.telemetry.log_level, "debug");
        assert!(config.telemetry.json);
        Ok(())
    });
}

#[test]
fn test_invalid_value_is_load_error() {
    Jail::expect_with(|jail| {
        jail.create_file("default.toml", "[server]\nport = \"not-a-port\"")?;

        let err = AppConfig::load(".").unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
        Ok(())
    });
}
