use std::path::Path;

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.page_size == 0 {
        return Err(ConfigError::Validation {
            message: "page_size must be greater than 0".to_string(),
        });
    }

    if config.uploads.max_file_bytes == 0 {
        return Err(ConfigError::Validation {
            message: "uploads.max_file_bytes must be greater than 0".to_string(),
        });
    }

    if config.uploads.allowed_content_types.is_empty() {
        return Err(ConfigError::Validation {
            message: "uploads.allowed_content_types must not be empty".to_string(),
        });
    }

    for content_type in &config.uploads.allowed_content_types {
        if !is_valid_mime(content_type) {
            return Err(ConfigError::Validation {
                message: format!("Invalid content type '{}'", content_type),
            });
        }
    }

    if config.server.listen_address.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "server.listen_address must not be empty".to_string(),
        });
    }

    Ok(())
}

/// `type/subtype`, both non-empty tokens without wildcards.
fn is_valid_mime(value: &str) -> bool {
    let is_token = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'))
    };
    match value.split_once('/') {
        Some((kind, sub)) => is_token(kind) && is_token(sub),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DatabaseErrorPolicy;
    use crate::storage::SaveMode;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load_config_from_str(r#"{ "version": "1.0" }"#).unwrap();
        assert_eq!(config.uploads_directory, "uploads");
        assert_eq!(config.page_size, 6);
        assert_eq!(config.uploads.max_file_bytes, 2 * 1024 * 1024);
        assert_eq!(
            config.uploads.allowed_content_types,
            ["image/png", "image/jpeg", "application/pdf"]
        );
        assert_eq!(config.uploads.create_mode, SaveMode::Direct);
        assert_eq!(
            config.database_error_policy,
            DatabaseErrorPolicy::FailClosed
        );
        assert_eq!(config.server.listen_address, "127.0.0.1:3000");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_full_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "uploads_directory": "/var/lib/docdesk/uploads",
            "database_path": "/var/lib/docdesk/docdesk.db",
            "page_size": 10,
            "uploads": {
                "max_file_bytes": 1048576,
                "allowed_content_types": ["application/pdf"],
                "create_mode": "unique"
            },
            "database_error_policy": "fail_open",
            "server": { "listen_address": "0.0.0.0:8080" }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.uploads_directory, "/var/lib/docdesk/uploads");
        assert_eq!(
            config.resolved_database_path().unwrap(),
            std::path::PathBuf::from("/var/lib/docdesk/docdesk.db")
        );
        assert_eq!(config.page_size, 10);
        assert_eq!(config.uploads.max_file_bytes, 1_048_576);
        assert_eq!(config.uploads.create_mode, SaveMode::Unique);
        assert_eq!(config.database_error_policy, DatabaseErrorPolicy::FailOpen);
        assert_eq!(config.server.listen_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_unsupported_version() {
        let err = load_config_from_str(r#"{ "version": "2.0" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_missing_version_fails_schema() {
        let err = load_config_from_str(r#"{ "page_size": 6 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
    }

    #[test]
    fn test_unknown_field_fails_schema() {
        let err = load_config_from_str(r#"{ "version": "1.0", "worker_count": 4 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
    }

    #[test]
    fn test_zero_page_size_fails_schema() {
        let err = load_config_from_str(r#"{ "version": "1.0", "page_size": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
    }

    #[test]
    fn test_unknown_policy_fails_schema() {
        let err =
            load_config_from_str(r#"{ "version": "1.0", "database_error_policy": "retry" }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
    }

    #[test]
    fn test_invalid_content_type() {
        let err = load_config_from_str(
            r#"{ "version": "1.0", "uploads": { "allowed_content_types": ["image/*"] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = load_config_from_str("{ version: 1.0 ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docdesk.json");
        std::fs::write(&path, r#"{ "version": "1.0", "page_size": 3 }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.page_size, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_is_valid_mime() {
        assert!(is_valid_mime("application/pdf"));
        assert!(is_valid_mime("application/vnd.ms-excel"));
        assert!(is_valid_mime("image/svg+xml"));
        assert!(!is_valid_mime("pdf"));
        assert!(!is_valid_mime("image/"));
        assert!(!is_valid_mime("image/*"));
    }
}
