//! Configuration module for the historial gateway.
//!
//! Loads configuration from YAML files and environment variables. The
//! credential and record tables live here too: they are read once at
//! startup and never change afterwards.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::access::AccessPolicyKind;
use crate::auth::ConfiguredUser;
use crate::domain::MedicalRecord;
use crate::logging::LogFormat;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default = "default_records")]
    pub records: Vec<MedicalRecord>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Token and credential configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens. Has no default on purpose.
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Token validity window in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
    #[serde(default = "default_users")]
    pub users: Vec<ConfiguredUser>,
}

/// Record access policy selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub policy: AccessPolicyKind,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Placeholder connection descriptor. Nothing connects to it.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub server: String,
    pub name: String,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (HISTORIAL__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml (if exists)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(env_source())
    }

    /// Same layering as [`Config::load`] with the environment layer supplied by the caller.
    fn load_with_env(env: Environment) -> Result<Self, ConfigError> {
        let config: Config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set (HISTORIAL__AUTH__JWT_SECRET)".to_string(),
            ));
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: default_issuer(),
            token_ttl_secs: default_token_ttl(),
            users: default_users(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            server: r"WIN-IG5U6V6SUTN\SQLEXPRESS02".to_string(),
            name: "HistoriasMedicas".to_string(),
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("HISTORIAL")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn default_issuer() -> String {
    "historial-gateway".to_string()
}

fn default_token_ttl() -> i64 {
    3600
}

fn default_users() -> Vec<ConfiguredUser> {
    vec![
        ConfiguredUser::new("doctor", "password123"),
        ConfiguredUser::new("admin", "adminsecure"),
    ]
}

fn default_records() -> Vec<MedicalRecord> {
    vec![
        MedicalRecord::new(101, "Ana Pérez", "APENDICITIS AGUDA", "Riesgo de fuga")
            .assigned_to(["admin"]),
        MedicalRecord::new(202, "Beto Gómez", "NEUMONÍA BACTERIANA", "Contrato 002")
            .assigned_to(["doctor"]),
        MedicalRecord::new(303, "Carlos Díaz", "MIGRAÑA CRÓNICA", "Cuenta Bancaria")
            .assigned_to(["admin"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(vars))
    }

    fn base_config() -> Config {
        Config {
            server: ServerConfig::default(),
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                ..AuthConfig::default()
            },
            access: AccessConfig::default(),
            logging: LoggingConfig::default(),
            database: DatabaseConfig::default(),
            records: default_records(),
        }
    }

    #[test]
    fn test_default_fixtures() {
        let auth = AuthConfig::default();
        assert_eq!(auth.token_ttl_secs, 3600);
        assert_eq!(auth.users.len(), 2);
        assert!(auth.users.iter().any(|u| u.username == "doctor"));

        let records = default_records();
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![101, 202, 303]);
    }

    #[test]
    fn test_default_policy_is_no_ownership_check() {
        assert_eq!(
            AccessConfig::default().policy,
            AccessPolicyKind::NoOwnershipCheck
        );
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        config.auth.jwt_secret = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let mut config = base_config();
        config.auth.token_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_yaml_source() {
        let yaml = r#"
auth:
  jwt_secret: "from-yaml"
access:
  policy: "owner_only"
records:
  - id: 7
    patient_name: "Test"
    diagnosis: "NONE"
    sensitive_note: "n/a"
"#;
        let config: Config = ConfigLoader::builder()
            .add_source(File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.auth.jwt_secret, "from-yaml");
        assert_eq!(config.access.policy, AccessPolicyKind::OwnerOnly);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.records.len(), 1);
        assert!(config.records[0].assigned_to.is_empty());
        assert_eq!(config.auth.users.len(), 2);
    }

    #[test]
    fn test_env_overrides_default_file() {
        let config = Config::load_with_env(env_with(&[
            ("HISTORIAL__AUTH__JWT_SECRET", "env-secret"),
            ("HISTORIAL__SERVER__PORT", "8080"),
            ("HISTORIAL__ACCESS__POLICY", "owner_only"),
        ]))
        .unwrap();

        assert_eq!(config.auth.jwt_secret, "env-secret");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.access.policy, AccessPolicyKind::OwnerOnly);

        // Untouched keys still come from config/default.yaml
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.users.len(), 2);
        let ids: Vec<i64> = config.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![101, 202, 303]);
        assert!(config.records[1].is_assigned_to("doctor"));
    }

    #[test]
    fn test_load_without_secret_fails() {
        assert!(Config::load_with_env(env_with(&[])).is_err());
    }
}
