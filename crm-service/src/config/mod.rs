use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct CrmConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub database: DatabaseConfig,
    pub smtp: SmtpConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub service_name: String,
    /// OTLP collector; traces are only exported when set.
    pub otlp_endpoint: Option<String>,
}

impl CrmConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(CrmConfig {
            common: common_config,
            database: DatabaseConfig {
                url: get_env("CRM_DATABASE_URL", Some("sqlite://crm.db?mode=rwc"), is_prod)?,
                max_connections: get_env("CRM_DATABASE_MAX_CONNECTIONS", Some("5"), is_prod)?
                    .parse()
                    .unwrap_or(5),
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: get_env("SMTP_PORT", Some("587"), is_prod)?
                    .parse()
                    .unwrap_or(587),
                user: get_env("SMTP_USER", Some(""), is_prod)?,
                password: get_env("SMTP_PASSWORD", Some(""), is_prod)?,
                from_email: get_env("SMTP_FROM_EMAIL", Some("noreply@example.com"), is_prod)?,
                from_name: get_env("SMTP_FROM_NAME", Some("CRM Billing"), is_prod)?,
                enabled: env::var("SMTP_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            observability: ObservabilityConfig {
                service_name: env::var("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|_| "crm-service".to_string()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }

    /// Development settings against the given database, SMTP off.
    pub fn local(database_url: &str) -> Self {
        CrmConfig {
            common: core_config::Config::ephemeral(),
            database: DatabaseConfig {
                url: database_url.to_string(),
                max_connections: 5,
            },
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 25,
                user: String::new(),
                password: String::new(),
                from_email: "noreply@example.com".to_string(),
                from_name: "CRM Billing".to_string(),
                enabled: false,
            },
            observability: ObservabilityConfig {
                service_name: "crm-service".to_string(),
                otlp_endpoint: None,
            },
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
