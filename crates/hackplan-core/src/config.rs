use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 18620;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Default scheduling granularity. Estimates round up to whole slots.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;
/// Default bearer token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 72;

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const GROQ_DEFAULT_BASE_URL: &str = "https://api.groq.com";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Top-level config (hackplan.toml + HACKPLAN_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackplanConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Default for HackplanConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                port: DEFAULT_PORT,
                bind: DEFAULT_BIND.to_string(),
            },
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            providers: ProvidersConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Token signing settings. The secret MUST be overridden in production
/// (HACKPLAN_AUTH__TOKEN_SECRET) — the default exists only so a fresh
/// checkout boots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    pub gemini: Option<GeminiConfig>,
    pub groq: Option<GroqConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,
    #[serde(default = "default_groq_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_token_secret() -> String {
    "change-me".to_string()
}
fn default_token_ttl() -> u32 {
    DEFAULT_TOKEN_TTL_HOURS
}
fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}
fn default_gemini_base_url() -> String {
    GEMINI_DEFAULT_BASE_URL.to_string()
}
fn default_gemini_model() -> String {
    GEMINI_DEFAULT_MODEL.to_string()
}
fn default_groq_base_url() -> String {
    GROQ_DEFAULT_BASE_URL.to_string()
}
fn default_groq_model() -> String {
    GROQ_DEFAULT_MODEL.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.hackplan/hackplan.db", home)
}

impl HackplanConfig {
    /// Load config from a TOML file with HACKPLAN_* env var overrides.
    /// Nesting is spelled with a double underscore so snake_case keys stay
    /// addressable: `HACKPLAN_AUTH__TOKEN_SECRET` overrides
    /// `auth.token_secret`.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.hackplan/hackplan.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: HackplanConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("HACKPLAN_").split("__"))
            .extract()
            .map_err(|e| crate::error::HackplanError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.hackplan/hackplan.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = HackplanConfig::default();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert_eq!(cfg.scheduler.slot_minutes, 30);
        assert!(cfg.providers.gemini.is_none());
        assert!(cfg.providers.groq.is_none());
        assert_eq!(cfg.auth.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
    }

    #[test]
    fn toml_round_trip_preserves_providers() {
        let mut cfg = HackplanConfig::default();
        cfg.providers.groq = Some(GroqConfig {
            api_key: "gsk_test".into(),
            base_url: default_groq_base_url(),
            model: default_groq_model(),
        });
        let s = toml_like(&cfg);
        let back: HackplanConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back.providers.groq.unwrap().api_key, "gsk_test");
    }

    // serde_json stands in for the TOML layer; figment drives both through serde.
    fn toml_like(cfg: &HackplanConfig) -> String {
        serde_json::to_string(cfg).unwrap()
    }

    #[test]
    fn env_overrides_reach_snake_case_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HACKPLAN_GATEWAY__PORT", "9999");
            jail.set_env("HACKPLAN_AUTH__TOKEN_SECRET", "supersecret");
            jail.set_env("HACKPLAN_SCHEDULER__SLOT_MINUTES", "15");
            let cfg = HackplanConfig::load(Some("hackplan.toml")).expect("config loads");
            assert_eq!(cfg.gateway.port, 9999);
            assert_eq!(cfg.auth.token_secret, "supersecret");
            assert_eq!(cfg.scheduler.slot_minutes, 15);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_beat_the_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "hackplan.toml",
                "[gateway]\nport = 1111\n\n[auth]\ntoken_secret = \"from-file\"\n",
            )?;
            jail.set_env("HACKPLAN_AUTH__TOKEN_SECRET", "from-env");
            let cfg = HackplanConfig::load(Some("hackplan.toml")).expect("config loads");
            assert_eq!(cfg.gateway.port, 1111);
            assert_eq!(cfg.auth.token_secret, "from-env");
            Ok(())
        });
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("hackplan.toml", "[gateway\nport = oops")?;
            let err = HackplanConfig::load(Some("hackplan.toml")).unwrap_err();
            assert!(matches!(err, crate::error::HackplanError::Config(_)));
            Ok(())
        });
    }
}
