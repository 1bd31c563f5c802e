//! Gateway and model configuration. Loaded from defaults, an optional TOML file, then
//! `SOUL__*` environment variables.

use crate::error::{SoulError, SoulResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_CONFIG_PATH: &str = "SOUL_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/gateway";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
/// Prebuilt voice that handles Indian English well.
pub const DEFAULT_TTS_VOICE: &str = "Algenib";

/// Where model calls go: a deterministic offline backend, or the live API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoulConfig {
    /// Title shown in the chat header.
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub llm_mode: LlmMode,
    pub gemini_api_base: String,
    /// Falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY` when not set in file or `SOUL__` env.
    #[serde(default, skip_serializing)]
    pub gemini_api_key: Option<String>,
    pub text_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub request_timeout_secs: u64,
    /// Upper bound for request bodies; voice clips arrive base64-encoded.
    pub max_body_bytes: usize,
    /// Origins allowed by CORS. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// If set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Synthesize spoken replies for voice messages.
    pub speech_enabled: bool,
}

impl Default for SoulConfig {
    fn default() -> Self {
        Self {
            app_name: "SecureSoulAI Assistant".to_string(),
            host: "127.0.0.1".to_string(),
            port: 9002,
            llm_mode: LlmMode::Mock,
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            gemini_api_key: None,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            request_timeout_secs: 60,
            max_body_bytes: 10 * 1024 * 1024,
            cors_origins: Vec::new(),
            log_dir: None,
            speech_enabled: true,
        }
    }
}

impl SoulConfig {
    /// Load config. Precedence: `SOUL__*` env > file (`SOUL_CONFIG` or `config/gateway.toml`) > defaults.
    pub fn load() -> SoulResult<Self> {
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Some(Path::new(&path)))
    }

    /// Load with an explicit optional file path. A missing file is not an error.
    pub fn load_from(path: Option<&Path>) -> SoulResult<Self> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("llm_mode", "mock")?
            .set_default("gemini_api_base", defaults.gemini_api_base)?
            .set_default("text_model", defaults.text_model)?
            .set_default("tts_model", defaults.tts_model)?
            .set_default("tts_voice", defaults.tts_voice)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .set_default("speech_enabled", defaults.speech_enabled)?;

        let builder = match path {
            Some(p) => builder.add_source(config::File::from(p).required(false)),
            None => builder,
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("SOUL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: SoulConfig = built.try_deserialize()?;
        if cfg.gemini_api_key.as_deref().map(str::trim).unwrap_or("").is_empty() {
            cfg.gemini_api_key = std::env::var(ENV_GEMINI_API_KEY)
                .or_else(|_| std::env::var(ENV_GOOGLE_API_KEY))
                .ok();
        }
        cfg.gemini_api_key = cfg
            .gemini_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the gateway cannot start with.
    pub fn validate(&self) -> SoulResult<()> {
        if self.llm_mode == LlmMode::Live && self.gemini_api_key.is_none() {
            return Err(SoulError::Config(format!(
                "llm_mode = \"live\" requires {} or {} (or SOUL__GEMINI_API_KEY)",
                ENV_GEMINI_API_KEY, ENV_GOOGLE_API_KEY
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(SoulError::Config("request_timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = SoulConfig::load_from(Some(Path::new("does/not/exist"))).unwrap();
        assert_eq!(cfg.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(cfg.tts_voice, DEFAULT_TTS_VOICE);
        assert!(cfg.speech_enabled);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "app_name = \"Test Soul\"\nport = 4100\ntts_voice = \"Kore\"\ncors_origins = [\"http://localhost:3000\"]"
        )
        .unwrap();
        let cfg = SoulConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(cfg.app_name, "Test Soul");
        assert_eq!(cfg.port, 4100);
        assert_eq!(cfg.tts_voice, "Kore");
        assert_eq!(cfg.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(cfg.bind_addr(), "127.0.0.1:4100");
    }

    #[test]
    fn live_mode_without_key_is_rejected() {
        let cfg = SoulConfig {
            llm_mode: LlmMode::Live,
            gemini_api_key: None,
            ..SoulConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SoulError::Config(_))));
    }

    #[test]
    fn live_mode_with_key_is_accepted() {
        let cfg = SoulConfig {
            llm_mode: LlmMode::Live,
            gemini_api_key: Some("test-key".into()),
            ..SoulConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
