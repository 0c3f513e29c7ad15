// Analyzer configuration
// Read from the environment; absent keys select defaults

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    ANALYZE_TIMEOUT_MS_DEFAULT, ENV_ANALYZE_TIMEOUT_MS, ENV_CUSTOM_MODEL_PATH, ENV_USE_CUSTOM_MODEL,
    ENV_VISION_API_KEY, ENV_VISION_ENDPOINT, VISION_ENDPOINT_DEFAULT,
};
use crate::error::{PhotoCriticError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Cloud Vision API key; None disables the vision backend
    pub vision_api_key: Option<String>,
    pub vision_endpoint: String,
    pub use_custom_model: bool,
    /// Forwarded to the evaluator as CUSTOM_MODEL_PATH
    pub custom_model_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            vision_api_key: None,
            vision_endpoint: VISION_ENDPOINT_DEFAULT.to_string(),
            use_custom_model: false,
            custom_model_path: None,
            timeout: Duration::from_millis(ANALYZE_TIMEOUT_MS_DEFAULT),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self> {
        let vision_api_key = non_empty_var(ENV_VISION_API_KEY);
        let vision_endpoint =
            non_empty_var(ENV_VISION_ENDPOINT).unwrap_or_else(|| VISION_ENDPOINT_DEFAULT.to_string());
        let use_custom_model = non_empty_var(ENV_USE_CUSTOM_MODEL)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let custom_model_path = non_empty_var(ENV_CUSTOM_MODEL_PATH).map(PathBuf::from);

        let timeout = match non_empty_var(ENV_ANALYZE_TIMEOUT_MS) {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|_| {
                    PhotoCriticError::Config(format!("{} must be milliseconds, got '{}'", ENV_ANALYZE_TIMEOUT_MS, raw))
                })?;
                if ms == 0 {
                    return Err(PhotoCriticError::Config(format!("{} must be greater than zero", ENV_ANALYZE_TIMEOUT_MS)));
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(ANALYZE_TIMEOUT_MS_DEFAULT),
        };

        Ok(Self {
            vision_api_key,
            vision_endpoint,
            use_custom_model,
            custom_model_path,
            timeout,
        })
    }

    pub fn vision_enabled(&self) -> bool {
        self.vision_api_key.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Serializes tests that mutate the process environment
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_env() {
        for key in [
            ENV_VISION_API_KEY,
            ENV_VISION_ENDPOINT,
            ENV_USE_CUSTOM_MODEL,
            ENV_CUSTOM_MODEL_PATH,
            ENV_ANALYZE_TIMEOUT_MS,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults_when_env_missing() {
        let _lock = env_guard().lock().unwrap_or_else(|e| e.into_inner());
        reset_env();

        let config = AnalyzerConfig::from_env().unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert!(!config.vision_enabled());
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_reads_overrides() {
        let _lock = env_guard().lock().unwrap_or_else(|e| e.into_inner());
        reset_env();
        env::set_var(ENV_VISION_API_KEY, "secret");
        env::set_var(ENV_VISION_ENDPOINT, "http://127.0.0.1:9/annotate");
        env::set_var(ENV_USE_CUSTOM_MODEL, "Yes");
        env::set_var(ENV_CUSTOM_MODEL_PATH, "/models/aesthetic.pth");
        env::set_var(ENV_ANALYZE_TIMEOUT_MS, "2500");

        let config = AnalyzerConfig::from_env().unwrap();
        reset_env();

        assert_eq!(config.vision_api_key.as_deref(), Some("secret"));
        assert_eq!(config.vision_endpoint, "http://127.0.0.1:9/annotate");
        assert!(config.use_custom_model);
        assert_eq!(config.custom_model_path, Some(PathBuf::from("/models/aesthetic.pth")));
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_blank_api_key_disables_vision() {
        let _lock = env_guard().lock().unwrap_or_else(|e| e.into_inner());
        reset_env();
        env::set_var(ENV_VISION_API_KEY, "   ");

        let config = AnalyzerConfig::from_env().unwrap();
        reset_env();
        assert!(!config.vision_enabled());
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let _lock = env_guard().lock().unwrap_or_else(|e| e.into_inner());
        reset_env();

        for bad in ["soon", "0", "-5"] {
            env::set_var(ENV_ANALYZE_TIMEOUT_MS, bad);
            let err = AnalyzerConfig::from_env().unwrap_err();
            assert!(matches!(err, PhotoCriticError::Config(_)), "{} accepted", bad);
        }
        reset_env();
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" ON "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("maybe"));
    }
}
