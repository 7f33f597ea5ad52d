use crate::error::AppError;
use std::env;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LOOKUP_URL: &str = "https://html.duckduckgo.com/html/";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Candidate model identifiers, tried in order.
    pub models: Vec<String>,
    pub api_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    fn from_lookup<F>(provider: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = provider.to_uppercase();

        let models = lookup(&format!("{}_MODELS", prefix))
            .map(|m| {
                m.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| match provider {
                "gemini" => vec![
                    "gemini-1.5-flash".to_string(),
                    "gemini-1.5-flash-latest".to_string(),
                    "gemini-pro".to_string(),
                ],
                _ => vec![],
            });

        let api_url = lookup(&format!("{}_API_URL", prefix))
            .unwrap_or_else(|| match provider {
                "gemini" => DEFAULT_GEMINI_API_URL.to_string(),
                _ => String::new(),
            })
            .trim_end_matches('/')
            .to_string();

        let temperature = lookup(&format!("{}_TEMPERATURE", prefix))
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.4);

        let timeout_secs = lookup(&format!("{}_TIMEOUT_SECS", prefix))
            .and_then(|t| t.parse().ok())
            .unwrap_or(60);

        Self {
            models,
            api_url,
            temperature,
            timeout_secs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub gemini: ProviderConfig,
    /// Meals at or above this many grams of protein count as high protein.
    pub protein_threshold_g: f64,
    pub lookup_enabled: bool,
    pub lookup_url: String,
}

impl AppConfig {
    /// Loads configuration from the environment. A key passed on the command
    /// line wins over `GOOGLE_API_KEY`.
    pub fn from_env(api_key_override: Option<String>) -> Result<Self, AppError> {
        Self::from_lookup(api_key_override, |key| env::var(key).ok())
    }

    fn from_lookup<F>(api_key_override: Option<String>, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = api_key_override
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or(AppError::MissingApiKey)?;

        let protein_threshold_g = match lookup("PROTEIN_THRESHOLD_G") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| {
                    AppError::Config(format!("PROTEIN_THRESHOLD_G must be a non-negative number, got '{}'", raw))
                })?,
            None => 30.0,
        };

        let lookup_enabled = lookup("LOOKUP_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        let lookup_url = lookup("LOOKUP_URL").unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string());

        Ok(Self {
            api_key,
            gemini: ProviderConfig::from_lookup("gemini", &lookup),
            protein_threshold_g,
            lookup_enabled,
            lookup_url,
        })
    }
}
