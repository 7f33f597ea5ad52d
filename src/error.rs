use thiserror::Error;

/// Startup and configuration failures. These end the process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("API key not found. Set GOOGLE_API_KEY or pass --api-key.")]
    MissingApiKey,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Failures of a single analysis request. The session keeps running.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please write what you ate OR upload a photo.")]
    MissingInput,
    #[error("Error: AI Service Busy.")]
    ServiceBusy,
    #[error("Could not analyze. Please try again.")]
    Unparseable { raw: String },
    #[error("Could not read image: {0}")]
    Image(String),
}

impl AnalysisError {
    /// Raw model output kept for debug display, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            AnalysisError::Unparseable { raw } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_messages() {
        assert_eq!(AnalysisError::ServiceBusy.to_string(), "Error: AI Service Busy.");
        assert_eq!(
            AnalysisError::MissingInput.to_string(),
            "Please write what you ate OR upload a photo."
        );
    }

    #[test]
    fn test_raw_output_only_for_unparseable() {
        let err = AnalysisError::Unparseable { raw: "not json".to_string() };
        assert_eq!(err.raw_output(), Some("not json"));
        assert_eq!(AnalysisError::ServiceBusy.raw_output(), None);
    }
}
