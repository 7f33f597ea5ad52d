use crate::error::AnalysisError;
use crate::food::analysis::nutrition::{parse_meal_analysis, MealAnalysis};
use crate::food::profile::UserProfile;
use crate::food::prompt::{compose_analyst_prompt, compose_coach_prompt, AnalysisMode};
use crate::providers::traits::{CompletionProvider, FoodLookup, InlineImage};
use std::time::Duration;

/// Fixed-count retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            delay: Duration::from_secs(1),
        }
    }
}

/// One user request: what they typed and/or photographed.
#[derive(Debug, Clone, Copy)]
pub struct MealRequest<'a> {
    pub mode: AnalysisMode,
    pub notes: Option<&'a str>,
    pub image: Option<&'a InlineImage>,
}

impl<'a> MealRequest<'a> {
    fn trimmed_notes(&self) -> Option<&'a str> {
        self.notes.map(str::trim).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealReport {
    pub analysis: MealAnalysis,
    /// Set when the coach stage ran and replaced the analyst's advice.
    pub coached: bool,
}

/// Analyst (and optional coach) over a hosted completion provider.
pub struct NutritionAgent {
    provider: Box<dyn CompletionProvider + Send + Sync>,
    lookup: Option<Box<dyn FoodLookup + Send + Sync>>,
    retry: RetryPolicy,
    coach_enabled: bool,
}

impl NutritionAgent {
    pub fn new(provider: Box<dyn CompletionProvider + Send + Sync>) -> Self {
        Self {
            provider,
            lookup: None,
            retry: RetryPolicy::default(),
            coach_enabled: false,
        }
    }

    pub fn with_lookup(mut self, lookup: Box<dyn FoodLookup + Send + Sync>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_coach(mut self, enabled: bool) -> Self {
        self.coach_enabled = enabled;
        self
    }

    pub fn lookup_enabled(&self) -> bool {
        self.lookup.is_some()
    }

    pub fn coach_enabled(&self) -> bool {
        self.coach_enabled
    }

    pub async fn model_name(&self) -> String {
        self.provider
            .get_model_info()
            .await
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Runs the analyst stage and returns the model's raw text.
    pub async fn analyze_raw(
        &self,
        profile: &UserProfile,
        request: MealRequest<'_>,
    ) -> Result<String, AnalysisError> {
        let notes = request.trimmed_notes();
        if notes.is_none() && request.image.is_none() {
            return Err(AnalysisError::MissingInput);
        }

        let reference = match (&self.lookup, notes) {
            (Some(lookup), Some(notes)) => Some(lookup.search(notes).await),
            _ => None,
        };

        let prompt = compose_analyst_prompt(request.mode, profile, notes, reference.as_deref());
        self.complete_with_retry(&prompt, request.image).await
    }

    /// Full pipeline: analyst call, normalization, then the coach stage if
    /// enabled.
    pub async fn analyze(
        &self,
        profile: &UserProfile,
        request: MealRequest<'_>,
    ) -> Result<MealReport, AnalysisError> {
        let raw = self.analyze_raw(profile, request).await?;
        let mut analysis = parse_meal_analysis(&raw)?;

        let mut coached = false;
        if self.coach_enabled {
            if let Some(advice) = self.coach(profile, request.mode, &analysis).await {
                analysis.advice = advice;
                coached = true;
            }
        }

        Ok(MealReport { analysis, coached })
    }

    async fn coach(
        &self,
        profile: &UserProfile,
        mode: AnalysisMode,
        analysis: &MealAnalysis,
    ) -> Option<String> {
        let analysis_json = match serde_json::to_string_pretty(analysis) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize analysis for coach stage");
                return None;
            }
        };

        let prompt = compose_coach_prompt(mode, profile, &analysis_json);
        match self.complete_with_retry(&prompt, None).await {
            Ok(advice) if !advice.trim().is_empty() => Some(advice.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Coach stage failed, keeping analyst advice");
                None
            }
        }
    }

    async fn complete_with_retry(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, AnalysisError> {
        let attempts = self.retry.attempts.max(1);

        for attempt in 1..=attempts {
            match self.provider.complete(prompt, image).await {
                Ok(text) => {
                    tracing::debug!(attempt, response_len = text.len(), "Model response received");
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!(attempt, max_attempts = attempts, error = %e, "Model call failed");
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        Err(AnalysisError::ServiceBusy)
    }
}
