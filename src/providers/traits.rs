use anyhow::Result;
use async_trait::async_trait;

/// An image attached to a generation request, sent inline as base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generates text for `prompt`, optionally grounded on an attached image.
    async fn complete(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String>;

    async fn get_model_info(&self) -> Result<String>;

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync>;
}

impl Clone for Box<dyn CompletionProvider + Send + Sync> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Looks up reference nutrition text for a food description.
///
/// Implementations never fail: they fall back to a fixed message instead.
#[async_trait]
pub trait FoodLookup: Send + Sync {
    async fn search(&self, query: &str) -> String;
}
