use crate::providers::traits::FoodLookup;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

pub const NO_DATA: &str = "No specific data found.";
pub const OFFLINE: &str = "Offline Mode: Using internal knowledge base.";

/// Web search over DuckDuckGo's HTML endpoint, biased towards cooked Indian
/// food portions.
#[derive(Clone)]
pub struct DuckDuckGoLookup {
    client: Client,
    base_url: String,
}

impl DuckDuckGoLookup {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (compatible; hostelfit)")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    pub fn build_query(query: &str) -> String {
        format!(
            "{} cooked indian food nutritional value protein calories 100g average",
            query.trim()
        )
    }

    async fn fetch_first_snippet(&self, query: &str) -> Result<Option<String>> {
        let url = format!(
            "{}?q={}",
            self.base_url,
            urlencoding::encode(&Self::build_query(query))
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("search returned status {}", response.status()));
        }

        let html = response.text().await?;
        Ok(first_snippet(&html))
    }
}

fn first_snippet(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".result__snippet").ok()?;

    document
        .select(&selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|text| !text.is_empty())
}

#[async_trait]
impl FoodLookup for DuckDuckGoLookup {
    async fn search(&self, query: &str) -> String {
        match self.fetch_first_snippet(query).await {
            Ok(Some(snippet)) => snippet,
            Ok(None) => NO_DATA.to_string(),
            Err(e) => {
                tracing::debug!(error = %e, "Food lookup failed, using fallback");
                OFFLINE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="https://example.com">Paneer</a>
            <a class="result__snippet" href="https://example.com">Paneer has <b>18g</b> protein
              per 100g and 265 calories.</a>
          </div>
          <div class="result">
            <a class="result__snippet" href="https://example.org">Second result</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_first_snippet_flattens_markup() {
        assert_eq!(
            first_snippet(RESULTS_PAGE).as_deref(),
            Some("Paneer has 18g protein per 100g and 265 calories.")
        );
    }

    #[test]
    fn test_first_snippet_none_without_results() {
        assert_eq!(first_snippet("<html><body>No results.</body></html>"), None);
    }

    #[tokio::test]
    async fn test_search_returns_first_snippet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", &DuckDuckGoLookup::build_query("paneer")))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .mount(&server)
            .await;

        let lookup = DuckDuckGoLookup::new(&server.uri());
        assert!(lookup.search("paneer").await.starts_with("Paneer has 18g protein"));
    }

    #[tokio::test]
    async fn test_search_without_results_uses_no_data_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let lookup = DuckDuckGoLookup::new(&server.uri());
        assert_eq!(lookup.search("dal").await, NO_DATA);
    }

    #[tokio::test]
    async fn test_search_failure_falls_back_to_offline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let lookup = DuckDuckGoLookup::new(&server.uri());
        assert_eq!(lookup.search("dal").await, OFFLINE);
    }
}
