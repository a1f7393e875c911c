use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CraftError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Thin HTTP wrapper shared by every fetcher: one `Client`, one user agent,
/// and uniform handling of non-success statuses.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: Client,
    prices: String,
    wiki: String,
    hiscores: String,
}

impl WikiClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let http = Client::builder().user_agent(config.user_agent()).build()?;
        Ok(Self {
            http,
            prices: trim_base(config.prices_endpoint()),
            wiki: trim_base(config.wiki_endpoint()),
            hiscores: config.hiscores_endpoint().to_string(),
        })
    }

    pub fn prices_url(&self, path: &str) -> String {
        format!("{}/{}", self.prices, path.trim_start_matches('/'))
    }

    pub fn wiki_api_url(&self) -> String {
        format!("{}/api.php", self.wiki)
    }

    /// Article URLs use underscores in place of spaces.
    pub fn article_url(&self, title: &str) -> String {
        format!("{}/w/{}", self.wiki, title.replace(' ', "_"))
    }

    pub fn hiscores_url(&self) -> &str {
        &self.hiscores
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.send(url, query).await?;
        Ok(response.json().await?)
    }

    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.send(url, query).await?;
        Ok(response.text().await?)
    }

    async fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        tracing::debug!("Making API request to: {} {:?}", url, query);
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(CraftError::HttpStatus {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
