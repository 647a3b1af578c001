use crate::config::toml_config::EndpointConfig;
use crate::core::fetcher::Fetcher;
use crate::core::{JsonFetcher, MovieSearchResponse};
use crate::utils::error::Result;
use reqwest::Method;
use serde_json::{Map, Value};

/// Daum 電影名稱搜尋；`output=json` 由設定的預設參數帶入
pub struct MovieSearchService<F: JsonFetcher> {
    fetcher: F,
    path: String,
}

impl MovieSearchService<Fetcher> {
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(Fetcher::new(config.fetcher.clone()), config.path.clone())
    }
}

impl<F: JsonFetcher> MovieSearchService<F> {
    pub fn new(fetcher: F, path: impl Into<String>) -> Self {
        Self {
            fetcher,
            path: path.into(),
        }
    }

    pub async fn search(&self, name: &str) -> Result<MovieSearchResponse> {
        let mut data = Map::new();
        data.insert("q".to_string(), Value::String(name.to_string()));

        let value = self.fetcher.fetch(&self.path, Method::GET, &data).await?;
        let response = MovieSearchResponse::from_value(value)?;
        tracing::info!(
            "🔎 {} items found for {}",
            response.channel.item.len(),
            name
        );
        Ok(response)
    }
}
