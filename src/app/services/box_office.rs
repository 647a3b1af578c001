use crate::config::toml_config::EndpointConfig;
use crate::core::fetcher::Fetcher;
use crate::core::{BoxOfficeResponse, JsonFetcher};
use crate::utils::error::Result;
use reqwest::Method;
use serde_json::{Map, Value};

/// KOBIS 每日票房查詢
pub struct BoxOfficeService<F: JsonFetcher> {
    fetcher: F,
    path: String,
}

impl BoxOfficeService<Fetcher> {
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(Fetcher::new(config.fetcher.clone()), config.path.clone())
    }
}

impl<F: JsonFetcher> BoxOfficeService<F> {
    pub fn new(fetcher: F, path: impl Into<String>) -> Self {
        Self {
            fetcher,
            path: path.into(),
        }
    }

    /// 不做型別檢查的原始回應
    pub async fn fetch_raw(&self, target_dt: &str) -> Result<Value> {
        let mut data = Map::new();
        data.insert("targetDt".to_string(), Value::String(target_dt.to_string()));

        tracing::debug!("Fetching daily box office for {}", target_dt);
        self.fetcher.fetch(&self.path, Method::GET, &data).await
    }

    pub async fn daily(&self, target_dt: &str) -> Result<BoxOfficeResponse> {
        let value = self.fetch_raw(target_dt).await?;
        let response = BoxOfficeResponse::from_value(value)?;
        tracing::info!(
            "📽️ {} movies in box office for {}",
            response.box_office_result.daily_box_office_list.len(),
            target_dt
        );
        Ok(response)
    }
}
