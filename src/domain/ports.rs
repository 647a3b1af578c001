use crate::domain::model::Movie;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};

/// 對單一主機發出 JSON 請求，回傳解析後的回應
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch(&self, endpoint: &str, method: Method, data: &Map<String, Value>)
        -> Result<Value>;
}

/// 外部文件資料庫
pub trait MovieStore: Send + Sync {
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Movie>>> + Send;
    fn create(
        &self,
        fields: Map<String, Value>,
    ) -> impl std::future::Future<Output = Result<Movie>> + Send;
    fn update(&self, movie: Movie) -> impl std::future::Future<Output = Result<Movie>> + Send;
    fn delete(&self, id: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
