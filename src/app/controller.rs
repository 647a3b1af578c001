//! `Movie` 資源的 CRUD 操作，路由層只需把下列方法接到對應的 HTTP 動詞：
//!
//! ```text
//! GET     /api/movies        ->  index
//! POST    /api/movies        ->  create
//! GET     /api/movies/:id    ->  show
//! PUT     /api/movies/:id    ->  update
//! DELETE  /api/movies/:id    ->  destroy
//! ```

use crate::app::services::BoxOfficeService;
use crate::core::date_key::today_previous_day_key;
use crate::core::formatter::render;
use crate::core::{BoxOfficeResponse, JsonFetcher, MovieStore};
use crate::utils::error::{AppError, Result};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ControllerResponse {
    fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    fn error(err: &AppError) -> Self {
        Self::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        )
    }
}

pub struct MovieController<S: MovieStore, F: JsonFetcher> {
    store: S,
    box_office: BoxOfficeService<F>,
}

impl<S: MovieStore, F: JsonFetcher> MovieController<S, F> {
    pub fn new(store: S, box_office: BoxOfficeService<F>) -> Self {
        Self { store, box_office }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 回傳票房 API 的原始內容；沒指定日期時查前一天
    pub async fn index(&self, target_dt: Option<&str>) -> ControllerResponse {
        respond(self.try_index(target_dt).await)
    }

    pub async fn show(&self, id: &str) -> ControllerResponse {
        respond(self.try_show(id).await)
    }

    pub async fn create(&self, body: Value) -> ControllerResponse {
        respond(self.try_create(body).await)
    }

    pub async fn update(&self, id: &str, body: Value) -> ControllerResponse {
        respond(self.try_update(id, body).await)
    }

    pub async fn destroy(&self, id: &str) -> ControllerResponse {
        respond(self.try_destroy(id).await)
    }

    async fn try_index(&self, target_dt: Option<&str>) -> Result<ControllerResponse> {
        let target_dt = match target_dt {
            Some(key) => key.to_string(),
            None => today_previous_day_key()?,
        };

        let data = self.box_office.fetch_raw(&target_dt).await?;

        // 只為了日誌；格式不符時照樣回傳原始內容
        match BoxOfficeResponse::from_value(data.clone()).and_then(|r| render(&r)) {
            Ok(summary) => tracing::info!("Box office for {}:\n{}", target_dt, summary),
            Err(e) => tracing::warn!("Box office response not rendered: {}", e),
        }

        Ok(ControllerResponse::json(StatusCode::OK, data))
    }

    async fn try_show(&self, id: &str) -> Result<ControllerResponse> {
        Ok(match self.store.find_by_id(id).await? {
            Some(movie) => ControllerResponse::json(StatusCode::OK, movie.to_json()),
            None => ControllerResponse::empty(StatusCode::NOT_FOUND),
        })
    }

    async fn try_create(&self, body: Value) -> Result<ControllerResponse> {
        let movie = self.store.create(into_object(body)?).await?;
        tracing::debug!("Created movie {}", movie.id);
        Ok(ControllerResponse::json(StatusCode::CREATED, movie.to_json()))
    }

    async fn try_update(&self, id: &str, body: Value) -> Result<ControllerResponse> {
        let mut updates = into_object(body)?;
        updates.remove("_id");

        let Some(mut movie) = self.store.find_by_id(id).await? else {
            return Ok(ControllerResponse::empty(StatusCode::NOT_FOUND));
        };

        movie.merge(updates);
        let saved = self.store.update(movie).await?;
        Ok(ControllerResponse::json(StatusCode::OK, saved.to_json()))
    }

    async fn try_destroy(&self, id: &str) -> Result<ControllerResponse> {
        if self.store.find_by_id(id).await?.is_none() {
            return Ok(ControllerResponse::empty(StatusCode::NOT_FOUND));
        }

        self.store.delete(id).await?;
        Ok(ControllerResponse::empty(StatusCode::NO_CONTENT))
    }
}

fn respond(result: Result<ControllerResponse>) -> ControllerResponse {
    result.unwrap_or_else(|e| {
        tracing::error!("❌ Request failed: {} (Category: {:?})", e, e.category());
        ControllerResponse::error(&e)
    })
}

fn into_object(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(AppError::InvalidRequest {
            message: format!("Movie document must be a JSON object, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::InMemoryMovieStore;
    use crate::core::Movie;
    use async_trait::async_trait;
    use reqwest::Method;

    struct StaticFetcher(Result<Value>);

    #[async_trait]
    impl JsonFetcher for StaticFetcher {
        async fn fetch(&self, _: &str, _: Method, _: &Map<String, Value>) -> Result<Value> {
            match &self.0 {
                Ok(value) => Ok(value.clone()),
                Err(e) => Err(AppError::StoreError {
                    message: e.to_string(),
                }),
            }
        }
    }

    /// 每個操作都失敗的儲存層
    struct BrokenStore;

    impl MovieStore for BrokenStore {
        async fn find_by_id(&self, _: &str) -> Result<Option<Movie>> {
            Err(AppError::StoreError {
                message: "connection refused".to_string(),
            })
        }

        async fn create(&self, _: Map<String, Value>) -> Result<Movie> {
            Err(AppError::StoreError {
                message: "connection refused".to_string(),
            })
        }

        async fn update(&self, _: Movie) -> Result<Movie> {
            Err(AppError::StoreError {
                message: "connection refused".to_string(),
            })
        }

        async fn delete(&self, _: &str) -> Result<()> {
            Err(AppError::StoreError {
                message: "connection refused".to_string(),
            })
        }
    }

    fn controller(fetched: Result<Value>) -> MovieController<InMemoryMovieStore, StaticFetcher> {
        MovieController::new(
            InMemoryMovieStore::new(),
            BoxOfficeService::new(StaticFetcher(fetched), "/daily.json"),
        )
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let controller = controller(Ok(json!({})));

        let created = controller
            .create(json!({"title": "부산행", "meta": {"year": 2016}}))
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
        let body = created.body.unwrap();
        let id = body["_id"].as_str().unwrap().to_string();
        assert_eq!(body["title"], "부산행");

        let shown = controller.show(&id).await;
        assert_eq!(shown.status, StatusCode::OK);
        assert_eq!(shown.body.unwrap(), body);

        let updated = controller
            .update(&id, json!({"_id": "hijack", "meta": {"genre": "action"}}))
            .await;
        assert_eq!(updated.status, StatusCode::OK);
        assert_eq!(
            updated.body.unwrap(),
            json!({"_id": id.clone(), "title": "부산행", "meta": {"year": 2016, "genre": "action"}})
        );

        let destroyed = controller.destroy(&id).await;
        assert_eq!(destroyed.status, StatusCode::NO_CONTENT);
        assert!(destroyed.body.is_none());

        assert_eq!(controller.show(&id).await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_merges_array_fields() {
        let controller = controller(Ok(json!({})));

        let created = controller
            .create(json!({
                "title": "부산행",
                "tags": ["zombie", "train", "thriller"],
                "cast": [{"name": "공유", "role": "lead"}]
            }))
            .await;
        let id = created.body.unwrap()["_id"].as_str().unwrap().to_string();

        let updated = controller
            .update(&id, json!({"tags": ["horror"], "cast": [{"name": "Gong Yoo"}]}))
            .await;

        assert_eq!(updated.status, StatusCode::OK);
        let body = updated.body.unwrap();
        assert_eq!(body["tags"], json!(["horror", "train", "thriller"]));
        assert_eq!(body["cast"], json!([{"name": "Gong Yoo", "role": "lead"}]));
        assert_eq!(controller.show(&id).await.body.unwrap(), body);
    }

    #[tokio::test]
    async fn test_missing_movie_is_not_found() {
        let controller = controller(Ok(json!({})));

        assert_eq!(controller.show("nope").await.status, StatusCode::NOT_FOUND);
        assert_eq!(
            controller.update("nope", json!({"title": "x"})).await.status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(controller.destroy("nope").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_object_body_is_server_error() {
        let controller = controller(Ok(json!({})));

        let response = controller.create(json!(["not", "an", "object"])).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = response.body.unwrap()["error"].as_str().unwrap().to_string();
        assert!(message.starts_with("Invalid request:"));
        assert!(message.contains("JSON object"));
        assert!(!message.contains("store"));

        let err = into_object(json!("text")).unwrap_err();
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Request);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let controller = MovieController::new(
            BrokenStore,
            BoxOfficeService::new(StaticFetcher(Ok(json!({}))), "/daily.json"),
        );

        for response in [
            controller.show("m1").await,
            controller.create(json!({"title": "x"})).await,
            controller.update("m1", json!({"title": "x"})).await,
            controller.destroy("m1").await,
        ] {
            assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(response.body.unwrap()["error"]
                .as_str()
                .unwrap()
                .contains("connection refused"));
        }
    }

    #[tokio::test]
    async fn test_index_returns_raw_box_office() {
        let raw = json!({
            "boxOfficeResult": {
                "boxofficeType": "일별 박스오피스",
                "showRange": "20230101~20230101",
                "dailyBoxOfficeList": [{"rank": "1", "movieNm": "아바타", "audiCnt": "1000"}]
            }
        });
        let controller = controller(Ok(raw.clone()));

        let response = controller.index(Some("20230101")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_index_fetch_failure_is_server_error() {
        let controller = controller(Err(AppError::HttpStatus {
            status: 502,
            url: "https://www.kobis.or.kr/daily.json".to_string(),
        }));

        let response = controller.index(Some("20230101")).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.unwrap()["error"]
            .as_str()
            .unwrap()
            .contains("502"));
    }
}
