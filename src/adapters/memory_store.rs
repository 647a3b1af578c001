use crate::core::{Movie, MovieStore};
use crate::utils::error::{AppError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 記憶體內的文件資料庫，測試與示範用
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovieStore {
    movies: Arc<Mutex<HashMap<String, Movie>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.movies.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.lock().await.is_empty()
    }

    // 24 位十六進位，和 ObjectId 同長度
    fn generate_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl MovieStore for InMemoryMovieStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>> {
        let movies = self.movies.lock().await;
        Ok(movies.get(id).cloned())
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<Movie> {
        let movie = Movie::new(self.generate_id(), fields);
        let mut movies = self.movies.lock().await;
        movies.insert(movie.id.clone(), movie.clone());
        Ok(movie)
    }

    async fn update(&self, movie: Movie) -> Result<Movie> {
        let mut movies = self.movies.lock().await;
        match movies.get_mut(&movie.id) {
            Some(existing) => {
                *existing = movie.clone();
                Ok(movie)
            }
            None => Err(AppError::StoreError {
                message: format!("Movie {} no longer exists", movie.id),
            }),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut movies = self.movies.lock().await;
        movies.remove(id);
        Ok(())
    }
}
