pub mod date_key;
pub mod fetcher;
pub mod formatter;

pub use crate::domain::model::{BoxOfficeResponse, Movie, MovieSearchResponse};
pub use crate::domain::ports::{JsonFetcher, MovieStore};
pub use crate::utils::error::Result;
