pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::memory_store::InMemoryMovieStore;
pub use app::controller::{ControllerResponse, MovieController};
pub use app::services::{BoxOfficeService, MovieSearchService};
pub use config::AppConfig;
pub use core::fetcher::{FetchedBody, Fetcher, FetcherConfig};
pub use utils::error::{AppError, Result};
