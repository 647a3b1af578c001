pub mod box_office;
pub mod movie_search;

pub use box_office::BoxOfficeService;
pub use movie_search::MovieSearchService;
