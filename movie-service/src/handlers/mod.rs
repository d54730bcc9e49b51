pub mod health;
pub mod movies;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use movies::{list_movies, list_movies_by_year, summarize_movie};
