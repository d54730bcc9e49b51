//! Request-to-response logic behind the three movie endpoints.
//!
//! Each operation is a linear sequence of store reads (and, for summaries,
//! one completion call). Every failure is classified into an [`AppError`] so
//! the HTTP layer always has a structured result to render.

use super::metrics::{record_completion, record_store_operation};
use super::providers::{ChatMessage, CompletionProvider};
use super::store::MovieStore;
use crate::models::Movie;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;

/// System instruction sent ahead of every summary prompt.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the user prompt for a movie summary.
pub fn summary_prompt(movie: &Movie) -> String {
    format!(
        "Summarize the movie '{}', a {} film released in {}.",
        movie.title, movie.genre, movie.release_year
    )
}

#[derive(Clone)]
pub struct MovieCatalog {
    store: Arc<dyn MovieStore>,
    completions: Arc<dyn CompletionProvider>,
}

impl MovieCatalog {
    pub fn new(store: Arc<dyn MovieStore>, completions: Arc<dyn CompletionProvider>) -> Self {
        Self { store, completions }
    }

    pub fn store(&self) -> &Arc<dyn MovieStore> {
        &self.store
    }

    /// Every record in the store, in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Movie>, AppError> {
        let result = self.store.scan().await;
        record_store_operation("scan", result.is_ok());

        let movies = result.map_err(|e| {
            tracing::error!(error = %e, "Failed to scan movies");
            AppError::UpstreamFailure(format!("Error retrieving movies: {}", e))
        })?;
        tracing::info!(count = movies.len(), "Listed movies");
        Ok(movies)
    }

    /// Records whose `releaseYear` equals `year` exactly. No match is an
    /// empty list, not an error.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_year(&self, year: Option<&str>) -> Result<Vec<Movie>, AppError> {
        let year = year.ok_or_else(|| {
            AppError::BadRequest("Year parameter is missing from the request.".to_string())
        })?;

        let result = self.store.scan_by_year(year).await;
        record_store_operation("scan_by_year", result.is_ok());

        let movies = result.map_err(internal_error)?;
        tracing::info!(year = %year, count = movies.len(), "Listed movies by year");
        Ok(movies)
    }

    /// Fetch a record by title and attach a freshly generated summary.
    ///
    /// The summary only lives in the returned value; nothing is written back.
    #[tracing::instrument(skip(self))]
    pub async fn summarize(&self, title: Option<&str>) -> Result<Movie, AppError> {
        let title = title.ok_or_else(|| {
            AppError::BadRequest("Movie title parameter is missing from the request.".to_string())
        })?;

        let result = self.store.get(title).await;
        record_store_operation("get", result.is_ok());

        let movie = result
            .map_err(internal_error)?
            .ok_or_else(|| AppError::NotFound("Movie not found.".to_string()))?;

        let messages = [
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(summary_prompt(&movie)),
        ];

        let started = Instant::now();
        let result = self.completions.complete(&messages).await;
        record_completion(self.completions.model(), result.is_ok(), started.elapsed());

        let summary = result.map_err(|e| {
            tracing::error!(title = %title, error = %e, "Summary generation failed");
            AppError::from(e)
        })?;

        tracing::info!(title = %title, "Generated movie summary");
        Ok(movie.with_summary(summary.trim()))
    }
}

fn internal_error(err: AppError) -> AppError {
    tracing::error!(error = %err, "Movie store request failed");
    AppError::UpstreamFailure(format!("Internal server error: {}", err))
}
