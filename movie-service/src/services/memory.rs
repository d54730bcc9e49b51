//! In-process movie store for local development and tests.

use super::store::MovieStore;
use crate::models::Movie;
use async_trait::async_trait;
use service_core::error::AppError;
use std::path::Path;
use std::sync::Arc;

/// Immutable in-memory store. Records keep their seed order; a title seen
/// twice keeps the later record in the earlier slot.
#[derive(Clone, Default)]
pub struct InMemoryMovieStore {
    movies: Arc<Vec<Movie>>,
}

impl InMemoryMovieStore {
    pub fn new(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut unique: Vec<Movie> = Vec::new();
        for movie in movies {
            match unique.iter_mut().find(|m| m.title == movie.title) {
                Some(existing) => *existing = movie,
                None => unique.push(movie),
            }
        }
        Self {
            movies: Arc::new(unique),
        }
    }

    /// Load the store from a JSON array of movie records.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await?;
        let movies: Vec<Movie> = serde_json::from_slice(&raw).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid movie seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::info!(path = %path.display(), count = movies.len(), "Loaded movie seed file");
        Ok(Self::new(movies))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn scan(&self) -> Result<Vec<Movie>, AppError> {
        Ok(self.movies.as_ref().clone())
    }

    async fn scan_by_year(&self, year: &str) -> Result<Vec<Movie>, AppError> {
        Ok(self
            .movies
            .iter()
            .filter(|m| m.release_year == year)
            .cloned()
            .collect())
    }

    async fn get(&self, title: &str) -> Result<Option<Movie>, AppError> {
        Ok(self.movies.iter().find(|m| m.title == title).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryMovieStore {
        InMemoryMovieStore::new(vec![
            Movie::new("Inception", "Sci-Fi", "2010"),
            Movie::new("Heat", "Crime", "1995"),
            Movie::new("Toy Story 3", "Animation", "2010"),
        ])
    }

    #[tokio::test]
    async fn scan_returns_every_record() {
        assert_eq!(store().scan().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn year_filter_is_exact_string_match() {
        let store = store();
        let titles: Vec<String> = store
            .scan_by_year("2010")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Inception", "Toy Story 3"]);

        assert!(store.scan_by_year("10").await.unwrap().is_empty());
        assert!(store.scan_by_year("2010.0").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_titles_keep_the_later_record() {
        let store = InMemoryMovieStore::new(vec![
            Movie::new("Dune", "Sci-Fi", "1984"),
            Movie::new("Dune", "Sci-Fi", "2021"),
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Dune").await.unwrap().unwrap().release_year, "2021");
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        assert!(store().get("inception").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn loads_seed_file() {
        let path = std::env::temp_dir().join(format!("movies-seed-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{"title":"Alien","genre":"Horror","releaseYear":"1979"}]"#,
        )
        .await
        .unwrap();

        let store = InMemoryMovieStore::from_json_file(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("Alien").await.unwrap(),
            Some(Movie::new("Alien", "Horror", "1979"))
        );
    }

    #[tokio::test]
    async fn rejects_malformed_seed_file() {
        let path = std::env::temp_dir().join(format!("movies-bad-{}.json", std::process::id()));
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = InMemoryMovieStore::from_json_file(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
