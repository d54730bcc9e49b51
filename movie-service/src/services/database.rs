use super::store::MovieStore;
use crate::models::Movie;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

/// MongoDB-backed movie store.
#[derive(Clone)]
pub struct MongoMovieStore {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoMovieStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self {
            client,
            db,
            collection: collection.to_string(),
        })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!(collection = %self.collection, "Creating MongoDB indexes for movie-service");

        let movies = self.movies();

        // The title is the record key
        let title_index = IndexModel::builder()
            .keys(doc! { "title": 1 })
            .options(
                IndexOptions::builder()
                    .name("title_key".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        movies.create_index(title_index, None).await.map_err(|e| {
            tracing::error!("Failed to create title index on movies collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created unique index on movies.title");

        let year_index = IndexModel::builder()
            .keys(doc! { "releaseYear": 1 })
            .options(
                IndexOptions::builder()
                    .name("release_year_lookup".to_string())
                    .build(),
            )
            .build();

        movies.create_index(year_index, None).await.map_err(|e| {
            tracing::error!(
                "Failed to create releaseYear index on movies collection: {}",
                e
            );
            AppError::from(e)
        })?;
        tracing::info!("Created index on movies.releaseYear");

        Ok(())
    }

    pub fn movies(&self) -> Collection<Movie> {
        self.db.collection(&self.collection)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl MovieStore for MongoMovieStore {
    async fn scan(&self) -> Result<Vec<Movie>, AppError> {
        let cursor = self.movies().find(doc! {}, None).await?;
        let movies: Vec<Movie> = cursor.try_collect().await?;
        tracing::debug!(count = movies.len(), "Scanned movies collection");
        Ok(movies)
    }

    async fn scan_by_year(&self, year: &str) -> Result<Vec<Movie>, AppError> {
        let cursor = self
            .movies()
            .find(doc! { "releaseYear": year }, None)
            .await?;
        let movies: Vec<Movie> = cursor.try_collect().await?;
        tracing::debug!(year = %year, count = movies.len(), "Scanned movies by release year");
        Ok(movies)
    }

    async fn get(&self, title: &str) -> Result<Option<Movie>, AppError> {
        Ok(self.movies().find_one(doc! { "title": title }, None).await?)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> (MongoMovieStore, String) {
        let db_name = format!("movie_store_test_{}", std::process::id());
        let store = MongoMovieStore::connect("mongodb://localhost:27017", &db_name, "Movies")
            .await
            .expect("Failed to connect to MongoDB");
        store.initialize_indexes().await.unwrap();
        store
            .movies()
            .insert_many(
                vec![
                    Movie::new("Inception", "Sci-Fi", "2010"),
                    Movie::new("The Social Network", "Drama", "2010"),
                    Movie::new("Heat", "Crime", "1995"),
                ],
                None,
            )
            .await
            .unwrap();
        (store, db_name)
    }

    #[tokio::test]
    #[ignore = "Requires MongoDB running on localhost:27017"]
    async fn reads_through_mongodb() {
        let (store, db_name) = seeded_store().await;

        assert_eq!(store.scan().await.unwrap().len(), 3);
        assert_eq!(store.scan_by_year("2010").await.unwrap().len(), 2);
        assert!(store.scan_by_year("2010 ").await.unwrap().is_empty());
        assert_eq!(
            store.get("Heat").await.unwrap(),
            Some(Movie::new("Heat", "Crime", "1995"))
        );
        assert_eq!(store.get("Alien").await.unwrap(), None);
        store.health_check().await.unwrap();

        let _ = store.client().database(&db_name).drop(None).await;
    }
}
