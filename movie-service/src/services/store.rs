//! Record store abstraction.
//!
//! Handlers only read: a full scan, a scan filtered on `releaseYear`, and a
//! lookup by title.

use crate::models::Movie;
use async_trait::async_trait;
use service_core::error::AppError;

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Return every record, in store order.
    async fn scan(&self) -> Result<Vec<Movie>, AppError>;

    /// Return the records whose `releaseYear` equals `year` exactly.
    async fn scan_by_year(&self, year: &str) -> Result<Vec<Movie>, AppError>;

    /// Look a record up by its title key.
    async fn get(&self, title: &str) -> Result<Option<Movie>, AppError>;

    /// Cheap connectivity probe used by `/health` and `/ready`.
    async fn health_check(&self) -> Result<(), AppError>;
}
