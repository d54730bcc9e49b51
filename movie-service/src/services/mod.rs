pub mod catalog;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod providers;
pub mod store;

pub use catalog::MovieCatalog;
pub use database::MongoMovieStore;
pub use memory::InMemoryMovieStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::MovieStore;
