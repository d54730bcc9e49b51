use crate::models::Movie;
use crate::startup::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use service_core::error::AppError;
use std::collections::HashMap;

/// Path parameters of the matched route.
type PathParams = Result<Path<HashMap<String, String>>, PathRejection>;

/// `Ok(None)` when the route carries no such segment. A segment that is
/// present but cannot be decoded is rejected as invalid.
fn path_param(params: PathParams, key: &str) -> Result<Option<String>, AppError> {
    match params {
        Ok(Path(mut map)) => Ok(map.remove(key)),
        Err(PathRejection::MissingPathParams(_)) => Ok(None),
        Err(rejection) => Err(AppError::BadRequest(format!(
            "Invalid {} parameter: {}",
            key,
            rejection.body_text()
        ))),
    }
}

/// `GET /movies`
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, AppError> {
    state.catalog.list_all().await.map(Json)
}

/// `GET /movies/year/:year`
pub async fn list_movies_by_year(
    State(state): State<AppState>,
    params: PathParams,
) -> Result<Json<Vec<Movie>>, AppError> {
    let year = path_param(params, "year")?;
    state.catalog.list_by_year(year.as_deref()).await.map(Json)
}

/// `GET /movies/:movieTitle/summary`
pub async fn summarize_movie(
    State(state): State<AppState>,
    params: PathParams,
) -> Result<Json<Movie>, AppError> {
    let title = path_param(params, "movieTitle")?;
    state.catalog.summarize(title.as_deref()).await.map(Json)
}
