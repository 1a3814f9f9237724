//! Quote endpoint routes.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use quotebook_engine::{CategoryOptions, Quote, EXPORT_FILE_NAME};

use crate::error::Result;
use crate::handlers::{
    handle_add, handle_categories, handle_export, handle_filter, handle_import, handle_last,
    handle_list, handle_random, AddQuoteRequest, AddQuoteResponse, FilterQuery, ImportResponse,
    QuotesResponse, ViewResponse,
};
use crate::AppState;

/// Create quote routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_handler).post(add_handler))
        .route("/quotes/random", get(random_handler))
        .route("/quotes/last", get(last_handler))
        .route("/quotes/filter", get(filter_handler))
        .route("/quotes/export", get(export_handler))
        .route("/quotes/import", post(import_handler))
        .route("/categories", get(categories_handler))
}

/// GET /quotes - Every quote.
async fn list_handler(State(state): State<AppState>) -> Json<QuotesResponse> {
    Json(handle_list(&state.book).await)
}

/// POST /quotes - Add a quote.
async fn add_handler(
    State(state): State<AppState>,
    Json(request): Json<AddQuoteRequest>,
) -> Result<(StatusCode, Json<AddQuoteResponse>)> {
    let response = handle_add(&state.book, &state.conn_manager, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /quotes/random - Show a random quote.
async fn random_handler(State(state): State<AppState>) -> Result<Json<ViewResponse>> {
    Ok(Json(handle_random(&state.book).await?))
}

/// GET /quotes/last - Last quote shown this session.
async fn last_handler(State(state): State<AppState>) -> Result<Json<Quote>> {
    Ok(Json(handle_last(&state.book).await?))
}

/// GET /quotes/filter - Apply a category filter.
async fn filter_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ViewResponse>> {
    Ok(Json(handle_filter(&state.book, query).await?))
}

/// GET /categories - Selector options.
async fn categories_handler(State(state): State<AppState>) -> Result<Json<CategoryOptions>> {
    Ok(Json(handle_categories(&state.book).await?))
}

/// GET /quotes/export - Download the collection.
async fn export_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = handle_export(&state.book).await?;
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /quotes/import - Upload a previously exported file.
async fn import_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>> {
    Ok(Json(
        handle_import(&state.book, &state.conn_manager, &body).await?,
    ))
}
