//! Quote handlers - add, show, filter and list quotes.

use quotebook_engine::{view::render_quote_html, CategoryFilter, CategoryOptions, Quote, View};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::websocket::{ConnectionManager, ServerMessage};
use crate::{with_book, SharedBook};

/// Message shown after a successful add.
pub const QUOTE_ADDED_MESSAGE: &str = "Quote added successfully!";

/// Request body for adding a quote.
///
/// Missing fields deserialize as empty strings so they are rejected by the
/// same validation as blank input.
#[derive(Debug, Deserialize)]
pub struct AddQuoteRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

/// Response for a successful add.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuoteResponse {
    pub quote: Quote,
    /// Fragment to append to the display
    pub html: String,
    /// Notification text
    pub message: String,
}

/// A view together with its rendered fragment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub view: View,
    pub html: String,
}

impl From<View> for ViewResponse {
    fn from(view: View) -> Self {
        Self {
            html: view.render_html(),
            view,
        }
    }
}

/// Query parameters for filtering.
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    /// Category to show, or `"all"`. Falls back to the persisted selection.
    pub category: Option<String>,
}

/// Response listing every quote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesResponse {
    pub quotes: Vec<Quote>,
    pub count: usize,
}

/// Add a quote and tell connected pages about it.
pub async fn handle_add(
    book: &SharedBook,
    conn_manager: &ConnectionManager,
    request: AddQuoteRequest,
) -> Result<AddQuoteResponse> {
    let (quote, categories) = with_book(book, move |book| {
        let quote = book.add(&request.text, &request.category)?;
        Ok::<_, quotebook_engine::Error>((quote, book.category_options()))
    })
    .await??;

    tracing::info!(category = %quote.category, "Quote added");

    // The quote is already saved; a failed notification must not fail the add
    match categories {
        Ok(categories) => {
            conn_manager.broadcast_all(ServerMessage::QuoteAdded {
                quote: quote.clone(),
                categories,
            });
        }
        Err(e) => tracing::warn!("Quote added but not broadcast: {}", e),
    }

    Ok(AddQuoteResponse {
        html: render_quote_html(&quote),
        quote,
        message: QUOTE_ADDED_MESSAGE.to_string(),
    })
}

/// Pick a random quote.
pub async fn handle_random(book: &SharedBook) -> Result<ViewResponse> {
    let book = book.lock().await;
    let view = book.show_random(&mut rand::thread_rng())?;
    Ok(view.into())
}

/// The last quote shown this session.
pub async fn handle_last(book: &SharedBook) -> Result<Quote> {
    book.lock()
        .await
        .last_viewed()?
        .ok_or_else(|| AppError::NotFound("no quote viewed this session".to_string()))
}

/// Apply a category filter, persisting the selection.
pub async fn handle_filter(book: &SharedBook, query: FilterQuery) -> Result<ViewResponse> {
    if matches!(&query.category, Some(category) if category.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "category must not be empty".to_string(),
        ));
    }

    let view = with_book(book, move |book| match query.category {
        Some(category) => book.filter(&CategoryFilter::from(category)),
        None => book.current_view(),
    })
    .await??;

    Ok(view.into())
}

/// Category selector options.
pub async fn handle_categories(book: &SharedBook) -> Result<CategoryOptions> {
    Ok(with_book(book, |book| book.category_options()).await??)
}

/// Every quote, in order.
pub async fn handle_list(book: &SharedBook) -> QuotesResponse {
    let book = book.lock().await;
    let quotes = book.store().as_slice().to_vec();
    QuotesResponse {
        count: quotes.len(),
        quotes,
    }
}
