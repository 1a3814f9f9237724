//! Import and export handlers.

use serde::Serialize;

use crate::error::Result;
use crate::websocket::{ConnectionManager, ServerMessage};
use crate::{with_book, SharedBook};

/// Response for a successful import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Quotes appended by this import
    pub imported: usize,
    /// Collection size afterwards
    pub total: usize,
    pub message: String,
}

/// Pretty-printed JSON of the whole collection.
pub async fn handle_export(book: &SharedBook) -> Result<String> {
    Ok(book.lock().await.export_json()?)
}

/// Append the quotes in an uploaded file.
///
/// The body is the raw file text. Nothing is appended unless every element
/// is a valid quote.
pub async fn handle_import(
    book: &SharedBook,
    conn_manager: &ConnectionManager,
    body: &str,
) -> Result<ImportResponse> {
    let body = body.to_string();
    let (imported, total, state) = with_book(book, move |book| {
        let imported = book.import_json(&body)?;
        let state = book
            .category_options()
            .and_then(|categories| Ok(ServerMessage::state(categories, book.current_view()?)));
        Ok::<_, quotebook_engine::Error>((imported, book.store().len(), state))
    })
    .await??;

    tracing::info!(imported, total, "Quotes imported");

    // The import is already saved; a failed notification must not fail it
    match state {
        Ok(state) if imported > 0 => {
            conn_manager.broadcast_all(state);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Quotes imported but not broadcast: {}", e),
    }

    Ok(ImportResponse {
        imported,
        total,
        message: "Quotes imported successfully!".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_engine::{MemoryStore, QuoteBook};
    use std::sync::Arc;
    use tokio::sync::{mpsc, Mutex};

    fn shared_book() -> SharedBook {
        let book = QuoteBook::open(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
            .unwrap();
        Arc::new(Mutex::new(book))
    }

    #[tokio::test]
    async fn export_then_import_doubles() {
        let book = shared_book();
        let conn_manager = ConnectionManager::new();

        let exported = handle_export(&book).await.unwrap();
        let response = handle_import(&book, &conn_manager, &exported).await.unwrap();

        assert_eq!(response.imported, 3);
        assert_eq!(response.total, 6);
    }

    #[tokio::test]
    async fn import_broadcasts_state() {
        let book = shared_book();
        let conn_manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        conn_manager.register(tx);

        handle_import(
            &book,
            &conn_manager,
            r#"[{"text":"Imported","category":"Files"}]"#,
        )
        .await
        .unwrap();

        match rx.try_recv().unwrap() {
            ServerMessage::State { categories, .. } => {
                assert!(categories.options.contains(&"Files".to_string()));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn import_succeeds_when_notification_cannot_be_built() {
        let (book, _) = crate::handlers::testing::book_with_unreadable_selection();
        let conn_manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        conn_manager.register(tx);

        let response = handle_import(
            &book,
            &conn_manager,
            r#"[{"text":"Imported","category":"Files"}]"#,
        )
        .await
        .unwrap();

        assert_eq!(response.imported, 1);
        assert_eq!(response.total, 4);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_import_is_quiet() {
        let book = shared_book();
        let conn_manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        conn_manager.register(tx);

        let response = handle_import(&book, &conn_manager, "[]").await.unwrap();
        assert_eq!(response.imported, 0);
        assert_eq!(response.total, 3);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn invalid_import_changes_nothing() {
        let book = shared_book();
        let conn_manager = ConnectionManager::new();

        assert!(handle_import(&book, &conn_manager, r#"{"text":"x"}"#)
            .await
            .is_err());
        assert!(handle_import(&book, &conn_manager, r#"[{"text":"ok","category":"a"}"#)
            .await
            .is_err());
        assert_eq!(book.lock().await.store().len(), 3);
    }

    #[tokio::test]
    async fn incomplete_records_are_imported() {
        let book = shared_book();
        let conn_manager = ConnectionManager::new();

        let response = handle_import(
            &book,
            &conn_manager,
            r#"[{"text":"ok","category":"a"}, {"text":"no category"}]"#,
        )
        .await
        .unwrap();
        assert_eq!(response.imported, 2);
        assert_eq!(response.total, 5);
    }
}
