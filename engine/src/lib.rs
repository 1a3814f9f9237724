//! # Quotebook Engine
//!
//! Data layer for a random-quote widget.
//!
//! This crate stores quote/category pairs, picks and filters quotes for
//! display, imports and exports JSON, and merges quotes fetched from a remote
//! endpoint. It owns no IO: persistence goes through the [`KeyValueStore`]
//! trait and randomness through an injected [`rand::Rng`].
//!
//! ## Core Concepts
//!
//! ### Quotes
//!
//! A [`Quote`] is a `{text, category}` pair with no identifier. Quotes with
//! the same text are the same quote as far as merging is concerned; nothing
//! else deduplicates them.
//!
//! ### Store and Book
//!
//! The [`QuoteStore`] is an ordered, append-only sequence. The [`QuoteBook`]
//! wraps it with durable and session storage and is the object hosts hold on
//! to: every operation (add, import, filter, merge) goes through it and
//! persists what it changes.
//!
//! ### Merging
//!
//! [`merge_remote`] applies a remote list with a server-wins rule: a local
//! quote whose text matches gets the remote category, and unseen remote
//! quotes are appended. Local quotes are never removed.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use quotebook_engine::{CategoryFilter, MemoryStore, Quote, QuoteBook};
//!
//! // 1. Open a book (seeds three default quotes on first use)
//! let mut book = QuoteBook::open(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryStore::new()),
//! )
//! .unwrap();
//!
//! // 2. Add a quote
//! book.add("Simplicity is prerequisite for reliability.", "Engineering").unwrap();
//! assert_eq!(book.store().len(), 4);
//!
//! // 3. Filter by category
//! let view = book.filter(&CategoryFilter::from_value("Engineering")).unwrap();
//! assert_eq!(view.quotes().len(), 1);
//!
//! // 4. Merge remote quotes
//! let applied = book
//!     .apply_remote(vec![Quote::new("Simplicity is prerequisite for reliability.", "Wisdom")])
//!     .unwrap();
//! assert_eq!(applied.report.conflict_count(), 1);
//! ```

pub mod book;
pub mod error;
pub mod merge;
pub mod quote;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod view;

// Re-export main types at crate root
pub use book::{QuoteBook, Refresh, RemoteApplied};
pub use error::Error;
pub use merge::{merge_remote, CategoryConflict, MergeReport};
pub use quote::{default_quotes, Quote, RemoteQuote, UNCATEGORIZED};
pub use storage::{
    KeyValueStore, MemoryStore, LAST_QUOTE_KEY, QUOTES_KEY, SELECTED_CATEGORY_KEY,
};
pub use store::QuoteStore;
pub use transfer::{export_json, parse_import, EXPORT_FILE_NAME};
pub use view::{
    CategoryFilter, CategoryOptions, View, ALL_CATEGORIES, EMPTY_STORE_MESSAGE,
    NO_MATCHES_MESSAGE,
};

/// Type alias for clarity
pub type Category = String;
