//! Store - the in-memory quote container.
//!
//! The store is an ordered sequence of quotes. It only ever grows, except for
//! in-place category updates made during a merge.

use crate::{
    error::Result,
    quote::default_quotes,
    storage::{KeyValueStore, QUOTES_KEY},
    Error, Quote,
};
use serde::{Deserialize, Serialize};

/// Ordered, append-only collection of quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { quotes: Vec::new() }
    }

    /// Create a store holding the given quotes, in order.
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Create a store seeded with the default quotes.
    pub fn with_defaults() -> Self {
        Self::from_quotes(default_quotes())
    }

    /// Load the store from persistent storage.
    ///
    /// When nothing has been persisted yet, the store is seeded with the
    /// default quotes and those are written back immediately.
    pub fn load(kv: &dyn KeyValueStore) -> Result<Self> {
        match kv.get(QUOTES_KEY)? {
            Some(json) => {
                let quotes: Vec<Quote> =
                    serde_json::from_str(&json).map_err(|e| Error::CorruptState {
                        key: QUOTES_KEY.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Self::from_quotes(quotes))
            }
            None => {
                let store = Self::with_defaults();
                store.save(kv)?;
                Ok(store)
            }
        }
    }

    /// Persist the full sequence.
    pub fn save(&self, kv: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.quotes)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        kv.set(QUOTES_KEY, &json)
    }

    /// Validate user input and append it.
    ///
    /// The store is left untouched when either field is blank.
    pub fn add(&mut self, text: &str, category: &str) -> Result<&Quote> {
        let quote = Quote::from_input(text, category)?;
        Ok(self.push(quote))
    }

    /// Append a quote without validation.
    pub fn push(&mut self, quote: Quote) -> &Quote {
        self.quotes.push(quote);
        &self.quotes[self.quotes.len() - 1]
    }

    /// Append every quote, in order. Returns how many were appended.
    pub fn extend(&mut self, quotes: impl IntoIterator<Item = Quote>) -> usize {
        let before = self.quotes.len();
        self.quotes.extend(quotes);
        self.quotes.len() - before
    }

    /// Drop every quote after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.quotes.truncate(len);
    }

    /// First quote whose text matches exactly.
    pub fn find_by_text_mut(&mut self, text: &str) -> Option<&mut Quote> {
        self.quotes.iter_mut().find(|q| q.text == text)
    }

    /// Get a quote by position.
    pub fn get(&self, index: usize) -> Option<&Quote> {
        self.quotes.get(index)
    }

    /// All quotes, in order.
    pub fn as_slice(&self) -> &[Quote] {
        &self.quotes
    }

    /// Iterate quotes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter()
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Check if the store holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
