//! Quote types.

use crate::{error::Result, Category, Error};
use serde::{Deserialize, Serialize};

/// Category assigned to remote items that arrive without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A quote and the category it is filed under.
///
/// Quotes have no identifier. Two quotes are "the same quote" for merging
/// purposes when their `text` matches exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself
    pub text: String,
    /// Category the quote is filed under
    pub category: Category,
}

impl Quote {
    /// Create a quote without validation.
    pub fn new(text: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Build a quote from user input.
    ///
    /// Both fields are trimmed and must be non-empty afterwards.
    pub fn from_input(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(Error::EmptyField("text"));
        }
        if category.is_empty() {
            return Err(Error::EmptyField("category"));
        }

        Ok(Self::new(text, category))
    }
}

/// An item as served by the remote endpoint.
///
/// Remote payloads are looser than [`Quote`]: the text may be published as
/// `title`, and the category may be missing altogether.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteQuote {
    #[serde(alias = "title")]
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl RemoteQuote {
    /// Convert into a [`Quote`], defaulting the category.
    ///
    /// Returns `None` when the text is blank.
    pub fn into_quote(self) -> Option<Quote> {
        if self.text.trim().is_empty() {
            return None;
        }

        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Some(Quote::new(self.text, category))
    }
}

/// The quotes a fresh store is seeded with.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        Quote::new(
            "Don\u{2019}t let yesterday take up too much of today.",
            "Inspiration",
        ),
        Quote::new(
            "Your time is limited, don't waste it living someone else's life.",
            "Life",
        ),
    ]
}
