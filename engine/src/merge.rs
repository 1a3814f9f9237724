//! Merging remote quotes into the local store.
//!
//! The rule is server-wins on category and additive otherwise.
//!
//! # Algorithm
//!
//! 1. Walk the remote quotes once, in order
//! 2. Look up the first local quote with identical text
//! 3. On a category mismatch, overwrite the local category and record a conflict
//! 4. With no match, append the remote quote and record an addition
//!
//! Lookups run against the live store, so a remote quote appended earlier in
//! the same pass is a match candidate for later ones. Local quotes are never
//! removed, and when several local quotes share a text only the first one is
//! touched.

use crate::{Category, Quote, QuoteStore};
use serde::{Deserialize, Serialize};

/// A category overwritten by the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConflict {
    /// Text shared by the local and remote quote
    pub text: String,
    /// Category the local quote had before the merge
    pub local_category: Category,
    /// Category it has now
    pub remote_category: Category,
}

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Local quotes whose category was replaced
    pub conflicts: Vec<CategoryConflict>,
    /// Remote quotes appended to the store
    pub added: Vec<Quote>,
}

impl MergeReport {
    /// Number of categories overwritten.
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Number of quotes appended.
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    /// Whether the store was modified at all.
    pub fn has_changes(&self) -> bool {
        !self.conflicts.is_empty() || !self.added.is_empty()
    }

    /// Human readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "Sync complete: {} conflict(s) resolved, {} new quote(s) added.",
            self.conflict_count(),
            self.added_count()
        )
    }
}

/// Merge remote quotes into `store`.
pub fn merge_remote(
    store: &mut QuoteStore,
    remote: impl IntoIterator<Item = Quote>,
) -> MergeReport {
    let mut report = MergeReport::default();

    for incoming in remote {
        match store.find_by_text_mut(&incoming.text) {
            Some(local) => {
                if local.category != incoming.category {
                    let previous = std::mem::replace(&mut local.category, incoming.category);
                    report.conflicts.push(CategoryConflict {
                        text: incoming.text,
                        local_category: previous,
                        remote_category: local.category.clone(),
                    });
                }
            }
            None => {
                report.added.push(incoming.clone());
                store.push(incoming);
            }
        }
    }

    report
}
