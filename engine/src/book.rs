//! QuoteBook - the owned state object every operation goes through.
//!
//! A `QuoteBook` owns the [`QuoteStore`] together with the two key-value
//! stores it is persisted to: a durable one for the quotes and the selected
//! category, and a session one for the last quote shown. Hosts keep exactly
//! one book and pass it (or a lock around it) to each operation.

use crate::{
    error::Result,
    merge::{merge_remote, MergeReport},
    storage::{KeyValueStore, LAST_QUOTE_KEY, SELECTED_CATEGORY_KEY},
    transfer,
    view::{self, CategoryFilter, CategoryOptions, View},
    Error, Quote, QuoteStore,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State a page needs to redraw after the store changed underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refresh {
    /// Rebuilt category selector
    pub categories: CategoryOptions,
    /// Re-rendered view for the active filter
    pub view: View,
}

/// Result of applying remote quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteApplied {
    pub report: MergeReport,
    /// Present only when the merge changed something
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<Refresh>,
}

/// The quote collection and where it is persisted.
pub struct QuoteBook {
    store: QuoteStore,
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl QuoteBook {
    /// Load the book from durable storage, seeding defaults if empty.
    pub fn open(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Result<Self> {
        let store = QuoteStore::load(durable.as_ref())?;
        Ok(Self::with_store(store, durable, session))
    }

    /// Build a book around an existing store without touching storage.
    pub fn with_store(
        store: QuoteStore,
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            store,
            durable,
            session,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Persist the current quotes.
    pub fn save(&self) -> Result<()> {
        self.store.save(self.durable.as_ref())
    }

    /// Add a quote from user input and persist.
    ///
    /// Blank input leaves the book unchanged. If persisting fails the quote is
    /// taken back out so memory and storage stay in step.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = self.store.add(text, category)?.clone();

        if let Err(e) = self.save() {
            self.store.truncate(self.store.len() - 1);
            return Err(e);
        }

        Ok(quote)
    }

    /// Import the text of an uploaded file and persist.
    ///
    /// Returns the number of quotes appended. On any error the book is
    /// unchanged.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let quotes = transfer::parse_import(text)?;
        let before = self.store.len();
        let imported = self.store.extend(quotes);

        if let Err(e) = self.save() {
            self.store.truncate(before);
            return Err(e);
        }

        Ok(imported)
    }

    /// Pretty-printed JSON of every quote.
    pub fn export_json(&self) -> Result<String> {
        transfer::export_json(&self.store)
    }

    /// Pick a random quote and remember it for the session.
    pub fn show_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<View> {
        let view = view::random_view(&self.store, rng);

        if let View::Single { quote } = &view {
            let json =
                serde_json::to_string(quote).map_err(|e| Error::Serialization(e.to_string()))?;
            self.session.set(LAST_QUOTE_KEY, &json)?;
        }

        Ok(view)
    }

    /// The last quote shown this session, if any.
    pub fn last_viewed(&self) -> Result<Option<Quote>> {
        match self.session.get(LAST_QUOTE_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| Error::CorruptState {
                    key: LAST_QUOTE_KEY.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// The persisted category selection; `"all"` when none was made.
    pub fn selected_category(&self) -> Result<CategoryFilter> {
        Ok(self
            .durable
            .get(SELECTED_CATEGORY_KEY)?
            .map(CategoryFilter::from)
            .unwrap_or_default())
    }

    /// Persist a category selection and return its view.
    pub fn filter(&self, filter: &CategoryFilter) -> Result<View> {
        self.durable.set(SELECTED_CATEGORY_KEY, filter.as_str())?;
        Ok(view::filter_view(&self.store, filter))
    }

    /// View for the active selection.
    ///
    /// Uses the same fallback as [`QuoteBook::category_options`], so a
    /// selection whose category vanished renders every quote.
    pub fn current_view(&self) -> Result<View> {
        let selected = self.category_options()?.selected;
        Ok(view::filter_view(&self.store, &selected))
    }

    /// Category selector options with the persisted selection reapplied.
    pub fn category_options(&self) -> Result<CategoryOptions> {
        let selected = self.selected_category()?;
        Ok(view::category_options(&self.store, &selected))
    }

    /// Merge remote quotes (server-wins) and persist if anything changed.
    ///
    /// If the merged store cannot be saved the book is restored to its state
    /// before the merge, so the next cycle sees the same changes again.
    pub fn apply_remote(&mut self, remote: Vec<Quote>) -> Result<RemoteApplied> {
        let before = self.store.clone();
        let report = merge_remote(&mut self.store, remote);

        if !report.has_changes() {
            return Ok(RemoteApplied {
                report,
                refresh: None,
            });
        }

        if let Err(e) = self.save() {
            self.store = before;
            return Err(e);
        }

        let refresh = Refresh {
            categories: self.category_options()?,
            view: self.current_view()?,
        };

        Ok(RemoteApplied {
            report,
            refresh: Some(refresh),
        })
    }
}
