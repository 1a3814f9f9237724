//! View logic: what to show, independent of where it is shown.
//!
//! Every function here is a pure transformation of a [`QuoteStore`] into a
//! [`View`] or a list of categories. Rendering to HTML fragments is provided
//! for hosts that serve a page; anything else can consume the `View` as data.

use crate::{Category, Quote, QuoteStore};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Shown when there is nothing to pick a random quote from.
pub const EMPTY_STORE_MESSAGE: &str = "No quotes available. Please add one!";

/// Shown when a filter matches nothing.
pub const NO_MATCHES_MESSAGE: &str = "No quotes found for this category.";

/// Category filter as chosen in the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Show every quote
    #[default]
    All,
    /// Show quotes of one category
    Category(Category),
}

impl CategoryFilter {
    /// Parse a selector value. The `"all"` sentinel maps to [`CategoryFilter::All`].
    pub fn from_value(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    /// The selector value for this filter.
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(category) => category,
        }
    }

    /// Whether `quote` passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => &quote.category == category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Category(category) => category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the quote display area should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum View {
    /// A message instead of quotes
    Placeholder { message: String },
    /// One quote
    Single { quote: Quote },
    /// Several quotes, in store order
    List { quotes: Vec<Quote> },
}

impl View {
    fn placeholder(message: &str) -> Self {
        View::Placeholder {
            message: message.to_string(),
        }
    }

    /// Quotes contained in this view.
    pub fn quotes(&self) -> &[Quote] {
        match self {
            View::Placeholder { .. } => &[],
            View::Single { quote } => std::slice::from_ref(quote),
            View::List { quotes } => quotes,
        }
    }

    /// Render the view as an HTML fragment.
    pub fn render_html(&self) -> String {
        match self {
            View::Placeholder { message } => format!("<em>{}</em>", escape_html(message)),
            View::Single { quote } => render_quote_html(quote),
            View::List { quotes } => quotes
                .iter()
                .map(|q| format!("<div class=\"quote\">{}</div>", render_quote_html(q)))
                .collect(),
        }
    }
}

/// Options for the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptions {
    /// Selector values, `"all"` first
    pub options: Vec<String>,
    /// Currently selected value
    pub selected: CategoryFilter,
}

/// Choose a uniformly random index in `[0, len)`.
///
/// Returns `None` for an empty store.
pub fn pick_random<R: Rng + ?Sized>(store: &QuoteStore, rng: &mut R) -> Option<usize> {
    if store.is_empty() {
        None
    } else {
        Some(rng.gen_range(0..store.len()))
    }
}

/// View for the "show new quote" action.
pub fn random_view<R: Rng + ?Sized>(store: &QuoteStore, rng: &mut R) -> View {
    match pick_random(store, rng).and_then(|i| store.get(i)) {
        Some(quote) => View::Single {
            quote: quote.clone(),
        },
        None => View::placeholder(EMPTY_STORE_MESSAGE),
    }
}

/// View for a category filter.
pub fn filter_view(store: &QuoteStore, filter: &CategoryFilter) -> View {
    let quotes: Vec<Quote> = store.iter().filter(|q| filter.matches(q)).cloned().collect();

    if quotes.is_empty() {
        View::placeholder(NO_MATCHES_MESSAGE)
    } else {
        View::List { quotes }
    }
}

/// Distinct categories present in the store, sorted.
pub fn categories(store: &QuoteStore) -> Vec<Category> {
    let set: BTreeSet<&str> = store.iter().map(|q| q.category.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Build the selector options and reapply a persisted selection.
///
/// A selection whose category no longer exists falls back to `"all"`.
pub fn category_options(store: &QuoteStore, persisted: &CategoryFilter) -> CategoryOptions {
    let categories = categories(store);

    let selected = match persisted {
        CategoryFilter::Category(c) if !categories.contains(c) => CategoryFilter::All,
        other => other.clone(),
    };

    let mut options = Vec::with_capacity(categories.len() + 1);
    options.push(ALL_CATEGORIES.to_string());
    // A category literally named "all" is already covered by the sentinel
    options.extend(categories.into_iter().filter(|c| c != ALL_CATEGORIES));

    CategoryOptions { options, selected }
}

/// Render one quote as an HTML fragment.
pub fn render_quote_html(quote: &Quote) -> String {
    format!(
        "<p>\"{}\"</p><small>Category: <strong>{}</strong></small>",
        escape_html(&quote.text),
        escape_html(&quote.category)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_store() -> QuoteStore {
        QuoteStore::from_quotes(vec![
            Quote::new("A", "Life"),
            Quote::new("B", "Motivation"),
            Quote::new("C", "Life"),
        ])
    }

    #[test]
    fn filter_sentinel_roundtrip() {
        assert_eq!(CategoryFilter::from_value("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_value("Life"),
            CategoryFilter::Category("Life".into())
        );
        assert_eq!(CategoryFilter::All.as_str(), "all");

        let json = serde_json::to_string(&CategoryFilter::Category("Life".into())).unwrap();
        assert_eq!(json, r#""Life""#);
        let parsed: CategoryFilter = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(parsed, CategoryFilter::All);
    }

    #[test]
    fn random_on_empty_store_is_placeholder() {
        let mut rng = StdRng::seed_from_u64(7);
        let view = random_view(&QuoteStore::new(), &mut rng);
        assert_eq!(
            view,
            View::Placeholder {
                message: EMPTY_STORE_MESSAGE.into()
            }
        );
        assert_eq!(
            view.render_html(),
            "<em>No quotes available. Please add one!</em>"
        );
    }

    #[test]
    fn random_index_stays_in_range() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let i = pick_random(&store, &mut rng).unwrap();
            assert!(i < store.len());
        }
    }

    #[test]
    fn random_is_roughly_uniform() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(1234);
        let mut counts = [0usize; 3];
        let trials = 30_000;
        for _ in 0..trials {
            counts[pick_random(&store, &mut rng).unwrap()] += 1;
        }
        // Each bucket expects 10_000; allow a generous band
        for count in counts {
            assert!((9_000..=11_000).contains(&count), "count {count}");
        }
    }

    #[test]
    fn filter_by_category() {
        let store = sample_store();
        let view = filter_view(&store, &CategoryFilter::Category("Life".into()));
        let texts: Vec<_> = view.quotes().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "C"]);
    }

    #[test]
    fn filter_all_returns_everything() {
        let store = sample_store();
        let view = filter_view(&store, &CategoryFilter::All);
        assert_eq!(view.quotes().len(), 3);
    }

    #[test]
    fn filter_without_matches_is_placeholder() {
        let store = sample_store();
        let view = filter_view(&store, &CategoryFilter::Category("Nope".into()));
        assert_eq!(
            view,
            View::Placeholder {
                message: NO_MATCHES_MESSAGE.into()
            }
        );
        assert!(view.quotes().is_empty());

        let view = filter_view(&QuoteStore::new(), &CategoryFilter::All);
        assert!(matches!(view, View::Placeholder { .. }));
    }

    #[test]
    fn categories_are_distinct() {
        assert_eq!(categories(&sample_store()), vec!["Life", "Motivation"]);
    }

    #[test]
    fn options_start_with_all_and_keep_selection() {
        let store = sample_store();
        let options = category_options(&store, &CategoryFilter::Category("Life".into()));
        assert_eq!(options.options, vec!["all", "Life", "Motivation"]);
        assert_eq!(options.selected, CategoryFilter::Category("Life".into()));
    }

    #[test]
    fn category_named_all_is_listed_once() {
        let mut store = sample_store();
        store.push(Quote::new("Edge", ALL_CATEGORIES));

        let options = category_options(&store, &CategoryFilter::All);
        assert_eq!(options.options, vec!["all", "Life", "Motivation"]);
    }

    #[test]
    fn stale_selection_falls_back_to_all() {
        let store = sample_store();
        let options = category_options(&store, &CategoryFilter::Category("Gone".into()));
        assert_eq!(options.selected, CategoryFilter::All);
    }

    #[test]
    fn html_is_escaped() {
        let quote = Quote::new("<b>bold</b> & \"quoted\"", "A&B");
        assert_eq!(
            render_quote_html(&quote),
            "<p>\"&lt;b&gt;bold&lt;/b&gt; &amp; &quot;quoted&quot;\"</p>\
             <small>Category: <strong>A&amp;B</strong></small>"
        );
    }

    #[test]
    fn view_serialization_is_tagged() {
        let view = View::Single {
            quote: Quote::new("A", "X"),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["quote"]["text"], "A");
    }
}
