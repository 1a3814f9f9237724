//! Import and export of the quote collection as JSON files.

use crate::{error::Result, Error, Quote, QuoteStore};
use serde_json::Value;

/// File name suggested for exported collections.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Serialize the whole store as a pretty-printed JSON array.
pub fn export_json(store: &QuoteStore) -> Result<String> {
    serde_json::to_string_pretty(store.as_slice()).map_err(|e| Error::Serialization(e.to_string()))
}

/// Parse an uploaded file.
///
/// The top level must be a JSON array; anything else is rejected before a
/// single record is produced. Elements are taken as they come: every element
/// yields one quote, with a missing or null `text`/`category` read as an
/// empty string and any other non-string value kept as its JSON text.
pub fn parse_import(text: &str) -> Result<Vec<Quote>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::InvalidImport(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(Error::ImportNotArray);
    };

    Ok(items
        .iter()
        .map(|item| Quote::new(field(item, "text"), field(item, "category")))
        .collect())
}

fn field(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_is_pretty_array() {
        let store = QuoteStore::from_quotes(vec![Quote::new("A", "X")]);
        let json = export_json(&store).unwrap();

        assert!(json.starts_with("[\n"));
        assert!(json.contains("\"text\": \"A\""));
    }

    #[test]
    fn export_empty_store() {
        assert_eq!(export_json(&QuoteStore::new()).unwrap(), "[]");
    }

    #[test]
    fn import_array() {
        let quotes =
            parse_import(r#"[{"text":"A","category":"X"},{"text":"B","category":"Y"}]"#)
                .unwrap();
        assert_eq!(quotes, vec![Quote::new("A", "X"), Quote::new("B", "Y")]);
    }

    #[test]
    fn import_rejects_object() {
        let err = parse_import(r#"{"text":"A","category":"X"}"#).unwrap_err();
        assert_eq!(err, Error::ImportNotArray);
    }

    #[test]
    fn import_rejects_unparsable_text() {
        let err = parse_import("not json at all").unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
    }

    #[test]
    fn import_takes_every_element() {
        let quotes =
            parse_import(r#"[{"text":"A","category":"X"},{"text":"B"},{"text":1},"loose",null]"#)
                .unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::new("A", "X"),
                Quote::new("B", ""),
                Quote::new("1", ""),
                Quote::new("", ""),
                Quote::new("", ""),
            ]
        );
    }
}
