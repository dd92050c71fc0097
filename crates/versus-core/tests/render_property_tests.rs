#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use versus_core::plan::{quote_ident, quote_literal};
use versus_core::rules::validation::normalize_column_list;
use versus_core::Value;

fn unquote(text: &str, quote: char) -> Option<String> {
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    let doubled = format!("{}{}", quote, quote);
    if inner.replace(&doubled, "").contains(quote) {
        return None;
    }
    Some(inner.replace(&doubled, &quote.to_string()))
}

proptest! {
    #[test]
    fn quoted_identifiers_unquote_to_the_original(name in ".*") {
        prop_assert_eq!(unquote(&quote_ident(&name), '"'), Some(name));
    }

    #[test]
    fn quoted_text_literals_unquote_to_the_original(text in ".*") {
        let rendered = quote_literal(&Value::Text(text.clone()));
        prop_assert_eq!(unquote(&rendered, '\''), Some(text));
    }

    #[test]
    fn normalized_lists_keep_order(names in prop::collection::btree_set("[a-z]{1,6}", 1..6)) {
        let names: Vec<String> = names.into_iter().collect();
        prop_assert_eq!(normalize_column_list("by", &names).unwrap(), names);
    }
}
