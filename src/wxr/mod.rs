//! The WXR to flat-record pipeline.
//!
//! Raw export text goes through these stages, each a pure transform of the
//! previous one:
//!
//! 1. [`sanitizer`] repairs the text into well-formed XML;
//! 2. [`tokenizer`] turns it into a flat sequence of [`event::ParseEvent`]s;
//! 3. [`tree::build_tree`] rebuilds the element tree;
//! 4. [`locator::find_items`] collects every `<item>` subtree;
//! 5. [`flatten::flatten`] turns each item into a [`record::Record`];
//! 6. [`reconcile::reconcile`] gives every record the same columns.
//!
//! [`convert`] runs stages 2 to 6 over already sanitized XML.
//!
//! # Examples
//!
//! ```
//! use wxr_flatten::wxr::{config::FlattenRules, convert, tokenizer::QuickXmlTokenizer};
//!
//! let xml = r#"
//! <rss xmlns:wp="http://wordpress.org/export/1.2/">
//!   <channel>
//!     <item>
//!       <title>Hello</title>
//!       <category domain="category">A</category>
//!       <category domain="category">B</category>
//!       <wp:postmeta>
//!         <wp:meta_key>_edit_lock</wp:meta_key>
//!         <wp:meta_value>1221689350</wp:meta_value>
//!       </wp:postmeta>
//!     </item>
//!     <item>
//!       <title>World</title>
//!     </item>
//!   </channel>
//! </rss>"#;
//!
//! let records = convert(xml, &QuickXmlTokenizer::new(), &FlattenRules::default()).unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].value("category_category"), Some("A,B"));
//! assert_eq!(records[0].value("_edit_lock"), Some("1221689350"));
//! assert_eq!(records[1].value("title"), Some("World"));
//! assert_eq!(records[1].get("_edit_lock"), Some(&None));
//! ```
pub mod config;
pub mod event;
pub mod flatten;
pub mod locator;
pub mod reconcile;
pub mod record;
pub mod sanitizer;
pub mod tokenizer;
pub mod tree;

use log::debug;

use crate::error::WxrError;

use self::{config::FlattenRules, record::Record, tokenizer::Tokenizer, tree::Element};

/// Flattens and reconciles every item of an already built tree.
pub fn records_from_tree(root: &Element, rules: &FlattenRules) -> Vec<Record> {
    let items = locator::find_items(root, &rules.item_tag);
    debug!("Found {} <{}> elements", items.len(), rules.item_tag);

    let records: Vec<Record> = items
        .into_iter()
        .map(|item| flatten::flatten(item, rules))
        .collect();

    reconcile::reconcile(&records)
}

/// Runs tokenizing, tree building, item location, flattening and
/// reconciliation over well-formed XML.
pub fn convert(
    xml: &str,
    tokenizer: &dyn Tokenizer,
    rules: &FlattenRules,
) -> Result<Vec<Record>, WxrError> {
    let events = tokenizer.tokenize(xml)?;
    let root = tree::build_tree(events)?;
    Ok(records_from_tree(&root, rules))
}
