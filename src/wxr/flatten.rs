use indexmap::IndexMap;

use super::{config::FlattenRules, record::Record, tree::Element};

/// Flattens one located item into a single record.
///
/// Columns are produced in three passes, later passes overriding earlier ones
/// on a name collision:
///
/// 1. every direct child other than categories and post-meta becomes a column
///    named after its tag, plus one `{tag}_{attribute}` column per attribute;
/// 2. categories carrying a `domain` attribute are grouped per domain into
///    comma-joined `category_{domain}` columns;
/// 3. each post-meta block with a non-empty meta key becomes a column named
///    after that key.
///
/// A repeated tag or meta key keeps its last value. Every value is trimmed of
/// ASCII whitespace and NUL; other Unicode spaces are kept.
pub fn flatten(item: &Element, rules: &FlattenRules) -> Record {
    let children = item.children().unwrap_or_default();

    let mut record = Record::new();
    flatten_values(children, rules, &mut record);
    flatten_categories(children, rules, &mut record);
    flatten_postmeta(children, rules, &mut record);
    record
}

fn flatten_values(children: &[Element], rules: &FlattenRules, record: &mut Record) {
    let skipped = |tag: &str| tag == rules.category_tag || tag == rules.postmeta_tag;

    for child in children.iter().filter(|child| !skipped(child.tag())) {
        let tag = child.tag();
        record.insert(tag, trim_value(child.value().unwrap_or_default()));

        for (key, value) in child.attributes() {
            record.insert(format!("{tag}_{key}"), trim_value(value));
        }
    }
}

fn flatten_categories(children: &[Element], rules: &FlattenRules, record: &mut Record) {
    let mut domains: IndexMap<&str, Vec<&str>> = IndexMap::new();

    for child in children.iter().filter(|child| child.tag() == rules.category_tag) {
        if let Some(domain) = child.attributes().get(&rules.category_group_attribute) {
            domains
                .entry(domain.as_str())
                .or_default()
                .push(child.value().unwrap_or_default());
        }
    }

    for (domain, names) in domains {
        record.insert(format!("category_{domain}"), trim_value(&names.join(",")));
    }
}

fn flatten_postmeta(children: &[Element], rules: &FlattenRules, record: &mut Record) {
    for child in children.iter().filter(|child| child.tag() == rules.postmeta_tag) {
        let mut key = "";
        let mut value = "";

        for entry in child.children().unwrap_or_default() {
            if entry.tag() == rules.meta_key_tag {
                key = entry.value().unwrap_or_default();
            } else if entry.tag() == rules.meta_value_tag {
                value = entry.value().unwrap_or_default();
            }
        }

        if !key.is_empty() {
            record.insert(key, trim_value(value));
        }
    }
}

fn trim_value(value: &str) -> &str {
    value.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
