use crate::parser::{NodeExt, NodeRef};

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements the tree walker never enters and whose text never contributes
/// to a value.
pub static IGNORED_TAGS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["script", "style", "template"]));

/// A property class token: `dt-`, `e-`, `p-` or `u-`, an optional vendor
/// segment, then one or more lowercase words.
pub static PROPERTY_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:dt|e|p|u)(?:-[0-9a-z]+)?(?:-[a-z]+)+$").unwrap());

/// A root class token such as `h-card` or `h-x-vendor-thing`.
pub static ITEM_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h(?:-[0-9a-z]+)?(?:-[a-z]+)+$").unwrap());

static NORMALIZE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// An attribute-priority table: each entry names an attribute and the tags
/// for which it is authoritative.  Entries are tried in order.
pub type AttributeTable = &'static [(&'static str, &'static [&'static str])];

/// Return the first attribute value `table` selects for `node`.
///
/// An attribute that is present but empty still wins: `<a href="">` names
/// the current document.
pub fn attribute_value_from(node: &NodeRef, table: AttributeTable) -> Option<String> {
    let tag = node.element_name()?;
    table
        .iter()
        .filter(|(_, tags)| tags.contains(&tag))
        .find_map(|(attribute, _)| node.attr_value(attribute))
}

/// Like [`attribute_value_from`] but skips blank values.
pub fn non_blank_attribute_value_from(node: &NodeRef, table: AttributeTable) -> Option<String> {
    let tag = node.element_name()?;
    table
        .iter()
        .filter(|(_, tags)| tags.contains(&tag))
        .find_map(|(attribute, _)| node.non_blank_attr(attribute))
}

/// Collapse every run of whitespace in `src` into a single ASCII space and
/// trim both ends.
pub fn normalize_text(src: &str) -> String {
    NORMALIZE_REGEX.replace_all(src.trim(), " ").to_string()
}

/// Split a whitespace-separated token list, then sort and de-duplicate it.
pub fn sorted_unique_tokens(src: &str) -> Vec<String> {
    let mut tokens: Vec<String> = src.split_whitespace().map(String::from).collect();
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Resolve a `<base href>` value against the document URI.  If
/// `base_path` is empty the document URI is returned unchanged.
pub fn resolve_base_uri(doc_uri: &str, base_path: &str) -> String {
    let base_path = base_path.trim();
    if base_path.is_empty() {
        return doc_uri.to_string();
    }
    if let Ok(absolute) = url::Url::parse(base_path) {
        return absolute.into();
    }
    if let Ok(parsed_url) = url::Url::parse(doc_uri) {
        if let Ok(base) = parsed_url.join(base_path) {
            return base.into();
        }
    }
    doc_uri.to_string()
}

/// Convert a potentially-relative URI to an absolute one against
/// `base_uri`.  Already-absolute input comes back unchanged apart from URL
/// normalisation; with no usable base the trimmed input is returned as is.
pub fn to_absolute_uri(uri: &str, base_uri: &str) -> String {
    let uri = uri.trim();
    if let Ok(parsed) = url::Url::parse(uri) {
        return parsed.into();
    }
    if let Ok(parsed_url) = url::Url::parse(base_uri) {
        if let Ok(parsed_url) = parsed_url.join(uri) {
            return parsed_url.into();
        }
    }
    uri.to_string()
}
