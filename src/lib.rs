//! Resolve [microformats2](https://microformats.org/wiki/microformats2-parsing)
//! items, properties and `rel` relationships from an HTML document tree.
//!
//! ## Quick start
//!
//! ```rust
//! use mf2_rs::{parse, ParseOptions};
//!
//! let html = r#"<div class="h-card"><a class="p-name u-url" href="/jane">Jane Doe</a></div>
//!               <a rel="me" href="https://social.example/@jane">me</a>"#;
//! let document = parse(html, "https://example.org/", ParseOptions::default()).unwrap();
//!
//! let card = &document.items[0];
//! assert_eq!(card.types, vec!["h-card"]);
//! assert_eq!(card.property("url").unwrap().value.as_text(), Some("https://example.org/jane"));
//! assert_eq!(document.relationships.group_by_rel()["me"], vec!["https://social.example/@jane"]);
//! ```
//!
//! ## Module layout
//!
//! * **Top level** – [`parse`] is the document entry-point; [`resolve_item`],
//!   [`resolve_properties`] and [`extract_relationships`] work on an already
//!   parsed tree.  [`Resolver`] is the reusable form of all four.
//! * [`Item`], [`Property`] and [`PropertyValue`] – the resolved structure.
//! * [`RelationshipsCollection`] – `rel` links with by-URL and by-rel indices.
//! * [`parser`] – thin wrappers around the underlying HTML parser
//!   ([`parser::NodeRef`], [`parser::parse_html`]) and the [`NodeExt`] helpers.

#[macro_use]
mod logging;

mod error;
mod item;
mod models;
mod node_utils;
mod parsers;
mod property;
mod relationships;
mod resolver;
mod utils;

pub use error::{ParseError, ParseResult};
pub use item::{is_item_node, item_types_from, Item};
pub use logging::logger::DebugLogsCategories;
pub use models::{Document, ParseOptions, ValueClassPrecedence};
pub use node_utils::{ImageText, NodeExt};
pub use property::{is_property_node, property_nodes_from, types_from, Prefix, Property, PropertyValue, TypeToken};
pub use relationships::{RelAttributes, Relationship, RelationshipsCollection};
pub use resolver::Resolver;

/// Thin wrappers around the underlying HTML parser.
///
/// [`NodeRef`] is the reference-counted DOM node type used throughout the crate.
/// [`parse_html`] parses a complete HTML document into a [`NodeRef`] tree.
pub mod parser {
    use kuchikikiki::traits::TendrilSink;
    pub use kuchikikiki::NodeRef;
    pub use crate::node_utils::NodeExt;

    /// Parse an HTML string into a [`NodeRef`] document tree.
    ///
    /// The parser follows the HTML5 specification; an implicit `<html>`, `<head>`,
    /// and `<body>` are synthesised when missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mf2_rs::parser::parse_html;
    ///
    /// let doc = parse_html(r#"<div class="h-card">Jane</div>"#);
    /// assert!(doc.select_first(".h-card").is_ok());
    /// ```
    pub fn parse_html(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }
}

/// Parse an HTML page and resolve every top-level item and relationship.
///
/// # Arguments
///
/// * `html_str` – the raw HTML source of the page.
/// * `base_url` – the URL the page was fetched from, used to make `u-*`
///   values and `rel` hrefs absolute.  A `<base href>` in the page refines
///   it.  Pass `""` to leave relative URLs untouched.
/// * `options` – see [`ParseOptions`].
///
/// # Errors
///
/// [`ParseError::InvalidBaseUrl`] when `base_url` (after applying
/// `<base href>`) is neither empty nor an absolute URL.
pub fn parse(html_str: &str, base_url: &str, options: ParseOptions) -> ParseResult<Document> {
    let document = parser::parse_html(html_str);
    let base_href = document
        .select_first("base[href]")
        .ok()
        .and_then(|base| base.as_node().attr_value("href"))
        .unwrap_or_default();
    let base_url = utils::resolve_base_uri(base_url.trim(), &base_href);
    let resolver = Resolver::new(&base_url, options)?;
    Ok(resolver.parse_document(&document))
}

/// Resolve the item rooted at `node` against `base_url`.
pub fn resolve_item(node: &parser::NodeRef, base_url: &str, options: &ParseOptions) -> ParseResult<Item> {
    Ok(Resolver::new(base_url, options.clone())?.resolve_item(node))
}

/// Resolve the properties (explicit, then implied) of the item rooted at
/// `node` against `base_url`.
pub fn resolve_properties(
    node: &parser::NodeRef,
    base_url: &str,
    options: &ParseOptions,
) -> ParseResult<Vec<Property>> {
    Ok(Resolver::new(base_url, options.clone())?.resolve_properties(node))
}

/// Collect the `rel` relationships below `root`, resolving hrefs against
/// `base_url`.
pub fn extract_relationships(root: &parser::NodeRef, base_url: &str) -> ParseResult<RelationshipsCollection> {
    Ok(Resolver::new(base_url, ParseOptions::default())?.extract_relationships(root))
}
