use crate::item::{is_item_node, Item};
use crate::logging::logging_defs::*;
use crate::parser::{NodeExt, NodeRef};
use crate::parsers;
use crate::resolver::Resolver;
use crate::utils::PROPERTY_CLASS;
use std::fmt;

/// The type prefix of a property class token.  Each prefix selects one
/// typed value parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `dt-*`: a date, time or datetime.
    DateTime,
    /// `e-*`: embedded markup.
    Embedded,
    /// `p-*`: plain text.
    PlainText,
    /// `u-*`: a URL.
    Url,
}

impl Prefix {
    pub fn from_token(token: &str) -> Option<Prefix> {
        match token {
            "dt" => Some(Prefix::DateTime),
            "e" => Some(Prefix::Embedded),
            "p" => Some(Prefix::PlainText),
            "u" => Some(Prefix::Url),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::DateTime => "dt",
            Prefix::Embedded => "e",
            Prefix::PlainText => "p",
            Prefix::Url => "u",
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property class token split into its prefix and name, e.g. `u-url`
/// becomes `(Url, "url")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeToken {
    pub prefix: Prefix,
    pub name: String,
}

/// The resolved value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    /// A URL taken from an `<img>` that also carries `alt` text.
    MediaWithAlt { value: String, alt: String },
    /// An `e-*` value: the inner markup and its plain-text rendering.
    Embedded { html: String, value: String },
    /// The property element is itself an item.  The item's `value` slot
    /// holds the collapsed scalar.
    Nested(Box<Item>),
}

impl PropertyValue {
    /// Whether the value contributes anything: non-blank text, or any
    /// nested item.
    pub fn is_present(&self) -> bool {
        match self {
            PropertyValue::Text(text) => !text.trim().is_empty(),
            PropertyValue::MediaWithAlt { value, .. } => !value.trim().is_empty(),
            PropertyValue::Embedded { html, value } => {
                !html.trim().is_empty() || !value.trim().is_empty()
            }
            PropertyValue::Nested(_) => true,
        }
    }

    /// The plain string view of the value.  Nested items answer with their
    /// collapsed value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::MediaWithAlt { value, .. } => Some(value),
            PropertyValue::Embedded { value, .. } => Some(value),
            PropertyValue::Nested(item) => item.value.as_ref().and_then(|v| v.as_text()),
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            PropertyValue::Nested(item) => Some(item),
            _ => None,
        }
    }

    /// Replace a nested item by its collapsed value so that values never
    /// nest inside an item's `value` slot.
    pub(crate) fn collapsed(&self) -> Option<PropertyValue> {
        match self {
            PropertyValue::Nested(item) => item.value.clone(),
            other => Some(other.clone()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> PropertyValue {
        PropertyValue::Text(text.to_string())
    }
}

/// One resolved `(node, type)` pair of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub prefix: Prefix,
    /// `true` when the property was inferred rather than declared by a
    /// class token.
    pub implied: bool,
    pub value: PropertyValue,
    /// The element the value was read from: the property element, or the
    /// item root for implied properties.
    pub node: NodeRef,
}

impl Property {
    pub(crate) fn resolve(node: &NodeRef, token: &TypeToken, resolver: &Resolver) -> Property {
        let logger = resolver.logger();
        annotate_span!(logger, RESOLVE_PROPERTIES, "{}-{}", token.prefix, token.name);

        // dt-* values always come from the datetime parser, even on an item root.
        let value = if is_item_node(node) && token.prefix != Prefix::DateTime {
            let mut item = Item::resolve(node, resolver);
            item.value = delegated_value(&item, token.prefix, node, resolver);
            PropertyValue::Nested(Box::new(item))
        } else {
            parsers::parse(token.prefix, node, resolver)
        };

        Property {
            name: token.name.clone(),
            prefix: token.prefix,
            implied: false,
            value,
            node: node.clone(),
        }
    }

    pub(crate) fn implied(name: &str, prefix: Prefix, value: PropertyValue, node: &NodeRef) -> Property {
        Property {
            name: name.to_string(),
            prefix,
            implied: true,
            value,
            node: node.clone(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_present()
    }
}

/// The scalar an item collapses to when it is the value of a property.
fn delegated_value(item: &Item, prefix: Prefix, node: &NodeRef, resolver: &Resolver) -> Option<PropertyValue> {
    let delegate = match prefix {
        Prefix::PlainText => item.property("name"),
        Prefix::Url => item.property("url"),
        Prefix::Embedded | Prefix::DateTime => None,
    };
    delegate
        .filter(|property| property.is_present())
        .and_then(|property| property.value.collapsed())
        .or_else(|| Some(parsers::parse(prefix, node, resolver)))
}

/// Every property class token on `node`, in first-seen order without
/// duplicates.
///
/// ```rust
/// use mf2_rs::parser::parse_html;
/// use mf2_rs::{types_from, Prefix};
///
/// let doc = parse_html(r#"<a class="p-name u-url p-name" href="/">Jane</a>"#);
/// let a = doc.select_first("a").unwrap().as_node().clone();
/// let tokens = types_from(&a);
/// assert_eq!(tokens.len(), 2);
/// assert_eq!((tokens[0].prefix, tokens[0].name.as_str()), (Prefix::PlainText, "name"));
/// assert_eq!((tokens[1].prefix, tokens[1].name.as_str()), (Prefix::Url, "url"));
/// ```
pub fn types_from(node: &NodeRef) -> Vec<TypeToken> {
    let mut tokens: Vec<TypeToken> = vec![];
    for class in node.classes() {
        if !PROPERTY_CLASS.is_match(&class) {
            continue;
        }
        let token = class
            .split_once('-')
            .and_then(|(prefix, name)| {
                Prefix::from_token(prefix).map(|prefix| TypeToken {
                    prefix,
                    name: name.to_string(),
                })
            });
        if let Some(token) = token {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}

/// Whether `node` carries at least one property class token.
pub fn is_property_node(node: &NodeRef) -> bool {
    node.classes().iter().any(|class| PROPERTY_CLASS.is_match(class))
}

/// Collect property elements in document order, starting from each node of
/// `context`.  Ignored elements are skipped with their subtree, and the
/// walk never enters an item node: its descendants belong to that item.
pub fn property_nodes_from(context: &[NodeRef]) -> Vec<NodeRef> {
    let mut nodes = vec![];
    for node in context {
        collect_property_nodes(node, &mut nodes);
    }
    nodes
}

fn collect_property_nodes(node: &NodeRef, out: &mut Vec<NodeRef>) {
    if node.as_element().is_none() || node.is_ignored() {
        return;
    }
    if is_property_node(node) {
        out.push(node.clone());
    }
    if !is_item_node(node) {
        for child in node.element_children() {
            collect_property_nodes(&child, out);
        }
    }
}
