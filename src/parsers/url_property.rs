use super::value_class_pattern;
use crate::models::ValueClassPrecedence;
use crate::node_utils::ImageText;
use crate::parser::{NodeExt, NodeRef};
use crate::property::{Prefix, PropertyValue};
use crate::resolver::Resolver;
use crate::utils::{attribute_value_from, AttributeTable};

const URL_ATTRIBUTES: AttributeTable = &[
    ("href", &["a", "area", "link"]),
    ("src", &["audio", "iframe", "img", "source", "video"]),
    ("poster", &["video"]),
    ("data", &["object"]),
];

const EXTENDED_URL_ATTRIBUTES: AttributeTable = &[
    ("title", &["abbr"]),
    ("value", &["data", "input"]),
];

/// Resolve a `u-*` value to an absolute URL.  An `<img>` with `alt` yields
/// the URL together with its alternative text.
pub(crate) fn value(node: &NodeRef, resolver: &Resolver) -> PropertyValue {
    let resolved = resolver.resolve_url(&unresolved_value(node, resolver));
    if !node.matches_selector("img[alt]") {
        return PropertyValue::Text(resolved);
    }
    PropertyValue::MediaWithAlt {
        value: resolved,
        alt: node.attr_value("alt").unwrap_or_default().trim().to_string(),
    }
}

fn unresolved_value(node: &NodeRef, resolver: &Resolver) -> String {
    if let Some(value) = attribute_value_from(node, URL_ATTRIBUTES) {
        return value;
    }

    let value_class = || value_class_pattern::parse(node, Prefix::Url, resolver);
    let extended = || attribute_value_from(node, EXTENDED_URL_ATTRIBUTES);
    let found = match resolver.options().value_class_precedence {
        ValueClassPrecedence::BeforeExtended => value_class().or_else(extended),
        ValueClassPrecedence::AfterExtended => extended().or_else(value_class),
    };

    found.unwrap_or_else(|| node.text_with_images(ImageText::Alt))
}
