use crate::item::is_item_node;
use crate::node_utils::ImageText;
use crate::parser::{NodeExt, NodeRef};
use crate::property::PropertyValue;
use crate::resolver::Resolver;
use crate::utils::{non_blank_attribute_value_from, AttributeTable};

const IMPLIED_NAME_ATTRIBUTES: AttributeTable = &[("alt", &["area", "img"]), ("title", &["abbr"])];

/// The element/attribute pairs an implied photo may come from.
const IMPLIED_PHOTO_SOURCES: &[(&str, &str)] = &[("img", "src"), ("object", "data")];

/// The element/attribute pairs an implied url may come from.
const IMPLIED_URL_SOURCES: &[(&str, &str)] = &[("a", "href"), ("area", "href")];

/// The implied name of the item rooted at `node`.
///
/// Looks for `alt`/`title` on the root, then on its only element child,
/// then on that child's only element child, stopping at nested items.
/// Falls back to the root's text with images rendered as their `alt`.
pub(crate) fn name(node: &NodeRef) -> String {
    let attribute = non_blank_attribute_value_from(node, IMPLIED_NAME_ATTRIBUTES).or_else(|| {
        let child = only_non_item_child(node)?;
        non_blank_attribute_value_from(&child, IMPLIED_NAME_ATTRIBUTES).or_else(|| {
            let grandchild = only_non_item_child(&child)?;
            non_blank_attribute_value_from(&grandchild, IMPLIED_NAME_ATTRIBUTES)
        })
    });
    attribute
        .unwrap_or_else(|| node.text_with_images(ImageText::Alt))
        .trim()
        .to_string()
}

/// The implied photo of the item rooted at `node`, if any.
pub(crate) fn photo(node: &NodeRef, resolver: &Resolver) -> Option<PropertyValue> {
    let (source, raw) = implied_source(node, IMPLIED_PHOTO_SOURCES)?;
    let value = resolver.resolve_url(&raw);
    if source.matches_selector("img[alt]") {
        let alt = source.attr_value("alt").unwrap_or_default().trim().to_string();
        return Some(PropertyValue::MediaWithAlt { value, alt });
    }
    Some(PropertyValue::Text(value))
}

/// The implied url of the item rooted at `node`, if any.
pub(crate) fn url(node: &NodeRef, resolver: &Resolver) -> Option<PropertyValue> {
    let (_, raw) = implied_source(node, IMPLIED_URL_SOURCES)?;
    Some(PropertyValue::Text(resolver.resolve_url(&raw)))
}

/// Find the element supplying an implied photo or url: the root itself,
/// else the only child of a matching tag, else the same one level down
/// through the root's only element child.  Nested items are never entered.
fn implied_source(node: &NodeRef, sources: &[(&str, &str)]) -> Option<(NodeRef, String)> {
    if let Some(found) = own_source(node, sources) {
        return Some(found);
    }
    if let Some(found) = only_of_type_source(node, sources) {
        return Some(found);
    }
    let child = only_non_item_child(node)?;
    only_of_type_source(&child, sources)
}

fn own_source(node: &NodeRef, sources: &[(&str, &str)]) -> Option<(NodeRef, String)> {
    let tag = node.element_name()?;
    sources
        .iter()
        .filter(|(source_tag, _)| *source_tag == tag)
        .find_map(|(_, attribute)| node.attr_value(attribute))
        .map(|value| (node.clone(), value))
}

/// A child of `parent` that is the only one of its tag, carries the
/// source attribute and is not an item.
fn only_of_type_source(parent: &NodeRef, sources: &[(&str, &str)]) -> Option<(NodeRef, String)> {
    let children = parent.element_children();
    sources.iter().find_map(|(tag, _)| {
        let mut same_tag = children.iter().filter(|c| c.element_name() == Some(*tag));
        match (same_tag.next(), same_tag.next()) {
            (Some(only), None) if !is_item_node(only) => own_source(only, sources),
            _ => None,
        }
    })
}

fn only_non_item_child(node: &NodeRef) -> Option<NodeRef> {
    node.only_element_child().filter(|child| !is_item_node(child))
}
