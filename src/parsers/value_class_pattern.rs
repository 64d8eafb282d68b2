use super::date_time;
use crate::item::is_item_node;
use crate::logging::logging_defs::*;
use crate::parser::{NodeExt, NodeRef};
use crate::property::{is_property_node, Prefix};
use crate::resolver::Resolver;
use crate::utils::{attribute_value_from, AttributeTable};

const VALUE_CLASS: &str = "value";
const VALUE_TITLE_CLASS: &str = "value-title";

const VALUE_ATTRIBUTES: AttributeTable = &[
    ("alt", &["area", "img"]),
    ("value", &["data"]),
    ("title", &["abbr"]),
];

const DATETIME_VALUE_ATTRIBUTES: AttributeTable = &[
    ("alt", &["area", "img"]),
    ("value", &["data"]),
    ("title", &["abbr"]),
    ("datetime", &["del", "ins", "time"]),
];

/// Resolve `node` through the value-class pattern.
///
/// Returns `None` when no `value`/`value-title` descendant exists or when
/// the marked parts add up to nothing, so the caller's next fallback runs.
pub(crate) fn parse(node: &NodeRef, prefix: Prefix, resolver: &Resolver) -> Option<String> {
    let value_nodes = value_nodes_from(node);
    if value_nodes.is_empty() {
        return None;
    }

    let logger = resolver.logger();
    start_span!(logger, VALUE_CLASS_PATTERN);

    let parts: Vec<String> = value_nodes
        .iter()
        .map(|value_node| part_value(value_node, prefix))
        .collect();
    annotate_span!(logger, VALUE_CLASS_PATTERN, "{} parts: {:?}", prefix, parts);

    let value = match prefix {
        Prefix::DateTime => date_time::assemble(&parts),
        _ => parts.concat(),
    };

    end_span!(logger, VALUE_CLASS_PATTERN);
    Some(value).filter(|v| !v.trim().is_empty())
}

/// The `value`/`value-title` elements below `node`, in document order.  The
/// search does not enter marked elements, property elements or items.
pub(crate) fn value_nodes_from(node: &NodeRef) -> Vec<NodeRef> {
    let mut nodes = vec![];
    for child in node.element_children() {
        collect_value_nodes(&child, &mut nodes);
    }
    nodes
}

fn collect_value_nodes(node: &NodeRef, out: &mut Vec<NodeRef>) {
    if node.is_ignored() {
        return;
    }
    if node.has_class(VALUE_CLASS) || node.has_class(VALUE_TITLE_CLASS) {
        out.push(node.clone());
        return;
    }
    if is_property_node(node) || is_item_node(node) {
        return;
    }
    for child in node.element_children() {
        collect_value_nodes(&child, out);
    }
}

fn part_value(node: &NodeRef, prefix: Prefix) -> String {
    if node.has_class(VALUE_TITLE_CLASS) {
        return node.attr_value("title").unwrap_or_default();
    }
    let table = match prefix {
        Prefix::DateTime => DATETIME_VALUE_ATTRIBUTES,
        _ => VALUE_ATTRIBUTES,
    };
    attribute_value_from(node, table).unwrap_or_else(|| node.text_contents())
}
