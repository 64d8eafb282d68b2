//! Typed value parsers, one per class-token prefix, plus the value-class
//! pattern they share and the implied-property rules.

pub(crate) mod date_time;
pub(crate) mod embedded_markup;
pub(crate) mod implied;
pub(crate) mod plain_text;
pub(crate) mod url_property;
pub(crate) mod value_class_pattern;

use crate::parser::NodeRef;
use crate::property::{Prefix, PropertyValue};
use crate::resolver::Resolver;

/// Run the typed parser selected by `prefix` against `node`.
pub(crate) fn parse(prefix: Prefix, node: &NodeRef, resolver: &Resolver) -> PropertyValue {
    match prefix {
        Prefix::DateTime => PropertyValue::Text(date_time::value(node, resolver)),
        Prefix::Embedded => embedded_markup::value(node, resolver),
        Prefix::PlainText => PropertyValue::Text(plain_text::value(node, resolver)),
        Prefix::Url => url_property::value(node, resolver),
    }
}
