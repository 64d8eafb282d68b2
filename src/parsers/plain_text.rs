use super::value_class_pattern;
use crate::node_utils::ImageText;
use crate::parser::{NodeExt, NodeRef};
use crate::property::Prefix;
use crate::resolver::Resolver;
use crate::utils::{attribute_value_from, normalize_text, AttributeTable};

const PLAIN_TEXT_ATTRIBUTES: AttributeTable = &[
    ("title", &["abbr", "link"]),
    ("value", &["data", "input"]),
    ("alt", &["area", "img"]),
];

/// Resolve a `p-*` value: value-class pattern, then the attribute table,
/// then the element's text with images rendered as their `alt` (or `src`).
pub(crate) fn value(node: &NodeRef, resolver: &Resolver) -> String {
    if let Some(value) = value_class_pattern::parse(node, Prefix::PlainText, resolver) {
        return value;
    }
    if let Some(value) = attribute_value_from(node, PLAIN_TEXT_ATTRIBUTES) {
        return value.trim().to_string();
    }
    normalize_text(&node.text_with_images(ImageText::AltOrSrc(resolver.base_url())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use crate::ParseOptions;

    fn plain(html: &str) -> String {
        let doc = parse_html(html);
        let node = doc.select_first(".p-x").unwrap().as_node().clone();
        let resolver = Resolver::new("https://example.org/", ParseOptions::default()).unwrap();
        value(&node, &resolver)
    }

    #[test]
    fn attribute_table() {
        assert_eq!(plain(r#"<abbr class="p-x" title="Doctor">Dr</abbr>"#), "Doctor");
        assert_eq!(plain(r#"<data class="p-x" value="42">forty-two</data>"#), "42");
        assert_eq!(plain(r#"<img class="p-x" src="/a.png" alt=" Jane ">"#), "Jane");
    }

    #[test]
    fn text_is_collapsed_with_images_substituted() {
        assert_eq!(
            plain("<p class=\"p-x\">  Hello\n   <img src=\"/w.png\" alt=\"wave\">   <b>world</b> </p>"),
            "Hello wave world"
        );
        assert_eq!(
            plain(r#"<p class="p-x">Photo <img src="/w.png"></p>"#),
            "Photo https://example.org/w.png"
        );
    }

    #[test]
    fn value_class_pattern_wins_over_text() {
        assert_eq!(
            plain(r#"<p class="p-x"><span class="value">+1</span> (call) <span class="value">555</span></p>"#),
            "+1555"
        );
    }
}
