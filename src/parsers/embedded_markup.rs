use crate::node_utils::ImageText;
use crate::parser::{NodeExt, NodeRef};
use crate::property::PropertyValue;
use crate::resolver::Resolver;

/// Resolve an `e-*` value: the element's inner markup, untouched, and its
/// text rendering.
pub(crate) fn value(node: &NodeRef, resolver: &Resolver) -> PropertyValue {
    PropertyValue::Embedded {
        html: node.inner_html().trim().to_string(),
        value: node
            .text_with_images(ImageText::AltOrSrc(resolver.base_url()))
            .trim()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use crate::ParseOptions;

    #[test]
    fn keeps_markup_and_renders_text() {
        let doc = parse_html(
            "<div class=\"e-content\">\n  <p>Hello <em>there</em></p><img src=\"/smile.png\">\n</div>",
        );
        let node = doc.select_first(".e-content").unwrap().as_node().clone();
        let resolver = Resolver::new("https://example.org/", ParseOptions::default()).unwrap();
        assert_eq!(
            value(&node, &resolver),
            PropertyValue::Embedded {
                html: r#"<p>Hello <em>there</em></p><img src="/smile.png">"#.into(),
                value: "Hello there https://example.org/smile.png".into(),
            }
        );
    }
}
