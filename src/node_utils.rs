use crate::parser::NodeRef;
use crate::utils::{to_absolute_uri, IGNORED_TAGS};

/// How an `<img>` element is rendered when a subtree is flattened to text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageText<'a> {
    /// Images contribute their `alt` attribute, if any.
    Alt,
    /// Images contribute ` alt ` when present, otherwise their `src`
    /// resolved against the given base URL.
    AltOrSrc(&'a str),
}

/// DOM-navigation helpers implemented on [`NodeRef`].
///
/// This trait is automatically in scope when you import from
/// [`crate::parser`].
pub trait NodeExt {
    /// Return the local tag name of this node if it is an element (e.g.
    /// `"div"`, `"p"`), or `None` for text / comment / document nodes.
    fn element_name(&self) -> Option<&str>;

    /// Look up an attribute by name and return its value, or `None` if the
    /// attribute is absent or this is not an element node.
    fn attr_value(&self, name: &str) -> Option<String>;

    /// Like [`attr_value`][NodeExt::attr_value] but treats a blank value as
    /// absent.
    fn non_blank_attr(&self, name: &str) -> Option<String>;

    /// The whitespace-separated tokens of the `class` attribute, in source
    /// order.
    fn classes(&self) -> Vec<String>;

    /// Whether the `class` attribute contains `token`.
    fn has_class(&self, token: &str) -> bool;

    /// Collect the direct *element* children (skipping text and comment nodes)
    /// into a `Vec`.
    fn element_children(&self) -> Vec<NodeRef>;

    /// The single element child, when there is exactly one.
    fn only_element_child(&self) -> Option<NodeRef>;

    /// Test this node alone (not its descendants) against a CSS selector.
    /// An invalid selector never matches.
    fn matches_selector(&self, selector: &str) -> bool;

    /// Whether the walker skips this node and its subtree entirely.
    fn is_ignored(&self) -> bool;

    /// Serialise the *children* of this node to an HTML string (the node's
    /// own open/close tags are **not** included).
    fn inner_html(&self) -> String;

    /// Concatenate the text below this node, skipping ignored elements and
    /// rendering descendant `<img>` elements according to `images`.  The node
    /// itself is never substituted.  Never touches the tree.
    fn text_with_images(&self, images: ImageText<'_>) -> String;
}

impl NodeExt for NodeRef {
    fn element_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.local.as_ref())
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).map(|v| v.to_string()))
    }

    fn non_blank_attr(&self, name: &str) -> Option<String> {
        self.attr_value(name).filter(|v| !v.trim().is_empty())
    }

    fn classes(&self) -> Vec<String> {
        self.attr_value("class")
            .map(|c| c.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    fn has_class(&self, token: &str) -> bool {
        self.attr_value("class")
            .map(|c| c.split_whitespace().any(|t| t == token))
            .unwrap_or(false)
    }

    fn element_children(&self) -> Vec<NodeRef> {
        self.children()
            .filter(|c| c.as_element().is_some())
            .collect()
    }

    fn only_element_child(&self) -> Option<NodeRef> {
        let mut children = self.children().filter(|c| c.as_element().is_some());
        match (children.next(), children.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    fn matches_selector(&self, selector: &str) -> bool {
        match (self.clone().into_element_ref(), kuchikikiki::Selectors::compile(selector)) {
            (Some(element), Ok(selectors)) => selectors.matches(&element),
            _ => false,
        }
    }

    fn is_ignored(&self) -> bool {
        self.element_name()
            .map(|name| IGNORED_TAGS.contains(name))
            .unwrap_or(false)
    }

    fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            out.push_str(&child.to_string());
        }
        out
    }

    fn text_with_images(&self, images: ImageText<'_>) -> String {
        let mut out = String::new();
        if self.is_ignored() {
            return out;
        }
        for child in self.children() {
            append_text(&child, images, &mut out);
        }
        out
    }
}

fn append_text(node: &NodeRef, images: ImageText<'_>, out: &mut String) {
    if let Some(text) = node.as_text() {
        out.push_str(&text.borrow());
        return;
    }
    if node.is_ignored() {
        return;
    }
    if node.element_name() == Some("img") {
        match images {
            ImageText::Alt => {
                if let Some(alt) = node.attr_value("alt") {
                    out.push_str(&alt);
                }
            }
            ImageText::AltOrSrc(base_url) => {
                if let Some(alt) = node.attr_value("alt") {
                    out.push(' ');
                    out.push_str(alt.trim());
                    out.push(' ');
                } else if let Some(src) = node.attr_value("src") {
                    out.push(' ');
                    out.push_str(&to_absolute_uri(&src, base_url));
                    out.push(' ');
                }
            }
        }
        return;
    }
    for child in node.children() {
        append_text(&child, images, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    fn first(doc: &NodeRef, selector: &str) -> NodeRef {
        doc.select_first(selector).unwrap().as_node().clone()
    }

    #[test]
    fn classes_preserve_source_order() {
        let doc = parse_html(r#"<p class=" p-name  u-url h-card">x</p>"#);
        let p = first(&doc, "p");
        assert_eq!(p.classes(), vec!["p-name", "u-url", "h-card"]);
        assert!(p.has_class("u-url"));
        assert!(!p.has_class("url"));
    }

    #[test]
    fn only_element_child_ignores_text() {
        let doc = parse_html("<div id=a> text <span>x</span> more </div><div id=b><i></i><b></b></div>");
        assert!(first(&doc, "#a").only_element_child().is_some());
        assert!(first(&doc, "#b").only_element_child().is_none());
    }

    #[test]
    fn matches_selector_checks_only_the_node() {
        let doc = parse_html(r#"<div><img src="a.jpg" alt="pic"><img src="b.jpg"></div>"#);
        let imgs: Vec<_> = doc.select("img").unwrap().map(|e| e.as_node().clone()).collect();
        assert!(imgs[0].matches_selector("img[alt]"));
        assert!(!imgs[1].matches_selector("img[alt]"));
        assert!(!first(&doc, "div").matches_selector("img[alt]"));
        assert!(!imgs[0].matches_selector("[[["));
    }

    #[test]
    fn text_with_images_leaves_tree_untouched() {
        let doc = parse_html(r#"<p>Hi <img src="/me.png" alt="Jane"> there<script>x()</script></p>"#);
        let p = first(&doc, "p");
        assert_eq!(p.text_with_images(ImageText::Alt), "Hi Jane there");
        assert_eq!(p.text_with_images(ImageText::AltOrSrc("")), "Hi  Jane  there");
        assert!(p.select_first("img").is_ok());
        assert_eq!(p.text_contents(), "Hi  therex()");
    }

    #[test]
    fn root_image_is_not_substituted() {
        let doc = parse_html(r#"<img src="/me.png" alt="Jane">"#);
        let img = first(&doc, "img");
        assert_eq!(img.text_with_images(ImageText::Alt), "");
        assert_eq!(img.text_with_images(ImageText::AltOrSrc("https://example.org/")), "");
    }

    #[test]
    fn image_without_alt_falls_back_to_absolute_src() {
        let doc = parse_html(r#"<p>Photo: <img src="/me.png"></p>"#);
        let p = first(&doc, "p");
        assert_eq!(
            p.text_with_images(ImageText::AltOrSrc("https://example.org/")),
            "Photo:  https://example.org/me.png "
        );
    }
}
