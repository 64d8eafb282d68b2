use crate::logging::logging_defs::*;
use crate::parser::{NodeExt, NodeRef};
use crate::parsers::{date_time, implied};
use crate::property::{is_property_node, property_nodes_from, types_from, Prefix, Property, PropertyValue};
use crate::resolver::Resolver;
use crate::utils::ITEM_CLASS;

/// Legacy (microformats1) root class names and the item type each stands for.
/// Consulted only when an element carries no `h-*` token.
const LEGACY_ROOT_CLASSES: &[(&str, &str)] = &[
    ("adr", "h-adr"),
    ("geo", "h-geo"),
    ("hentry", "h-entry"),
    ("hfeed", "h-feed"),
    ("hproduct", "h-product"),
    ("hrecipe", "h-recipe"),
    ("hresume", "h-resume"),
    ("hreview", "h-review"),
    ("hreview-aggregate", "h-review-aggregate"),
    ("vcalendar", "h-calendar"),
    ("vcard", "h-card"),
    ("vevent", "h-event"),
];

/// One microformat instance rooted at an item element.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Sorted, de-duplicated root types such as `h-card`.
    pub types: Vec<String>,
    pub id: Option<String>,
    /// Explicit properties in document order, then any implied ones.
    pub properties: Vec<Property>,
    /// Nested items that are not the value of a property.
    pub children: Vec<Item>,
    /// Set when the item is the value of a property of an enclosing item.
    pub value: Option<PropertyValue>,
    pub node: NodeRef,
}

impl Item {
    pub(crate) fn resolve(node: &NodeRef, resolver: &Resolver) -> Item {
        let logger = resolver.logger();
        start_span!(logger, RESOLVE_ITEM);

        let types = item_types_from(node);
        annotate_span!(logger, RESOLVE_ITEM, "{}", types.join(" "));

        let context = node.element_children();

        start_span!(logger, RESOLVE_PROPERTIES);
        let mut properties: Vec<Property> = property_nodes_from(&context)
            .iter()
            .flat_map(|property_node| {
                types_from(property_node)
                    .into_iter()
                    .map(|token| Property::resolve(property_node, &token, resolver))
                    .collect::<Vec<_>>()
            })
            .collect();
        date_time::imply_dates(&mut properties);
        end_span!(logger, RESOLVE_PROPERTIES);

        let children: Vec<Item> = item_nodes_from(&context)
            .iter()
            .filter(|child| !is_property_node(child))
            .map(|child| Item::resolve(child, resolver))
            .collect();

        let implied = implied_properties(node, &properties, &children, resolver);
        properties.extend(implied);

        end_span!(logger, RESOLVE_ITEM);

        Item {
            types,
            id: node.non_blank_attr("id").map(|id| id.trim().to_string()),
            properties,
            children,
            value: None,
            node: node.clone(),
        }
    }

    /// The first property called `name`, explicit or implied.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Every property called `name`, in order.
    pub fn properties_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties.iter().filter(move |p| p.name == name)
    }

    /// Distinct property names in first-seen order.
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for property in &self.properties {
            if !names.contains(&property.name.as_str()) {
                names.push(property.name.as_str());
            }
        }
        names
    }
}

fn implied_properties(
    node: &NodeRef,
    properties: &[Property],
    children: &[Item],
    resolver: &Resolver,
) -> Vec<Property> {
    let logger = resolver.logger();
    start_span!(logger, IMPLIED_PROPERTIES);

    let has_nested = !children.is_empty()
        || properties
            .iter()
            .any(|p| matches!(p.value, PropertyValue::Nested(_)));
    let has_named = |name: &str| properties.iter().any(|p| p.name == name);
    let has_prefix = |prefix: Prefix| properties.iter().any(|p| p.prefix == prefix);

    let mut implied_properties = vec![];

    if !has_named("name") && !has_prefix(Prefix::PlainText) && !has_prefix(Prefix::Embedded) && !has_nested {
        let name = implied::name(node);
        if !name.is_empty() {
            annotate_span!(logger, IMPLIED_PROPERTIES, "name: {}", name);
            implied_properties.push(Property::implied("name", Prefix::PlainText, PropertyValue::Text(name), node));
        }
    }

    if !has_prefix(Prefix::Url) && !has_nested {
        if !has_named("photo") {
            if let Some(photo) = implied::photo(node, resolver) {
                annotate_span!(logger, IMPLIED_PROPERTIES, "photo: {:?}", photo);
                implied_properties.push(Property::implied("photo", Prefix::Url, photo, node));
            }
        }
        if !has_named("url") {
            if let Some(url) = implied::url(node, resolver) {
                annotate_span!(logger, IMPLIED_PROPERTIES, "url: {:?}", url);
                implied_properties.push(Property::implied("url", Prefix::Url, url, node));
            }
        }
    }

    end_span!(logger, IMPLIED_PROPERTIES);
    implied_properties
}

/// Whether `node` is the root of an item: it carries an `h-*` class token or
/// one of the legacy root class names.
pub fn is_item_node(node: &NodeRef) -> bool {
    !item_types_from(node).is_empty()
}

/// The sorted, de-duplicated item types of `node`.  Legacy root names are
/// mapped to their `h-*` equivalents only when no `h-*` token is present.
pub fn item_types_from(node: &NodeRef) -> Vec<String> {
    let classes = node.classes();
    let mut types: Vec<String> = classes
        .iter()
        .filter(|class| ITEM_CLASS.is_match(class))
        .cloned()
        .collect();
    if types.is_empty() {
        types = classes
            .iter()
            .filter_map(|class| {
                LEGACY_ROOT_CLASSES
                    .iter()
                    .find(|(legacy, _)| *legacy == class.as_str())
                    .map(|(_, item_type)| item_type.to_string())
            })
            .collect();
    }
    types.sort();
    types.dedup();
    types
}

/// Collect the outermost item nodes at or below each node of `context`, in
/// document order.  Ignored elements are skipped with their subtree.
pub fn item_nodes_from(context: &[NodeRef]) -> Vec<NodeRef> {
    let mut nodes = vec![];
    for node in context {
        collect_item_nodes(node, &mut nodes);
    }
    nodes
}

fn collect_item_nodes(node: &NodeRef, out: &mut Vec<NodeRef>) {
    if node.as_element().is_some() {
        if node.is_ignored() {
            return;
        }
        if is_item_node(node) {
            out.push(node.clone());
            return;
        }
    }
    for child in node.children() {
        collect_item_nodes(&child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use crate::ParseOptions;

    fn first(doc: &NodeRef, selector: &str) -> NodeRef {
        doc.select_first(selector).unwrap().as_node().clone()
    }

    fn resolve(html: &str, selector: &str) -> Item {
        let doc = parse_html(html);
        let resolver = Resolver::new("https://example.org/", ParseOptions::default()).unwrap();
        Item::resolve(&first(&doc, selector), &resolver)
    }

    #[test]
    fn item_types_are_sorted_and_unique() {
        let doc = parse_html(r#"<div class="h-entry h-as-note h-entry p-name">x</div>"#);
        assert_eq!(item_types_from(&first(&doc, "div")), vec!["h-as-note", "h-entry"]);
    }

    #[test]
    fn legacy_roots_map_only_without_h_tokens() {
        let doc = parse_html(r#"<div id="a" class="vcard">x</div><div id="b" class="h-entry hentry vcard">y</div><div id="c" class="card">z</div>"#);
        assert_eq!(item_types_from(&first(&doc, "#a")), vec!["h-card"]);
        assert_eq!(item_types_from(&first(&doc, "#b")), vec!["h-entry"]);
        assert!(!is_item_node(&first(&doc, "#c")));
    }

    #[test]
    fn nested_item_properties_stay_in_the_nested_item() {
        let item = resolve(
            r#"<div class="h-entry">
                 <a class="p-name" href="/post">Post</a>
                 <div class="p-author h-card"><span class="p-name">Jane</span><span class="p-note">bio</span></div>
               </div>"#,
            ".h-entry",
        );
        assert_eq!(item.property_names(), vec!["name", "author"]);
        assert!(item.property("note").is_none());
        let author = item.property("author").unwrap().value.as_item().unwrap();
        assert_eq!(author.property_names(), vec!["name", "note"]);
        assert!(item.children.is_empty());
    }

    #[test]
    fn children_are_items_that_are_not_properties() {
        let item = resolve(
            r#"<div class="h-feed"><h1 class="p-name">Feed</h1>
                 <article class="h-entry"><p class="p-name">One</p></article>
                 <article class="h-entry"><p class="p-name">Two</p></article>
               </div>"#,
            ".h-feed",
        );
        assert_eq!(item.children.len(), 2);
        assert_eq!(item.children[1].property("name").unwrap().value, PropertyValue::from("Two"));
        assert_eq!(item.property_names(), vec!["name"]);
    }

    #[test]
    fn implied_name_photo_and_url() {
        let item = resolve(
            r#"<a class="h-card" href="/jane"><img src="/jane.jpg" alt="Jane Doe"></a>"#,
            ".h-card",
        );
        let name = item.property("name").unwrap();
        assert!(name.implied);
        assert_eq!(name.value, PropertyValue::from("Jane Doe"));
        assert_eq!(
            item.property("photo").unwrap().value,
            PropertyValue::MediaWithAlt {
                value: "https://example.org/jane.jpg".into(),
                alt: "Jane Doe".into()
            }
        );
        assert_eq!(item.property("url").unwrap().value, PropertyValue::from("https://example.org/jane"));
    }

    #[test]
    fn explicit_properties_suppress_implied_ones() {
        let item = resolve(
            r#"<a class="h-card" href="/jane"><span class="p-nickname">JD</span><img class="u-logo" src="/l.png"></a>"#,
            ".h-card",
        );
        assert_eq!(item.property_names(), vec!["nickname", "logo"]);
        assert!(item.properties.iter().all(|p| !p.implied));
    }

    #[test]
    fn nested_items_suppress_implied_properties() {
        let item = resolve(
            r#"<a class="h-entry" href="/e"><span class="h-card">Jane</span></a>"#,
            ".h-entry",
        );
        assert!(item.properties.is_empty());
        assert_eq!(item.children.len(), 1);
        assert_eq!(item.children[0].property("name").unwrap().value, PropertyValue::from("Jane"));
    }

    #[test]
    fn id_is_recorded() {
        let item = resolve(r#"<p id="me" class="h-card">Jane</p>"#, ".h-card");
        assert_eq!(item.id.as_deref(), Some("me"));
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let doc = parse_html(
            r#"<div class="h-event"><span class="p-name">Party</span>
                 <time class="dt-start" datetime="2024-05-01">May 1</time>
                 <time class="dt-end">21:00</time>
                 <span class="p-location h-card">Town hall</span></div>"#,
        );
        let resolver = Resolver::new("https://example.org/", ParseOptions::default()).unwrap();
        let node = first(&doc, ".h-event");
        assert_eq!(Item::resolve(&node, &resolver), Item::resolve(&node, &resolver));
    }
}
