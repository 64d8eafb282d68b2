use crate::logging::logging_defs::*;
use crate::parser::{NodeExt, NodeRef};
use crate::resolver::Resolver;
use crate::utils::sorted_unique_tokens;
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// The attributes recorded for one hyperlink.  Optional fields are `None`
/// when the attribute is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelAttributes {
    /// Sorted, de-duplicated `rel` tokens.
    pub rels: Vec<String>,
    pub text: Option<String>,
    pub hreflang: Option<String>,
    pub media: Option<String>,
    pub title: Option<String>,
    pub media_type: Option<String>,
}

/// One `rel`-bearing hyperlink element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// The `href`, resolved against the document base URL.
    pub href: String,
    pub attributes: RelAttributes,
}

impl Relationship {
    fn from_node(node: &NodeRef, href: &str, rel: &str, resolver: &Resolver) -> Relationship {
        let extended = |name: &str| node.non_blank_attr(name).map(|v| v.trim().to_string());
        let text = node.text_contents();
        Relationship {
            href: resolver.resolve_url(href),
            attributes: RelAttributes {
                rels: sorted_unique_tokens(rel),
                text: Some(text).filter(|t| !t.trim().is_empty()),
                hreflang: extended("hreflang"),
                media: extended("media"),
                title: extended("title"),
                media_type: extended("type"),
            },
        }
    }
}

/// Every relationship of a document in document order, with lazily built,
/// cached lookup indices.
#[derive(Debug, Clone, Default)]
pub struct RelationshipsCollection {
    relationships: Vec<Relationship>,
    by_url: OnceCell<BTreeMap<String, RelAttributes>>,
    by_rel: OnceCell<BTreeMap<String, Vec<String>>>,
    rels: OnceCell<Vec<String>>,
    urls: OnceCell<Vec<String>>,
}

impl RelationshipsCollection {
    pub fn new(relationships: Vec<Relationship>) -> RelationshipsCollection {
        RelationshipsCollection {
            relationships,
            ..Default::default()
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relationship> {
        self.relationships.iter()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// `href` → attributes.  The first element with a given `href` wins.
    pub fn group_by_url(&self) -> &BTreeMap<String, RelAttributes> {
        self.by_url.get_or_init(|| {
            let mut map = BTreeMap::new();
            for relationship in &self.relationships {
                map.entry(relationship.href.clone())
                    .or_insert_with(|| relationship.attributes.clone());
            }
            map
        })
    }

    /// `rel` token → sorted, unique list of every `href` carrying it.
    pub fn group_by_rel(&self) -> &BTreeMap<String, Vec<String>> {
        self.by_rel.get_or_init(|| {
            let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for relationship in &self.relationships {
                for rel in &relationship.attributes.rels {
                    map.entry(rel.clone())
                        .or_default()
                        .push(relationship.href.clone());
                }
            }
            for urls in map.values_mut() {
                urls.sort();
                urls.dedup();
            }
            map
        })
    }

    /// Sorted, unique `rel` tokens seen anywhere in the document.
    pub fn rels(&self) -> &[String] {
        self.rels.get_or_init(|| {
            let mut rels: Vec<String> = self
                .relationships
                .iter()
                .flat_map(|r| r.attributes.rels.iter().cloned())
                .collect();
            rels.sort();
            rels.dedup();
            rels
        })
    }

    /// Sorted, unique hrefs seen anywhere in the document.
    pub fn urls(&self) -> &[String] {
        self.urls.get_or_init(|| {
            let mut urls: Vec<String> = self.relationships.iter().map(|r| r.href.clone()).collect();
            urls.sort();
            urls.dedup();
            urls
        })
    }
}

impl PartialEq for RelationshipsCollection {
    fn eq(&self, other: &Self) -> bool {
        self.relationships == other.relationships
    }
}

impl<'a> IntoIterator for &'a RelationshipsCollection {
    type Item = &'a Relationship;
    type IntoIter = std::slice::Iter<'a, Relationship>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collect every element below `root` carrying an `href` and a non-blank
/// `rel`, independently of any item structure.
pub(crate) fn extract(root: &NodeRef, resolver: &Resolver) -> RelationshipsCollection {
    let logger = resolver.logger();
    start_span!(logger, EXTRACT_RELATIONSHIPS);

    let mut relationships = vec![];
    if let Ok(elements) = root.select("[href][rel]") {
        for element in elements {
            let node = element.as_node();
            let (Some(href), Some(rel)) = (node.attr_value("href"), node.non_blank_attr("rel")) else {
                continue;
            };
            relationships.push(Relationship::from_node(node, &href, &rel, resolver));
        }
    }
    annotate_span!(logger, EXTRACT_RELATIONSHIPS, "{} relationships", relationships.len());

    end_span!(logger, EXTRACT_RELATIONSHIPS);
    RelationshipsCollection::new(relationships)
}
