use crate::error::{ParseError, ParseResult};
use crate::item::{item_nodes_from, Item};
use crate::logging::logger::{Listener, PerfLogger};
use crate::logging::logging_defs::*;
use crate::logging::PerfConsoleListener;
use crate::models::{Document, ParseOptions};
use crate::parser::NodeRef;
use crate::property::Property;
use crate::relationships::{self, RelationshipsCollection};
use crate::utils::to_absolute_uri;
use std::rc::Rc;

fn create_perf_logger(options: &ParseOptions) -> PerfLogger {
    let listeners = if options.debug {
        vec![Listener::new(Rc::new(PerfConsoleListener {
            categories: options.debug_categories,
        }))]
    } else {
        vec![]
    };
    PerfLogger::new(listeners)
}

/// Resolves items, properties and relationships against one base URL.
///
/// A resolver holds no per-document state besides its perf logger, so the
/// same instance may be reused across documents sharing a base URL.
pub struct Resolver {
    base_url: String,
    options: ParseOptions,
    logger: PerfLogger,
}

impl Resolver {
    /// Create a resolver.  An empty `base_url` leaves relative URLs as
    /// written; anything else must be an absolute URL.
    pub fn new(base_url: &str, options: ParseOptions) -> ParseResult<Resolver> {
        let base_url = base_url.trim();
        if !base_url.is_empty() {
            url::Url::parse(base_url).map_err(|source| ParseError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            })?;
        }
        let logger = create_perf_logger(&options);
        Ok(Resolver {
            base_url: base_url.to_string(),
            options,
            logger,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub(crate) fn logger(&self) -> &PerfLogger {
        &self.logger
    }

    /// Resolve `raw` against the base URL.
    pub fn resolve_url(&self, raw: &str) -> String {
        to_absolute_uri(raw, &self.base_url)
    }

    /// Resolve the item rooted at `node`.  `node` is treated as an item root
    /// whether or not it carries an item class.
    pub fn resolve_item(&self, node: &NodeRef) -> Item {
        Item::resolve(node, self)
    }

    /// The properties of the item rooted at `node`: explicit ones in document
    /// order, then implied ones.
    pub fn resolve_properties(&self, node: &NodeRef) -> Vec<Property> {
        self.resolve_item(node).properties
    }

    /// Collect the `rel` relationships below `root`.
    pub fn extract_relationships(&self, root: &NodeRef) -> RelationshipsCollection {
        relationships::extract(root, self)
    }

    /// Resolve every top-level item of `document` and its relationships.
    pub fn parse_document(&self, document: &NodeRef) -> Document {
        let logger = self.logger();
        start_span!(logger, PARSE_DOCUMENT);

        let items: Vec<Item> = item_nodes_from(std::slice::from_ref(document))
            .iter()
            .map(|node| self.resolve_item(node))
            .collect();
        add_point_to_span!(logger, PARSE_DOCUMENT, "items");

        let relationships = self.extract_relationships(document);
        add_point_to_span!(logger, PARSE_DOCUMENT, "relationships");

        end_span!(logger, PARSE_DOCUMENT);
        Document {
            base_url: self.base_url.clone(),
            items,
            relationships,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_base_url() {
        let err = Resolver::new("/not/absolute", ParseOptions::default()).err().unwrap();
        assert!(matches!(err, ParseError::InvalidBaseUrl { ref url, .. } if url == "/not/absolute"));
    }

    #[test]
    fn empty_base_leaves_urls_alone() {
        let resolver = Resolver::new("  ", ParseOptions::default()).unwrap();
        assert_eq!(resolver.base_url(), "");
        assert_eq!(resolver.resolve_url(" /x "), "/x");
    }

    #[test]
    fn debug_logging_does_not_change_results() {
        let doc = crate::parser::parse_html(r#"<p class="h-card"><a class="u-url p-name" href="/me">Me</a></p>"#);
        let quiet = Resolver::new("https://example.org/", ParseOptions::default()).unwrap();
        let mut options = ParseOptions::default();
        options.debug = true;
        let noisy = Resolver::new("https://example.org/", options).unwrap();
        assert_eq!(quiet.parse_document(&doc).items, noisy.parse_document(&doc).items);
    }
}
