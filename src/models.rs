use crate::item::Item;
use crate::logging::logger::DebugLogsCategories;
use crate::relationships::RelationshipsCollection;

/// Where the value-class pattern sits in the `u-*` resolution order.
///
/// Both orders are seen in the wild; the default matches the published
/// parsing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueClassPrecedence {
    /// Primary attribute table, then value-class pattern, then the extended
    /// table (`title` on `abbr`, `value` on `data|input`).
    #[default]
    BeforeExtended,
    /// Primary table, extended table, then value-class pattern.
    AfterExtended,
}

/// Knobs that control how a document is resolved.
///
/// # Examples
///
/// ```rust
/// use mf2_rs::{ParseOptions, ValueClassPrecedence};
///
/// let mut opts = ParseOptions::default();
/// opts.value_class_precedence = ValueClassPrecedence::AfterExtended;
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Order of the value-class pattern against the extended attribute
    /// table when resolving `u-*` properties.
    pub value_class_precedence: ValueClassPrecedence,
    /// Print span timings and annotations to stderr (debug builds only).
    pub debug: bool,
    /// Which spans are printed when [`debug`][Self::debug] is on.
    pub debug_categories: DebugLogsCategories,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            value_class_precedence: ValueClassPrecedence::default(),
            debug: false,
            debug_categories: DebugLogsCategories::ALL,
        }
    }
}

/// The output of [`crate::parse`].
#[derive(Debug, Clone)]
pub struct Document {
    /// The URL relative references were resolved against: the caller's base
    /// URL, adjusted by any `<base href>`.  Empty when none was given.
    pub base_url: String,
    /// Top-level items in document order.
    pub items: Vec<Item>,
    pub relationships: RelationshipsCollection,
}

impl Document {
    /// Top-level items carrying the given root type, e.g. `"h-card"`.
    pub fn items_of_type<'a>(&'a self, item_type: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |item| item.types.iter().any(|t| t == item_type))
    }
}
