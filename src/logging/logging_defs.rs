use super::logger::DebugLogsCategories;

/// Span IDs for performance-logging events.  Each ID must be unique;
/// simply increment when adding a new span.
pub const PARSE_DOCUMENT: u64 = 1;
pub const RESOLVE_ITEM: u64 = 2;
pub const RESOLVE_PROPERTIES: u64 = 3;
pub const IMPLIED_PROPERTIES: u64 = 4;
pub const VALUE_CLASS_PATTERN: u64 = 5;
pub const EXTRACT_RELATIONSHIPS: u64 = 6;

pub fn name(span_id: u64) -> &'static str {
    match span_id {
        PARSE_DOCUMENT => "PARSE_DOCUMENT",
        RESOLVE_ITEM => "RESOLVE_ITEM",
        RESOLVE_PROPERTIES => "RESOLVE_PROPERTIES",
        IMPLIED_PROPERTIES => "IMPLIED_PROPERTIES",
        VALUE_CLASS_PATTERN => "VALUE_CLASS_PATTERN",
        EXTRACT_RELATIONSHIPS => "EXTRACT_RELATIONSHIPS",
        _ => panic!(
            "Calling logging::logging_defs::name with unknown span_id: {}",
            span_id
        ),
    }
}

/// The debug category a span reports under.
pub fn category(span_id: u64) -> DebugLogsCategories {
    match span_id {
        PARSE_DOCUMENT | RESOLVE_ITEM => DebugLogsCategories::ITEMS,
        RESOLVE_PROPERTIES => DebugLogsCategories::PROPERTIES,
        IMPLIED_PROPERTIES => DebugLogsCategories::IMPLIED,
        VALUE_CLASS_PATTERN => DebugLogsCategories::VALUE_CLASS,
        EXTRACT_RELATIONSHIPS => DebugLogsCategories::RELATIONSHIPS,
        _ => DebugLogsCategories::NONE,
    }
}
