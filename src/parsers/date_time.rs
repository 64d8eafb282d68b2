use super::value_class_pattern;
use crate::parser::NodeRef;
use crate::property::{Prefix, Property, PropertyValue};
use crate::resolver::Resolver;
use crate::utils::{attribute_value_from, AttributeTable};

use regex::Regex;
use std::sync::LazyLock;

const DATETIME_ATTRIBUTES: AttributeTable = &[
    ("datetime", &["del", "ins", "time"]),
    ("title", &["abbr"]),
    ("value", &["data", "input"]),
];

/// `YYYY-MM-DD` or the ordinal `YYYY-DDD`.
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(?:\d{2}-\d{2}|\d{3})$").unwrap());

/// A time of day with optional seconds, optional am/pm and an optional
/// trailing timezone.
static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(\d{1,2})(?::(\d{2})(?::(\d{2}(?:\.\d+)?))?)?\s*(?:([ap])\.?\s*m\.?)?\s*(z|[+-]\d{2}:?\d{2}|[+-]\d{2})?$",
    )
    .unwrap()
});

static TIMEZONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:z|[+-]\d{2}:?\d{2}|[+-]\d{2})$").unwrap());

static DATETIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{4}-(?:\d{2}-\d{2}|\d{3}))(?:t|\s+)(.+)$").unwrap());

/// Resolve a `dt-*` value: value-class pattern, then the attribute table,
/// then the element's trimmed text.
pub(crate) fn value(node: &NodeRef, resolver: &Resolver) -> String {
    if let Some(value) = value_class_pattern::parse(node, Prefix::DateTime, resolver) {
        return value;
    }
    if let Some(value) = attribute_value_from(node, DATETIME_ATTRIBUTES) {
        return value.trim().to_string();
    }
    node.text_contents().trim().to_string()
}

/// Normalise a time of day to 24-hour `HH:MM[:SS]` followed by any timezone.
/// A bare number without `:` or am/pm is not a time.
pub(crate) fn normalize_time(src: &str) -> Option<String> {
    let caps = TIME.captures(src.trim())?;
    let minutes = caps.get(2).map(|m| m.as_str());
    let meridiem = caps.get(4).map(|m| m.as_str().to_ascii_lowercase());
    if minutes.is_none() && meridiem.is_none() {
        return None;
    }

    let mut hour: u32 = caps[1].parse().ok()?;
    match meridiem.as_deref() {
        Some(_) if hour == 0 || hour > 12 => return None,
        Some("a") => hour %= 12,
        Some(_) => hour = hour % 12 + 12,
        None if hour > 23 => return None,
        None => {}
    }

    let mut out = format!("{:02}:{}", hour, minutes.unwrap_or("00"));
    if let Some(seconds) = caps.get(3) {
        out.push(':');
        out.push_str(seconds.as_str());
    }
    if let Some(zone) = caps.get(5) {
        out.push_str(&normalize_timezone(zone.as_str()));
    }
    Some(out)
}

fn normalize_timezone(zone: &str) -> String {
    if zone.eq_ignore_ascii_case("z") {
        "Z".to_string()
    } else {
        zone.to_string()
    }
}

/// The date component of a date or datetime string.
pub(crate) fn date_component(src: &str) -> Option<&str> {
    let src = src.trim();
    if DATE.is_match(src) {
        return Some(src);
    }
    DATETIME
        .captures(src)
        .filter(|caps| TIME.is_match(caps[2].trim()))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Combine the parts of a `dt-*` value-class pattern.  The first date, the
/// first time and the first timezone found are joined as
/// `date time[zone]`; parts that are none of these are dropped.  When no
/// part is recognisable the raw parts are concatenated.
pub(crate) fn assemble(parts: &[String]) -> String {
    let mut date: Option<String> = None;
    let mut time: Option<String> = None;
    let mut zone: Option<String> = None;

    for part in parts.iter().map(|p| p.trim()) {
        if let Some(caps) = DATETIME.captures(part) {
            if let (None, Some(normalized)) = (&date, normalize_time(&caps[2])) {
                date = Some(caps[1].to_string());
                time = time.or(Some(normalized));
                continue;
            }
        }
        if DATE.is_match(part) {
            date = date.or_else(|| Some(part.to_string()));
        } else if TIMEZONE.is_match(part) {
            zone = zone.or_else(|| Some(normalize_timezone(part)));
        } else if let Some(normalized) = normalize_time(part) {
            time = time.or(Some(normalized));
        }
    }

    match (date, time) {
        (Some(date), Some(time)) => format!("{} {}{}", date, time, zone.unwrap_or_default()),
        (Some(date), None) => date,
        (None, Some(time)) => format!("{}{}", time, zone.unwrap_or_default()),
        (None, None) => parts.concat(),
    }
}

/// Give time-only `dt-*` values a date.  The date comes from the first
/// date-bearing `dt-*` property of the same name, else from the first
/// date-bearing `dt-*` property of the item.
pub(crate) fn imply_dates(properties: &mut [Property]) {
    let dated: Vec<(String, String)> = properties
        .iter()
        .filter(|p| p.prefix == Prefix::DateTime)
        .filter_map(|p| match &p.value {
            PropertyValue::Text(text) => date_component(text).map(|d| (p.name.clone(), d.to_string())),
            _ => None,
        })
        .collect();
    if dated.is_empty() {
        return;
    }

    for property in properties.iter_mut().filter(|p| p.prefix == Prefix::DateTime) {
        let time = match &property.value {
            PropertyValue::Text(text) => match normalize_time(text) {
                Some(time) => time,
                None => continue,
            },
            _ => continue,
        };
        let date = dated
            .iter()
            .find(|(name, _)| *name == property.name)
            .or_else(|| dated.first())
            .map(|(_, date)| date.clone());
        if let Some(date) = date {
            property.value = PropertyValue::Text(format!("{} {}", date, time));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::parser::parse_html;
    use crate::ParseOptions;

    fn item(html: &str) -> Item {
        let doc = parse_html(html);
        let node = doc.select_first(".h-event").unwrap().as_node().clone();
        let resolver = Resolver::new("", ParseOptions::default()).unwrap();
        Item::resolve(&node, &resolver)
    }

    fn texts(item: &Item, name: &str) -> Vec<String> {
        item.properties_named(name)
            .filter_map(|p| p.value.as_text().map(String::from))
            .collect()
    }

    #[test]
    fn normalizes_times() {
        assert_eq!(normalize_time("5pm").as_deref(), Some("17:00"));
        assert_eq!(normalize_time("5:30 p.m.").as_deref(), Some("17:30"));
        assert_eq!(normalize_time("12am").as_deref(), Some("00:00"));
        assert_eq!(normalize_time("9:05:07").as_deref(), Some("09:05:07"));
        assert_eq!(normalize_time("19:00Z").as_deref(), Some("19:00Z"));
        assert_eq!(normalize_time("19:00-08:00").as_deref(), Some("19:00-08:00"));
        assert_eq!(normalize_time("7"), None);
        assert_eq!(normalize_time("2024-01-01"), None);
        assert_eq!(normalize_time("25:00"), None);
    }

    #[test]
    fn date_components() {
        assert_eq!(date_component("2024-03-09"), Some("2024-03-09"));
        assert_eq!(date_component("2024-069"), Some("2024-069"));
        assert_eq!(date_component("2024-03-09T10:00"), Some("2024-03-09"));
        assert_eq!(date_component("2024-03-09 10:00:00-0800"), Some("2024-03-09"));
        assert_eq!(date_component("10:00"), None);
        assert_eq!(date_component("March 9"), None);
    }

    #[test]
    fn assembles_value_class_parts() {
        let parts = |p: &[&str]| p.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(assemble(&parts(&["2009-06-26", "7pm", "-08:00"])), "2009-06-26 19:00-08:00");
        assert_eq!(assemble(&parts(&["19:00", "2009-06-26"])), "2009-06-26 19:00");
        assert_eq!(assemble(&parts(&["2009-06-26"])), "2009-06-26");
        assert_eq!(assemble(&parts(&["Friday", "night"])), "Fridaynight");
    }

    #[test]
    fn value_class_date_and_time_combine() {
        let event = item(
            r#"<div class="h-event"><span class="p-name">Launch</span>
                 <span class="dt-start"><span class="value">2009-06-26</span> at <span class="value">7pm</span></span></div>"#,
        );
        assert_eq!(texts(&event, "start"), vec!["2009-06-26 19:00"]);
    }

    #[test]
    fn attribute_table_then_text() {
        let event = item(
            r#"<div class="h-event">
                 <time class="dt-start" datetime=" 2024-05-01T18:00 ">May 1st</time>
                 <abbr class="dt-updated" title="2024-04-01">April</abbr>
                 <span class="dt-end">2024-05-02</span></div>"#,
        );
        assert_eq!(texts(&event, "start"), vec!["2024-05-01T18:00"]);
        assert_eq!(texts(&event, "updated"), vec!["2024-04-01"]);
        assert_eq!(texts(&event, "end"), vec!["2024-05-02"]);
    }

    #[test]
    fn same_name_date_and_time_combine() {
        let event = item(
            r#"<div class="h-event">
                 <time class="dt-start">2024-05-01</time>
                 <time class="dt-start">6pm</time></div>"#,
        );
        assert_eq!(texts(&event, "start"), vec!["2024-05-01", "2024-05-01 18:00"]);
    }

    #[test]
    fn time_only_takes_date_from_other_datetime_property() {
        let event = item(
            r#"<div class="h-event">
                 <time class="dt-start" datetime="2024-05-01T18:00">May 1, 6pm</time>
                 to <time class="dt-end">21:30</time></div>"#,
        );
        assert_eq!(texts(&event, "end"), vec!["2024-05-01 21:30"]);
    }

    #[test]
    fn same_name_date_is_preferred() {
        let event = item(
            r#"<div class="h-event">
                 <time class="dt-start" datetime="2024-05-01">May 1</time>
                 <time class="dt-end" datetime="2024-05-03">May 3</time>
                 <time class="dt-end">10:00</time></div>"#,
        );
        assert_eq!(texts(&event, "end"), vec!["2024-05-03", "2024-05-03 10:00"]);
    }

    #[test]
    fn datetime_on_a_nested_item_still_supplies_the_date() {
        let event = item(
            r#"<div class="h-event"><time class="dt-start h-card" datetime="2024-01-01">x</time>
                 <time class="dt-end">10:00</time></div>"#,
        );
        assert_eq!(texts(&event, "start"), vec!["2024-01-01"]);
        assert_eq!(texts(&event, "end"), vec!["2024-01-01 10:00"]);
        assert!(event.children.is_empty());
    }

    #[test]
    fn time_only_without_any_date_is_kept() {
        let event = item(r#"<div class="h-event"><time class="dt-start">10:00</time></div>"#);
        assert_eq!(texts(&event, "start"), vec!["10:00"]);
    }
}
