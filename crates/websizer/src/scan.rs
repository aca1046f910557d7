//! Markup scanner: pulls asset references out of HTML
//!
//! Parsing is permissive (html5ever via `scraper`), so broken markup still
//! yields every element it can recognize. The only failure is a rule that
//! cannot be turned into an element selector.

use crate::error::SizeError;
use crate::rules::{TagRule, TagRules};
use scraper::{Html, Selector};
use tracing::debug;

/// Extract every non-empty value of `rule.attribute()` on `rule.tag()` elements
///
/// Values are returned in document order with duplicates preserved.
pub fn extract_attribute_values(html: &[u8], rule: &TagRule) -> Result<Vec<String>, SizeError> {
    let document = parse_document(html);
    select_values(&document, rule)
}

/// Run every rule over the same document and concatenate results in rule order
pub fn extract_all(html: &[u8], rules: &TagRules) -> Result<Vec<String>, SizeError> {
    let document = parse_document(html);
    let mut out = Vec::new();
    for rule in rules {
        out.extend(select_values(&document, rule)?);
    }
    Ok(out)
}

fn parse_document(html: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(html))
}

fn select_values(document: &Html, rule: &TagRule) -> Result<Vec<String>, SizeError> {
    let selector = rule_selector(rule)?;
    let values: Vec<String> = document
        .select(&selector)
        .filter_map(|element| element.value().attr(rule.attribute()))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    debug!(rule = %rule, found = values.len(), "Extracted attribute values");
    Ok(values)
}

fn rule_selector(rule: &TagRule) -> Result<Selector, SizeError> {
    let parse_error = |reason: String| SizeError::Parse {
        tag: rule.tag().to_string(),
        attribute: rule.attribute().to_string(),
        reason,
    };

    // Only plain element names; anything else would turn into a CSS selector list
    if !is_element_name(rule.tag()) {
        return Err(parse_error("not a valid element name".to_string()));
    }
    if rule.attribute().is_empty() || rule.attribute().contains(char::is_whitespace) {
        return Err(parse_error("not a valid attribute name".to_string()));
    }

    Selector::parse(rule.tag()).map_err(|e| parse_error(e.to_string()))
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
