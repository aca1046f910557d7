//! Tag/attribute rules that decide which markup references count as assets

use std::fmt;
use std::str::FromStr;

/// A `(tag, attribute)` pair whose values are treated as linked assets
///
/// Names are stored ASCII-lowercased, matching how HTML tokenization
/// reports element and attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagRule {
    tag: String,
    attribute: String,
}

impl TagRule {
    /// Create a rule for the given tag and attribute names
    pub fn new(tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attribute: attribute.into().to_ascii_lowercase(),
        }
    }

    /// Element name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute name
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl fmt::Display for TagRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.attribute)
    }
}

impl FromStr for TagRule {
    type Err = String;

    /// Parse `tag=attribute`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, attribute) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid rule {s:?}: expected TAG=ATTRIBUTE"))?;
        let (tag, attribute) = (tag.trim(), attribute.trim());
        if tag.is_empty() || attribute.is_empty() {
            return Err(format!(
                "Invalid rule {s:?}: tag and attribute must not be empty"
            ));
        }
        Ok(TagRule::new(tag, attribute))
    }
}

/// Ordered, immutable set of [`TagRule`]s
///
/// Scanning runs the rules in order and concatenates their results, so the
/// order here is the order links are measured in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRules {
    rules: Vec<TagRule>,
}

impl TagRules {
    /// A rule set with no rules: nothing is ever scanned
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Return a new set with `rule` appended (duplicates are ignored)
    pub fn with_rule(mut self, rule: TagRule) -> Self {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TagRules {
    /// `link/href` (stylesheets, scripts, favicons), `img/src`, `video/poster`
    fn default() -> Self {
        Self::empty()
            .with_rule(TagRule::new("link", "href"))
            .with_rule(TagRule::new("img", "src"))
            .with_rule(TagRule::new("video", "poster"))
    }
}

impl FromIterator<TagRule> for TagRules {
    fn from_iter<I: IntoIterator<Item = TagRule>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with_rule)
    }
}

impl<'a> IntoIterator for &'a TagRules {
    type Item = &'a TagRule;
    type IntoIter = std::slice::Iter<'a, TagRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = TagRules::default();
        let pairs: Vec<String> = rules.iter().map(ToString::to_string).collect();
        assert_eq!(pairs, vec!["link=href", "img=src", "video=poster"]);
    }

    #[test]
    fn test_rule_names_are_lowercased() {
        let rule = TagRule::new("IMG", "SrC");
        assert_eq!(rule.tag(), "img");
        assert_eq!(rule.attribute(), "src");
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!(
            "source=src".parse::<TagRule>().unwrap(),
            TagRule::new("source", "src")
        );
        assert_eq!(
            " script = src ".parse::<TagRule>().unwrap(),
            TagRule::new("script", "src")
        );
        assert!("script".parse::<TagRule>().is_err());
        assert!("=src".parse::<TagRule>().is_err());
        assert!("script=".parse::<TagRule>().is_err());
    }

    #[test]
    fn test_with_rule_extends_and_dedups() {
        let rules = TagRules::default()
            .with_rule(TagRule::new("script", "src"))
            .with_rule(TagRule::new("link", "href"));
        assert_eq!(rules.len(), 4);
        assert_eq!(rules.iter().last().unwrap(), &TagRule::new("script", "src"));
    }

    #[test]
    fn test_empty_rules() {
        let rules: TagRules = Vec::<TagRule>::new().into_iter().collect();
        assert!(rules.is_empty());
        assert_eq!(rules, TagRules::empty());
    }
}
