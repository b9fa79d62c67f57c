//! Filter rules and the exclusion set
//!
//! Exclusions are a denylist: a message is logged unless one of the rules in
//! the active [`ExclusionSet`] matches it.
//!
//! Rules are written as `<id>` or `<id>:<sub>`, where each number is either
//! `0x`-prefixed hex or decimal (`0x028`, `40`, `0x028:0x1844`). A catalog
//! label may be used in place of the numeric form.

use crate::error::ConfigError;
use crate::registry;
use crate::types::message::MessageTypeId;
use crate::utils::parse_number;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Payload-derived sub-classification value
pub type SubCategory = u16;

/// A single exclusion rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterRule {
    /// Matches every message with this type id
    Bare(MessageTypeId),

    /// Matches messages of `type_id` whose payload sub-category equals `sub_category`
    Composite {
        type_id: MessageTypeId,
        sub_category: SubCategory,
    },
}

impl FilterRule {
    pub const fn bare(type_id: u64) -> Self {
        FilterRule::Bare(MessageTypeId(type_id))
    }

    pub const fn composite(type_id: u64, sub_category: SubCategory) -> Self {
        FilterRule::Composite {
            type_id: MessageTypeId(type_id),
            sub_category,
        }
    }

    /// Message type this rule applies to
    pub fn type_id(&self) -> MessageTypeId {
        match self {
            FilterRule::Bare(id) => *id,
            FilterRule::Composite { type_id, .. } => *type_id,
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRule::Bare(id) => write!(f, "{}", id),
            FilterRule::Composite {
                type_id,
                sub_category,
            } => write!(f, "{}:0x{:04X}", type_id, sub_category),
        }
    }
}

impl FromStr for FilterRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::Empty);
        }

        if let Some(entry) = registry::find_by_label(s) {
            return Ok(entry.rule);
        }

        match s.split_once(':') {
            None => {
                let id = parse_number(s).map_err(|_| ConfigError::InvalidTypeId(s.to_string()))?;
                Ok(FilterRule::Bare(MessageTypeId(id)))
            }
            Some((id_str, sub_str)) => {
                let id_str = id_str.trim();
                let sub_str = sub_str.trim();
                let type_id = parse_number(id_str)
                    .map(MessageTypeId)
                    .map_err(|_| ConfigError::InvalidTypeId(id_str.to_string()))?;
                let sub_category = parse_number(sub_str)
                    .ok()
                    .and_then(|v| SubCategory::try_from(v).ok())
                    .ok_or_else(|| ConfigError::InvalidSubCategory(sub_str.to_string()))?;

                if registry::sub_category_field(type_id).is_none() {
                    return Err(ConfigError::NoSubCategoryField(type_id));
                }

                Ok(FilterRule::Composite {
                    type_id,
                    sub_category,
                })
            }
        }
    }
}

/// Rules currently excluded from logging.
///
/// Ordered so that summaries come out the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    rules: BTreeSet<FilterRule>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of identifiers, failing on the first malformed one.
    pub fn parse_all<I, S>(identifiers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .map(|s| s.as_ref().parse::<FilterRule>())
            .collect()
    }

    /// Returns true if the rule was not already present.
    pub fn insert(&mut self, rule: FilterRule) -> bool {
        self.rules.insert(rule)
    }

    /// Returns true if the rule was present.
    pub fn remove(&mut self, rule: &FilterRule) -> bool {
        self.rules.remove(rule)
    }

    pub fn contains(&self, rule: &FilterRule) -> bool {
        self.rules.contains(rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterRule> {
        self.rules.iter()
    }

    /// Identifier strings in the same form `parse_all` accepts
    pub fn to_identifiers(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.to_string()).collect()
    }

    /// Comma-joined identifiers, or `NONE` when nothing is excluded.
    pub fn summary(&self) -> String {
        if self.rules.is_empty() {
            "NONE".to_string()
        } else {
            self.to_identifiers().join(", ")
        }
    }
}

impl FromIterator<FilterRule> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = FilterRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<FilterRule> for ExclusionSet {
    fn extend<T: IntoIterator<Item = FilterRule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ExclusionSet {
    type Item = &'a FilterRule;
    type IntoIter = std::collections::btree_set::Iter<'a, FilterRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_hex_and_decimal() {
        assert_eq!("0x028".parse::<FilterRule>().unwrap(), FilterRule::bare(0x28));
        assert_eq!("0X00a".parse::<FilterRule>().unwrap(), FilterRule::bare(0x0A));
        assert_eq!("40".parse::<FilterRule>().unwrap(), FilterRule::bare(40));
    }

    #[test]
    fn test_parse_bare_id_wider_than_32_bits() {
        let rule: FilterRule = "0x123456789".parse().unwrap();
        assert_eq!(rule, FilterRule::bare(0x1_2345_6789));
        assert_eq!(rule.to_string(), "0x123456789");
    }

    #[test]
    fn test_parse_composite() {
        let rule: FilterRule = "0x028:0x1844".parse().unwrap();
        assert_eq!(rule, FilterRule::composite(0x28, 0x1844));
        assert_eq!(rule.type_id(), MessageTypeId(0x28));

        let spaced: FilterRule = " 0x028 : 6212 ".parse().unwrap();
        assert_eq!(spaced, FilterRule::composite(0x28, 0x1844));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<FilterRule>(), Err(ConfigError::Empty));
        assert_eq!(
            "0xZZ".parse::<FilterRule>(),
            Err(ConfigError::InvalidTypeId("0xZZ".to_string()))
        );
        assert_eq!(
            "0x028:nope".parse::<FilterRule>(),
            Err(ConfigError::InvalidSubCategory("nope".to_string()))
        );
        // sub-category must fit in 16 bits
        assert!(matches!(
            "0x028:0x10000".parse::<FilterRule>(),
            Err(ConfigError::InvalidSubCategory(_))
        ));
    }

    #[test]
    fn test_parse_composite_requires_registered_field() {
        assert_eq!(
            "0x00A:0x0001".parse::<FilterRule>(),
            Err(ConfigError::NoSubCategoryField(MessageTypeId(0x0A)))
        );
    }

    #[test]
    fn test_parse_catalog_label() {
        let entry = &registry::entries()[0];
        let rule: FilterRule = entry.label.to_uppercase().parse().unwrap();
        assert_eq!(rule, entry.rule);
    }

    #[test]
    fn test_display_matches_parse_input() {
        assert_eq!(FilterRule::bare(0x0A).to_string(), "0x00A");
        assert_eq!(FilterRule::composite(0x28, 0x58E0).to_string(), "0x028:0x58E0");
    }

    #[test]
    fn test_summary_none_when_empty() {
        assert_eq!(ExclusionSet::new().summary(), "NONE");
    }

    #[test]
    fn test_summary_is_sorted_and_comma_joined() {
        let set = ExclusionSet::parse_all(["0x028:0x1844", "0x00A", "0x028"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.summary(), "0x00A, 0x028, 0x028:0x1844");
    }

    #[test]
    fn test_parse_all_stops_at_first_error() {
        let err = ExclusionSet::parse_all(["0x00A", "bogus", "0x028"]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTypeId("bogus".to_string()));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = ExclusionSet::new();
        assert!(set.insert(FilterRule::bare(1)));
        assert!(!set.insert(FilterRule::bare(1)));
        assert!(set.contains(&FilterRule::bare(1)));
        assert!(set.remove(&FilterRule::bare(1)));
        assert!(set.is_empty());
    }
}
