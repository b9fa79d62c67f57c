//! Exclusion filter
//!
//! Denylist semantics: anything not matched by an exclusion is logged, so new
//! or unknown message types show up in the capture by default.

use packetlog_shared::registry;
use packetlog_shared::types::filter::{ExclusionSet, FilterRule};
use packetlog_shared::types::message::MessageTypeId;

/// Decide whether a message should be written to the log.
///
/// A bare rule rejects every message of its type. A composite rule rejects only
/// messages whose payload sub-category can be read and equals the rule's
/// value; a payload too short to carry the field is not matched, and no bare
/// rule is implied for it.
pub fn should_log(type_id: MessageTypeId, payload: &[u8], exclusions: &ExclusionSet) -> bool {
    // Extracted at most once, and only if a composite rule asks for it.
    let mut sub_category = None;

    for rule in exclusions {
        match *rule {
            FilterRule::Bare(id) if id == type_id => return false,
            FilterRule::Composite {
                type_id: id,
                sub_category: excluded,
            } if id == type_id => {
                let actual = *sub_category
                    .get_or_insert_with(|| registry::extract_sub_category(type_id, payload));
                if actual == Some(excluded) {
                    return false;
                }
            }
            _ => {}
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTION: MessageTypeId = MessageTypeId(0x028);

    fn action_payload(len: usize, category: u16) -> Vec<u8> {
        let mut payload = vec![0xAAu8; len];
        if len >= 12 {
            payload[10..12].copy_from_slice(&category.to_le_bytes());
        }
        payload
    }

    fn set(ids: &[&str]) -> ExclusionSet {
        ExclusionSet::parse_all(ids).unwrap()
    }

    #[test]
    fn test_empty_exclusions_admit_everything() {
        let none = ExclusionSet::new();
        for id in [0u64, 0x0A, 0x028, 0x3FF, u64::MAX] {
            assert!(should_log(MessageTypeId(id), &[], &none));
            assert!(should_log(MessageTypeId(id), &[1, 2, 3], &none));
        }
    }

    #[test]
    fn test_unrelated_exclusions_admit() {
        let exclusions = set(&["0x001", "0x002", "0x028:0x1844"]);
        assert!(should_log(MessageTypeId(0x0A), &action_payload(12, 0x1844), &exclusions));
        assert!(should_log(MessageTypeId(0x400), &[], &exclusions));
    }

    #[test]
    fn test_bare_exclusion_rejects_any_payload() {
        let exclusions = set(&["0x00A"]);
        assert!(!should_log(MessageTypeId(0x0A), &[], &exclusions));
        assert!(!should_log(MessageTypeId(0x0A), &[0xFF; 300], &exclusions));
    }

    #[test]
    fn test_composite_rejects_matching_sub_category() {
        let exclusions = set(&["0x028:0x1844"]);
        assert!(!should_log(ACTION, &action_payload(12, 0x1844), &exclusions));
        assert!(!should_log(ACTION, &action_payload(40, 0x1844), &exclusions));
    }

    #[test]
    fn test_composite_admits_other_sub_category() {
        let exclusions = set(&["0x028:0x1844"]);
        assert!(should_log(ACTION, &action_payload(12, 0x58E0), &exclusions));
    }

    #[test]
    fn test_composite_admits_short_payload() {
        let exclusions = set(&["0x028:0x1844"]);
        assert!(should_log(ACTION, &action_payload(11, 0), &exclusions));
        assert!(should_log(ACTION, &[], &exclusions));
    }

    #[test]
    fn test_bare_and_composite_for_same_type() {
        let exclusions = set(&["0x028", "0x028:0x1844"]);
        assert!(!should_log(ACTION, &action_payload(12, 0x58E0), &exclusions));
        assert!(!should_log(ACTION, &action_payload(11, 0), &exclusions));
    }

    #[test]
    fn test_several_composites_for_same_type() {
        let exclusions = set(&["0x028:0x1844", "0x028:0x58E0"]);
        assert!(!should_log(ACTION, &action_payload(12, 0x1844), &exclusions));
        assert!(!should_log(ACTION, &action_payload(12, 0x58E0), &exclusions));
        assert!(should_log(ACTION, &action_payload(12, 0x0001), &exclusions));
    }

    #[test]
    fn test_composite_for_type_without_field_never_matches() {
        // Built directly: the parser refuses this combination.
        let exclusions: ExclusionSet = [FilterRule::composite(0x0A, 0)].into_iter().collect();
        assert!(should_log(MessageTypeId(0x0A), &[0u8; 16], &exclusions));
    }
}
