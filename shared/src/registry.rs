//! Static filter registry
//!
//! The catalog lists the message types a configuration surface offers for
//! exclusion, each with a display label. Labels are never consulted by the
//! filter itself. Extending the catalog or the sub-category table is a
//! data-only change.

use crate::types::filter::{FilterRule, SubCategory};
use crate::types::message::MessageTypeId;

/// Location of a little-endian u16 sub-category inside a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubCategoryField {
    /// Offset of the low byte; the high byte follows it
    pub offset: usize,
}

impl SubCategoryField {
    pub const fn at(offset: usize) -> Self {
        Self { offset }
    }

    /// Read the field, or `None` when the payload is too short to hold it.
    pub fn extract(&self, payload: &[u8]) -> Option<SubCategory> {
        let end = self.offset.checked_add(2)?;
        match payload.get(self.offset..end)? {
            [lo, hi] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }
}

/// One selectable catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub rule: FilterRule,
    pub label: &'static str,
}

const fn entry(rule: FilterRule, label: &'static str) -> CatalogEntry {
    CatalogEntry { rule, label }
}

/// Message types whose payload carries a sub-category field
static SUB_CATEGORY_FIELDS: &[(MessageTypeId, SubCategoryField)] =
    &[(MessageTypeId(0x028), SubCategoryField::at(10))];

static CATALOG: &[CatalogEntry] = &[
    entry(FilterRule::bare(0x001), "Handshake"),
    entry(FilterRule::bare(0x002), "Keep-alive"),
    entry(FilterRule::bare(0x00A), "Chat message"),
    entry(FilterRule::bare(0x011), "Entity spawn"),
    entry(FilterRule::bare(0x012), "Entity despawn"),
    entry(FilterRule::bare(0x013), "Entity movement"),
    entry(FilterRule::bare(0x01F), "Inventory update"),
    entry(FilterRule::bare(0x028), "Action (all)"),
    entry(FilterRule::composite(0x028, 0x1844), "Action: skill cast"),
    entry(FilterRule::composite(0x028, 0x58E0), "Action: emote"),
    entry(FilterRule::bare(0x03C), "Status effect"),
    entry(FilterRule::bare(0x0F0), "Server notice"),
    entry(FilterRule::bare(0x1FF), "Heartbeat ack"),
];

/// All catalog entries, in display order
pub fn entries() -> &'static [CatalogEntry] {
    CATALOG
}

/// Sub-category field registered for a message type, if any
pub fn sub_category_field(type_id: MessageTypeId) -> Option<SubCategoryField> {
    SUB_CATEGORY_FIELDS
        .iter()
        .find(|(id, _)| *id == type_id)
        .map(|(_, field)| *field)
}

/// Extract the sub-category of a payload for the given message type.
///
/// Fails silently (returns `None`) for unregistered types and short payloads.
pub fn extract_sub_category(type_id: MessageTypeId, payload: &[u8]) -> Option<SubCategory> {
    sub_category_field(type_id)?.extract(payload)
}

pub fn lookup(rule: &FilterRule) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.rule == *rule)
}

pub fn label_for(rule: &FilterRule) -> Option<&'static str> {
    lookup(rule).map(|e| e.label)
}

/// Case-insensitive label lookup
pub fn find_by_label(label: &str) -> Option<&'static CatalogEntry> {
    let label = label.trim();
    CATALOG.iter().find(|e| e.label.eq_ignore_ascii_case(label))
}
