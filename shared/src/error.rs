//! Configuration-boundary errors

use crate::types::message::MessageTypeId;
use thiserror::Error;

/// Raised when an exclusion identifier cannot be turned into a filter rule.
///
/// These never reach the filter engine: a malformed entry is rejected where
/// the configuration is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("empty exclusion identifier")]
    Empty,

    #[error("invalid message type id '{0}'")]
    InvalidTypeId(String),

    #[error("invalid sub-category '{0}'")]
    InvalidSubCategory(String),

    #[error("message type {0} has no sub-category field")]
    NoSubCategoryField(MessageTypeId),
}
