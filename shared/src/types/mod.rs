//! Core data types

pub mod filter;
pub mod message;
