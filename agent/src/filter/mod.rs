//! Message admission
//!
//! The engine decides per message; the store is the live exclusion set shared
//! between the configuration surface and the session.

pub mod engine;
pub mod store;

pub use engine::should_log;
pub use store::ExclusionStore;
