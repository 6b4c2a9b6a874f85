//! Domain types for persistent flags.
//!
//! Pure value types with no file-system access.  The storage layer depends on
//! this module, never the other way round.

/// The immutable on/off value held by every flag.
pub mod toggle;
