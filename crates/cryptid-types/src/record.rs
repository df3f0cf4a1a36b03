//! The [`Record`] trait shared by every persisted type.
//!
//! Each table is keyed by a natural `name` column. The trait exposes that
//! key and a human-readable kind used in error messages, so stores can be
//! written once over any record type.

use validator::Validate;

/// A flat record keyed by its `name`.
pub trait Record: Clone + Send + Sync + Validate + 'static {
    /// Display name of the record kind (e.g. `"Creature"`).
    const KIND: &'static str;

    /// The primary key of this record.
    fn name(&self) -> &str;
}
