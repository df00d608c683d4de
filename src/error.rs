// =====================================================================
// File: error.rs
//
// The in-memory core (node storage, B+-tree algorithms, bulk packer,
// policy layer, facade as specified) never returns `Result` — it has
// no partial-failure states: missing keys yield the documented
// sentinel, deleting an absent key is a silent no-op, and out-of-range
// configuration is clamped, not rejected.
//
// `JumpTreeError` covers only the additive surface this crate layers
// on top of that core: duplicate-key detection in checked batch
// construction, and I/O performed by the CLI driver and `print_to`.
// =====================================================================
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JumpTreeError {
    #[error("duplicate key {key} in batch construction")]
    DuplicateKeyInBatch { key: i32 },

    #[error("failed to write debug dump")]
    Format(#[from] std::fmt::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
