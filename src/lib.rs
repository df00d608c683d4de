//! # jumptree
//! A height-bounded B+-tree variant tuned for the Jump Search access
//! pattern.
//!
//! ## Features
//! - In-memory ordered dictionary: `i32` key -> `i32` payload id.
//! - Height held at or below a caller-chosen target `k` by widening or
//!   narrowing the branching factor `b` and repacking, either online
//!   (from the live leaf chain) or offline (from a sorted batch).
//! - Arena-owned nodes; no raw pointers, no unsafe.
//!
//! ## Usage
//! [`JumpTree`] is the public entry point. The `jumptree-cli` binary
//! wraps it in an interactive REPL for manual exploration.
// =====================================================================
// File: lib.rs
// =====================================================================
pub mod config;
pub mod error;
pub mod jump_tree;
pub mod tree;

pub use config::JumpTreeConfig;
pub use error::JumpTreeError;
pub use jump_tree::JumpTree;
pub use tree::NOT_FOUND;
