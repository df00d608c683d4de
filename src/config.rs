// =====================================================================
// File: config.rs
//
// Recognized configuration knobs: the height target `k` and the
// initial branching factor `b`. Both are clamped at construction time
// rather than rejected (`k >= 0`, `b >= 4`), matching this crate's error
// handling design. Doubles as the CLI binary's argument struct via
// `clap::Parser`.
// =====================================================================
use clap::Parser;
use log::warn;

#[derive(Debug, Clone, Copy, Parser)]
#[command(name = "jumptree-cli", about = "Interactive driver for a JumpTree dictionary")]
pub struct JumpTreeConfig {
    /// Height target k. Values below 0 are clamped to 0.
    #[arg(short = 'k', long = "height", default_value_t = 5)]
    pub k: i32,

    /// Initial branching factor b. Values below 4 are clamped to 4.
    #[arg(short = 'b', long = "branching", default_value_t = 4)]
    pub b: usize,
}

impl JumpTreeConfig {
    pub fn new(k: i32, b: usize) -> Self {
        Self { k, b }
    }

    /// Applies the documented clamps, warning on each value actually
    /// adjusted.
    pub fn clamped(&self) -> (i32, usize) {
        let k = self.k.max(0);
        let b = self.b.max(4);
        if k != self.k {
            warn!("height k={} clamped to {}", self.k, k);
        }
        if b != self.b {
            warn!("branching factor b={} clamped to {}", self.b, b);
        }
        (k, b)
    }
}

impl Default for JumpTreeConfig {
    fn default() -> Self {
        Self { k: 5, b: 4 }
    }
}
