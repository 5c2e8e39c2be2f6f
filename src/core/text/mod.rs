//! Text helpers (grapheme segmentation, char offsets, display widths).
//!
//! These helpers are pure (string in/value out) and live under `core` so the markup model and
//! widgets can share them.

pub mod utils;
pub mod width;
