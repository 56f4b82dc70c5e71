//! Display-width helpers for raw ascii-art input.

mod utils;

pub use utils::{clean_line, glyph_width};
