//! Terminal display width helpers.
//!
//! Art pasted from a terminal may carry ANSI colour codes, and every cell of
//! the grid must be exactly one display column wide.

use unicode_width::UnicodeWidthChar;

/// Strip ANSI escapes and any trailing carriage return from a raw line.
pub fn clean_line(line: &str) -> String {
    let clean = strip_ansi_escapes::strip(line);
    let clean_str = String::from_utf8_lossy(&clean);
    clean_str.trim_end_matches('\r').to_string()
}

/// Display width of a single glyph; control characters report zero.
pub fn glyph_width(glyph: char) -> usize {
    UnicodeWidthChar::width(glyph).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_colour_codes() {
        assert_eq!(clean_line("\u{1b}[31maab\u{1b}[0m\r"), "aab");
    }

    #[test]
    fn wide_and_control_glyphs() {
        assert_eq!(glyph_width('a'), 1);
        assert_eq!(glyph_width('界'), 2);
        assert_eq!(glyph_width('\t'), 0);
    }
}
