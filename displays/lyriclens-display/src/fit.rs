//! Text fitting and formatting helpers
//!
//! `fit_text` works in rendered pixels through a [`TextRenderer`]; the
//! `truncate`/`wrap_line` pair works in characters for the list fallback,
//! whose containers lay text out on the glasses side.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use lyriclens_core::FontSpec;

use crate::text::TextRenderer;

pub const ELLIPSIS: &str = "...";

/// Shorten `text` until it fits in `max_width` pixels
///
/// Text that already fits is returned as is. Otherwise characters are
/// dropped from the end, one at a time, until `prefix + "..."` fits or the
/// prefix is empty. The result can still be wider than `max_width` when even
/// the ellipsis does not fit; drawing clips it.
pub fn fit_text<'a, R>(renderer: &R, text: &'a str, font: FontSpec, max_width: u32) -> Cow<'a, str>
where
    R: TextRenderer + ?Sized,
{
    if text.is_empty() || renderer.measure(text, font) <= max_width {
        return Cow::Borrowed(text);
    }

    let mut candidate = String::with_capacity(text.len() + ELLIPSIS.len());
    let mut prefix = text;
    loop {
        candidate.clear();
        candidate.push_str(prefix);
        candidate.push_str(ELLIPSIS);
        if prefix.is_empty() || renderer.measure(&candidate, font) <= max_width {
            return Cow::Owned(candidate);
        }
        prefix = drop_last_char(prefix);
    }
}

fn drop_last_char(s: &str) -> &str {
    match s.char_indices().next_back() {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// `M:SS` with unbounded minutes
pub fn format_time(ms: u64) -> heapless::String<24> {
    let total_secs = ms / 1000;
    let mut out = heapless::String::new();
    // 20 digits + ":SS" always fits
    let _ = write!(out, "{}:{:02}", total_secs / 60, total_secs % 60);
    out
}

/// Keep at most `max_chars` characters, ending in "..." when shortened
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Greedy word wrap at `max_chars`
///
/// Words are split on single spaces and joined back with one space. A word
/// longer than the limit stays whole on its own line. Text that already
/// fits (including the empty string) yields a single line.
pub fn wrap_line(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return alloc::vec![String::from(text)];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(core::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Rounded fill count for `cells` cells, clamped; NaN counts as empty
pub fn filled_cells(fraction: f32, cells: u32) -> u32 {
    let scaled = fraction * cells as f32;
    if scaled.is_nan() || scaled <= 0.0 {
        return 0;
    }
    if scaled >= cells as f32 {
        return cells;
    }
    // round half up; scaled is in (0, cells)
    ((scaled + 0.5) as u32).min(cells)
}

/// `<====-------->` style bar with `cells` cells between the brackets
pub fn text_progress_bar(fraction: f32, cells: usize) -> String {
    let filled = filled_cells(fraction, cells as u32) as usize;
    let mut bar = String::with_capacity(cells + 2);
    bar.push('<');
    bar.extend(core::iter::repeat('=').take(filled));
    bar.extend(core::iter::repeat('-').take(cells - filled));
    bar.push('>');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{PixelBuffer, Region};
    use embedded_graphics::prelude::Point;
    use proptest::prelude::*;

    /// Every char is `size_px / 2` wide
    struct HalfEm;

    impl TextRenderer for HalfEm {
        fn measure(&self, text: &str, font: FontSpec) -> u32 {
            text.chars().count() as u32 * (font.size_px as u32 / 2)
        }

        fn draw(&self, _: &mut PixelBuffer, _: &str, _: FontSpec, _: Point, _: u8, _: Region) {}
    }

    const FONT: FontSpec = FontSpec::regular(10);

    #[test]
    fn test_fit_text_keeps_fitting_text() {
        assert!(matches!(fit_text(&HalfEm, "hello", FONT, 25), Cow::Borrowed("hello")));
        assert_eq!(fit_text(&HalfEm, "", FONT, 0), "");
    }

    #[test]
    fn test_fit_text_truncates_with_ellipsis() {
        // 20 chars = 100 px; 50 px fits 10 chars, so 7 + "..."
        let fitted = fit_text(&HalfEm, "abcdefghijklmnopqrst", FONT, 50);
        assert_eq!(fitted, "abcdefg...");
        assert!(HalfEm.measure(&fitted, FONT) <= 50);
    }

    #[test]
    fn test_fit_text_falls_back_to_bare_ellipsis() {
        assert_eq!(fit_text(&HalfEm, "abcdef", FONT, 12), "...");
        assert_eq!(fit_text(&HalfEm, "abcdef", FONT, 0), "...");
    }

    #[test]
    fn test_fit_text_respects_char_boundaries() {
        assert_eq!(fit_text(&HalfEm, "ééééé", FONT, 20), "é...");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59_999), "0:59");
        assert_eq!(format_time(61_000), "1:01");
        assert_eq!(format_time(3_725_000), "62:05");
        assert!(format_time(u64::MAX).ends_with(":51"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 48), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("abcdefghij", 2), "...");
    }

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("", 10), [""]);
        assert_eq!(wrap_line("fits fine", 10), ["fits fine"]);
        assert_eq!(
            wrap_line("the quick brown fox jumps", 10),
            ["the quick", "brown fox", "jumps"]
        );
        assert_eq!(
            wrap_line("a supercalifragilistic word", 10),
            ["a", "supercalifragilistic", "word"]
        );
    }

    #[test]
    fn test_text_progress_bar() {
        assert_eq!(text_progress_bar(0.0, 12), "<------------>");
        assert_eq!(text_progress_bar(0.5, 12), "<======------>");
        assert_eq!(text_progress_bar(1.7, 12), "<============>");
        assert_eq!(text_progress_bar(-1.0, 12), "<------------>");
        assert_eq!(text_progress_bar(f32::NAN, 12), "<------------>");
    }

    #[test]
    fn test_filled_cells_rounds_half_up() {
        assert_eq!(filled_cells(0.5, 3), 2);
        assert_eq!(filled_cells(0.49, 2), 1);
        assert_eq!(filled_cells(0.2, 2), 0);
    }

    proptest! {
        #[test]
        fn prop_fit_text_fits_or_is_ellipsis(text in "[a-z ]{0,80}", max in 0u32..400) {
            let fitted = fit_text(&HalfEm, &text, FONT, max);
            prop_assert!(HalfEm.measure(&fitted, FONT) <= max || fitted == ELLIPSIS);
            if HalfEm.measure(&text, FONT) > max {
                prop_assert!(fitted.ends_with(ELLIPSIS));
            }
        }

        #[test]
        fn prop_wrap_line_respects_limit(text in "[a-z]{1,8}( [a-z]{1,8}){0,20}") {
            for line in wrap_line(&text, 20) {
                prop_assert!(line.chars().count() <= 20);
            }
        }
    }
}
