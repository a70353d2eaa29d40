//! Pure text wrapping utilities and dimensional constants for the InputBox.
//!
//! The composer stores line breaks as `"\r\n"` and keeps tabs verbatim. What
//! gets wrapped and drawn is the *display* form: every line break is a single
//! `'\n'` and a tab is one space. Cursor math happens in display space and is
//! mapped back to buffer byte offsets with [`to_buffer_pos`].

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

/// Build textwrap options configured for the input box inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Calculate the inner content width after subtracting border/padding overhead.
/// Returns 0 if the area is too narrow.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Count wrapped lines for display text, accounting for trailing newlines
/// that textwrap may not represent as empty lines.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }

    count
}

/// The buffer as drawn. Byte length differs from the buffer only by one per `"\r\n"`.
pub(super) fn display_text(buffer: &str) -> String {
    buffer
        .replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\r' => '\n',
            '\t' => ' ',
            other => other,
        })
        .collect()
}

/// Map a buffer byte offset to the matching offset in [`display_text`].
pub(super) fn to_display_pos(buffer: &str, pos: usize) -> usize {
    pos - buffer[..pos].matches("\r\n").count()
}

/// Map a display offset back to a buffer byte offset.
pub(super) fn to_buffer_pos(buffer: &str, display_pos: usize) -> usize {
    let mut shown = 0;
    let mut chars = buffer.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if shown >= display_pos {
            return i;
        }
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
        }
        shown += c.len_utf8();
    }
    buffer.len()
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
/// A `"\r\n"` pair counts as one character.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    if text[..pos].ends_with("\r\n") {
        return pos - 2;
    }
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
/// A `"\r\n"` pair counts as one character.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    if text[pos..].starts_with("\r\n") {
        return pos + 2;
    }
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Normalise pasted line endings to the composer's `"\r\n"`.
pub(super) fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- wrap_line_count -------------------------------------------------

    #[test]
    fn wrap_line_count_empty_string() {
        assert_eq!(wrap_line_count("", 80), 1);
    }

    #[test]
    fn wrap_line_count_zero_width() {
        assert_eq!(wrap_line_count("hello", 0), 1);
    }

    #[test]
    fn wrap_line_count_wraps_long_text() {
        assert_eq!(wrap_line_count("aaaaaaaaaa", 5), 2);
    }

    #[test]
    fn wrap_line_count_trailing_newline_adds_line() {
        assert_eq!(wrap_line_count("hello\n", 80), 2);
    }

    #[test]
    fn wrap_line_count_explicit_newlines() {
        assert_eq!(wrap_line_count("a\nb\nc", 80), 3);
    }

    // -- display mapping -------------------------------------------------

    #[test]
    fn display_text_collapses_crlf_and_tabs() {
        assert_eq!(display_text("a\r\nb\tc"), "a\nb c");
        assert_eq!(display_text("lone\rcr"), "lone\ncr");
    }

    #[test]
    fn display_pos_round_trips_around_crlf() {
        let buffer = "ab\r\ncd\r\n";
        // after "ab\r\n" (4 bytes) → display 3
        assert_eq!(to_display_pos(buffer, 4), 3);
        assert_eq!(to_buffer_pos(buffer, 3), 4);
        assert_eq!(to_display_pos(buffer, buffer.len()), 6);
        assert_eq!(to_buffer_pos(buffer, 6), buffer.len());
        assert_eq!(to_buffer_pos(buffer, 0), 0);
    }

    #[test]
    fn display_pos_with_multibyte() {
        let buffer = "é\r\nx";
        assert_eq!(to_display_pos(buffer, 4), 3);
        assert_eq!(to_buffer_pos(buffer, 3), 4);
    }

    // -- char boundaries -------------------------------------------------

    #[test]
    fn prev_char_boundary_multibyte() {
        let s = "café";
        assert_eq!(prev_char_boundary(s, 5), 3);
        assert_eq!(prev_char_boundary(s, 3), 2);
    }

    #[test]
    fn prev_char_boundary_skips_crlf_pair() {
        assert_eq!(prev_char_boundary("a\r\n", 3), 1);
    }

    #[test]
    fn next_char_boundary_emoji() {
        let s = "a🔥b";
        assert_eq!(next_char_boundary(s, 0), 1);
        assert_eq!(next_char_boundary(s, 1), 5);
    }

    #[test]
    fn next_char_boundary_skips_crlf_pair() {
        assert_eq!(next_char_boundary("a\r\nb", 1), 3);
    }

    #[test]
    fn normalize_newlines_handles_every_style() {
        assert_eq!(normalize_newlines("a\nb\r\nc\rd"), "a\r\nb\r\nc\r\nd");
    }
}
