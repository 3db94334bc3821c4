//! Character/byte offset handling.
//!
//! Annotation files store half-open **character** offsets (Unicode scalar
//! values), because that is what the annotation tooling and the downstream
//! trainer count. The `regex` crate and `str` slicing work in **bytes**.
//! Mixing the two silently shifts every span that follows a non-ASCII
//! character:
//!
//! ```text
//! Text:   "C2 → 10.0.0.5"
//!
//!          C  2     →     1  0  .  0  .  0  .  5
//! char:    0  1  2  3  4  5  6  7  8  9 10 11 12
//! byte:    0  1  2  3-5 6  7  8  9 10 11 12 13 14
//!                   └3┘
//!
//! "10.0.0.5" is chars [5, 13) but bytes [7, 15).
//! ```
//!
//! Every component converts at the boundary through [`SpanConverter`], which
//! precomputes both directions once per text so each lookup is O(1).

use serde::{Deserialize, Serialize};

/// A text span carrying both byte and character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    /// Byte offset (start, inclusive)
    pub byte_start: usize,
    /// Byte offset (end, exclusive)
    pub byte_end: usize,
    /// Character offset (start, inclusive)
    pub char_start: usize,
    /// Character offset (end, exclusive)
    pub char_end: usize,
}

impl TextSpan {
    /// Create a span from byte offsets, computing char offsets from text.
    ///
    /// ```
    /// use spanguard::offset::TextSpan;
    ///
    /// let text = "C2 → 10.0.0.5";
    /// let span = TextSpan::from_bytes(text, 7, text.len());
    /// assert_eq!(span.char_start, 5);
    /// assert_eq!(span.char_end, 13);
    /// assert_eq!(span.extract(text), "10.0.0.5");
    /// ```
    #[must_use]
    pub fn from_bytes(text: &str, byte_start: usize, byte_end: usize) -> Self {
        let (char_start, char_end) = bytes_to_chars(text, byte_start, byte_end);
        Self {
            byte_start,
            byte_end,
            char_start,
            char_end,
        }
    }

    /// Create a span from character offsets, computing byte offsets from text.
    #[must_use]
    pub fn from_chars(text: &str, char_start: usize, char_end: usize) -> Self {
        let (byte_start, byte_end) = chars_to_bytes(text, char_start, char_end);
        Self {
            byte_start,
            byte_end,
            char_start,
            char_end,
        }
    }

    /// Character length.
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.char_end.saturating_sub(self.char_start)
    }

    /// Check if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.byte_start >= self.byte_end
    }

    /// Extract the text for this span.
    #[must_use]
    pub fn extract<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.byte_start..self.byte_end).unwrap_or("")
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

/// Convert byte offsets to character offsets.
///
/// A byte offset inside a multi-byte character resolves to the next
/// character boundary.
#[must_use]
pub fn bytes_to_chars(text: &str, byte_start: usize, byte_end: usize) -> (usize, usize) {
    let mut char_start = None;
    let mut char_end = None;

    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        if char_start.is_none() && byte_idx >= byte_start {
            char_start = Some(char_idx);
        }
        if byte_idx >= byte_end {
            char_end = Some(char_idx);
            break;
        }
    }

    let char_count = text.chars().count();
    (
        char_start.unwrap_or(char_count),
        char_end.unwrap_or(char_count),
    )
}

/// Convert character offsets to byte offsets.
///
/// Offsets past the end clamp to `text.len()`.
#[must_use]
pub fn chars_to_bytes(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let mut byte_start = text.len();
    let mut byte_end = text.len();

    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        if char_idx == char_start {
            byte_start = byte_idx;
        }
        if char_idx == char_end {
            byte_end = byte_idx;
            break;
        }
    }

    (byte_start, byte_end)
}

// =============================================================================
// Span Converter (batch operations)
// =============================================================================

/// Converter for handling many spans over the same text.
///
/// ASCII text takes the identity fast path and allocates nothing.
#[derive(Debug, Clone)]
pub struct SpanConverter {
    byte_to_char: Vec<usize>,
    char_to_byte: Vec<usize>,
    char_len: usize,
    byte_len: usize,
    is_ascii: bool,
}

impl SpanConverter {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                byte_to_char: Vec::new(),
                char_to_byte: Vec::new(),
                char_len: text.len(),
                byte_len: text.len(),
                is_ascii: true,
            };
        }

        let char_len = text.chars().count();
        let mut byte_to_char = vec![0usize; text.len() + 1];
        let mut char_to_byte = Vec::with_capacity(char_len + 1);

        for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
            char_to_byte.push(byte_idx);
            // Interior bytes of a multi-byte char map to the *next* char so
            // that a misaligned byte offset never widens a span backwards.
            byte_to_char[byte_idx] = char_idx;
            for i in 1..ch.len_utf8() {
                byte_to_char[byte_idx + i] = char_idx + 1;
            }
        }
        char_to_byte.push(text.len());
        byte_to_char[text.len()] = char_len;

        Self {
            byte_to_char,
            char_to_byte,
            char_len,
            byte_len: text.len(),
            is_ascii: false,
        }
    }

    /// Number of characters in the text.
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.char_len
    }

    /// Convert byte offset to char offset (clamped to the text end).
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.is_ascii {
            byte_idx.min(self.byte_len)
        } else {
            self.byte_to_char
                .get(byte_idx)
                .copied()
                .unwrap_or(self.char_len)
        }
    }

    /// Convert char offset to byte offset (clamped to the text end).
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        if self.is_ascii {
            char_idx.min(self.byte_len)
        } else {
            self.char_to_byte
                .get(char_idx)
                .copied()
                .unwrap_or(self.byte_len)
        }
    }

    /// Both offset pairs for the char range `[char_start, char_end)`.
    #[must_use]
    pub fn from_chars(&self, char_start: usize, char_end: usize) -> TextSpan {
        TextSpan {
            byte_start: self.char_to_byte(char_start),
            byte_end: self.char_to_byte(char_end),
            char_start,
            char_end,
        }
    }

    /// Check if this text is ASCII.
    #[must_use]
    pub const fn is_ascii(&self) -> bool {
        self.is_ascii
    }
}

/// Character immediately before byte offset `byte_idx`, if any.
#[must_use]
pub fn char_before(text: &str, byte_idx: usize) -> Option<char> {
    text.get(..byte_idx).and_then(|s| s.chars().next_back())
}

/// Character starting at byte offset `byte_idx`, if any.
#[must_use]
pub fn char_at(text: &str, byte_idx: usize) -> Option<char> {
    text.get(byte_idx..).and_then(|s| s.chars().next())
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// chars -> bytes -> chars preserves in-range offsets.
        #[test]
        fn roundtrip_chars_bytes_chars(text in ".{0,80}", a in 0usize..80, b in 0usize..80) {
            let n = text.chars().count();
            let (s, e) = (a.min(b).min(n), a.max(b).min(n));
            let (bs, be) = chars_to_bytes(&text, s, e);
            prop_assert_eq!(bytes_to_chars(&text, bs, be), (s, e));
        }

        /// Converter agrees with the direct functions.
        #[test]
        fn converter_matches_direct(text in ".{0,60}", a in 0usize..60, b in 0usize..60) {
            let n = text.chars().count();
            let (s, e) = (a.min(b).min(n), a.max(b).min(n));
            let conv = SpanConverter::new(&text);
            let direct = TextSpan::from_chars(&text, s, e);
            prop_assert_eq!(conv.from_chars(s, e), direct);
        }
    }
}
