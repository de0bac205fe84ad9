//! Magic tag (`{{ ... }}`) delimiter matching.
//!
//! Every function takes the text to inspect and returns byte offsets relative to the
//! match start.

use crate::lookahead::NextMatch;
use memchr::{memchr2, memmem};

pub const MAGIC_OPEN: &str = "{{";
pub const MAGIC_CLOSE: &str = "}}";

/// Close sequence of a literal (`{{! ... !}}`) magic tag.
const LITERAL_CLOSE: &[u8] = b"!}}";

/// A magic tag matched at the start of some input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagicTag<'a> {
    /// Text between the delimiters, passed through unprocessed.
    pub body: &'a str,
    /// Bytes consumed, delimiters included.
    pub len: usize,
}

/// Matches a magic tag at the very start of `input`.
///
/// The body is matched non-greedily up to the first `}}`. A body starting with `!`
/// instead extends to the first `!}}`, so literal tags may contain `}}`. One extra `}`
/// right after the close delimiter is consumed as part of the tag (`{{{x}}}` yields the
/// body `{x`).
pub fn match_magic_tag(input: &str) -> Option<MagicTag<'_>> {
    match_magic_tag_at(input, 0, &mut NextMatch::default())
}

/// [`match_magic_tag`] at byte `pos` of `input`. `literal_close` remembers where the
/// next `!}}` is, for calls at non-decreasing `pos` over the same input.
pub(crate) fn match_magic_tag_at<'a>(
    input: &'a str,
    pos: usize,
    literal_close: &mut NextMatch,
) -> Option<MagicTag<'a>> {
    let rest = input[pos..].strip_prefix(MAGIC_OPEN)?;
    let body_len = literal_body_len(input, pos, literal_close)
        .or_else(|| memmem::find(rest.as_bytes(), MAGIC_CLOSE.as_bytes()))?;
    let mut len = MAGIC_OPEN.len() + body_len + MAGIC_CLOSE.len();
    if input.as_bytes().get(pos + len) == Some(&b'}') {
        len += 1;
    }
    debug_assert!(input.is_char_boundary(pos + len));
    Some(MagicTag {
        body: &rest[..body_len],
        len,
    })
}

fn literal_body_len(input: &str, pos: usize, literal_close: &mut NextMatch) -> Option<usize> {
    let body = pos + MAGIC_OPEN.len();
    if input.as_bytes().get(body) != Some(&b'!') {
        return None;
    }
    // The opening `!` cannot double as the closing one.
    let bytes = input.as_bytes();
    let close = literal_close.find(body + 1, |from| {
        memmem::find(&bytes[from..], LITERAL_CLOSE).map(|rel| from + rel)
    })?;
    Some(close + 1 - body)
}

/// Start of the last close delimiter in `input`. A magic tag opened at `pos` can
/// only match when this is at least `pos + MAGIC_OPEN.len()`.
pub fn last_close(input: &str) -> Option<usize> {
    memmem::rfind(input.as_bytes(), MAGIC_CLOSE.as_bytes())
}

/// Index of the first `<` or magic open delimiter in `input`.
pub fn find_text_break(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let rel = memchr2(b'<', b'{', &bytes[i..])?;
        let pos = i + rel;
        if bytes[pos] == b'<' || bytes.get(pos + 1) == Some(&b'{') {
            return Some(pos);
        }
        i = pos + 1;
    }
    None
}
