//! Tag boundary location.
//!
//! Tag names are matched on ASCII bytes only, so every slice endpoint produced here
//! sits on an ASCII structural byte and is a valid UTF-8 boundary.

use crate::lookahead::NextMatch;
use memchr::{memchr, memmem};
use std::borrow::Cow;
use std::ops::Range;

/// A start tag located at the beginning of the remaining input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartTag<'a> {
    /// The whole tag, `<` through the closing `>`.
    pub text: &'a str,
    /// Raw tag name, before case normalization.
    pub name: &'a str,
    /// Everything between the tag name and the closing `>` / `/>`.
    pub attributes: &'a str,
    /// A `/` sits right before the closing `>`.
    pub unary: bool,
}

/// An end tag located at the beginning of the remaining input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndTag<'a> {
    pub name: &'a str,
    /// Bytes consumed, through the closing `>`.
    pub len: usize,
}

/// Characters allowed in end-tag names and in the attribute-name lookahead.
pub fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

/// Locates the start tag at the beginning of `input`.
///
/// The first `>` is not trusted blindly: while it falls inside the value of a
/// `name="value"` / `name='value'` / `name=value` run that starts before it, the search
/// resumes after that value. Returns `None` when no closing `>` exists or when the
/// character after `<` is not ASCII alphanumeric (`< a>`, `<_a>`, `<!x>`, `</a>`).
///
/// Indexes the whole of `input` first. To look up many positions of one input, use a
/// [`TagLocator`].
pub fn locate_start_tag(input: &str) -> Option<StartTag<'_>> {
    TagLocator::new(input).locate(0)
}

/// Start-tag locator over one input, for lookups at non-decreasing offsets.
///
/// Every `name=value` match is found once up front. A lookup then steps from match to
/// match while the current `>` sits inside a value. The step sequence after a given
/// match depends only on that match, so a sequence that ran past the last `>` marks
/// every match it stepped over as dead, and a later lookup reaching one of them fails
/// at once. Work across all lookups stays linear in the input, give or take a binary
/// search per step.
#[derive(Debug)]
pub struct TagLocator<'a> {
    input: &'a str,
    /// `name=value` matches, ordered by name start.
    attributes: Vec<Range<usize>>,
    dead: Vec<bool>,
    walked: Vec<usize>,
    next_gt: NextMatch,
    steps: u64,
}

impl<'a> TagLocator<'a> {
    pub fn new(input: &'a str) -> Self {
        let attributes = index_attributes(input.as_bytes());
        Self {
            input,
            dead: vec![false; attributes.len()],
            attributes,
            walked: Vec::new(),
            next_gt: NextMatch::default(),
            steps: 0,
        }
    }

    /// Locates the start tag beginning at byte `pos`. Offsets in the returned tag are
    /// relative to `pos`.
    pub fn locate(&mut self, pos: usize) -> Option<StartTag<'a>> {
        let input = self.input;
        let bytes = input.as_bytes();
        if bytes.get(pos) != Some(&b'<')
            || !bytes.get(pos + 1).is_some_and(u8::is_ascii_alphanumeric)
        {
            return None;
        }

        let mut close = self
            .next_gt
            .find(pos, |from| memchr(b'>', &bytes[from..]).map(|rel| from + rel))?;
        let mut next = self.attributes.partition_point(|span| span.start <= pos);
        self.walked.clear();
        while let Some(span) = self.attributes.get(next).cloned() {
            if span.start >= close {
                break;
            }
            self.steps += 1;
            if self.dead[next] {
                self.bury_walked();
                return None;
            }
            self.walked.push(next);
            if close < span.end {
                match memchr(b'>', &bytes[span.end..]) {
                    Some(rel) => close = span.end + rel,
                    None => {
                        self.bury_walked();
                        return None;
                    }
                }
            }
            next += 1 + self.attributes[next + 1..]
                .partition_point(|later| later.start < span.end);
        }

        let unary = bytes[close - 1] == b'/';
        let content_end = if unary { close - 1 } else { close };
        let content = input[pos + 1..content_end].trim();
        let (name, attributes) = match content.find(char::is_whitespace) {
            Some(split) => content.split_at(split),
            None => (content, ""),
        };

        Some(StartTag {
            text: &input[pos..=close],
            name,
            attributes,
            unary,
        })
    }

    /// Attribute matches stepped over by all lookups so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn bury_walked(&mut self) {
        for &index in &self.walked {
            self.dead[index] = true;
        }
    }
}

/// Every `name\s*=\s*value` match in `bytes`, one per maximal name run, in order.
///
/// Any suffix of a name run sees the same continuation, so lookups that start inside a
/// run can share its match. Closing quotes and unquoted value ends are found with
/// cached searches, which keeps the pass linear.
fn index_attributes(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut ends = ValueEnds::default();
    let mut i = 0;
    while i < bytes.len() {
        if !is_name_byte(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        if let Some(end) = match_assigned_value(bytes, i, &mut ends) {
            spans.push(start..end);
        }
    }
    spans
}

#[derive(Default)]
struct ValueEnds {
    double_quote: NextMatch,
    single_quote: NextMatch,
    unquoted: NextMatch,
}

fn match_assigned_value(bytes: &[u8], i: usize, ends: &mut ValueEnds) -> Option<usize> {
    let i = skip_ascii_whitespace(bytes, i);
    if bytes.get(i) != Some(&b'=') {
        return None;
    }
    let i = skip_ascii_whitespace(bytes, i + 1);
    let find_byte = |byte: u8| {
        move |from: usize| memchr(byte, &bytes[from..]).map(|rel| from + rel)
    };
    match *bytes.get(i)? {
        b'"' => ends.double_quote.find(i + 1, find_byte(b'"')).map(|quote| quote + 1),
        b'\'' => ends.single_quote.find(i + 1, find_byte(b'\'')).map(|quote| quote + 1),
        b'>' => None,
        _ => {
            let end = ends.unquoted.find(i, |from| {
                bytes[from..]
                    .iter()
                    .position(|&b| b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'>'))
                    .map(|rel| from + rel)
            });
            Some(end.unwrap_or(bytes.len()))
        }
    }
}

fn skip_ascii_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Matches `</name ... >` at the beginning of `input`. Anything but `>` may follow the
/// name before the tag closes.
pub fn match_end_tag(input: &str) -> Option<EndTag<'_>> {
    let bytes = input.as_bytes();
    if !bytes.starts_with(b"</") {
        return None;
    }
    let name_end = 2 + bytes[2..].iter().take_while(|&&b| is_name_byte(b)).count();
    if name_end == 2 {
        return None;
    }
    let close = name_end + memchr(b'>', &bytes[name_end..])?;
    Some(EndTag {
        name: &input[2..name_end],
        len: close + 1,
    })
}

/// Finds the end tag closing a raw-text element: the first `</name` (ASCII
/// case-insensitive) that is eventually followed by a `>`.
///
/// Returns `(content_end, tag_end)`: the raw text is `input[..content_end]` and the
/// scan resumes at `tag_end`.
pub fn find_raw_text_end(input: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = input.as_bytes();
    let needle = name.as_bytes();
    let mut i = 0;
    // `<` cannot appear inside a UTF-8 continuation byte, so byte scanning is safe.
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        let start = i + rel;
        let name_start = start + 2;
        if bytes.get(start + 1) == Some(&b'/')
            && bytes.len() >= name_start + needle.len()
            && bytes[name_start..name_start + needle.len()].eq_ignore_ascii_case(needle)
        {
            let after = name_start + needle.len();
            let close = after + memchr(b'>', &bytes[after..])?;
            return Some((start, close + 1));
        }
        i = start + 1;
    }
    None
}

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Collapses `<!--x-->` and `<![CDATA[x]]>` wrappers inside raw text to their content.
pub fn strip_raw_text_wrappers(text: &str) -> Cow<'_, str> {
    let Some(first) = memmem::find(text.as_bytes(), b"<!") else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = first;
    while let Some(rel) = memmem::find(&text.as_bytes()[i..], b"<!") {
        let start = i + rel;
        let rest = &text[start..];
        let unwrapped = unwrap_section(rest, COMMENT_OPEN, COMMENT_CLOSE)
            .or_else(|| unwrap_section(rest, CDATA_OPEN, CDATA_CLOSE));
        match unwrapped {
            Some((inner, consumed)) => {
                out.push_str(&text[copied..start]);
                out.push_str(inner);
                copied = start + consumed;
                i = copied;
            }
            None => i = start + 1,
        }
    }
    if copied == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

fn unwrap_section<'a>(rest: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let body = rest.strip_prefix(open)?;
    let end = memmem::find(body.as_bytes(), close.as_bytes())?;
    Some((&body[..end], open.len() + end + close.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_simple_tags() {
        let tag = locate_start_tag("<div>text").expect("tag");
        assert_eq!(tag.text, "<div>");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.attributes, "");
        assert!(!tag.unary);

        let tag = locate_start_tag("<div class=\"a\" id=b>x").expect("tag");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.attributes, " class=\"a\" id=b");
    }

    #[test]
    fn skips_gt_inside_quoted_values() {
        let tag = locate_start_tag("<a title=\"1 > 2\">x</a>").expect("tag");
        assert_eq!(tag.text, "<a title=\"1 > 2\">");
        assert_eq!(tag.attributes, " title=\"1 > 2\"");

        let tag = locate_start_tag("<a x='>' y=\">>\" z>rest").expect("tag");
        assert_eq!(tag.text, "<a x='>' y=\">>\" z>");
    }

    #[test]
    fn ignores_attribute_lookalikes_after_the_tag() {
        let tag = locate_start_tag("<b>x</b><i title=\"y\">").expect("tag");
        assert_eq!(tag.text, "<b>");
    }

    #[test]
    fn detects_unary_marker() {
        let tag = locate_start_tag("<br/>").expect("tag");
        assert_eq!(tag.name, "br");
        assert!(tag.unary);

        let tag = locate_start_tag("<my-el a=\"1\" />").expect("tag");
        assert_eq!(tag.name, "my-el");
        assert_eq!(tag.attributes, " a=\"1\"");
        assert!(tag.unary);
    }

    #[test]
    fn rejects_invalid_openers() {
        assert_eq!(locate_start_tag("< a>"), None);
        assert_eq!(locate_start_tag("<_a>"), None);
        assert_eq!(locate_start_tag("</a>"), None);
        assert_eq!(locate_start_tag("<!x>"), None);
        assert_eq!(locate_start_tag("<"), None);
        assert_eq!(locate_start_tag("<div class="), None);
    }

    #[test]
    fn unterminated_quote_falls_back_to_first_gt() {
        // Without a closing quote there is no attribute match to protect the `>`.
        let tag = locate_start_tag("<a title=\"x>y").expect("tag");
        assert_eq!(tag.text, "<a title=\"x>");
    }

    #[test]
    fn locator_agrees_with_lookups_on_the_remaining_input() {
        let input = "<p a='>'>x<b c=\"d>\" e=f>y<i>z<u g='>";
        let mut locator = TagLocator::new(input);
        for (pos, _) in input.match_indices('<') {
            assert_eq!(
                locator.locate(pos),
                locate_start_tag(&input[pos..]),
                "at {pos}"
            );
        }
    }

    #[test]
    fn chains_that_run_off_the_end_are_walked_once() {
        let n = 50;
        let input = format!("<a y='>{} x'", " x' <a y='>".repeat(n));
        let mut locator = TagLocator::new(&input);
        assert_eq!(locator.locate(0), None);
        assert_eq!(locator.steps(), n as u64 + 1);

        let later: Vec<usize> = input.match_indices('<').map(|(pos, _)| pos).skip(1).collect();
        for &pos in &later {
            assert_eq!(locator.locate(pos), None);
        }
        assert_eq!(locator.steps(), n as u64 + 1 + later.len() as u64);
    }

    #[test]
    fn splits_name_on_any_whitespace() {
        let tag = locate_start_tag("<div\n\tclass=\"a\">").expect("tag");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.attributes, "\n\tclass=\"a\"");
    }

    #[test]
    fn matches_end_tags_leniently() {
        assert_eq!(
            match_end_tag("</div>rest"),
            Some(EndTag { name: "div", len: 6 })
        );
        assert_eq!(
            match_end_tag("</my-el foo>"),
            Some(EndTag { name: "my-el", len: 12 })
        );
        assert_eq!(match_end_tag("</ div>"), None);
        assert_eq!(match_end_tag("</div"), None);
        assert_eq!(match_end_tag("<div>"), None);
    }

    #[test]
    fn raw_text_end_is_case_insensitive_and_lenient() {
        assert_eq!(find_raw_text_end("a<b</script>", "script"), Some((3, 12)));
        assert_eq!(find_raw_text_end("x</SCRIPT >y", "script"), Some((1, 11)));
        assert_eq!(find_raw_text_end("x</scrip>", "script"), None);
        assert_eq!(find_raw_text_end("x</script", "script"), None);
    }

    #[test]
    fn strips_comment_and_cdata_wrappers() {
        assert_eq!(strip_raw_text_wrappers("a<!--b-->c"), "abc");
        assert_eq!(strip_raw_text_wrappers("<![CDATA[x < y]]>"), "x < y");
        assert_eq!(
            strip_raw_text_wrappers("<!--1--> and <![CDATA[2]]>"),
            "1 and 2"
        );
        assert!(matches!(
            strip_raw_text_wrappers("if (a < b) {}"),
            Cow::Borrowed("if (a < b) {}")
        ));
        assert!(matches!(
            strip_raw_text_wrappers("a <!-- unterminated"),
            Cow::Borrowed(_)
        ));
    }
}
