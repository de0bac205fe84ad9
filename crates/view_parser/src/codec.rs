//! Reversible attribute-name encoding.
//!
//! Attribute names captured by the parser may contain characters that are not valid in
//! DOM attribute names (`(`, `{`, `@`, spaces, ...) and may rely on letter case that a DOM
//! would fold away (`on:fooBar`). `encode` maps such names onto a safe alphabet using
//! colon-delimited escape tokens; `decode` maps them back.
//!
//! Round-trip: `decode(&encode(name)) == name` for every name except legacy binding
//! names that start with `(` or `{` and contain camelCase humps. Those are kebab-cased
//! (`(fooBar)` -> `(foo-bar)`), which `decode` does not undo. Names on the
//! case-sensitive attribute list skip the case handling in both directions.
//!
//! `:` itself is never escaped, so a name whose literal text already spells a token
//! (`a:s:b`, or `onU:x:to` next to `on:uX:to`) shares its encoding with another name.
//! `decode` returns the reading that encodes back to its input, preferring the
//! rightmost uppercase escapes.

use crate::elements::is_case_sensitive_attribute;
use std::borrow::Cow;

const UPPERCASE_ESCAPE: &str = ":u:";

/// Per-character escape tokens, in encode order.
const CHAR_ESCAPES: [(char, &str); 9] = [
    (' ', ":s:"),
    ('/', ":f:"),
    ('(', ":lp:"),
    (')', ":rp:"),
    ('{', ":lb:"),
    ('}', ":rb:"),
    ('^', ":c:"),
    ('$', ":d:"),
    ('@', ":at:"),
];

const BINDING_PREFIXES: [&str; 1] = ["on:"];
const BINDING_SUFFIXES: [&str; 4] = [":to", ":from", ":bind", ":raw"];

/// Encodes an attribute name into the escape alphabet.
pub fn encode(name: &str) -> Cow<'_, str> {
    let mut encoded = Cow::Borrowed(name);

    if !is_case_sensitive_attribute(name) && has_camel_hump(name) {
        if is_binding_name(name) {
            encoded = Cow::Owned(escape_uppercase(name));
        } else if is_legacy_binding_name(name) {
            encoded = Cow::Owned(kebab_case_humps(name));
        }
    }

    if !encoded.chars().any(needs_char_escape) {
        return encoded;
    }
    let mut out = String::with_capacity(encoded.len() + 8);
    for ch in encoded.chars() {
        match CHAR_ESCAPES.iter().find(|(from, _)| *from == ch) {
            Some((_, token)) => out.push_str(token),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Decodes a name produced by [`encode`].
pub fn decode(name: &str) -> Cow<'_, str> {
    let mut decoded = Cow::Borrowed(name);

    if !is_case_sensitive_attribute(name)
        && name.contains(UPPERCASE_ESCAPE)
        && is_binding_name(name)
    {
        decoded = Cow::Owned(unescape_uppercase(name));
    }

    for (ch, token) in CHAR_ESCAPES.iter().rev() {
        if decoded.contains(token) {
            let mut buf = [0u8; 4];
            decoded = Cow::Owned(decoded.replace(token, ch.encode_utf8(&mut buf)));
        }
    }
    decoded
}

/// Returns `true` when [`encode`] rewrites `name` in a way [`decode`] cannot undo.
pub fn is_lossy(name: &str) -> bool {
    !is_case_sensitive_attribute(name)
        && has_camel_hump(name)
        && !is_binding_name(name)
        && is_legacy_binding_name(name)
}

fn is_binding_name(name: &str) -> bool {
    BINDING_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
        || BINDING_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

fn is_legacy_binding_name(name: &str) -> bool {
    name.starts_with('(') || name.starts_with('{')
}

fn needs_char_escape(ch: char) -> bool {
    CHAR_ESCAPES.iter().any(|(from, _)| *from == ch)
}

/// An ASCII uppercase letter at the start of the name or right after a lowercase
/// letter or digit.
fn is_hump(bytes: &[u8], i: usize) -> bool {
    bytes[i].is_ascii_uppercase()
        && (i == 0 || bytes[i - 1].is_ascii_lowercase() || bytes[i - 1].is_ascii_digit())
}

fn has_camel_hump(name: &str) -> bool {
    let bytes = name.as_bytes();
    (0..bytes.len()).any(|i| is_hump(bytes, i))
}

fn escape_uppercase(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 6);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push_str(UPPERCASE_ESCAPE);
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Undoes [`escape_uppercase`].
///
/// A literal `:u` or `U:` next to an escape can be read two ways (`on:u:u:icon` is
/// `on:uIcon`, not `onU:icon`). The rightmost reading is tried first, then the
/// leftmost; the first one that escapes back to `name` under the binding rule wins.
fn unescape_uppercase(name: &str) -> String {
    let rightmost = unescape_uppercase_rightmost(name);
    if escapes_back_to(&rightmost, name) {
        return rightmost;
    }
    let leftmost = unescape_uppercase_leftmost(name);
    if escapes_back_to(&leftmost, name) {
        leftmost
    } else {
        rightmost
    }
}

fn escapes_back_to(candidate: &str, escaped: &str) -> bool {
    is_binding_name(candidate) && has_camel_hump(candidate) && escape_uppercase(candidate) == escaped
}

fn unescape_uppercase_leftmost(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find(UPPERCASE_ESCAPE) {
        let after = &rest[pos + UPPERCASE_ESCAPE.len()..];
        match after.as_bytes().first() {
            Some(b) if b.is_ascii_lowercase() => {
                out.push_str(&rest[..pos]);
                out.push(b.to_ascii_uppercase() as char);
                rest = &after[1..];
            }
            _ => {
                out.push_str(&rest[..pos + UPPERCASE_ESCAPE.len()]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn unescape_uppercase_rightmost(name: &str) -> String {
    let bytes = name.as_bytes();
    // Restored letters with the literal text that followed them, rightmost first.
    let mut restored: Vec<(char, &str)> = Vec::new();
    let mut end = name.len();
    let mut search_end = name.len();
    while let Some(pos) = name[..search_end].rfind(UPPERCASE_ESCAPE) {
        let letter = pos + UPPERCASE_ESCAPE.len();
        match bytes.get(letter) {
            Some(b) if letter < end && b.is_ascii_lowercase() => {
                restored.push((b.to_ascii_uppercase() as char, &name[letter + 1..end]));
                end = pos;
                search_end = pos;
            }
            // An earlier escape may still overlap this one's first two bytes.
            _ => search_end = pos + UPPERCASE_ESCAPE.len() - 1,
        }
    }

    let mut out = String::with_capacity(name.len());
    out.push_str(&name[..end]);
    for (letter, literal) in restored.iter().rev() {
        out.push(*letter);
        out.push_str(literal);
    }
    out
}

fn kebab_case_humps(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len() + 4);
    let mut last = 0;
    for i in 0..bytes.len() {
        if is_hump(bytes, i) {
            out.push_str(&name[last..i]);
            out.push('-');
            out.push(bytes[i].to_ascii_lowercase() as char);
            last = i + 1;
        }
    }
    out.push_str(&name[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_borrowed() {
        assert!(matches!(encode("class"), Cow::Borrowed("class")));
        assert!(matches!(decode("class"), Cow::Borrowed("class")));
        assert!(matches!(encode("data-foo"), Cow::Borrowed(_)));
    }

    #[test]
    fn binding_names_escape_every_uppercase_letter() {
        assert_eq!(encode("on:fooBar"), "on:foo:u:bar");
        assert_eq!(encode("fooBar:to"), "foo:u:bar:to");
        assert_eq!(encode("fooBAR:bind"), "foo:u:b:u:a:u:r:bind");
        assert_eq!(encode("someValue:raw"), "some:u:value:raw");
        assert_eq!(decode("on:foo:u:bar"), "on:fooBar");
        assert_eq!(decode("foo:u:b:u:a:u:r:bind"), "fooBAR:bind");
    }

    #[test]
    fn camel_case_outside_bindings_is_left_alone() {
        assert_eq!(encode("fooBar"), "fooBar");
        assert_eq!(decode("fooBar"), "fooBar");
    }

    #[test]
    fn uppercase_without_hump_is_not_escaped() {
        assert_eq!(encode("on:FOO"), "on:FOO");
        assert_eq!(decode("on:FOO"), "on:FOO");
    }

    #[test]
    fn legacy_binding_names_are_kebab_cased() {
        assert_eq!(encode("(fooBar)"), ":lp:foo-bar:rp:");
        assert_eq!(encode("{fooBar}"), ":lb:foo-bar:rb:");
        assert_eq!(encode("{(fooBar)}"), ":lb::lp:foo-bar:rp::rb:");
        assert!(is_lossy("(fooBar)"));
        assert!(!is_lossy("(foo)"));
        assert!(!is_lossy("on:fooBar"));
        // The kebab-case step is one-directional.
        assert_eq!(decode(&encode("(fooBar)")), "(foo-bar)");
    }

    #[test]
    fn kebab_case_only_splits_humps() {
        assert_eq!(kebab_case_humps("(fooBAR)"), "(foo-bAR)");
        assert_eq!(kebab_case_humps("{a1Bc}"), "{a1-bc}");
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(encode("a b"), "a:s:b");
        assert_eq!(encode("x/y"), "x:f:y");
        assert_eq!(encode("^click"), ":c:click");
        assert_eq!(encode("$value"), ":d:value");
        assert_eq!(encode("@event"), ":at:event");
        assert_eq!(encode("(click)"), ":lp:click:rp:");
    }

    #[test]
    fn case_sensitive_attributes_pass_through() {
        assert_eq!(encode("viewBox"), "viewBox");
        assert_eq!(decode("viewBox"), "viewBox");
        assert_eq!(encode("preserveAspectRatio"), "preserveAspectRatio");
    }

    #[test]
    fn round_trip_holds_for_non_legacy_names() {
        let names = [
            "class",
            "on:click",
            "on:fooBar",
            "on:vm:someEvent",
            "value:from",
            "checkedValue:bind",
            "innerHTML:raw",
            "(click)",
            "{value}",
            "{(value)}",
            "el:value:to",
            "on:el:click",
            "$attr",
            "@foo",
            "^bar",
            "a/b c",
            "viewBox",
            "fooBar",
            "on:uIcon",
            "on:uU2h^f253c",
            "valueU:bind",
            "xU:to",
        ];
        for name in names {
            assert_eq!(decode(&encode(name)), name, "round trip failed for {name:?}");
        }
    }

    #[test]
    fn unescape_ignores_dangling_uppercase_marker() {
        assert_eq!(unescape_uppercase("on:x:u:"), "on:x:u:");
        assert_eq!(unescape_uppercase("on:x:u:1"), "on:x:u:1");
    }

    #[test]
    fn literal_u_next_to_an_escape_is_kept() {
        assert_eq!(encode("on:uIcon"), "on:u:u:icon");
        assert_eq!(decode("on:u:u:icon"), "on:uIcon");
        assert_eq!(encode("xU:to"), "x:u:u:to");
        assert_eq!(decode("x:u:u:to"), "xU:to");
        assert_eq!(unescape_uppercase_rightmost("a:u:b:u:c"), "aBC");
        assert_eq!(unescape_uppercase_rightmost("on:x:u:1"), "on:x:u:1");
    }

    #[test]
    fn only_the_space_character_is_escaped() {
        assert_eq!(encode("a b"), "a:s:b");
        assert_eq!(encode("a\tb"), "a\tb");
        assert_eq!(encode("a\nb"), "a\nb");
        for name in ["a\tb", "a\nb", "on:x\u{a0}Y"] {
            assert_eq!(decode(&encode(name)), name, "round trip failed for {name:?}");
        }
    }
}
