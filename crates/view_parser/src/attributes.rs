//! Attribute list sub-parser.
//!
//! Runs once per start tag over the text between the tag name and the closing
//! `>` / `/>`. Names go through [`codec::encode`] before they are reported. Values are
//! reported raw, without quotes, in fragments split around magic tags:
//! `value="a{{x}}b"` yields `attrStart value`, `attrValue a`, `special x`,
//! `attrValue b`, `attrEnd value`.

use crate::codec;
use crate::config::{Diagnostics, ParserConfig};
use crate::handler::{Dispatcher, EventHandler};
use crate::lookahead::NextMatch;
use crate::magic::{self, MAGIC_OPEN, match_magic_tag_at};
use std::borrow::Cow;

#[derive(Debug)]
enum State<'a> {
    LookingForName,
    InName {
        start: usize,
    },
    /// A name was reported; an `=` may still follow.
    LookingForEq {
        name: Cow<'a, str>,
    },
    LookingForValue {
        name: Cow<'a, str>,
    },
    InValue {
        name: Cow<'a, str>,
        start: usize,
        quote: Option<char>,
    },
}

pub(crate) fn scan_attributes<'a, H: EventHandler + ?Sized>(
    region: &'a str,
    line: usize,
    out: &mut Dispatcher<'_, '_, H>,
) -> Result<(), H::Error> {
    let mut state = State::LookingForName;
    let mut pos = 0;
    let magic_close = magic::last_close(region);
    let mut literal_close = NextMatch::default();

    while let Some(ch) = region[pos..].chars().next() {
        if ch == '{'
            && magic_close.is_some_and(|close| close >= pos + MAGIC_OPEN.len())
            && let Some(tag) = match_magic_tag_at(region, pos, &mut literal_close)
        {
            state = settle_before_magic(state, region, pos, line, out)?;
            out.special(tag.body, line)?;
            pos += tag.len;
            // A value interrupted by a magic tag resumes right after it.
            if let State::InValue { start, .. } = &mut state {
                *start = pos;
            }
            continue;
        }

        let mut next = pos + ch.len_utf8();
        state = match state {
            State::InValue { name, start, quote } => {
                let closes = match quote {
                    Some(quote) => ch == quote,
                    None => ch.is_whitespace(),
                };
                if closes {
                    end_attribute(out, &name, &region[start..pos], line)?;
                    State::LookingForName
                } else {
                    State::InValue { name, start, quote }
                }
            }
            State::LookingForName if ch == '=' => State::LookingForValue {
                name: start_attribute(out, "", line)?,
            },
            State::InName { start } if ch == '=' => State::LookingForValue {
                name: start_attribute(out, &region[start..pos], line)?,
            },
            State::LookingForEq { name } if ch == '=' => State::LookingForValue { name },
            State::InName { start } => match name_end(region, start, pos, ch) {
                Some(end) => {
                    next = end;
                    State::LookingForEq {
                        name: start_attribute(out, &region[start..end], line)?,
                    }
                }
                None => State::InName { start },
            },
            // A bare attribute (`disabled`) followed by the next name.
            State::LookingForEq { name } if !ch.is_whitespace() => {
                end_attribute(out, &name, "", line)?;
                State::InName { start: pos }
            }
            State::LookingForName if !ch.is_whitespace() => State::InName { start: pos },
            State::LookingForValue { name } if !ch.is_whitespace() => match ch {
                '"' | '\'' => State::InValue {
                    name,
                    start: next,
                    quote: Some(ch),
                },
                _ => State::InValue {
                    name,
                    start: pos,
                    quote: None,
                },
            },
            unchanged => unchanged,
        };
        pos = next;
    }

    match state {
        State::LookingForName => Ok(()),
        State::InName { start } => {
            let name = start_attribute(out, &region[start..], line)?;
            end_attribute(out, &name, "", line)
        }
        State::LookingForEq { name } | State::LookingForValue { name } => {
            end_attribute(out, &name, "", line)
        }
        State::InValue { name, start, quote } => {
            if let Some(quote) = quote {
                out.diagnostics().warn(
                    line,
                    format_args!("end quote is missing for {name}: expected {quote}"),
                );
            }
            end_attribute(out, &name, &region[start..], line)
        }
    }
}

/// Resolves the pending state at a magic tag so the tag splits attributes cleanly.
fn settle_before_magic<'a, H: EventHandler + ?Sized>(
    state: State<'a>,
    region: &'a str,
    pos: usize,
    line: usize,
    out: &mut Dispatcher<'_, '_, H>,
) -> Result<State<'a>, H::Error> {
    Ok(match state {
        State::InValue { name, start, quote } => {
            if start < pos {
                out.attr_value(&region[start..pos], line)?;
            }
            State::InValue { name, start, quote }
        }
        State::InName { start } => {
            let name = start_attribute(out, &region[start..pos], line)?;
            end_attribute(out, &name, "", line)?;
            State::LookingForName
        }
        State::LookingForValue { name } => State::InValue {
            name,
            start: pos,
            quote: None,
        },
        State::LookingForEq { name } => {
            end_attribute(out, &name, "", line)?;
            State::LookingForName
        }
        State::LookingForName => State::LookingForName,
    })
}

/// Where the name that began at `start` ends, if `ch` at `pos` terminates it.
///
/// Names opened with `{` or `(` run to the matching closer; the other closer right
/// after it is swallowed too, so `{(x})` and `({x)}` stay single names. Other names
/// end at whitespace.
fn name_end(region: &str, start: usize, pos: usize, ch: char) -> Option<usize> {
    let bytes = region.as_bytes();
    let (closer, other_closer) = match bytes[start] {
        b'{' => ('}', b')'),
        b'(' => (')', b'}'),
        _ => return ch.is_whitespace().then_some(pos),
    };
    if ch != closer {
        return None;
    }
    if bytes.get(pos + 1) == Some(&other_closer) {
        Some(pos + 2)
    } else {
        Some(pos + 1)
    }
}

/// Reports the start of an attribute named `raw`, encoded.
///
/// Names are not case-folded here. Binding names escape their uppercase letters in
/// the codec, legacy `(`/`{` names are kebab-cased there, and every other name keeps
/// the case it was written in (`ID` stays `ID`).
fn start_attribute<'a, H: EventHandler + ?Sized>(
    out: &mut Dispatcher<'_, '_, H>,
    raw: &'a str,
    line: usize,
) -> Result<Cow<'a, str>, H::Error> {
    if codec::is_lossy(raw) {
        out.diagnostics().warn(
            line,
            format_args!("attribute {raw} is converted to kebab case and cannot be restored"),
        );
    }
    let name = codec::encode(raw);

    #[cfg(any(test, feature = "debug-stats"))]
    log::trace!(target: "view_parser.attributes", "attribute {raw:?} -> {name:?}");

    out.attr_start(&name, line)?;
    Ok(name)
}

fn end_attribute<H: EventHandler + ?Sized>(
    out: &mut Dispatcher<'_, '_, H>,
    name: &str,
    value: &str,
    line: usize,
) -> Result<(), H::Error> {
    if !value.is_empty() {
        out.attr_value(value, line)?;
    }
    out.attr_end(name, line)
}

/// Runs the attribute sub-parser alone over `region`, reporting to `handler`.
///
/// `region` is what follows the tag name in a start tag, for example
/// ` class="a" {{#if x}}checked{{/if}}`. No warnings are logged.
pub fn parse_attributes<H: EventHandler + ?Sized>(
    region: &str,
    handler: &mut H,
    line: usize,
) -> Result<(), H::Error> {
    let mut out = Dispatcher::new(handler, Diagnostics::disabled(), false);
    scan_attributes(region, line, &mut out)
}

/// Like [`parse_attributes`], with warnings controlled by `config`.
pub fn parse_attributes_with_config<H: EventHandler + ?Sized>(
    region: &str,
    handler: &mut H,
    line: usize,
    config: &ParserConfig,
) -> Result<(), H::Error> {
    let mut out = Dispatcher::new(handler, Diagnostics::new(config), false);
    scan_attributes(region, line, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerResult, Record};
    use std::convert::Infallible;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl EventHandler for Calls {
        type Error = Infallible;

        fn attr_start(&mut self, name: &str, _line: Option<usize>) -> HandlerResult<Infallible> {
            self.0.push(format!("start {name}"));
            Ok(Record::Keep)
        }

        fn attr_value(&mut self, value: &str, _line: Option<usize>) -> HandlerResult<Infallible> {
            self.0.push(format!("value {value}"));
            Ok(Record::Keep)
        }

        fn attr_end(&mut self, name: &str, _line: Option<usize>) -> HandlerResult<Infallible> {
            self.0.push(format!("end {name}"));
            Ok(Record::Keep)
        }

        fn special(&mut self, body: &str, _line: Option<usize>) -> HandlerResult<Infallible> {
            self.0.push(format!("special {body}"));
            Ok(Record::Keep)
        }
    }

    fn calls(region: &str) -> Vec<String> {
        let mut calls = Calls::default();
        let Ok(()) = parse_attributes(region, &mut calls, 1);
        calls.0
    }

    #[test]
    fn quoted_and_unquoted_values() {
        assert_eq!(
            calls(" class=\"a b\" id=main title='x'"),
            [
                "start class",
                "value a b",
                "end class",
                "start id",
                "value main",
                "end id",
                "start title",
                "value x",
                "end title",
            ]
        );
    }

    #[test]
    fn bare_attributes() {
        assert_eq!(
            calls(" disabled checked"),
            ["start disabled", "end disabled", "start checked", "end checked"]
        );
        assert_eq!(
            calls(" disabled class=\"x\""),
            ["start disabled", "end disabled", "start class", "value x", "end class"]
        );
    }

    #[test]
    fn spaces_around_equals() {
        assert_eq!(calls(" a = \"1\""), ["start a", "value 1", "end a"]);
    }

    #[test]
    fn empty_and_missing_values() {
        assert_eq!(calls(" a=\"\""), ["start a", "end a"]);
        assert_eq!(calls(" a="), ["start a", "end a"]);
        assert_eq!(calls(" a= "), ["start a", "end a"]);
    }

    #[test]
    fn magic_tag_splits_value() {
        assert_eq!(
            calls(" value=\"a{{expr}}b\""),
            ["start value", "value a", "special expr", "value b", "end value"]
        );
        assert_eq!(
            calls(" value=\"{{expr}}\""),
            ["start value", "special expr", "end value"]
        );
        assert_eq!(
            calls(" href={{url}} x"),
            ["start href", "special url", "end href", "start x", "end x"]
        );
    }

    #[test]
    fn magic_tag_between_attributes() {
        assert_eq!(
            calls(" {{#if a}}checked{{/if}}"),
            [
                "special #if a",
                "start checked",
                "end checked",
                "special /if",
            ]
        );
        assert_eq!(
            calls(" bare {{x}}"),
            ["start bare", "end bare", "special x"]
        );
    }

    #[test]
    fn unterminated_magic_tag_is_plain_text() {
        assert_eq!(calls(" a=\"{{x\""), ["start a", "value {{x", "end a"]);
    }

    #[test]
    fn bracketed_binding_names() {
        assert_eq!(
            calls(" (click)=\"go()\""),
            ["start :lp:click:rp:", "value go()", "end :lp:click:rp:"]
        );
        assert_eq!(
            calls(" {(value)}=\"x\""),
            [
                "start :lb::lp:value:rp::rb:",
                "value x",
                "end :lb::lp:value:rp::rb:"
            ]
        );
        // Bracketed names may contain spaces.
        assert_eq!(calls(" {a b}=c"), ["start :lb:a:s:b:rb:", "value c", "end :lb:a:s:b:rb:"]);
    }

    #[test]
    fn mismatched_bracket_closers_are_accepted() {
        assert_eq!(
            calls(" {(x})=1"),
            ["start :lb::lp:x:rb::rp:", "value 1", "end :lb::lp:x:rb::rp:"]
        );
        assert_eq!(
            calls(" ({x)}=1"),
            ["start :lp::lb:x:rp::rb:", "value 1", "end :lp::lb:x:rp::rb:"]
        );
    }

    #[test]
    fn binding_names_are_encoded() {
        assert_eq!(
            calls(" on:fooBar=\"go\""),
            ["start on:foo:u:bar", "value go", "end on:foo:u:bar"]
        );
        assert_eq!(calls(" viewBox=\"0 0 1 1\"")[0], "start viewBox");
    }

    #[test]
    fn unclosed_quote_captures_rest_of_region() {
        assert_eq!(calls(" a=\"x y"), ["start a", "value x y", "end a"]);
    }

    #[test]
    fn attribute_names_keep_their_case() {
        assert_eq!(calls(" ID=x"), ["start ID", "value x", "end ID"]);
    }

    #[test]
    fn leading_equals_opens_an_empty_name() {
        assert_eq!(calls(" =x"), ["start ", "value x", "end "]);
    }

    #[test]
    fn handler_error_stops_attribute_scan() {
        struct FailOnValue(usize);

        impl EventHandler for FailOnValue {
            type Error = &'static str;

            fn attr_start(&mut self, _name: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
                self.0 += 1;
                Ok(Record::Keep)
            }

            fn attr_value(&mut self, _value: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
                Err("stop")
            }
        }

        let mut handler = FailOnValue(0);
        assert_eq!(parse_attributes(" a=1 b=2", &mut handler, 1), Err("stop"));
        assert_eq!(handler.0, 1);
    }
}
