//! Deterministic event formatting for golden tests and diagnostics.
//!
//! One event per line, payload text escaped so every line stays single-line:
//! `START name=li unary=false`, `ATTR_VALUE value="a b"`, `CHARS text="x\n"`, `DONE`.

use crate::event::Event;
use std::fmt::Write;

/// Formats `event` without its line number.
pub fn format_event(event: &Event) -> String {
    let mut out = String::new();
    write_event(&mut out, event);
    out
}

/// Formats `event` followed by ` line=N`, or ` line=none` for stripped events.
pub fn format_event_with_line(event: &Event) -> String {
    let mut out = String::new();
    write_event(&mut out, event);
    match event.line() {
        Some(line) => {
            let _ = write!(&mut out, " line={line}");
        }
        None => out.push_str(" line=none"),
    }
    out
}

fn write_event(out: &mut String, event: &Event) {
    let _ = match event {
        Event::Start { name, unary, .. } => write!(out, "START name={name} unary={unary}"),
        Event::End { name, unary, .. } => write!(out, "END name={name} unary={unary}"),
        Event::Close { name, .. } => write!(out, "CLOSE name={name}"),
        Event::AttrStart { name, .. } => write!(out, "ATTR_START name={name}"),
        Event::AttrEnd { name, .. } => write!(out, "ATTR_END name={name}"),
        Event::AttrValue { value, .. } => {
            write!(out, "ATTR_VALUE value=\"{}\"", escape_text(value))
        }
        Event::Chars { text, .. } => write!(out, "CHARS text=\"{}\"", escape_text(text)),
        Event::Comment { body, .. } => write!(out, "COMMENT text=\"{}\"", escape_text(body)),
        Event::Special { body, .. } => write!(out, "SPECIAL body=\"{}\"", escape_text(body)),
        Event::Done { .. } => write!(out, "DONE"),
    };
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_kind_on_one_line() {
        let events = [
            Event::Start {
                name: "li".into(),
                unary: false,
                line: Some(1),
            },
            Event::AttrValue {
                value: "say \"hi\"".into(),
                line: Some(1),
            },
            Event::Chars {
                text: "a\nb\u{1}".into(),
                line: Some(2),
            },
            Event::Done { line: None },
        ];
        let lines: Vec<_> = events.iter().map(format_event_with_line).collect();
        assert_eq!(
            lines,
            [
                "START name=li unary=false line=1",
                "ATTR_VALUE value=\"say \\\"hi\\\"\" line=1",
                "CHARS text=\"a\\nb\\u{01}\" line=2",
                "DONE line=none",
            ]
        );
        assert_eq!(format_event(&events[0]), "START name=li unary=false");
    }
}
