//! Owned parse events, as captured in a [`TokenStream`](crate::TokenStream).

use crate::handler::{EventHandler, HandlerResult};

/// Event discriminant, one per [`EventHandler`] callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EventKind {
    Start,
    End,
    Close,
    AttrStart,
    AttrEnd,
    AttrValue,
    Chars,
    Comment,
    Special,
    Done,
}

impl EventKind {
    /// Handler slot name for this kind.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::End => "end",
            EventKind::Close => "close",
            EventKind::AttrStart => "attrStart",
            EventKind::AttrEnd => "attrEnd",
            EventKind::AttrValue => "attrValue",
            EventKind::Chars => "chars",
            EventKind::Comment => "comment",
            EventKind::Special => "special",
            EventKind::Done => "done",
        }
    }
}

/// One recorded handler call.
///
/// `line` is `None` only for events taken from a line-stripped stream.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum Event {
    Start {
        name: String,
        unary: bool,
        line: Option<usize>,
    },
    End {
        name: String,
        unary: bool,
        line: Option<usize>,
    },
    Close {
        name: String,
        line: Option<usize>,
    },
    AttrStart {
        name: String,
        line: Option<usize>,
    },
    AttrEnd {
        name: String,
        line: Option<usize>,
    },
    AttrValue {
        value: String,
        line: Option<usize>,
    },
    Chars {
        text: String,
        line: Option<usize>,
    },
    Comment {
        body: String,
        line: Option<usize>,
    },
    Special {
        body: String,
        line: Option<usize>,
    },
    Done {
        line: Option<usize>,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Start { .. } => EventKind::Start,
            Event::End { .. } => EventKind::End,
            Event::Close { .. } => EventKind::Close,
            Event::AttrStart { .. } => EventKind::AttrStart,
            Event::AttrEnd { .. } => EventKind::AttrEnd,
            Event::AttrValue { .. } => EventKind::AttrValue,
            Event::Chars { .. } => EventKind::Chars,
            Event::Comment { .. } => EventKind::Comment,
            Event::Special { .. } => EventKind::Special,
            Event::Done { .. } => EventKind::Done,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Event::Start { line, .. }
            | Event::End { line, .. }
            | Event::Close { line, .. }
            | Event::AttrStart { line, .. }
            | Event::AttrEnd { line, .. }
            | Event::AttrValue { line, .. }
            | Event::Chars { line, .. }
            | Event::Comment { line, .. }
            | Event::Special { line, .. }
            | Event::Done { line } => *line,
        }
    }

    pub(crate) fn line_mut(&mut self) -> &mut Option<usize> {
        match self {
            Event::Start { line, .. }
            | Event::End { line, .. }
            | Event::Close { line, .. }
            | Event::AttrStart { line, .. }
            | Event::AttrEnd { line, .. }
            | Event::AttrValue { line, .. }
            | Event::Chars { line, .. }
            | Event::Comment { line, .. }
            | Event::Special { line, .. }
            | Event::Done { line } => line,
        }
    }

    /// Text payload: element or attribute name, value fragment, text, or body.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Event::Start { name, .. }
            | Event::End { name, .. }
            | Event::Close { name, .. }
            | Event::AttrStart { name, .. }
            | Event::AttrEnd { name, .. } => Some(name),
            Event::AttrValue { value, .. } => Some(value),
            Event::Chars { text, .. } => Some(text),
            Event::Comment { body, .. } | Event::Special { body, .. } => Some(body),
            Event::Done { .. } => None,
        }
    }

    /// Calls the handler slot matching this event.
    pub fn dispatch<H: EventHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult<H::Error> {
        match self {
            Event::Start { name, unary, line } => handler.start(name, *unary, *line),
            Event::End { name, unary, line } => handler.end(name, *unary, *line),
            Event::Close { name, line } => handler.close(name, *line),
            Event::AttrStart { name, line } => handler.attr_start(name, *line),
            Event::AttrEnd { name, line } => handler.attr_end(name, *line),
            Event::AttrValue { value, line } => handler.attr_value(value, *line),
            Event::Chars { text, line } => handler.chars(text, *line),
            Event::Comment { body, line } => handler.comment(body, *line),
            Event::Special { body, line } => handler.special(body, *line),
            Event::Done { line } => handler.done(*line),
        }
    }
}
