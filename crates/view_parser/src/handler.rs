//! Event handler interface and the dispatcher that drives it.

use crate::config::Diagnostics;
use crate::event::{Event, EventKind};
use std::convert::Infallible;

/// Whether a handled event is appended to the stream of a recording parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Record {
    #[default]
    Keep,
    /// Leave this event out of the recording. Other handlers replaying the stream
    /// never see it.
    Skip,
}

pub type HandlerResult<E> = Result<Record, E>;

/// Receiver of parse events.
///
/// Every slot has a default that does nothing and keeps the event, so implementors
/// override only what they consume. Returning `Err` aborts the parse immediately;
/// no further event (not even `done`) is delivered.
///
/// `line` is 1-based. It is `None` only when replaying a line-stripped stream.
pub trait EventHandler {
    type Error;

    /// An element start tag was opened. `unary` elements get no `close`.
    fn start(&mut self, _name: &str, _unary: bool, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    /// The start tag's attribute list is finished. Emitted right after the
    /// attributes of every start tag, unary or not.
    fn end(&mut self, _name: &str, _unary: bool, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    /// An element was closed, explicitly or implicitly.
    fn close(&mut self, _name: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    /// `name` is already encoded with [`codec::encode`](crate::codec::encode).
    fn attr_start(&mut self, _name: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    fn attr_end(&mut self, _name: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    /// A fragment of the current attribute value. Values interrupted by magic tags
    /// arrive as several fragments.
    fn attr_value(&mut self, _value: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    fn chars(&mut self, _text: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    fn comment(&mut self, _body: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    /// A magic tag; `body` is everything between the delimiters, untouched.
    fn special(&mut self, _body: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }

    fn done(&mut self, _line: Option<usize>) -> HandlerResult<Self::Error> {
        Ok(Record::Keep)
    }
}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
    type Error = H::Error;

    fn start(&mut self, name: &str, unary: bool, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).start(name, unary, line)
    }

    fn end(&mut self, name: &str, unary: bool, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).end(name, unary, line)
    }

    fn close(&mut self, name: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).close(name, line)
    }

    fn attr_start(&mut self, name: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).attr_start(name, line)
    }

    fn attr_end(&mut self, name: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).attr_end(name, line)
    }

    fn attr_value(&mut self, value: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).attr_value(value, line)
    }

    fn chars(&mut self, text: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).chars(text, line)
    }

    fn comment(&mut self, body: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).comment(body, line)
    }

    fn special(&mut self, body: &str, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).special(body, line)
    }

    fn done(&mut self, line: Option<usize>) -> HandlerResult<Self::Error> {
        (**self).done(line)
    }
}

/// Handler that ignores everything and keeps every event. Useful for record-only
/// parses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl EventHandler for NoopHandler {
    type Error = Infallible;
}

/// Fans scanner output out to the handler and, for recording parses, the stream.
pub(crate) struct Dispatcher<'h, 'c, H: EventHandler + ?Sized> {
    handler: &'h mut H,
    recorded: Option<Vec<Event>>,
    events_emitted: usize,
    diagnostics: Diagnostics<'c>,
}

impl<'h, 'c, H: EventHandler + ?Sized> Dispatcher<'h, 'c, H> {
    pub(crate) fn new(handler: &'h mut H, diagnostics: Diagnostics<'c>, record: bool) -> Self {
        Self {
            handler,
            recorded: record.then(Vec::new),
            events_emitted: 0,
            diagnostics,
        }
    }

    pub(crate) fn diagnostics(&self) -> &Diagnostics<'c> {
        &self.diagnostics
    }

    pub(crate) fn events_emitted(&self) -> usize {
        self.events_emitted
    }

    pub(crate) fn into_recorded(self) -> Vec<Event> {
        self.recorded.unwrap_or_default()
    }

    pub(crate) fn start(&mut self, name: &str, unary: bool, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.start(name, unary, Some(line));
        self.finish(EventKind::Start, outcome, || Event::Start {
            name: name.to_owned(),
            unary,
            line: Some(line),
        })
    }

    pub(crate) fn end(&mut self, name: &str, unary: bool, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.end(name, unary, Some(line));
        self.finish(EventKind::End, outcome, || Event::End {
            name: name.to_owned(),
            unary,
            line: Some(line),
        })
    }

    pub(crate) fn close(&mut self, name: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.close(name, Some(line));
        self.finish(EventKind::Close, outcome, || Event::Close {
            name: name.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn attr_start(&mut self, name: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.attr_start(name, Some(line));
        self.finish(EventKind::AttrStart, outcome, || Event::AttrStart {
            name: name.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn attr_end(&mut self, name: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.attr_end(name, Some(line));
        self.finish(EventKind::AttrEnd, outcome, || Event::AttrEnd {
            name: name.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn attr_value(&mut self, value: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.attr_value(value, Some(line));
        self.finish(EventKind::AttrValue, outcome, || Event::AttrValue {
            value: value.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn chars(&mut self, text: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.chars(text, Some(line));
        self.finish(EventKind::Chars, outcome, || Event::Chars {
            text: text.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn comment(&mut self, body: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.comment(body, Some(line));
        self.finish(EventKind::Comment, outcome, || Event::Comment {
            body: body.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn special(&mut self, body: &str, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.special(body, Some(line));
        self.finish(EventKind::Special, outcome, || Event::Special {
            body: body.to_owned(),
            line: Some(line),
        })
    }

    pub(crate) fn done(&mut self, line: usize) -> Result<(), H::Error> {
        let outcome = self.handler.done(Some(line));
        self.finish(EventKind::Done, outcome, || Event::Done { line: Some(line) })
    }

    fn finish(
        &mut self,
        kind: EventKind,
        outcome: HandlerResult<H::Error>,
        event: impl FnOnce() -> Event,
    ) -> Result<(), H::Error> {
        let record = outcome?;
        self.events_emitted += 1;

        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "view_parser.scanner",
            "emit {} record={record:?}",
            kind.label()
        );
        #[cfg(not(any(test, feature = "debug-stats")))]
        let _ = kind;

        if record == Record::Keep
            && let Some(stream) = self.recorded.as_mut()
        {
            stream.push(event());
        }
        Ok(())
    }
}
