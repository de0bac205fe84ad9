use std::convert::Infallible;
use view_parser::event_fmt::{format_event, format_event_with_line};
use view_parser::{Event, EventHandler, EventKind, HandlerResult, Record};

/// Handler that keeps every event it receives, in order.
///
/// Kinds listed with [`RecordingHandler::skipping`] are still kept here but are
/// answered with [`Record::Skip`], so a recording parse leaves them out of its
/// stream.
#[derive(Clone, Debug, Default)]
pub struct RecordingHandler {
    events: Vec<Event>,
    skip: Vec<EventKind>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipping(kinds: &[EventKind]) -> Self {
        Self {
            events: Vec::new(),
            skip: kinds.to_vec(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Snapshot lines without line numbers.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(format_event).collect()
    }

    pub fn lines_with_numbers(&self) -> Vec<String> {
        self.events.iter().map(format_event_with_line).collect()
    }

    fn observe(&mut self, event: Event) -> HandlerResult<Infallible> {
        let record = if self.skip.contains(&event.kind()) {
            Record::Skip
        } else {
            Record::Keep
        };
        self.events.push(event);
        Ok(record)
    }
}

impl EventHandler for RecordingHandler {
    type Error = Infallible;

    fn start(&mut self, name: &str, unary: bool, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::Start {
            name: name.to_string(),
            unary,
            line,
        })
    }

    fn end(&mut self, name: &str, unary: bool, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::End {
            name: name.to_string(),
            unary,
            line,
        })
    }

    fn close(&mut self, name: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::Close {
            name: name.to_string(),
            line,
        })
    }

    fn attr_start(&mut self, name: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::AttrStart {
            name: name.to_string(),
            line,
        })
    }

    fn attr_end(&mut self, name: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::AttrEnd {
            name: name.to_string(),
            line,
        })
    }

    fn attr_value(&mut self, value: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::AttrValue {
            value: value.to_string(),
            line,
        })
    }

    fn chars(&mut self, text: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::Chars {
            text: text.to_string(),
            line,
        })
    }

    fn comment(&mut self, body: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::Comment {
            body: body.to_string(),
            line,
        })
    }

    fn special(&mut self, body: &str, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::Special {
            body: body.to_string(),
            line,
        })
    }

    fn done(&mut self, line: Option<usize>) -> HandlerResult<Infallible> {
        self.observe(Event::Done { line })
    }
}
