//! Recorded event sequences and replay.

use crate::event::Event;
use crate::handler::EventHandler;

/// Ordered capture of the events of one recording parse.
///
/// A stream is immutable once produced and can be replayed any number of times,
/// against any handler, including from several threads at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenStream {
    events: Vec<Event>,
}

impl TokenStream {
    pub(crate) fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Copy of this stream with every line number removed, the form in which
    /// precompiled templates are persisted.
    pub fn strip_lines(&self) -> TokenStream {
        let mut stripped = self.clone();
        for event in &mut stripped.events {
            *event.line_mut() = None;
        }
        stripped
    }

    /// Dispatches every event to `handler`, in order, exactly once each.
    ///
    /// [`Record`](crate::Record) results are ignored: the stream is already recorded.
    /// The first handler error stops the replay.
    pub fn replay<H: EventHandler + ?Sized>(&self, handler: &mut H) -> Result<&Self, H::Error> {
        for event in &self.events {
            event.dispatch(handler)?;
        }
        Ok(self)
    }
}

impl From<Vec<Event>> for TokenStream {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl<'s> IntoIterator for &'s TokenStream {
    type Item = &'s Event;
    type IntoIter = std::slice::Iter<'s, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Replays `stream` against `handler` and hands the stream back.
pub fn replay<'s, H: EventHandler + ?Sized>(
    stream: &'s TokenStream,
    handler: &mut H,
) -> Result<&'s TokenStream, H::Error> {
    stream.replay(handler)
}
