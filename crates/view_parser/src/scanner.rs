//! Markup scanner.
//!
//! Single left-to-right pass over the markup. Each iteration classifies the next
//! unit, in this order: comment, end tag, start tag, magic tag, plain text. Plain
//! text is buffered and flushed as one `chars` event before the next non-text unit.
//! While a raw-text element (`script`) is open, its content up to the matching end
//! tag is reported verbatim instead.
//!
//! Invariants:
//! - Progress: every iteration consumes at least one character. An iteration that
//!   does not is reported as [`ParseError::StalledScan`] rather than looping.
//! - Linear time: failed comment, tag, and magic-tag matches never rescan to the end
//!   of the input. Each is gated on the last position where its closing delimiter
//!   occurs. Start tags whose `>` hides in attribute values are resolved by a
//!   [`TagLocator`] that remembers which attribute chains run off the end, and
//!   literal magic tags share one forward search for `!}}`.
//! - Balance: at `done`, every element that was opened has been closed.

use crate::attributes::scan_attributes;
use crate::config::{Diagnostics, ParserConfig};
use crate::elements::{closes_self, is_raw_text_element, is_void_element, normalize_tag_name};
use crate::error::ParseError;
use crate::event::Event;
use crate::handler::{Dispatcher, EventHandler, NoopHandler};
use crate::locator::{
    StartTag, TagLocator, find_raw_text_end, match_end_tag, strip_raw_text_wrappers,
};
use crate::lookahead::NextMatch;
use crate::magic::{self, MAGIC_OPEN, find_text_break, match_magic_tag_at};
use crate::stack::OpenElementStack;
use crate::stream::TokenStream;
use memchr::{memchr_iter, memmem, memrchr};
use std::convert::Infallible;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Minimal scanner instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Classification passes over the remaining input.
    pub iterations: u64,
    /// Events the handler accepted, recorded or not.
    pub events_emitted: u64,
    pub max_stack_depth: usize,
    /// Plain-text passes that had to consume a lone `<` or `{{` that started no unit.
    pub forced_text_advances: u64,
    /// Attribute matches the start-tag locator stepped over while looking for where
    /// tags end.
    pub tag_chain_steps: u64,
}

/// Template markup parser.
///
/// A `Parser` holds configuration only; every call to [`Parser::parse`] runs to
/// completion with its own state, so one parser can serve many threads.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `markup`, reporting every event to `handler`.
    pub fn parse<H: EventHandler + ?Sized>(
        &self,
        markup: &str,
        handler: &mut H,
    ) -> Result<(), ParseError<H::Error>> {
        self.run(markup, handler, false).map(|_| ())
    }

    /// Parses `markup` like [`Parser::parse`] and also returns the events the handler
    /// did not veto with [`Record::Skip`](crate::Record::Skip).
    pub fn parse_recorded<H: EventHandler + ?Sized>(
        &self,
        markup: &str,
        handler: &mut H,
    ) -> Result<TokenStream, ParseError<H::Error>> {
        let (events, _) = self.run(markup, handler, true)?;
        Ok(TokenStream::new(events))
    }

    /// Records `markup` without a handler of its own.
    pub fn record(&self, markup: &str) -> Result<TokenStream, ParseError<Infallible>> {
        self.parse_recorded(markup, &mut NoopHandler)
    }

    /// Parses like [`Parser::parse`] and returns scanner counters.
    pub fn parse_with_stats<H: EventHandler + ?Sized>(
        &self,
        markup: &str,
        handler: &mut H,
    ) -> Result<ParseStats, ParseError<H::Error>> {
        self.run(markup, handler, false).map(|(_, stats)| stats)
    }

    fn run<H: EventHandler + ?Sized>(
        &self,
        markup: &str,
        handler: &mut H,
        record: bool,
    ) -> Result<(Vec<Event>, ParseStats), ParseError<H::Error>> {
        let mut out = Dispatcher::new(handler, Diagnostics::new(&self.config), record);
        let mut scanner = Scanner::new(markup);
        scanner.run(&mut out)?;
        let stats = ParseStats {
            events_emitted: out.events_emitted() as u64,
            max_stack_depth: scanner.stack.max_depth(),
            tag_chain_steps: scanner.locator.steps(),
            ..scanner.stats
        };
        Ok((out.into_recorded(), stats))
    }
}

/// Last offsets at which each closing delimiter starts. A match attempt at `pos` whose
/// delimiter only occurs before `pos` cannot succeed and is skipped.
#[derive(Clone, Copy, Debug)]
struct Horizon {
    last_gt: Option<usize>,
    last_comment_close: Option<usize>,
    last_magic_close: Option<usize>,
}

impl Horizon {
    fn new(input: &str) -> Self {
        Self {
            last_gt: memrchr(b'>', input.as_bytes()),
            last_comment_close: memmem::rfind(input.as_bytes(), COMMENT_CLOSE.as_bytes()),
            last_magic_close: magic::last_close(input),
        }
    }

    fn tag_possible(&self, pos: usize) -> bool {
        self.last_gt.is_some_and(|gt| gt > pos)
    }

    fn comment_possible(&self, pos: usize) -> bool {
        self.last_comment_close
            .is_some_and(|close| close >= pos + COMMENT_OPEN.len())
    }

    fn magic_possible(&self, pos: usize) -> bool {
        self.last_magic_close
            .is_some_and(|close| close >= pos + MAGIC_OPEN.len())
    }
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    stack: OpenElementStack<'a>,
    /// Start offset and line of buffered plain text.
    pending_text: Option<(usize, usize)>,
    /// Set by `<html>` and `</body>`; drops buffered plain text for the rest of the
    /// parse.
    suppress_text: bool,
    horizon: Horizon,
    locator: TagLocator<'a>,
    literal_close: NextMatch,
    stats: ParseStats,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            stack: OpenElementStack::default(),
            pending_text: None,
            suppress_text: false,
            horizon: Horizon::new(input),
            locator: TagLocator::new(input),
            literal_close: NextMatch::default(),
            stats: ParseStats::default(),
        }
    }

    fn run<H: EventHandler + ?Sized>(
        &mut self,
        out: &mut Dispatcher<'_, '_, H>,
    ) -> Result<(), ParseError<H::Error>> {
        while self.pos < self.input.len() {
            self.stats.iterations += 1;
            let before = self.pos;

            if self.stack.current().is_some_and(is_raw_text_element) {
                self.raw_text(out)?;
            } else {
                self.step(out)?;
            }

            if self.pos == before {
                return Err(ParseError::stalled(self.line, &self.input[self.pos..]));
            }
        }

        self.flush_text(out)?;
        let line = self.line;
        for name in self.stack.pop_all() {
            out.diagnostics()
                .warn(line, format_args!("expected closing tag </{name}>"));
            out.close(&name, line)?;
        }
        out.done(line)?;
        Ok(())
    }

    fn step<H: EventHandler + ?Sized>(
        &mut self,
        out: &mut Dispatcher<'_, '_, H>,
    ) -> Result<(), H::Error> {
        let input = self.input;
        let rest = &input[self.pos..];

        if rest.starts_with('<') {
            if rest.starts_with(COMMENT_OPEN) {
                if self.horizon.comment_possible(self.pos)
                    && let Some(end) = memmem::find(
                        &rest.as_bytes()[COMMENT_OPEN.len()..],
                        COMMENT_CLOSE.as_bytes(),
                    )
                {
                    self.flush_text(out)?;
                    let body = &rest[COMMENT_OPEN.len()..COMMENT_OPEN.len() + end];
                    self.trace_unit("comment");
                    out.comment(body, self.line)?;
                    self.advance(COMMENT_OPEN.len() + end + COMMENT_CLOSE.len());
                    return Ok(());
                }
            } else if self.horizon.tag_possible(self.pos) {
                if let Some(tag) = match_end_tag(rest) {
                    self.flush_text(out)?;
                    self.trace_unit("end tag");
                    let line = self.line;
                    self.advance(tag.len);
                    return self.close_element(tag.name, line, out);
                }
                if let Some(tag) = self.locator.locate(self.pos) {
                    self.flush_text(out)?;
                    self.trace_unit("start tag");
                    return self.open_element(tag, out);
                }
            }
        } else if rest.starts_with(MAGIC_OPEN)
            && self.horizon.magic_possible(self.pos)
            && let Some(tag) =
                match_magic_tag_at(input, self.pos, &mut self.literal_close)
        {
            self.flush_text(out)?;
            self.trace_unit("magic tag");
            out.special(tag.body, self.line)?;
            self.advance(tag.len);
            return Ok(());
        }

        self.consume_text(rest);
        Ok(())
    }

    fn consume_text(&mut self, rest: &str) {
        let len = match find_text_break(rest) {
            Some(0) => {
                // A `<` or `{{` that started nothing is ordinary text.
                self.stats.forced_text_advances += 1;
                rest.chars().next().map_or(1, char::len_utf8)
            }
            Some(len) => len,
            None => rest.len(),
        };
        if self.pending_text.is_none() {
            self.pending_text = Some((self.pos, self.line));
        }
        self.advance(len);
    }

    fn flush_text<H: EventHandler + ?Sized>(
        &mut self,
        out: &mut Dispatcher<'_, '_, H>,
    ) -> Result<(), H::Error> {
        let Some((start, line)) = self.pending_text.take() else {
            return Ok(());
        };
        if self.suppress_text {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "view_parser.scanner",
                "dropping {} bytes of text after html/body",
                self.pos - start
            );
            return Ok(());
        }
        out.chars(&self.input[start..self.pos], line)
    }

    fn open_element<H: EventHandler + ?Sized>(
        &mut self,
        tag: StartTag<'a>,
        out: &mut Dispatcher<'_, '_, H>,
    ) -> Result<(), H::Error> {
        let line = self.line;
        let name = normalize_tag_name(tag.name);

        if closes_self(&name) && self.stack.current() == Some(name.as_ref()) {
            let top = self.stack.len() - 1;
            for open in self.stack.pop_down_to(top) {
                out.close(&open, line)?;
            }
        }

        let unary = is_void_element(&name) || tag.unary;
        out.start(&name, unary, line)?;
        scan_attributes(tag.attributes, line, out)?;
        out.end(&name, unary, line)?;

        if name == "html" {
            self.suppress_text = true;
        }
        if !unary {
            self.stack.push(name);
        }
        self.advance(tag.text.len());
        Ok(())
    }

    /// Closes the innermost open element named `raw` and everything opened inside it.
    /// Unmatched end tags are ignored.
    fn close_element<H: EventHandler + ?Sized>(
        &mut self,
        raw: &str,
        line: usize,
        out: &mut Dispatcher<'_, '_, H>,
    ) -> Result<(), H::Error> {
        let name = normalize_tag_name(raw);
        match self.stack.position(&name) {
            Some(index) => {
                if let Some(top) = self.stack.current()
                    && index + 1 < self.stack.len()
                {
                    out.diagnostics().warn(
                        line,
                        format_args!("unexpected closing tag </{name}>, expected </{top}>"),
                    );
                }
                for open in self.stack.pop_down_to(index) {
                    out.close(&open, line)?;
                }
            }
            None => out
                .diagnostics()
                .warn(line, format_args!("unexpected closing tag </{name}>")),
        }
        if name == "body" {
            self.suppress_text = true;
        }
        Ok(())
    }

    /// Reports the content of the open raw-text element and closes it. Without a
    /// matching end tag the element runs to the end of the input.
    fn raw_text<H: EventHandler + ?Sized>(
        &mut self,
        out: &mut Dispatcher<'_, '_, H>,
    ) -> Result<(), H::Error> {
        self.flush_text(out)?;
        let input = self.input;
        let rest = &input[self.pos..];
        let bounds = self
            .stack
            .current()
            .and_then(|name| find_raw_text_end(rest, name));
        let (content_end, tag_end) = match bounds {
            Some(bounds) => bounds,
            None => {
                if let Some(name) = self.stack.current() {
                    out.diagnostics()
                        .warn(self.line, format_args!("expected closing tag </{name}>"));
                }
                (rest.len(), rest.len())
            }
        };
        self.trace_unit("raw text");

        let text = strip_raw_text_wrappers(&rest[..content_end]);
        if !text.is_empty() {
            out.chars(&text, self.line)?;
        }
        self.advance(content_end);

        let line = self.line;
        self.advance(tag_end - content_end);
        let top = self.stack.len() - 1;
        for open in self.stack.pop_down_to(top) {
            out.close(&open, line)?;
        }
        Ok(())
    }

    fn advance(&mut self, len: usize) {
        let end = self.pos + len;
        debug_assert!(self.input.is_char_boundary(end));
        self.line += memchr_iter(b'\n', &self.input.as_bytes()[self.pos..end]).count();
        self.pos = end;
    }

    #[inline]
    fn trace_unit(&self, _unit: &str) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "view_parser.scanner",
            "{_unit} at byte {} line {} depth {}",
            self.pos,
            self.line,
            self.stack.len()
        );
    }
}

/// Parses `markup` with the default configuration.
pub fn parse<H: EventHandler + ?Sized>(
    markup: &str,
    handler: &mut H,
) -> Result<(), ParseError<H::Error>> {
    Parser::default().parse(markup, handler)
}

/// Parses `markup` with the default configuration and records the events.
pub fn parse_recorded<H: EventHandler + ?Sized>(
    markup: &str,
    handler: &mut H,
) -> Result<TokenStream, ParseError<H::Error>> {
    Parser::default().parse_recorded(markup, handler)
}

/// Records `markup` with the default configuration.
pub fn record(markup: &str) -> Result<TokenStream, ParseError<Infallible>> {
    Parser::default().record(markup)
}
