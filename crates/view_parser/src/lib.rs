//! Streaming parser for HTML-like markup with embedded `{{ ... }}` template
//! expressions ("magic tags").
//!
//! The parser makes one left-to-right pass over the markup and reports what it finds
//! to an [`EventHandler`]: element starts and closes, attributes, text, comments,
//! and magic tags. It never builds a tree. A parse can also be recorded into a
//! [`TokenStream`] and replayed later without rescanning the text.
//!
//! ```
//! use view_parser::{EventHandler, HandlerResult, Record};
//!
//! #[derive(Default)]
//! struct Specials(Vec<String>);
//!
//! impl EventHandler for Specials {
//!     type Error = std::convert::Infallible;
//!
//!     fn special(&mut self, body: &str, _line: Option<usize>) -> HandlerResult<Self::Error> {
//!         self.0.push(body.to_string());
//!         Ok(Record::Keep)
//!     }
//! }
//!
//! let mut specials = Specials::default();
//! view_parser::parse("<p title=\"{{title}}\">{{#each items}}x{{/each}}</p>", &mut specials)
//!     .unwrap();
//! assert_eq!(specials.0, ["title", "#each items", "/each"]);
//! ```

pub mod attributes;
pub mod codec;
pub mod elements;
pub mod event_fmt;
pub mod locator;
pub mod magic;

mod config;
mod error;
mod event;
mod handler;
mod lookahead;
mod scanner;
mod stack;
mod stream;

pub use attributes::{parse_attributes, parse_attributes_with_config};
pub use config::ParserConfig;
pub use error::{ParseError, STALL_PREVIEW_CHARS};
pub use event::{Event, EventKind};
pub use handler::{EventHandler, HandlerResult, NoopHandler, Record};
pub use scanner::{ParseStats, Parser, parse, parse_recorded, record};
pub use stream::{TokenStream, replay};
