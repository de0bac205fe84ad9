#![no_main]

use libfuzzer_sys::fuzz_target;
use view_parser::event_fmt::format_event_with_line;
use view_parser::{Event, Parser, ParserConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(markup) = std::str::from_utf8(data) else {
        return;
    };
    let parser = Parser::new(ParserConfig::default().quiet());
    let stream = match parser.record(markup) {
        Ok(stream) => stream,
        Err(err) => panic!("parse failed: {err}"),
    };
    assert!(matches!(stream.events().last(), Some(Event::Done { .. })));

    let mut open = Vec::new();
    for event in stream.iter() {
        match event {
            Event::Start {
                name, unary: false, ..
            } => open.push(name.as_str()),
            Event::Close { name, .. } => assert_eq!(open.pop(), Some(name.as_str())),
            _ => {}
        }
    }
    assert!(open.is_empty());

    let replayed = match parser.record(markup) {
        Ok(again) => again,
        Err(err) => panic!("second parse failed: {err}"),
    };
    let first: Vec<_> = stream.iter().map(format_event_with_line).collect();
    let second: Vec<_> = replayed.iter().map(format_event_with_line).collect();
    assert_eq!(first, second);
});
