#![no_main]

use libfuzzer_sys::fuzz_target;
use view_parser::{Event, ParserConfig, parse_attributes_with_config, record};

fuzz_target!(|data: &[u8]| {
    let Ok(region) = std::str::from_utf8(data) else {
        return;
    };
    let config = ParserConfig::default().quiet();
    let mut sink = view_parser::NoopHandler;
    let Ok(()) = parse_attributes_with_config(region, &mut sink, 1, &config);

    // Wrapped in a tag, the same region must never unbalance attribute events.
    let markup = format!("<x {region}>");
    let Ok(stream) = record(&markup) else {
        panic!("parse failed");
    };
    let mut depth = 0usize;
    for event in stream.iter() {
        match event {
            Event::AttrStart { .. } => {
                assert_eq!(depth, 0);
                depth += 1;
            }
            Event::AttrEnd { .. } => {
                assert_eq!(depth, 1);
                depth -= 1;
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0);
});
