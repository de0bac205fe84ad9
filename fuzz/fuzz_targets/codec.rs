#![no_main]

use libfuzzer_sys::fuzz_target;
use view_parser::codec::{decode, encode};

const SPECIALS: [char; 9] = [' ', '/', '(', ')', '{', '}', '^', '$', '@'];

fuzz_target!(|data: &[u8]| {
    let Some((&shape, rest)) = data.split_first() else {
        return;
    };
    let Ok(body) = std::str::from_utf8(rest) else {
        return;
    };
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        return;
    }

    let name = match shape % 3 {
        0 => body.to_string(),
        1 => format!("on:{body}"),
        _ => format!("{body}:to"),
    };
    let encoded = encode(&name);
    assert_eq!(decode(&encoded), name);

    let special = SPECIALS[usize::from(shape) % SPECIALS.len()];
    let spaced = format!("1{special}{body}1");
    let encoded = encode(&spaced);
    assert!(!encoded.contains(SPECIALS));
    assert_eq!(decode(&encoded), spaced);
});
