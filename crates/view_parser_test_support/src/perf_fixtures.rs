pub const BLOCK_TEMPLATE: &str =
    "<div class=\"box {{kind}}\"><span>hello {{name}}</span><img src=\"{{src}}\" alt=x></div>\n";

pub fn make_blocks(blocks: usize) -> String {
    let mut markup = String::with_capacity(BLOCK_TEMPLATE.len() * blocks);
    for _ in 0..blocks {
        markup.push_str(BLOCK_TEMPLATE);
    }
    markup
}

/// A script body stuffed with near-miss end tags.
pub fn make_raw_text_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri");
        body.push('<');
        body.push_str("pt");
    }
    body.push_str("</script>");
    body
}

/// Openers that never complete: lone `<a`, `{{`, and `<!--` with no closer anywhere.
pub fn make_unclosed_openers(repeats: usize) -> String {
    let mut markup = String::with_capacity(repeats * 24);
    for _ in 0..repeats {
        markup.push_str("<a title=\"{{ x <!-- ");
    }
    markup
}

/// Start tags whose first `>` sits inside a quoted value whose closing quote belongs to
/// the next tag, ending in a value that never closes.
pub fn make_quoted_gt_chain(repeats: usize) -> String {
    format!("<a y='>{} x'", " x' <a y='>".repeat(repeats))
}

/// Literal magic tags with no `!}}` anywhere, so each one falls back to the plain close.
pub fn make_unclosed_literals(repeats: usize) -> String {
    "{{!a}} ".repeat(repeats)
}
