//! Speech markup.
//!
//! Handlers are free to wrap their own text in `<speak>` tags (or to embed `<audio>` and
//! other speech elements); the final message must still carry exactly one `<speak>` pair
//! around everything. [`finalize`] removes every speech tag it finds and wraps the result
//! once, so running it again changes nothing.
//!
//! For terminals, [`to_plain`] drops all markup and [`render_wrapped`] fills the text to the
//! terminal width.

use textwrap::{Options, fill};

/// Default speech tag name.
pub const SPEAK: &str = "speak";

/// Strip embedded `<tag ...>` / `</tag>` pairs and wrap the message in a single pair.
pub fn finalize(message: &str, tag: &str) -> String {
    let inner = strip_tag(message, tag);
    format!("<{tag}>{}</{tag}>", inner.trim())
}

/// Remove every opening and closing `tag` element, keeping everything else.
pub fn strip_tag(message: &str, tag: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('>') {
            Some(close) if is_tag(&after[1..close], tag) => {
                rest = &after[close + 1..];
            },
            Some(_) | None => {
                out.push('<');
                rest = &after[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

fn is_tag(element: &str, tag: &str) -> bool {
    let name = element.trim().trim_start_matches('/').trim_end_matches('/');
    let name = name.split_whitespace().next().unwrap_or_default();
    name.eq_ignore_ascii_case(tag)
}

/// The message as text: all markup elements removed and whitespace collapsed.
pub fn to_plain(message: &str) -> String {
    let mut text = String::with_capacity(message.len());
    let mut in_element = false;
    for ch in message.chars() {
        match ch {
            '<' => in_element = true,
            '>' if in_element => {
                in_element = false;
                text.push(' ');
            },
            _ if !in_element => text.push(ch),
            _ => {},
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap plain text to `width` columns.
pub fn render_wrapped(text: &str, width: usize) -> String {
    fill(text, Options::new(width.max(20)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_exactly_once() {
        assert_eq!(finalize("Hello.", SPEAK), "<speak>Hello.</speak>");
        assert_eq!(finalize("<speak>Hello.</speak>", SPEAK), "<speak>Hello.</speak>");
        assert_eq!(
            finalize("<speak>One.</speak> <speak version=\"1.0\">Two.</speak>", SPEAK),
            "<speak>One. Two.</speak>"
        );
    }

    #[test]
    fn finalize_is_idempotent() {
        for input in [
            "",
            "Plain text.",
            "<speak>Once.</speak>",
            "<speak><speak>Nested</speak></speak> and <SPEAK>loud</SPEAK>",
            "A <audio src=\"creak.mp3\"/> door.",
            "1 < 2 and <speaker>not a speak tag</speaker>",
        ] {
            let once = finalize(input, SPEAK);
            assert_eq!(finalize(&once, SPEAK), once, "input: {input}");
            assert_eq!(once.matches("<speak>").count(), 1);
            assert_eq!(once.matches("</speak>").count(), 1);
        }
    }

    #[test]
    fn other_elements_survive() {
        let out = finalize("A <audio src=\"creak.mp3\"/> door.", SPEAK);
        assert_eq!(out, "<speak>A <audio src=\"creak.mp3\"/> door.</speak>");
        assert!(finalize("<speaker>x</speaker>", SPEAK).contains("<speaker>"));
    }

    #[test]
    fn custom_tag_names() {
        assert_eq!(finalize("<say>Hi</say>", "say"), "<say>Hi</say>");
    }

    #[test]
    fn plain_text_drops_markup() {
        assert_eq!(to_plain("<speak>A <audio src=\"x.mp3\"/>door   creaks.</speak>"), "A door creaks.");
    }

    #[test]
    fn wrapping_respects_width() {
        let wrapped = render_wrapped("one two three four five six seven eight nine ten eleven", 20);
        assert!(wrapped.lines().all(|line| line.len() <= 20));
        assert!(wrapped.lines().count() > 1);
    }
}
