//! Cleaning of raw backend text before JSON decoding.

/// Strip Markdown code fences (with an optional language tag) and
/// surrounding whitespace.
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();
    loop {
        let next = strip_closing_fence(strip_opening_fence(text)).trim();
        if next.len() == text.len() {
            return next.to_string();
        }
        text = next;
    }
}

/// Drop a leading "```" plus any language tag on the same line.
fn strip_opening_fence(text: &str) -> &str {
    match text.strip_prefix("```") {
        Some(rest) => {
            let tag_len = rest
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '-')
                .unwrap_or(rest.len());
            &rest[tag_len..]
        }
        None => text,
    }
}

fn strip_closing_fence(text: &str) -> &str {
    text.strip_suffix("```").unwrap_or(text)
}
