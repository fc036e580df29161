/// Plain-text rendering of the small markup fragments the server puts in board cells
/// (numeric entities like `&#x2b1c;`, the odd named entity, occasional tags).

/// Decode entities and drop tags, leaving the text a browser would show.
pub fn to_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(pos) = rest.find(|c: char| c == '&' || c == '<') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                // Unterminated tag: a browser would swallow it, so do we
                None => rest = "",
            }
            continue;
        }

        match decode_entity(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the entity at the start of `input`, returning the character and the bytes consumed.
fn decode_entity(input: &str) -> Option<(char, usize)> {
    let end = input.find(';')?;
    // Entities are short; a far-away semicolon belongs to something else
    if end > 10 {
        return None;
    }
    let body = &input[1..end];

    let ch = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        char::from_u32(u32::from_str_radix(hex, 16).ok()?)?
    } else if let Some(dec) = body.strip_prefix('#') {
        char::from_u32(dec.parse().ok()?)?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            _ => return None,
        }
    };

    Some((ch, end + 1))
}
