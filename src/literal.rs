//! Values of PHP string and integer literals.

/// Decoded value of a single- or double-quoted string literal.
///
/// `text` is the literal as written, quotes included. Returns `None` for
/// anything that is not a quoted string.
#[must_use]
pub fn string_literal_value(text: &str) -> Option<String> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Some(single_quoted(&text[1..text.len() - 1]));
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Some(double_quoted(&text[1..text.len() - 1]));
    }
    None
}

fn single_quoted(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next @ ('\\' | '\'')) = chars.peek() {
                out.push(next);
                chars.next();
                continue;
            }
        }
        out.push(ch);
    }
    out
}

fn double_quoted(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '\\' || i + 1 == chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match decode_escape(&chars, i + 1) {
            Some((decoded, next)) => {
                out.push(decoded);
                i = next;
            }
            None => {
                out.push('\\');
                i += 1;
            }
        }
    }
    out
}

/// Decode the escape whose character after `\` is at `at`.
///
/// Returns the character and the index after the escape, or `None` when
/// the backslash is literal.
pub(crate) fn decode_escape(chars: &[char], at: usize) -> Option<(char, usize)> {
    let simple = match chars.get(at)? {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        'e' => Some('\u{1B}'),
        'f' => Some('\u{0C}'),
        '\\' => Some('\\'),
        '$' => Some('$'),
        '"' => Some('"'),
        _ => None,
    };
    if let Some(ch) = simple {
        return Some((ch, at + 1));
    }
    match chars[at] {
        'x' => {
            let end = scan(chars, at + 1, 2, |c| c.is_ascii_hexdigit());
            if end == at + 1 {
                return None;
            }
            let value = digits_value(&chars[at + 1..end], 16)?;
            Some((char::from_u32(value)?, end))
        }
        'u' if chars.get(at + 1) == Some(&'{') => {
            let end = scan(chars, at + 2, usize::MAX, |c| c.is_ascii_hexdigit());
            if end == at + 2 || chars.get(end) != Some(&'}') {
                return None;
            }
            let value = digits_value(&chars[at + 2..end], 16)?;
            Some((char::from_u32(value)?, end + 1))
        }
        '0'..='7' => {
            let end = scan(chars, at, 3, |c| ('0'..='7').contains(&c));
            let value = digits_value(&chars[at..end], 8)? & 0xFF;
            Some((char::from_u32(value)?, end))
        }
        _ => None,
    }
}

fn scan(chars: &[char], from: usize, max: usize, accept: impl Fn(char) -> bool) -> usize {
    let mut end = from;
    while end < chars.len() && end - from < max && accept(chars[end]) {
        end += 1;
    }
    end
}

fn digits_value(digits: &[char], radix: u32) -> Option<u32> {
    let text: String = digits.iter().collect();
    u32::from_str_radix(&text, radix).ok()
}

/// Value of an integer literal in any base, `_` separators allowed.
///
/// `None` when the value overflows `i64`.
#[must_use]
pub fn integer_literal_value(text: &str) -> Option<i64> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    let lower = clean.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    i64::from_str_radix(digits, radix).ok()
}
