//! Backslash escapes in the TEXT argument
//!
//! Shells make some characters awkward to type, so the text is unquoted the
//! way Go unquotes a literal: `\n`, `\x41`, `\101`, `\u00e9`, `\U0001F600`
//! and friends. Anything after a backslash that isn't one of these is an
//! error rather than being passed through.

use glyphline::{GlyphlineError, Result};

/// Replace every escape sequence in `text` with the character it names
pub fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let Some(kind) = chars.next() else {
            return Err(malformed("trailing backslash"));
        };
        let decoded = match kind {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => char::from(digits(&mut chars, 2, 16, "\\x")? as u8),
            'u' => scalar(digits(&mut chars, 4, 16, "\\u")?)?,
            'U' => scalar(digits(&mut chars, 8, 16, "\\U")?)?,
            '0'..='7' => {
                let rest = digits(&mut chars, 2, 8, "octal")?;
                let value = kind.to_digit(8).unwrap_or(0) * 64 + rest;
                let byte = u8::try_from(value)
                    .map_err(|_| malformed(&format!("octal escape \\{value:o} is above \\377")))?;
                char::from(byte)
            },
            other => return Err(malformed(&format!("unknown escape \\{other}"))),
        };
        out.push(decoded);
    }

    Ok(out)
}

/// Read exactly `count` digits in `radix`
fn digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32, what: &str) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| malformed(&format!("{what} escape needs {count} digits")))?;
        value = value * radix + digit;
    }
    Ok(value)
}

fn scalar(value: u32) -> Result<char> {
    char::from_u32(value).ok_or_else(|| malformed(&format!("U+{value:04X} is not a character")))
}

fn malformed(detail: &str) -> GlyphlineError {
    GlyphlineError::config(format!("Malformed escape in text: {detail}"))
}
