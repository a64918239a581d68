/*
 *
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Conversion between byte strings and C literals.

[`escape_as_c_string`] and [`escape_as_c_characters`] turn arbitrary bytes
into C string and character literals, using the shortest escape available
for each byte: a mnemonic if one exists, three octal digits otherwise.
Printable ASCII is left untouched.

[`undump`] goes the other way, and accepts a broader grammar than the one
produced by the escaping functions:

- any byte other than a backslash or a double quote stands for itself;
- `\t`, `\n`, `\r`, `\f`, `\b`, `\a`, `\v` and `\e` (escape, 0x1b);
- a backslash followed by a printable ASCII character that is not a letter
  or a digit (e.g., `\\`, `\"`, `\'`, `\?`) stands for that character;
- `\x` followed by one or two hexadecimal digits;
- a backslash followed by three octal digits (the first one at most 3), or
  by one or two octal digits; the longest match is taken.

For every byte string `b`, `undump(escape_as_c_string(b)) == b`.

*/

use thiserror::Error;

/// Errors returned by [`undump`].
///
/// The offending input is reported escaped as a C string literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UndumpError {
    /// The input is not a properly terminated double-quoted literal.
    #[error("Invalid quoting: {input}")]
    InvalidQuoting { input: String },
    /// The input contains a backslash sequence outside the grammar.
    #[error("Unexpected escape sequence {sequence} in {input}")]
    UnexpectedEscape { sequence: String, input: String },
}

/// Returns the byte denoted by a mnemonic escape, if `c` is one.
const fn mnemonic_value(c: u8) -> Option<u8> {
    match c {
        b't' => Some(b'\t'),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b'f' => Some(0x0c),
        b'b' => Some(0x08),
        b'a' => Some(0x07),
        b'v' => Some(0x0b),
        b'e' => Some(0x1b),
        _ => None,
    }
}

/// Returns the mnemonic escaping a byte, if any. There is no mnemonic for
/// escape (0x1b) in this direction, as it is not a C escape.
const fn mnemonic_of(b: u8) -> Option<u8> {
    match b {
        b'\t' => Some(b't'),
        b'\n' => Some(b'n'),
        b'\r' => Some(b'r'),
        0x0c => Some(b'f'),
        0x08 => Some(b'b'),
        0x07 => Some(b'a'),
        0x0b => Some(b'v'),
        _ => None,
    }
}

const fn is_octal(c: u8) -> bool {
    matches!(c, b'0'..=b'7')
}

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decodes a double-quoted literal.
///
/// # Examples
///
/// ```rust
/// # fn main() -> anyhow::Result<()> {
/// use mphash::escape::undump;
///
/// assert_eq!(undump(r#""\t\n\101""#)?, b"\t\nA");
/// assert_eq!(undump(r#""\x7\x7f\e""#)?, b"\x07\x7f\x1b");
/// assert!(undump("\"unterminated").is_err());
/// # Ok(())
/// # }
/// ```
pub fn undump(text: impl AsRef<[u8]>) -> Result<Vec<u8>, UndumpError> {
    let text = text.as_ref();
    let invalid_quoting = || UndumpError::InvalidQuoting {
        input: escape_as_c_string(text),
    };

    if text.len() < 2 || text[0] != b'"' || text[text.len() - 1] != b'"' {
        return Err(invalid_quoting());
    }

    let end = text.len() - 1;
    let mut result = Vec::with_capacity(end);
    let mut pos = 1;
    while pos < end {
        match text[pos] {
            b'"' => return Err(invalid_quoting()),
            b'\\' => {
                let start = pos;
                pos += 1;
                if pos >= end {
                    // The closing quote is escaped
                    return Err(invalid_quoting());
                }
                let c = text[pos];
                pos += 1;
                if let Some(b) = mnemonic_value(c) {
                    result.push(b);
                } else if c == b'x' {
                    let mut value = 0_u8;
                    let mut digits = 0;
                    while digits < 2 && pos < end {
                        match hex_value(text[pos]) {
                            Some(d) => {
                                value = (value << 4) | d;
                                digits += 1;
                                pos += 1;
                            }
                            None => break,
                        }
                    }
                    if digits == 0 {
                        return Err(UndumpError::UnexpectedEscape {
                            sequence: escape_as_c_string(&text[start..pos]),
                            input: escape_as_c_string(text),
                        });
                    }
                    result.push(value);
                } else if is_octal(c) {
                    let mut value = (c - b'0') as u32;
                    let max_digits = if c <= b'3' { 3 } else { 2 };
                    let mut digits = 1;
                    while digits < max_digits && pos < end && is_octal(text[pos]) {
                        value = (value << 3) | (text[pos] - b'0') as u32;
                        digits += 1;
                        pos += 1;
                    }
                    debug_assert!(value <= u8::MAX as u32);
                    result.push(value as u8);
                } else if (0x20..=0x7e).contains(&c) && !c.is_ascii_alphanumeric() {
                    result.push(c);
                } else {
                    return Err(UndumpError::UnexpectedEscape {
                        sequence: escape_as_c_string(&text[start..pos]),
                        input: escape_as_c_string(text),
                    });
                }
            }
            b => {
                result.push(b);
                pos += 1;
            }
        }
    }

    Ok(result)
}

fn push_octal(s: &mut String, b: u8) {
    s.push('\\');
    s.push((b'0' + (b >> 6)) as char);
    s.push((b'0' + ((b >> 3) & 7)) as char);
    s.push((b'0' + (b & 7)) as char);
}

/// Escapes bytes as a C string literal, including the surrounding double
/// quotes.
///
/// # Examples
///
/// ```rust
/// use mphash::escape::escape_as_c_string;
///
/// assert_eq!(escape_as_c_string(b"a\"b\\\n\x00\xff"), r#""a\"b\\\n\000\377""#);
/// ```
pub fn escape_as_c_string(bytes: impl AsRef<[u8]>) -> String {
    let bytes = bytes.as_ref();
    let mut s = String::with_capacity(bytes.len() + 2);
    s.push('"');
    for &b in bytes {
        match b {
            b'\\' => s.push_str("\\\\"),
            b'"' => s.push_str("\\\""),
            0x20..=0x7e => s.push(b as char),
            _ => match mnemonic_of(b) {
                Some(m) => {
                    s.push('\\');
                    s.push(m as char);
                }
                None => push_octal(&mut s, b),
            },
        }
    }
    s.push('"');
    s
}

/// Escapes each byte as a C character literal, including the surrounding
/// single quotes.
///
/// # Examples
///
/// ```rust
/// use mphash::escape::escape_as_c_characters;
///
/// assert_eq!(
///     escape_as_c_characters(b"a'\0\x01"),
///     vec!["'a'", r"'\''", r"'\0'", r"'\001'"]
/// );
/// ```
pub fn escape_as_c_characters(bytes: impl AsRef<[u8]>) -> Vec<String> {
    bytes
        .as_ref()
        .iter()
        .map(|&b| {
            let mut s = String::with_capacity(6);
            s.push('\'');
            match b {
                0 => s.push_str("\\0"),
                b'\\' => s.push_str("\\\\"),
                b'\'' => s.push_str("\\'"),
                0x20..=0x7e => s.push(b as char),
                _ => match mnemonic_of(b) {
                    Some(m) => {
                        s.push('\\');
                        s.push(m as char);
                    }
                    None => push_octal(&mut s, b),
                },
            }
            s.push('\'');
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_octal() -> anyhow::Result<()> {
        for c in 0..=255_u8 {
            for dumped in [
                format!("\"\\{:03o}\"", c),
                format!("\"\\{:02o}\"", c),
                format!("\"\\{:01o}\"", c),
            ] {
                assert_eq!(undump(&dumped)?, [c], "{}", dumped);
            }
        }
        // Octal escapes stop after three digits, or two if the first one is
        // larger than 3
        assert_eq!(undump(r#""\1234""#)?, b"\x534");
        assert_eq!(undump(r#""\477""#)?, b"\x277");
        assert_eq!(undump(r#""\08""#)?, b"\x008");
        Ok(())
    }

    #[test]
    fn test_hex() -> anyhow::Result<()> {
        for c in 0..=255_u8 {
            for dumped in [
                format!("\"\\x{:02x}\"", c),
                format!("\"\\x{:01x}\"", c),
                format!("\"\\x{:02X}\"", c),
            ] {
                assert_eq!(undump(&dumped)?, [c], "{}", dumped);
            }
        }
        assert_eq!(undump(r#""\x414""#)?, b"A4");
        assert_eq!(undump(r#""\x4g""#)?, b"\x04g");
        Ok(())
    }

    #[test]
    fn test_mnemonic() -> anyhow::Result<()> {
        assert_eq!(undump(r#""\t""#)?, b"\t");
        assert_eq!(undump(r#""\n""#)?, b"\n");
        assert_eq!(undump(r#""\r""#)?, b"\r");
        assert_eq!(undump(r#""\f""#)?, b"\x0c");
        assert_eq!(undump(r#""\b""#)?, b"\x08");
        assert_eq!(undump(r#""\a""#)?, b"\x07");
        assert_eq!(undump(r#""\v""#)?, b"\x0b");
        assert_eq!(undump(r#""\e""#)?, b"\x1b");
        assert_eq!(undump(r#""\t\n\101""#)?, [0x09, 0x0a, 0x41]);
        Ok(())
    }

    #[test]
    fn test_punctuation() -> anyhow::Result<()> {
        assert_eq!(undump(r#""\\\"\'\?\ \~""#)?, b"\\\"'? ~");
        assert_eq!(undump("\"\"")?, b"");
        assert_eq!(undump("\"caf\u{e9}\"")?, "caf\u{e9}".as_bytes());
        Ok(())
    }

    #[test]
    fn test_invalid_quoting() {
        for input in ["", "\"", "abc", "\"abc", "abc\"", "\"a\"b\"", "\"abc\\\""] {
            assert!(
                matches!(undump(input), Err(UndumpError::InvalidQuoting { .. })),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_unexpected_escape() {
        assert_eq!(
            undump(r#""a\qb""#),
            Err(UndumpError::UnexpectedEscape {
                sequence: r#""\\q""#.to_string(),
                input: r#""\"a\\qb\"""#.to_string(),
            })
        );
        for input in [r#""\x""#, r#""\xg""#, r#""\8""#, r#""\N""#, "\"\\\x01\"", "\"\\\u{e9}\""] {
            assert!(
                matches!(undump(input), Err(UndumpError::UnexpectedEscape { .. })),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_escape_as_c_string() {
        assert_eq!(escape_as_c_string(b""), "\"\"");
        assert_eq!(escape_as_c_string(b"foo bar"), "\"foo bar\"");
        assert_eq!(
            escape_as_c_string(b"\t\n\r\x0c\x08\x07\x0b"),
            r#""\t\n\r\f\b\a\v""#
        );
        assert_eq!(escape_as_c_string(b"\x1b\x1f\x7f\x80"), r#""\033\037\177\200""#);
        assert_eq!(escape_as_c_string(b"'?"), "\"'?\"");
    }

    #[test]
    fn test_escape_as_c_characters() {
        assert_eq!(escape_as_c_characters(b""), Vec::<String>::new());
        assert_eq!(
            escape_as_c_characters(b"\"\\\t\x1b\x7f~"),
            vec![r#"'"'"#, r"'\\'", r"'\t'", r"'\033'", r"'\177'", "'~'"]
        );
        let all = escape_as_c_characters((0..=255_u8).collect::<Vec<_>>());
        assert_eq!(all.len(), 256);
        assert_eq!(all[0], r"'\0'");
        assert_eq!(all[0xff], r"'\377'");
    }

    #[test]
    fn test_round_trip() -> anyhow::Result<()> {
        let all = (0..=255_u8).collect::<Vec<_>>();
        assert_eq!(undump(escape_as_c_string(&all))?, all);

        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..1000 {
            let len = rng.random_range(0..40);
            let bytes = (0..len).map(|_| rng.random::<u8>()).collect::<Vec<_>>();
            assert_eq!(undump(escape_as_c_string(&bytes))?, bytes);
        }
        Ok(())
    }
}
