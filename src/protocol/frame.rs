//! Line Framing
//!
//! The network transport is newline-delimited: one command per line in, one
//! JSON reply per line out. This module splits complete lines off a receive
//! buffer.
//!
//! ## How the Parser Works
//!
//! [`parse_line`] looks at the buffer and returns either:
//! - `Ok(Some((line, consumed)))` - A complete line, `consumed` bytes were used
//! - `Ok(None)` - No newline yet, the line is incomplete
//! - `Err(ParseError)` - The line is not UTF-8 or is too long
//!
//! The caller appends incoming network data to its buffer, calls
//! `parse_line`, and advances the buffer by `consumed` on success.

use crate::protocol::{ParseError, ParseResult};

/// Maximum length of a single command line, terminator included.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Splits one line off the front of `buf`.
///
/// A trailing `\r` before the `\n` is stripped, so both `\n` and `\r\n`
/// terminated clients work.
pub fn parse_line(buf: &[u8]) -> ParseResult<Option<(String, usize)>> {
    let newline = match buf.iter().position(|&b| b == b'\n') {
        Some(pos) => pos,
        None if buf.len() > MAX_LINE_LENGTH => {
            return Err(ParseError::LineTooLong {
                size: buf.len(),
                max: MAX_LINE_LENGTH,
            })
        }
        None => return Ok(None),
    };

    if newline + 1 > MAX_LINE_LENGTH {
        return Err(ParseError::LineTooLong {
            size: newline + 1,
            max: MAX_LINE_LENGTH,
        });
    }

    let line = &buf[..newline];
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let line = std::str::from_utf8(line)
        .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?
        .to_string();

    Ok(Some((line, newline + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let (line, consumed) = parse_line(b"GET foo\n").unwrap().unwrap();
        assert_eq!(line, "GET foo");
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_parse_line_crlf() {
        let (line, consumed) = parse_line(b"DBSIZE\r\nGET foo\r\n").unwrap().unwrap();
        assert_eq!(line, "DBSIZE");
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_parse_line_incomplete() {
        assert_eq!(parse_line(b"GET fo"), Ok(None));
        assert_eq!(parse_line(b""), Ok(None));
    }

    #[test]
    fn test_parse_blank_line() {
        let (line, consumed) = parse_line(b"\r\n").unwrap().unwrap();
        assert_eq!(line, "");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_parse_line_invalid_utf8() {
        assert!(matches!(
            parse_line(b"GET \xff\n"),
            Err(ParseError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_parse_line_too_long() {
        let long = vec![b'a'; MAX_LINE_LENGTH + 1];
        assert!(matches!(
            parse_line(&long),
            Err(ParseError::LineTooLong { .. })
        ));

        let mut terminated = vec![b'a'; MAX_LINE_LENGTH];
        terminated.push(b'\n');
        assert!(parse_line(&terminated).is_err());
    }
}
