use std::fmt;

use combine::easy::{Error, Errors};
use combine::error::StreamError;
use combine::stream::Resetable;
use combine::{Positioned, StreamOnce};

use crate::position::Pos;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Kind {
    Punctuator,
    Name,
    IntValue,
    FloatValue,
    StringValue,
    BlockString,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'a> {
    pub kind: Kind,
    pub value: &'a str,
}

#[derive(Clone, Debug)]
pub struct TokenStream<'a> {
    buf: &'a str,
    position: Pos,
    off: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    position: Pos,
    off: usize,
}

impl<'a> StreamOnce for TokenStream<'a> {
    type Item = Token<'a>;
    type Range = Token<'a>;
    type Position = Pos;
    type Error = Errors<Token<'a>, Token<'a>, Pos>;

    fn uncons(&mut self) -> Result<Token<'a>, Error<Token<'a>, Token<'a>>> {
        let old_off = self.off;
        let old_pos = self.position;
        match self.take_token() {
            Ok(token) => {
                self.skip_whitespace();
                Ok(token)
            }
            Err(e) => {
                self.off = old_off;
                self.position = old_pos;
                Err(e)
            }
        }
    }
}

impl<'a> Positioned for TokenStream<'a> {
    fn position(&self) -> Self::Position {
        self.position
    }
}

impl<'a> Resetable for TokenStream<'a> {
    type Checkpoint = Checkpoint;
    fn checkpoint(&self) -> Self::Checkpoint {
        Checkpoint {
            position: self.position,
            off: self.off,
        }
    }
    fn reset(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.off = checkpoint.off;
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

impl<'a> TokenStream<'a> {
    pub fn new(s: &str) -> TokenStream {
        let mut me = TokenStream {
            buf: s,
            position: Pos::start(),
            off: 0,
        };
        me.skip_whitespace();
        me
    }

    /// Lexes one token starting at the current offset.
    ///
    /// Leading ignored characters have already been consumed, so
    /// `self.position` points at the first character of the token.
    fn take_token(&mut self) -> Result<Token<'a>, Error<Token<'a>, Token<'a>>> {
        use self::Kind::*;
        let tail = &self.buf[self.off..];
        let cur_char = match tail.chars().next() {
            Some(x) => x,
            None => return Err(Error::end_of_input()),
        };
        let (kind, len) = match cur_char {
            '!' | '$' | '&' | ':' | '=' | '@' | '|' | '(' | ')' | '[' | ']' | '{' | '}' => {
                (Punctuator, 1)
            }
            '.' => {
                if tail.starts_with("...") {
                    (Punctuator, 3)
                } else {
                    return Err(Error::unexpected_message(
                        "bare dot is not a token, expected `...`",
                    ));
                }
            }
            c if is_name_start(c) => {
                let len = tail.find(|c| !is_name_continue(c)).unwrap_or_else(|| tail.len());
                (Name, len)
            }
            '-' | '0'..='9' => take_number(tail)?,
            '"' => {
                if tail.starts_with("\"\"\"") {
                    (BlockString, block_string_len(tail)?)
                } else {
                    (StringValue, string_len(tail)?)
                }
            }
            c => {
                return Err(Error::unexpected_message(format_args!(
                    "unexpected character {:?}",
                    c
                )));
            }
        };
        let value = &self.buf[self.off..self.off + len];
        self.update_position(len);
        Ok(Token { kind, value })
    }

    fn skip_whitespace(&mut self) {
        let num = {
            let mut iter = self.buf[self.off..].char_indices();
            loop {
                let (idx, cur_char) = match iter.next() {
                    Some(pair) => pair,
                    None => break self.buf.len() - self.off,
                };
                match cur_char {
                    '\u{feff}' | '\t' | ' ' |
                    '\r' | '\n' |
                    // comma is also entirely ignored in spec
                    ',' => continue,
                    //comment
                    '#' => {
                        while let Some((_, cur_char)) = iter.next() {
                            if cur_char == '\r' || cur_char == '\n' {
                                break;
                            }
                        }
                        continue;
                    }
                    _ => break idx,
                }
            }
        };
        if num > 0 {
            self.update_position(num);
        }
    }

    fn update_position(&mut self, len: usize) {
        let val = &self.buf[self.off..][..len];
        self.off += len;
        let lines = val.as_bytes().iter().filter(|&&x| x == b'\n').count();
        self.position.line += lines;
        if lines > 0 {
            let line_offset = val.rfind('\n').unwrap() + 1;
            let num = val[line_offset..].chars().count();
            self.position.column = num + 1;
        } else {
            let num = val.chars().count();
            self.position.column += num;
        }
        self.position.offset = self.off;
    }
}

/// IntValue / FloatValue per the GraphQL lexical grammar. `tail` starts with
/// `-` or a digit. Returns the token kind and length.
fn take_number<'a>(tail: &str) -> Result<(Kind, usize), Error<Token<'a>, Token<'a>>> {
    let mut chars = tail.char_indices().peekable();
    let mut kind = Kind::IntValue;

    if let Some(&(_, '-')) = chars.peek() {
        chars.next();
    }
    match chars.next() {
        Some((_, '0')) => {
            if let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() {
                    return Err(Error::unexpected_message(
                        "numbers may not start with a leading zero",
                    ));
                }
            }
        }
        Some((_, c)) if c.is_ascii_digit() => {
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() {
                    chars.next();
                } else {
                    break;
                }
            }
        }
        _ => {
            return Err(Error::unexpected_message(
                "minus sign must be followed by a digit",
            ));
        }
    }

    if let Some(&(_, '.')) = chars.peek() {
        chars.next();
        kind = Kind::FloatValue;
        match chars.next() {
            Some((_, c)) if c.is_ascii_digit() => {}
            _ => {
                return Err(Error::unexpected_message(
                    "decimal point must be followed by a digit",
                ));
            }
        }
        while let Some(&(_, c)) = chars.peek() {
            if c.is_ascii_digit() {
                chars.next();
            } else {
                break;
            }
        }
    }

    if let Some(&(_, c)) = chars.peek() {
        if c == 'e' || c == 'E' {
            chars.next();
            kind = Kind::FloatValue;
            if let Some(&(_, sign)) = chars.peek() {
                if sign == '+' || sign == '-' {
                    chars.next();
                }
            }
            match chars.next() {
                Some((_, c)) if c.is_ascii_digit() => {}
                _ => {
                    return Err(Error::unexpected_message(
                        "exponent must be followed by a digit",
                    ));
                }
            }
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() {
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }

    let end = match chars.peek() {
        Some(&(idx, _)) => idx,
        None => tail.len(),
    };
    // a number must not run directly into a name or another number
    if let Some(c) = tail[end..].chars().next() {
        if is_name_continue(c) || c == '.' {
            return Err(Error::unexpected_message(format_args!(
                "number must not be followed by {:?}",
                c
            )));
        }
    }
    Ok((kind, end))
}

/// Length of a `"…"` literal including both quotes. `tail` starts with the
/// opening quote. Escape validity is checked later, during unescaping.
fn string_len<'a>(tail: &str) -> Result<usize, Error<Token<'a>, Token<'a>>> {
    let mut chars = tail.char_indices().skip(1);
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok(idx + 1),
            '\\' => {
                chars.next();
            }
            '\n' | '\r' => break,
            _ => {}
        }
    }
    Err(Error::unexpected_message("unterminated string value"))
}

/// Length of a `"""…"""` literal including the quotes. `tail` starts with
/// the opening triple quote. `\"""` is the only escape.
fn block_string_len<'a>(tail: &str) -> Result<usize, Error<Token<'a>, Token<'a>>> {
    let rest = &tail[3..];
    let mut idx = 0;
    while idx < rest.len() {
        if rest[idx..].starts_with("\\\"\"\"") {
            idx += 4;
        } else if rest[idx..].starts_with("\"\"\"") {
            return Ok(3 + idx + 3);
        } else {
            idx += rest[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }
    Err(Error::unexpected_message("unterminated block string value"))
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{:?}]", self.value, self.kind)
    }
}
