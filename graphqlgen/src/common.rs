use std::borrow::Cow;
use std::fmt;

use combine::easy::Error;
use combine::error::StreamError;
use combine::parser::choice::{choice, optional};
use combine::parser::item::position;
use combine::parser::repeat::{many, many1};
use combine::{parser, ParseResult, Parser};
use ordered_float::NotNan;

use crate::helpers::{ident, kind, name, punct};
use crate::position::Pos;
use crate::tokenizer::{Kind as T, Token, TokenStream};

pub type Txt<'a> = &'a str;

#[derive(Debug, Clone, PartialEq)]
pub struct Directive<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub arguments: Vec<(Txt<'a>, Value<'a>)>,
}

/// An input value literal.
///
/// String payloads borrow from the source text unless escapes forced an
/// allocation. Object fields keep declaration order; key uniqueness is
/// checked when the value is coerced against a type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Variable(Txt<'a>),
    Int(i32),
    Float(NotNan<f64>),
    String(Cow<'a, str>),
    Boolean(bool),
    Null,
    Enum(Txt<'a>),
    List(Vec<Value<'a>>),
    Object(Vec<(Txt<'a>, Value<'a>)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type<'a> {
    NamedType(Txt<'a>),
    ListType(Box<Type<'a>>),
    NonNullType(Box<Type<'a>>),
}

pub fn directives<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<Directive<'a>>, TokenStream<'a>> {
    many(
        position()
            .skip(punct("@"))
            .and(name::<'a>())
            .and(parser(arguments))
            .map(|((position, name), arguments)| Directive {
                position,
                name,
                arguments,
            }),
    )
    .parse_stream(input)
}

pub fn arguments<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<(Txt<'a>, Value<'a>)>, TokenStream<'a>> {
    optional(
        punct("(")
            .with(many1(name::<'a>().skip(punct(":")).and(parser(value))))
            .skip(punct(")")),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn int_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value<'a>, TokenStream<'a>> {
    kind(T::IntValue)
        .and_then(|tok| tok.value.parse())
        .map(Value::Int)
        .parse_stream(input)
}

pub fn float_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value<'a>, TokenStream<'a>> {
    kind(T::FloatValue)
        .and_then(|tok| {
            tok.value
                .parse::<f64>()
                .map_err(Error::other)
                .and_then(|v| {
                    NotNan::new(v).map_err(|_| Error::unexpected_message("float literal is NaN"))
                })
        })
        .map(Value::Float)
        .parse_stream(input)
}

fn hex4<'a>(chars: &mut impl Iterator<Item = char>) -> Result<u32, Error<Token<'a>, Token<'a>>> {
    let mut code = 0;
    for _ in 0..4 {
        let c = chars
            .next()
            .ok_or_else(|| Error::unexpected_message("\\u must be followed by 4 hex digits"))?;
        let digit = c.to_digit(16).ok_or_else(|| {
            Error::unexpected_message(format_args!("invalid hex digit {:?} in \\u escape", c))
        })?;
        code = code * 16 + digit;
    }
    Ok(code)
}

/// Unescapes a `"…"` literal, borrowing the source slice when it contains no
/// escape sequences. `\uXXXX` escapes are decoded UTF-16 aware: surrogate
/// pairs combine into one code point, lone or invalid surrogates fail.
fn unquote_string<'a>(s: &'a str) -> Result<Cow<'a, str>, Error<Token<'a>, Token<'a>>> {
    debug_assert!(s.starts_with('"') && s.ends_with('"'));
    let inner = &s[1..s.len() - 1];
    if !inner.contains('\\') {
        return Ok(Cow::Borrowed(inner));
    }

    let mut res = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        let esc = chars
            .next()
            .ok_or_else(|| Error::unexpected_message("string cannot end with a backslash"))?;
        match esc {
            '"' | '\\' | '/' => res.push(esc),
            'b' => res.push('\u{0008}'),
            'f' => res.push('\u{000C}'),
            'n' => res.push('\n'),
            'r' => res.push('\r'),
            't' => res.push('\t'),
            'u' => {
                let code = hex4(&mut chars)?;
                match code {
                    0xD800..=0xDBFF => {
                        // high surrogate, the low half must follow immediately
                        match (chars.next(), chars.next()) {
                            (Some('\\'), Some('u')) => {
                                let low = hex4(&mut chars)?;
                                if !(0xDC00..=0xDFFF).contains(&low) {
                                    return Err(Error::unexpected_message(
                                        "unpaired surrogate in \\u escape",
                                    ));
                                }
                                let point = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                                match std::char::from_u32(point) {
                                    Some(c) => res.push(c),
                                    None => {
                                        return Err(Error::unexpected_message(
                                            "invalid \\u escape pair",
                                        ))
                                    }
                                }
                            }
                            _ => {
                                return Err(Error::unexpected_message(
                                    "unpaired surrogate in \\u escape",
                                ))
                            }
                        }
                    }
                    0xDC00..=0xDFFF => {
                        return Err(Error::unexpected_message(
                            "unpaired surrogate in \\u escape",
                        ));
                    }
                    _ => match std::char::from_u32(code) {
                        Some(c) => res.push(c),
                        None => {
                            return Err(Error::unexpected_message(format_args!(
                                "{:04X} is not a valid unicode code point",
                                code
                            )))
                        }
                    },
                }
            }
            c => {
                return Err(Error::unexpected_message(format_args!(
                    "unknown escape sequence \\{}",
                    c
                )));
            }
        }
    }
    Ok(Cow::Owned(res))
}

fn split_lines(s: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut iter = s.char_indices().peekable();
    while let Some((idx, c)) = iter.next() {
        match c {
            '\n' => {
                lines.push(&s[start..idx]);
                start = idx + 1;
            }
            '\r' => {
                lines.push(&s[start..idx]);
                if let Some(&(_, '\n')) = iter.peek() {
                    iter.next();
                    start = idx + 2;
                } else {
                    start = idx + 1;
                }
            }
            _ => {}
        }
    }
    lines.push(&s[start..]);
    lines
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

/// Unescapes a `"""…"""` literal with the June 2018 block string algorithm:
/// strip the common indentation of every line but the first, then drop
/// leading and trailing blank lines. `\"""` is the only escape.
fn unquote_block_string<'a>(src: &'a str) -> Result<Cow<'a, str>, Error<Token<'a>, Token<'a>>> {
    debug_assert!(src.starts_with("\"\"\"") && src.ends_with("\"\"\""));
    let inner = &src[3..src.len() - 3];
    if !inner.contains('\n')
        && !inner.contains('\r')
        && !inner.contains("\\\"\"\"")
        && !(is_blank(inner) && !inner.is_empty())
    {
        return Ok(Cow::Borrowed(inner));
    }

    let inner = inner.replace("\\\"\"\"", "\"\"\"");
    let lines = split_lines(&inner);
    let indent = lines[1..]
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| line.len() - line.trim_start_matches(|c| c == ' ' || c == '\t').len())
        .min()
        .unwrap_or(0);

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            kept.push(line);
        } else if line.len() > indent {
            kept.push(&line[indent..]);
        } else {
            kept.push("");
        }
    }
    let start = kept.iter().take_while(|line| is_blank(line)).count();
    let end = kept.len() - kept[start..].iter().rev().take_while(|line| is_blank(line)).count();
    Ok(Cow::Owned(kept[start..end].join("\n")))
}

pub fn string<'a>(input: &mut TokenStream<'a>) -> ParseResult<Cow<'a, str>, TokenStream<'a>> {
    choice((
        kind(T::StringValue).and_then(|tok| unquote_string(tok.value)),
        kind(T::BlockString).and_then(|tok| unquote_block_string(tok.value)),
    ))
    .parse_stream(input)
}

pub fn string_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value<'a>, TokenStream<'a>> {
    kind(T::StringValue)
        .and_then(|tok| unquote_string(tok.value))
        .map(Value::String)
        .parse_stream(input)
}

pub fn block_string_value<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Value<'a>, TokenStream<'a>> {
    kind(T::BlockString)
        .and_then(|tok| unquote_block_string(tok.value))
        .map(Value::String)
        .parse_stream(input)
}

pub fn plain_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value<'a>, TokenStream<'a>> {
    ident("true")
        .map(|_| Value::Boolean(true))
        .or(ident("false").map(|_| Value::Boolean(false)))
        .or(ident("null").map(|_| Value::Null))
        .or(name::<'a>().map(Value::Enum))
        .or(parser(int_value))
        .or(parser(float_value))
        .or(parser(string_value))
        .or(parser(block_string_value))
        .parse_stream(input)
}

pub fn value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value<'a>, TokenStream<'a>> {
    parser(plain_value)
        .or(punct("$").with(name::<'a>()).map(Value::Variable))
        .or(punct("[")
            .with(many(parser(value)))
            .skip(punct("]"))
            .map(Value::List))
        .or(punct("{")
            .with(many(name::<'a>().skip(punct(":")).and(parser(value))))
            .skip(punct("}"))
            .map(Value::Object))
        .parse_stream(input)
}

/// Like `value` but without variable references, per the `Value[Const]`
/// production used for default values.
pub fn default_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value<'a>, TokenStream<'a>> {
    parser(plain_value)
        .or(punct("[")
            .with(many(parser(default_value)))
            .skip(punct("]"))
            .map(Value::List))
        .or(punct("{")
            .with(many(
                name::<'a>().skip(punct(":")).and(parser(default_value)),
            ))
            .skip(punct("}"))
            .map(Value::Object))
        .parse_stream(input)
}

pub fn parse_type<'a>(input: &mut TokenStream<'a>) -> ParseResult<Type<'a>, TokenStream<'a>> {
    name::<'a>()
        .map(Type::NamedType)
        .or(punct("[")
            .with(parser(parse_type))
            .skip(punct("]"))
            .map(Box::new)
            .map(Type::ListType))
        .and(optional(punct("!")).map(|v| v.is_some()))
        .map(|(typ, strict)| {
            if strict {
                Type::NonNullType(Box::new(typ))
            } else {
                typ
            }
        })
        .expected("Type")
        .parse_stream(input)
}

impl<'a> fmt::Display for Type<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::NamedType(name) => write!(f, "{}", name),
            Type::ListType(inner) => write!(f, "[{}]", inner),
            Type::NonNullType(inner) => write!(f, "{}!", inner),
        }
    }
}

pub(crate) fn write_quoted(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04X}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

impl<'a> fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "${}", name),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write_quoted(v, f),
            Value::Boolean(true) => write!(f, "true"),
            Value::Boolean(false) => write!(f, "false"),
            Value::Null => write!(f, "null"),
            Value::Enum(name) => write!(f, "{}", name),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
