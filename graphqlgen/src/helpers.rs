//! Terminal parsers over the token stream.
//!
//! The grammars only ever need two shapes of terminal: a token satisfying a
//! rule (punctuation, keywords, literal kinds) and a name yielding its text.
//! Both report their expectation through `add_error`, so a failure names
//! what the production wanted rather than what the lexer saw.

use std::marker::PhantomData;

use combine::error::Tracked;
use combine::stream::easy::{Error, Info};
use combine::{satisfy, ConsumedResult, Parser, StreamOnce};

use crate::common::Txt;
use crate::tokenizer::{Kind, Token, TokenStream};

/// What a [`Match`] accepts.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Any token of the kind.
    OfKind(Kind),
    /// A token with this exact spelling: punctuation or a keyword.
    Spelled(Kind, &'static str),
}

impl Rule {
    fn accepts(self, token: Token<'_>) -> bool {
        match self {
            Rule::OfKind(kind) => token.kind == kind,
            Rule::Spelled(kind, value) => token.kind == kind && token.value == value,
        }
    }
}

/// The single token matcher behind every terminal except names.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    rule: Rule,
    phantom: PhantomData<&'a u8>,
}

fn matching<'x>(rule: Rule) -> Match<'x> {
    Match {
        rule,
        phantom: PhantomData,
    }
}

pub fn kind<'x>(kind: Kind) -> Match<'x> {
    matching(Rule::OfKind(kind))
}

pub fn punct<'s>(value: &'static str) -> Match<'s> {
    matching(Rule::Spelled(Kind::Punctuator, value))
}

pub fn ident<'s>(value: &'static str) -> Match<'s> {
    matching(Rule::Spelled(Kind::Name, value))
}

impl<'a> Parser for Match<'a> {
    type Input = TokenStream<'a>;
    type Output = Token<'a>;
    type PartialState = ();

    #[inline]
    fn parse_lazy(&mut self, input: &mut Self::Input) -> ConsumedResult<Self::Output, Self::Input> {
        let rule = self.rule;
        satisfy(move |token: Token<'a>| rule.accepts(token)).parse_lazy(input)
    }

    fn add_error(&mut self, errors: &mut Tracked<<Self::Input as StreamOnce>::Error>) {
        let info = match self.rule {
            Rule::OfKind(kind) => Info::Owned(format!("{:?}", kind)),
            Rule::Spelled(_, value) => Info::Borrowed(value),
        };
        errors.error.add_error(Error::Expected(info));
    }
}

/// Yields a name's text. `except` carves out a keyword that is not legal in
/// the position, like `on` where a fragment name is expected.
#[derive(Debug, Clone)]
pub struct NameParser<'a> {
    except: Option<&'static str>,
    label: &'static str,
    phantom: PhantomData<&'a u8>,
}

pub fn name<'a>() -> NameParser<'a> {
    NameParser {
        except: None,
        label: "Name",
        phantom: PhantomData,
    }
}

/// A name usable as a fragment name, i.e. anything but `on`.
pub fn fragment_name<'a>() -> NameParser<'a> {
    NameParser {
        except: Some("on"),
        label: "FragmentName",
        phantom: PhantomData,
    }
}

impl<'a> Parser for NameParser<'a> {
    type Input = TokenStream<'a>;
    type Output = Txt<'a>;
    type PartialState = ();

    #[inline]
    fn parse_lazy(&mut self, input: &mut Self::Input) -> ConsumedResult<Self::Output, Self::Input> {
        let except = self.except;
        satisfy(move |token: Token<'a>| token.kind == Kind::Name && Some(token.value) != except)
            .map(|token: Token<'a>| token.value)
            .parse_lazy(input)
    }

    fn add_error(&mut self, errors: &mut Tracked<<Self::Input as StreamOnce>::Error>) {
        errors
            .error
            .add_error(Error::Expected(Info::Borrowed(self.label)));
    }
}
