//! Tokenizer built from nom combinators.
//!
//! Scans a query string into an ordered list of token strings. The scan is
//! total: characters that start no token are dropped, and a string literal
//! missing its closing quote runs to the end of the input.
//!
//! ```text
//! select name FROM users where age >= 18 AND tag = 'x;
//! => SELECT | name | FROM | users | WHERE | age | >= | 18 | AND | tag | = | 'x;
//! ```

use nom::{
    branch::alt,
    bytes::complete::{take, take_while, take_while1},
    character::complete::{char, digit1, satisfy},
    combinator::{map, opt, recognize, verify},
    sequence::{pair, tuple},
    IResult,
};
use tracing::trace;

use crate::grammar;

/// Tokenize a query string.
///
/// Keywords come back upper-cased; identifiers, numbers, symbols and
/// string literals come back verbatim.
///
/// # Example
///
/// ```
/// use tinysql::lexer::tokenize;
///
/// let tokens = tokenize("select id from users;");
/// assert_eq!(tokens, vec!["SELECT", "id", "FROM", "users", ";"]);
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Ok((remaining, _)) = whitespace(rest) {
            rest = remaining;
            continue;
        }

        match parse_token(rest) {
            Ok((remaining, token)) => {
                tokens.push(token);
                rest = remaining;
            }
            Err(_) => {
                trace!(skipped = ?rest.chars().next(), "dropping unrecognized character");
                rest = skip_char(rest);
            }
        }
    }

    trace!(count = tokens.len(), "tokenized input");
    tokens
}

/// Try every token shape at the current position, in priority order.
fn parse_token(input: &str) -> IResult<&str, String> {
    alt((string_literal, symbol, word, number))(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_whitespace())(input)
}

/// Quoted string, quotes included. The closing quote is optional.
fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        recognize(tuple((char('\''), take_while(|c| c != '\''), opt(char('\''))))),
        |s: &str| s.to_string(),
    )(input)
}

/// Reserved symbol, two-character forms first.
fn symbol(input: &str) -> IResult<&str, String> {
    map(
        alt((
            verify(take(2usize), |s: &str| grammar::is_symbol(s)),
            verify(take(1usize), |s: &str| grammar::is_symbol(s)),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Keyword or identifier. Must start with a letter or underscore.
fn word(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            satisfy(|c: char| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        normalize_word,
    )(input)
}

fn number(input: &str) -> IResult<&str, String> {
    map(digit1, |s: &str| s.to_string())(input)
}

fn normalize_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if grammar::is_keyword(&upper) {
        upper
    } else {
        word.to_string()
    }
}

fn skip_char(input: &str) -> &str {
    let mut chars = input.chars();
    chars.next();
    chars.as_str()
}
