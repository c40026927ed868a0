// MIT License
//
// Copyright (c) 2024 Jerome Johnson
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Tag option tokenization.
//!
//! Splits the option string that follows a tag name into positional
//! arguments and `key=value` pairs. Tokens are whitespace-separated except
//! inside double quotes:
//!
//! ```text
//! name "a literal" color=red title="hello world"
//! ```
//!
//! yields two positional arguments (`name` and the quoted `a literal`) and
//! two keyword arguments.

use crate::error::{Error, Result};
use crate::tag::Arg;

/// Splits a trimmed option string into positional and keyword arguments.
///
/// Consecutive whitespace collapses; an unterminated double quote is an
/// error.
pub(crate) fn split_options(src: &str) -> Result<(Vec<Arg>, Vec<(String, Arg)>)> {
    let mut args = Vec::new();
    let mut kwargs = Vec::new();
    let mut rest = src.trim_start();
    while !rest.is_empty() {
        let (token, tail) = next_token(rest)?;
        match split_key(token) {
            Some((key, value)) => kwargs.push((key.to_string(), read_arg(value))),
            None => args.push(read_arg(token)),
        }
        rest = tail;
    }
    Ok((args, kwargs))
}

/// Scans one whitespace-separated token, honouring double quotes.
fn next_token(src: &str) -> Result<(&str, &str)> {
    let mut in_quotes = false;
    for (at, c) in src.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                return Ok((&src[..at], src[at..].trim_start()));
            }
            _ => (),
        }
    }
    if in_quotes {
        return Err(Error::UnterminatedQuote(src.to_string()));
    }
    Ok((src, ""))
}

/// Detects a `key=value` token. The `=` must sit before any quoted part,
/// so a quoted literal containing `=` stays positional.
fn split_key(token: &str) -> Option<(&str, &str)> {
    let at = token.find('=')?;
    if token[..at].contains('"') {
        return None;
    }
    Some((&token[..at], &token[at + 1..]))
}

fn read_arg(value: &str) -> Arg {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => Arg {
            value: inner.to_string(),
            quoted: true,
        },
        None => Arg {
            value: value.to_string(),
            quoted: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(value: &str) -> Arg {
        Arg {
            value: value.to_string(),
            quoted: false,
        }
    }

    fn quoted(value: &str) -> Arg {
        Arg {
            value: value.to_string(),
            quoted: true,
        }
    }

    #[test]
    fn splits_positional_arguments() {
        let (args, kwargs) = split_options("one two three").unwrap();
        assert_eq!(args, vec![bare("one"), bare("two"), bare("three")]);
        assert!(kwargs.is_empty());
    }

    #[test]
    fn consecutive_whitespace_collapses() {
        let (args, _) = split_options("one   two\t three").unwrap();
        assert_eq!(args, vec![bare("one"), bare("two"), bare("three")]);
    }

    #[test]
    fn quoted_literals_keep_their_spaces() {
        let (args, _) = split_options("greet \"dear customer\"").unwrap();
        assert_eq!(args, vec![bare("greet"), quoted("dear customer")]);
    }

    #[test]
    fn tokens_with_equals_become_keyword_arguments() {
        let (args, kwargs) = split_options("first color=red").unwrap();
        assert_eq!(args, vec![bare("first")]);
        assert_eq!(kwargs, vec![("color".to_string(), bare("red"))]);
    }

    #[test]
    fn keyword_values_may_be_quoted() {
        let (_, kwargs) = split_options("title=\"hello world\"").unwrap();
        assert_eq!(kwargs, vec![("title".to_string(), quoted("hello world"))]);
    }

    #[test]
    fn equals_inside_quotes_stays_positional() {
        let (args, kwargs) = split_options("\"default=x\"").unwrap();
        assert_eq!(args, vec![quoted("default=x")]);
        assert!(kwargs.is_empty());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(
            split_options("\"oops").unwrap_err(),
            Error::UnterminatedQuote("\"oops".to_string())
        );
    }

    #[test]
    fn empty_options_yield_nothing() {
        let (args, kwargs) = split_options("").unwrap();
        assert!(args.is_empty());
        assert!(kwargs.is_empty());
    }
}
