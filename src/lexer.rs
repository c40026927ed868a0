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

//! Tag accumulation.
//!
//! The parser hands this module the input immediately following an opening
//! delimiter; a single left-to-right scan collects characters up to the
//! requested closing delimiter and returns the parsed [`Tag`] together with
//! the residual input. Scanning fails on a forbidden character (a nested
//! `{` inside ordinary tags) and on end of input.

use crate::error::{Error, Result};
use crate::matcher::PrefixMatcher;
use crate::tag::Tag;
use crate::tokenizer;

/// The opening/closing delimiter pair recorded on every tag.
pub(crate) type Delimiters = (&'static str, &'static str);

/// Accumulates a full tag, splitting its contents into name and options.
pub(crate) fn accumulate_tag<'a>(
    input: &'a str,
    delimiters: Delimiters,
    forbidden: &[char],
    matcher: Option<&PrefixMatcher>,
) -> Result<(Tag, &'a str)> {
    let (raw, residual) = scan(input, delimiters.1, forbidden)?;
    Ok((make_tag(raw, delimiters, matcher)?, residual))
}

/// Accumulates comment contents verbatim. The body is never option-split,
/// so quotes inside comments survive untouched.
pub(crate) fn accumulate_comment<'a>(
    input: &'a str,
    delimiters: Delimiters,
    forbidden: &[char],
) -> Result<(Tag, &'a str)> {
    let (raw, residual) = scan(input, delimiters.1, forbidden)?;
    let tag = Tag {
        raw_contents: raw.to_string(),
        opening_delimiter: delimiters.0,
        closing_delimiter: delimiters.1,
        ..Tag::default()
    };
    Ok((tag, residual))
}

/// Single left-to-right scan to the requested closing delimiter. At each
/// position the closing delimiter is tested first, then the forbidden set.
fn scan<'a>(input: &'a str, closing: &str, forbidden: &[char]) -> Result<(&'a str, &'a str)> {
    let mut at = 0;
    while at < input.len() {
        let rest = &input[at..];
        if rest.starts_with(closing) {
            return Ok((&input[..at], &rest[closing.len()..]));
        }
        let next = match rest.chars().next() {
            Some(next) => next,
            None => break,
        };
        if forbidden.contains(&next) {
            return Err(Error::ForbiddenCharacter(next, input[..at].to_string()));
        }
        at += next.len_utf8();
    }
    Err(Error::UnclosedTag)
}

/// Builds a [`Tag`] from raw contents: trim, bind the name (longest
/// registered helper prefix, or up to the first whitespace), then lex the
/// remaining options.
fn make_tag(raw: &str, delimiters: Delimiters, matcher: Option<&PrefixMatcher>) -> Result<Tag> {
    let trimmed = raw.trim();
    let (name, options) = match matcher.and_then(|matcher| matcher.split(trimmed)) {
        Some((name, options)) => (name, options),
        None => match trimmed.find(char::is_whitespace) {
            Some(at) => (&trimmed[..at], &trimmed[at..]),
            None => (trimmed, ""),
        },
    };
    let raw_options = options.trim();
    let (args, kwargs) = tokenizer::split_options(raw_options)?;
    Ok(Tag {
        name: name.to_string(),
        raw_contents: raw.to_string(),
        raw_options: raw_options.to_string(),
        args,
        kwargs,
        opening_delimiter: delimiters.0,
        closing_delimiter: delimiters.1,
        block_contents: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESCAPED: Delimiters = ("{{", "}}");

    fn tag(input: &str) -> (Tag, &str) {
        accumulate_tag(input, ESCAPED, &['{'], None).unwrap()
    }

    #[test]
    fn accumulates_up_to_the_closing_delimiter() {
        let (tag, residual) = tag("firstName}} and more");
        assert_eq!(tag.name, "firstName");
        assert_eq!(tag.raw_contents, "firstName");
        assert_eq!(residual, " and more");
    }

    #[test]
    fn splits_name_and_options_on_whitespace() {
        let (tag, _) = tag("insert name \"Customer\"}}");
        assert_eq!(tag.name, "insert");
        assert_eq!(tag.raw_options, "name \"Customer\"");
        assert_eq!(tag.args.len(), 2);
        assert_eq!(tag.args[1].value, "Customer");
        assert!(tag.args[1].quoted);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_from_the_name() {
        let (tag, _) = tag("  firstName  }}");
        assert_eq!(tag.name, "firstName");
        assert_eq!(tag.raw_contents, "  firstName  ");
    }

    #[test]
    fn a_registered_multi_word_name_binds_as_one_token() {
        let matcher = PrefixMatcher::build(["else", "else if"].into_iter()).unwrap();
        let (tag, _) =
            accumulate_tag("else if user.active}}", ESCAPED, &['{'], Some(&matcher)).unwrap();
        assert_eq!(tag.name, "else if");
        assert_eq!(tag.raw_options, "user.active");
    }

    #[test]
    fn a_three_character_delimiter_is_matched_whole() {
        let (tag, residual) =
            accumulate_tag("content}}} tail", ("{{{", "}}}"), &['{'], None).unwrap();
        assert_eq!(tag.name, "content");
        assert_eq!(residual, " tail");
    }

    #[test]
    fn missing_delimiter_is_an_unclosed_tag() {
        assert_eq!(
            accumulate_tag("firstName", ESCAPED, &['{'], None).unwrap_err(),
            Error::UnclosedTag
        );
    }

    #[test]
    fn forbidden_characters_report_the_accumulated_prefix() {
        assert_eq!(
            accumulate_tag("na{me}}", ESCAPED, &['{'], None).unwrap_err(),
            Error::ForbiddenCharacter('{', "na".to_string())
        );
    }

    #[test]
    fn comments_keep_their_contents_verbatim() {
        let (tag, residual) =
            accumulate_comment(" don't \"quote\" me }} tail", ESCAPED, &[]).unwrap();
        assert_eq!(tag.raw_contents, " don't \"quote\" me ");
        assert_eq!(tag.name, "");
        assert_eq!(residual, " tail");
    }

    #[test]
    fn multibyte_contents_scan_cleanly() {
        let (tag, _) = tag("héllo}}");
        assert_eq!(tag.name, "héllo");
    }
}
