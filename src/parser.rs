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

//! Streaming template parser.
//!
//! The parser walks the input once, dispatching on the longest delimiter
//! prefix of the remaining text. The prefixes overlap (`{{` leads `{{{`
//! leads `{{{{`), so the tests run strictly from longest to shortest:
//!
//! 1. `{{{{` raw block, body captured verbatim
//! 2. `{{!--` long comment
//! 3. `{{!` short comment
//! 4. `{{#` block open
//! 5. `{{/` block close
//! 6. `{{>` partial, expanded and re-parsed
//! 7. `{{{` unescaped interpolation
//! 8. `{{` escaped interpolation
//! 9. a bare `}}` is a stray closer
//! 10. anything else is copied through
//!
//! Block bodies and partial fragments parse in their own frame: each frame
//! shares the open-block stack but may only close blocks opened at its own
//! level or deeper, so closing tags match LIFO and a partial cannot
//! terminate a block it did not open.

use regex::Regex;

use crate::error::{cap, Error, Result};
use crate::lexer::{self, Delimiters};
use crate::matcher::PrefixMatcher;
use crate::registry::{CallbackResult, Registry};
use crate::tag::Tag;

const ESCAPED: Delimiters = ("{{", "}}");
const UNESCAPED: Delimiters = ("{{{", "}}}");
const BLOCK_OPEN: Delimiters = ("{{#", "}}");
const BLOCK_CLOSE: Delimiters = ("{{/", "}}");
const PARTIAL: Delimiters = ("{{>", "}}");
const RAW_BLOCK: Delimiters = ("{{{{", "}}}}");
const RAW_BLOCK_CLOSE: Delimiters = ("{{{{/", "}}}}");
const COMMENT: Delimiters = ("{{!", "}}");
const LONG_COMMENT: Delimiters = ("{{!--", "--}}");

/// Forbidden inside every ordinary tag; a nested `{` is always an error.
const BRACE: [char; 1] = ['{'];
/// Long comments place no restriction on their contents.
const ANY: [char; 0] = [];

/// Output of one parser frame.
struct Parsed {
    output: String,
    consumed: usize,
    closed: bool,
}

/// A reusable transpiler over one registry.
///
/// Construction compiles the injection guard and the helper-name matcher
/// once, so a parser can be applied to any number of templates.
pub struct Parser<'a> {
    registry: &'a Registry,
    matcher: Option<PrefixMatcher>,
    guard: Regex,
}

impl<'a> Parser<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            matcher: PrefixMatcher::build(registry.callback_names()),
            guard: Regex::new("<%.*?%>").unwrap(),
        }
    }

    /// Transpiles a full template. Source that already contains embedded
    /// expressions is rejected before parsing begins.
    pub fn transpile(&self, source: &str) -> Result<String> {
        if self.guard.is_match(source) {
            return Err(Error::EmbeddedExpression);
        }
        tracing::debug!(length = source.len(), "transpiling template");
        let mut stack = Vec::new();
        let parsed = self.parse_part(source, &mut stack, 0)?;
        Ok(parsed.output)
    }

    /// Parses one frame: the whole template, a block body, or a partial
    /// fragment. `base` is the stack depth this frame may not pop below.
    fn parse_part(&self, src: &str, stack: &mut Vec<String>, base: usize) -> Result<Parsed> {
        let mut output = String::new();
        let mut rest = src;
        loop {
            if rest.is_empty() {
                if stack.len() > base {
                    let open = stack.last().map(String::as_str).unwrap_or_default();
                    return Err(Error::MissingBlockClose(closing_tag(open)));
                }
                return Ok(Parsed {
                    output,
                    consumed: src.len(),
                    closed: false,
                });
            }
            if let Some(tail) = rest.strip_prefix(RAW_BLOCK.0) {
                rest = self.raw_block(tail, &mut output)?;
            } else if let Some(tail) = rest.strip_prefix(LONG_COMMENT.0) {
                let (tag, tail) = lexer::accumulate_comment(tail, LONG_COMMENT, &ANY)?;
                output.push_str("<%#");
                output.push_str(&tag.raw_contents);
                output.push_str("--%>");
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix(COMMENT.0) {
                let (tag, tail) = lexer::accumulate_comment(tail, COMMENT, &BRACE)?;
                output.push_str("<%#");
                output.push_str(&tag.raw_contents);
                output.push_str("%>");
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix(BLOCK_OPEN.0) {
                let (mut tag, tail) = self.tag(tail, BLOCK_OPEN)?;
                if tag.name.is_empty() {
                    return Err(Error::NameRequired("Block", "{{#name}}"));
                }
                stack.push(tag.name.clone());
                let inner = self.parse_part(tail, stack, stack.len() - 1)?;
                if !inner.closed {
                    return Err(Error::MissingBlockClose(closing_tag(&tag.name)));
                }
                tag.block_contents = Some(inner.output);
                let callback = self.registry.lookup_block(&tag.name);
                output.push_str(&coerce(callback(&tag))?);
                rest = &tail[inner.consumed..];
            } else if let Some(tail) = rest.strip_prefix(BLOCK_CLOSE.0) {
                if stack.len() == base {
                    return Err(Error::UnexpectedBlockClose);
                }
                let (tag, tail) = self.tag(tail, BLOCK_CLOSE)?;
                let expected = stack.pop().unwrap_or_default();
                if tag.name.is_empty() {
                    return Err(Error::NameRequired("Closing block", "{{/name}}"));
                }
                if tag.name != expected {
                    return Err(Error::WrongBlockClose(closing_tag(&expected)));
                }
                return Ok(Parsed {
                    output,
                    consumed: src.len() - tail.len(),
                    closed: true,
                });
            } else if let Some(tail) = rest.strip_prefix(PARTIAL.0) {
                let (tag, tail) = self.tag(tail, PARTIAL)?;
                if tag.name.is_empty() {
                    return Err(Error::NameRequired("Partial", "{{>name}}"));
                }
                tracing::trace!(name = %tag.name, "expanding partial");
                let callback = self.registry.lookup_partial(&tag.name);
                let fragment = coerce(callback(&tag))?;
                let inner = self.parse_part(&fragment, stack, stack.len())?;
                output.push_str(&inner.output);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix(UNESCAPED.0) {
                let (tag, tail) = self.tag(tail, UNESCAPED)?;
                if tag.name.is_empty() {
                    return Err(Error::NameRequired("Non-escaped", "{{{name}}}"));
                }
                if !tag.raw_options.is_empty() {
                    return Err(Error::OptionsNotAllowed);
                }
                let callback = self.registry.lookup_unescaped();
                output.push_str(&coerce(callback(&tag))?);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix(ESCAPED.0) {
                let (tag, tail) = self.tag(tail, ESCAPED)?;
                if tag.name.is_empty() {
                    return Err(Error::NameRequired("Escaped", "{{name}}"));
                }
                let callback = self.registry.lookup_helper(&tag.name);
                output.push_str(&coerce(callback(&tag))?);
                rest = tail;
            } else if rest.starts_with("}}") {
                return Err(Error::StrayClosingDelimiter(cap(&output).to_string()));
            } else if let Some(next) = rest.chars().next() {
                output.push(next);
                rest = &rest[next.len_utf8()..];
            }
        }
    }

    /// Raw four-brace blocks capture their body verbatim, up to the
    /// matching `{{{{/name}}}}`.
    fn raw_block<'s>(&self, input: &'s str, output: &mut String) -> Result<&'s str> {
        let (mut tag, tail) = self.tag(input, RAW_BLOCK)?;
        if tag.name.is_empty() {
            return Err(Error::NameRequired("Raw block", "{{{{name}}}}"));
        }
        let at = tail.find(RAW_BLOCK_CLOSE.0).ok_or(Error::UnclosedTag)?;
        let body = &tail[..at];
        let (closing, tail) = self.tag(&tail[at + RAW_BLOCK_CLOSE.0.len()..], RAW_BLOCK_CLOSE)?;
        if closing.name.is_empty() || closing.name != tag.name {
            return Err(Error::WrongBlockClose(raw_closing_tag(&tag.name)));
        }
        tag.block_contents = Some(body.to_string());
        let callback = self.registry.lookup_block(&tag.name);
        output.push_str(&coerce(callback(&tag))?);
        Ok(tail)
    }

    fn tag<'s>(&self, input: &'s str, delimiters: Delimiters) -> Result<(Tag, &'s str)> {
        lexer::accumulate_tag(input, delimiters, &BRACE, self.matcher.as_ref())
    }
}

fn closing_tag(name: &str) -> String {
    format!("{{{{/{}}}}}", name)
}

fn raw_closing_tag(name: &str) -> String {
    format!("{{{{{{{{/{}}}}}}}}}", name)
}

fn coerce(result: CallbackResult) -> Result<String> {
    match result {
        CallbackResult::Value(value) => Ok(value),
        CallbackResult::Error(message) => Err(Error::Helper(message)),
    }
}
