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

//! Parsed tag data.

/// One argument parsed from a tag's option string.
///
/// `quoted` records whether the source wrote the value in double quotes; a
/// quoted value is re-emitted as a string literal, an unquoted one is
/// treated as an identifier path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// The argument's value, without surrounding quotes.
    pub value: String,
    /// Whether the source quoted the value.
    pub quoted: bool,
}

/// A parsed source tag.
///
/// Tags are produced by the lexer and consumed by the parser and by helper
/// callbacks. A tag is a plain record: construction succeeds for any
/// contents, including an empty name, and validation happens where the tag
/// is dispatched. The parser performs exactly one mutation after
/// construction, filling in [`block_contents`](Tag::block_contents) once a
/// block's body has been parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// First token of the tag contents, or the longest registered helper
    /// name when one matches.
    pub name: String,
    /// Everything between the delimiters, untrimmed.
    pub raw_contents: String,
    /// What follows the name, trimmed; empty when the tag has no options.
    pub raw_options: String,
    /// Positional arguments, in source order.
    pub args: Vec<Arg>,
    /// Keyword arguments, in source order.
    pub kwargs: Vec<(String, Arg)>,
    /// The delimiter that opened this tag, e.g. `{{#`.
    pub opening_delimiter: &'static str,
    /// The delimiter that closed this tag, e.g. `}}`.
    pub closing_delimiter: &'static str,
    /// Transpiled body of a block tag; `None` for every other kind.
    pub block_contents: Option<String>,
}

impl Tag {
    /// Returns the binding for a keyword option, preferring the last one
    /// when a key was given more than once.
    pub fn kwarg(&self, key: &str) -> Option<&Arg> {
        self.kwargs
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kwarg_lookup_prefers_the_last_binding() {
        let tag = Tag {
            kwargs: vec![
                (
                    "color".to_string(),
                    Arg {
                        value: "red".to_string(),
                        quoted: false,
                    },
                ),
                (
                    "color".to_string(),
                    Arg {
                        value: "blue".to_string(),
                        quoted: false,
                    },
                ),
            ],
            ..Tag::default()
        };
        assert_eq!(tag.kwarg("color").map(|arg| arg.value.as_str()), Some("blue"));
        assert_eq!(tag.kwarg("size"), None);
    }
}
