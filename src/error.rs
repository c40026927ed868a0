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

//! Error handling for the template transpiler.
//!
//! Every failure in the pipeline surfaces as one [`Error`] value. Failures
//! are fatal: the transpile aborts and no partial output is returned.

use thiserror::Error;

/// Caps error context at its first 32 characters.
pub(crate) fn cap(src: &str) -> &str {
    static CAP_AT: usize = 32;

    match src.char_indices().nth(CAP_AT) {
        Some((at, _)) => &src[..at],
        None => src,
    }
}

/// Error type for template transpilation failures.
#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// The source already contains target-language expressions.
    #[error("Compilation unsafe: the source template contains EEx expressions.")]
    EmbeddedExpression,

    /// Input ended before a tag's closing delimiter was found.
    #[error("Unclosed tag.")]
    UnclosedTag,

    /// A character that may not appear inside a tag was encountered; carries
    /// the offending character and the contents accumulated so far.
    #[error("Unexpected character {0} inside a tag: {1}")]
    ForbiddenCharacter(char, String),

    /// A closing delimiter appeared with no tag open; carries the leading
    /// output already produced when it was hit.
    #[error("Unexpected closing delimiter: }}}}{0}")]
    StrayClosingDelimiter(String),

    /// A closing block tag appeared with no block open.
    #[error("Unexpected closing block tag.")]
    UnexpectedBlockClose,

    /// A closing block tag named the wrong block; carries the rendered tag
    /// that was expected, e.g. `{{/if}}`.
    #[error("Unexpected closing block tag. Expected closing {0} tag.")]
    WrongBlockClose(String),

    /// Input ended with at least one block still open; carries the rendered
    /// closing tag still missing.
    #[error("Unexpected end of template.  Closing block not found: {0}")]
    MissingBlockClose(String),

    /// A tag of the given kind was written without a name.
    #[error("{0} tags require a name, e.g. {1}")]
    NameRequired(&'static str, &'static str),

    /// Triple-brace interpolations take a bare name only.
    #[error("Non-escaped tags should not include options")]
    OptionsNotAllowed,

    /// A double-quoted option literal was never closed.
    #[error("Unterminated quote in tag options: {0}")]
    UnterminatedQuote(String),

    /// A callback was registered under an unusable name.
    #[error("Helper names must be non-empty and must not start with '.': {0:?}")]
    InvalidHelperName(String),

    /// A helper callback rejected the tag; carries the callback's message.
    #[error("{0}")]
    Helper(String),
}

/// Result type for transpilation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_leaves_short_context_alone() {
        assert_eq!(cap("short"), "short");
    }

    #[test]
    fn cap_takes_the_first_32_characters() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(cap(long), "abcdefghijklmnopqrstuvwxyz012345");
        assert_eq!(cap(long).chars().count(), 32);
    }

    #[test]
    fn cap_respects_character_boundaries() {
        let long = "é".repeat(40);
        assert_eq!(cap(&long), "é".repeat(32));
    }

    #[test]
    fn messages_render_embedded_tags() {
        assert_eq!(
            Error::WrongBlockClose("{{/if}}".to_string()).to_string(),
            "Unexpected closing block tag. Expected closing {{/if}} tag."
        );
        assert_eq!(
            Error::MissingBlockClose("{{/each}}".to_string()).to_string(),
            "Unexpected end of template.  Closing block not found: {{/each}}"
        );
        assert_eq!(
            Error::StrayClosingDelimiter("abc".to_string()).to_string(),
            "Unexpected closing delimiter: }}abc"
        );
    }
}
