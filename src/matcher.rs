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

//! Longest-match recognition of registered helper names.
//!
//! Helper names may contain spaces (`else if`, `else greaterThan`), so tag
//! contents cannot simply be split on the first whitespace. The matcher
//! holds an alternation over every registered name, longest first, and
//! binds the longest registered prefix as the tag name.

use regex::Regex;

/// Splits tag contents at the boundary of the longest registered helper
/// name that leads them.
#[derive(Debug, Clone)]
pub(crate) struct PrefixMatcher {
    pattern: Regex,
}

impl PrefixMatcher {
    /// Builds the alternation. Reserved `__…__` names never participate;
    /// with no usable names there is no matcher.
    pub(crate) fn build<'a, I>(names: I) -> Option<Self>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut names: Vec<&str> = names.filter(|name| !is_sentinel(name)).collect();
        if names.is_empty() {
            return None;
        }
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("^(?P<tag_name>{})(?P<tag_options>.*)$", alternation);
        Regex::new(&pattern).ok().map(|pattern| Self { pattern })
    }

    /// Splits trimmed tag contents into `(name, options)` when a registered
    /// name leads them.
    pub(crate) fn split<'t>(&self, contents: &'t str) -> Option<(&'t str, &'t str)> {
        let captures = self.pattern.captures(contents)?;
        let name = captures.name("tag_name")?;
        let options = captures.name("tag_options")?;
        Some((name.as_str(), options.as_str()))
    }
}

fn is_sentinel(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(names: &[&str]) -> PrefixMatcher {
        PrefixMatcher::build(names.iter().copied()).unwrap()
    }

    #[test]
    fn binds_the_longest_registered_prefix() {
        let matcher = matcher(&["else", "else if"]);
        assert_eq!(matcher.split("else if x"), Some(("else if", " x")));
        assert_eq!(matcher.split("else"), Some(("else", "")));
    }

    #[test]
    fn unregistered_contents_do_not_match() {
        let matcher = matcher(&["if", "unless"]);
        assert_eq!(matcher.split("user.name"), None);
    }

    #[test]
    fn names_with_metacharacters_are_escaped() {
        let matcher = matcher(&["what?"]);
        assert_eq!(matcher.split("what? now"), Some(("what?", " now")));
        assert_eq!(matcher.split("what now"), None);
    }

    #[test]
    fn sentinel_names_are_excluded() {
        assert!(PrefixMatcher::build(["__escaped__", "__unescaped__"].into_iter()).is_none());
    }

    #[test]
    fn no_names_means_no_matcher() {
        assert!(PrefixMatcher::build(std::iter::empty()).is_none());
    }
}
