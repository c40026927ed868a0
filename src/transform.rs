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

//! Translation of source identifiers into target expressions.
//!
//! A bare identifier becomes an assign (`name` → `@name`), a dotted path
//! becomes a `get_in/2` call (`user.profile.name` →
//! `get_in(@user, [:profile, :name])`), and identifiers rooted in `this`
//! keep their head untouched so loop bindings resolve locally. A leading
//! `@root.` is stripped before translation.

use crate::tag::Arg;

/// Renders one argument as a target expression. Quoted literals are
/// re-emitted verbatim in double quotes.
pub(crate) fn expression(arg: &Arg) -> String {
    if arg.quoted {
        return format!("\"{}\"", arg.value);
    }
    literal_or_path(&arg.value)
}

/// Renders an unquoted value: numbers pass through untouched, everything
/// else is treated as an identifier path.
pub(crate) fn literal_or_path(value: &str) -> String {
    if is_number(value) {
        return value.to_string();
    }
    path(value)
}

/// Translates an identifier path.
pub(crate) fn path(value: &str) -> String {
    let stripped = value.strip_prefix("@root.").unwrap_or(value);
    match stripped.split_once('.') {
        None => {
            if stripped.starts_with("this") {
                stripped.to_string()
            } else {
                format!("@{}", stripped)
            }
        }
        Some((head, tail)) => {
            let keys = tail
                .split('.')
                .map(|key| format!(":{}", key))
                .collect::<Vec<_>>()
                .join(", ");
            if head.starts_with("this") {
                format!("get_in({}, [{}])", head, keys)
            } else {
                format!("get_in(@{}, [{}])", head, keys)
            }
        }
    }
}

fn is_number(value: &str) -> bool {
    value
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || c == '-')
        .unwrap_or(false)
        && value.parse::<f64>().is_ok()
}
