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

//! Default helper bundles.
//!
//! A dialect is a preconfigured [`Registry`]. The base dialect covers the
//! universal constructs:
//!
//! - helpers: `else`, `log`, `@index`, `@key`, plus the interpolation
//!   fallbacks every registry carries
//! - block-helpers: `if`, `each`, `foreach`, `raw`, `unless`
//!
//! The [`sendgrid()`] dialect augments the base set with the conditional
//! vocabulary of Sendgrid's transactional templates.
//!
//! Conditional blocks transpile to a `cond` chain. The block body becomes
//! the first clause and every `{{else …}}` tag inside it contributes a
//! further clause marker; `{{#if}}` also appends a catch-all `nil` clause
//! so a false condition renders nothing.

mod sendgrid;

pub use sendgrid::sendgrid;

use crate::registry::Registry;
use crate::tag::Tag;
use crate::transform;

/// Plain result shape the bundled helper callbacks are written against.
pub(crate) type HelperResult = std::result::Result<String, String>;

/// The base dialect.
pub fn base() -> Registry {
    let mut registry = Registry::new();
    registry.install_helper("else", else_clause);
    registry.install_helper("log", log);
    registry.install_helper("@index", index);
    registry.install_helper("@key", key);
    registry.install_block("if", if_block);
    registry.install_block("unless", unless_block);
    registry.install_block("each", |tag: &Tag| each_block(tag, "each"));
    registry.install_block("foreach", |tag: &Tag| each_block(tag, "foreach"));
    registry.install_block("raw", raw_block);
    registry
}

/// Fallback for `{{name}}` tags: interpolate the translated identifier.
pub(crate) fn escaped(tag: &Tag) -> HelperResult {
    Ok(format!("<%= {} %>", transform::path(&tag.name)))
}

/// Fallback for `{{{name}}}` tags. Escaping is the renderer's concern, so
/// the emission matches the escaped form.
pub(crate) fn unescaped(tag: &Tag) -> HelperResult {
    Ok(format!("<%= {} %>", transform::path(&tag.name)))
}

fn else_clause(_tag: &Tag) -> HelperResult {
    Ok("<% true -> %>".to_string())
}

fn log(tag: &Tag) -> HelperResult {
    if tag.args.is_empty() {
        return Err("The log helper requires options, e.g. {{log options}}".to_string());
    }
    let rendered = tag
        .args
        .iter()
        .map(transform::expression)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("<% Logger.debug({}) %>", rendered))
}

fn index(_tag: &Tag) -> HelperResult {
    Ok("<%= index %>".to_string())
}

fn key(_tag: &Tag) -> HelperResult {
    Ok("<%= key %>".to_string())
}

/// Body of a parsed block, or empty when the callback ran outside one.
pub(crate) fn body(tag: &Tag) -> &str {
    tag.block_contents.as_deref().unwrap_or("")
}

/// Translates the single operand a truthiness-style helper takes.
pub(crate) fn truthy_condition(tag: &Tag, label: &str, example: &str) -> HelperResult {
    match tag.args.first() {
        Some(arg) => Ok(transform::expression(arg)),
        None => Err(format!(
            "The {} helper requires options, e.g. {}",
            label, example
        )),
    }
}

pub(crate) fn if_block(tag: &Tag) -> HelperResult {
    let condition = truthy_condition(tag, "if", "{{#if options}}")?;
    Ok(format!(
        "<%= cond do %>\n<% {} -> %>{}<% true -> %><% nil %>\n<% end %>\n",
        condition,
        body(tag)
    ))
}

pub(crate) fn unless_block(tag: &Tag) -> HelperResult {
    let condition = truthy_condition(tag, "unless", "{{#unless options}}")?;
    Ok(format!(
        "<%= cond do %>\n<% !{} -> %>{}<% end %>\n",
        condition,
        body(tag)
    ))
}

pub(crate) fn each_block(tag: &Tag, label: &str) -> HelperResult {
    let source = truthy_condition(tag, label, "{{#each options}}")?;
    Ok(format!(
        "<%= for this <- {} do %>{}<% end %>\n",
        source,
        body(tag)
    ))
}

pub(crate) fn raw_block(tag: &Tag) -> HelperResult {
    Ok(body(tag).to_string())
}
