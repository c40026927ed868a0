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

//! Handlebars template transpiler.
//!
//! This crate rewrites Handlebars-style templates into an embedded template
//! language ("ETL"). Interpolations come out as `<%= … %>` expressions and
//! comments as `<%# … %>`; block constructs turn into `<% … %>` control
//! flow. The output is plain text, and evaluating it against data is a
//! renderer's job, not this crate's.
//!
//! # Features
//!
//! - Variables and dotted paths: `{{user.name}}` →
//!   `<%= get_in(@user, [:name]) %>`
//! - Block helpers: `{{#if …}}`, `{{#unless …}}`, `{{#each …}}`, raw
//!   four-brace blocks
//! - Comments, short and long
//! - Partials, registered as fragments or callbacks and re-parsed inline
//! - A user-extensible registry of helpers, block-helpers and partials
//! - Two bundled dialects: base and Sendgrid
//!
//! Source that already contains `<% … %>` expressions is rejected outright,
//! so a template cannot smuggle raw code past the transpiler.
//!
//! # Example
//!
//! ```rust
//! let etl = etl_handlebars::compile("<p>Hello {{firstName}}</p>").unwrap();
//! assert_eq!(etl, "<p>Hello <%= @firstName %></p>");
//! ```
//!
//! Registering a partial:
//!
//! ```rust
//! use etl_handlebars::{compile_with, helpers};
//!
//! let mut registry = helpers::base();
//! registry.register_partial("signature", "<p>The {{team}} team</p>").unwrap();
//! let etl = compile_with("{{> signature}}", &registry).unwrap();
//! assert_eq!(etl, "<p>The <%= @team %> team</p>");
//! ```
//!
//! # Module Structure
//!
//! - `parser.rs`: streaming prefix-dispatch parser
//! - `lexer.rs`: tag accumulation
//! - `tokenizer.rs`: option-string tokenization
//! - `matcher.rs`: longest-match binding of registered helper names
//! - `registry.rs`: helper registration and lookup
//! - `helpers/`: bundled dialects
//! - `transform.rs`: identifier translation
//! - `error.rs`: error types and handling

mod error;
pub mod helpers;
mod lexer;
mod matcher;
mod parser;
mod registry;
mod tag;
mod tokenizer;
mod transform;

pub use error::{Error, Result};
pub use parser::Parser;
pub use registry::{CallbackResult, HelperFn, Partial, Registry, ESCAPED, UNESCAPED};
pub use tag::{Arg, Tag};

/// Transpiles a template with the base dialect.
pub fn compile(template: &str) -> Result<String> {
    compile_with(template, &helpers::base())
}

/// Transpiles a template with a caller-supplied registry.
pub fn compile_with(template: &str, registry: &Registry) -> Result<String> {
    Parser::new(registry).transpile(template)
}
