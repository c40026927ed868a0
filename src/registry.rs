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

//! Helper registration and lookup.
//!
//! A [`Registry`] maps names to the callbacks that rewrite tags into output
//! fragments. Three kinds exist: helpers for inline tags, block-helpers for
//! `{{#name}}…{{/name}}` constructs, and partials for `{{>name}}`
//! insertions. Interpolation tags with no registered helper fall back to
//! the reserved `__escaped__` and `__unescaped__` callbacks, which a
//! registry always carries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::helpers;
use crate::tag::Tag;

/// Reserved helper name holding the fallback for `{{name}}` tags.
pub const ESCAPED: &str = "__escaped__";
/// Reserved helper name holding the fallback for `{{{name}}}` tags.
pub const UNESCAPED: &str = "__unescaped__";

/// What a callback hands back to the parser.
///
/// Callbacks may be written against plain strings or against
/// `Result<String, String>`; both coerce into this enum at registration, so
/// the parser deals with exactly one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    /// Output to append to the transpiled template.
    Value(String),
    /// A message that aborts the transpile.
    Error(String),
}

impl From<String> for CallbackResult {
    fn from(value: String) -> Self {
        CallbackResult::Value(value)
    }
}

impl From<&str> for CallbackResult {
    fn from(value: &str) -> Self {
        CallbackResult::Value(value.to_string())
    }
}

impl From<std::result::Result<String, String>> for CallbackResult {
    fn from(value: std::result::Result<String, String>) -> Self {
        match value {
            Ok(value) => CallbackResult::Value(value),
            Err(message) => CallbackResult::Error(message),
        }
    }
}

/// A registered callback.
pub type HelperFn = Arc<dyn Fn(&Tag) -> CallbackResult + Send + Sync>;

/// A registered partial: either a template fragment or a callback producing
/// one. Plain strings convert directly, so
/// `registry.register_partial("header", "<h1>{{title}}</h1>")` just works.
#[derive(Clone)]
pub enum Partial {
    /// A template fragment inserted as-is before re-parsing.
    Source(String),
    /// A callback deriving the fragment from the tag.
    Call(HelperFn),
}

impl From<&str> for Partial {
    fn from(source: &str) -> Self {
        Partial::Source(source.to_string())
    }
}

impl From<String> for Partial {
    fn from(source: String) -> Self {
        Partial::Source(source)
    }
}

impl fmt::Debug for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partial::Source(source) => f.debug_tuple("Source").field(source).finish(),
            Partial::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// The set of callbacks a transpile dispatches against.
///
/// Registries are built once and treated as immutable afterwards; callbacks
/// are reference-counted, so cloning a registry is cheap.
#[derive(Clone)]
pub struct Registry {
    helpers: HashMap<String, HelperFn>,
    blocks: HashMap<String, HelperFn>,
    partials: HashMap<String, Partial>,
    escaped: HelperFn,
    unescaped: HelperFn,
}

impl Registry {
    /// An empty registry holding only the interpolation fallbacks.
    pub fn new() -> Self {
        Self {
            helpers: HashMap::new(),
            blocks: HashMap::new(),
            partials: HashMap::new(),
            escaped: Arc::new(|tag: &Tag| helpers::escaped(tag).into()),
            unescaped: Arc::new(|tag: &Tag| helpers::unescaped(tag).into()),
        }
    }

    /// Registers a helper for inline tags. Registering the reserved
    /// [`ESCAPED`] or [`UNESCAPED`] names replaces the matching fallback.
    pub fn register_helper<F, R>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(&Tag) -> R + Send + Sync + 'static,
        R: Into<CallbackResult>,
    {
        validate_name(name)?;
        tracing::trace!(name, "registered helper");
        self.install_helper(name, callback);
        Ok(())
    }

    /// Registers a block-helper for `{{#name}}…{{/name}}` constructs.
    pub fn register_block<F, R>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(&Tag) -> R + Send + Sync + 'static,
        R: Into<CallbackResult>,
    {
        validate_name(name)?;
        tracing::trace!(name, "registered block-helper");
        self.install_block(name, callback);
        Ok(())
    }

    /// Registers a partial under the given name.
    pub fn register_partial<P>(&mut self, name: &str, partial: P) -> Result<()>
    where
        P: Into<Partial>,
    {
        validate_name(name)?;
        tracing::trace!(name, "registered partial");
        self.partials.insert(name.to_string(), partial.into());
        Ok(())
    }

    pub(crate) fn install_helper<F, R>(&mut self, name: &str, callback: F)
    where
        F: Fn(&Tag) -> R + Send + Sync + 'static,
        R: Into<CallbackResult>,
    {
        let callback: HelperFn = Arc::new(move |tag| callback(tag).into());
        match name {
            ESCAPED => self.escaped = callback,
            UNESCAPED => self.unescaped = callback,
            _ => {
                self.helpers.insert(name.to_string(), callback);
            }
        }
    }

    pub(crate) fn install_block<F, R>(&mut self, name: &str, callback: F)
    where
        F: Fn(&Tag) -> R + Send + Sync + 'static,
        R: Into<CallbackResult>,
    {
        self.blocks
            .insert(name.to_string(), Arc::new(move |tag| callback(tag).into()));
    }

    /// The exact helper if registered, otherwise the escaped-interpolation
    /// fallback.
    pub fn lookup_helper(&self, name: &str) -> HelperFn {
        self.helpers
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.escaped.clone())
    }

    /// The exact block-helper if registered, otherwise a callback that
    /// fails the transpile.
    pub fn lookup_block(&self, name: &str) -> HelperFn {
        match self.blocks.get(name) {
            Some(callback) => callback.clone(),
            None => {
                let name = name.to_string();
                Arc::new(move |_| {
                    CallbackResult::Error(format!("Block-helper not registered: {}", name))
                })
            }
        }
    }

    /// The partial's callback if registered, with plain-string partials
    /// wrapped as constant callbacks; otherwise a callback that fails the
    /// transpile.
    pub fn lookup_partial(&self, name: &str) -> HelperFn {
        match self.partials.get(name) {
            Some(Partial::Call(callback)) => callback.clone(),
            Some(Partial::Source(source)) => {
                let source = source.clone();
                Arc::new(move |_| CallbackResult::Value(source.clone()))
            }
            None => {
                let name = name.to_string();
                Arc::new(move |_| {
                    CallbackResult::Error(format!("Partial not registered: {}", name))
                })
            }
        }
    }

    /// The fallback for `{{{name}}}` tags.
    pub fn lookup_unescaped(&self) -> HelperFn {
        self.unescaped.clone()
    }

    /// Names that participate in tag-name prefix matching.
    pub(crate) fn callback_names(&self) -> impl Iterator<Item = &str> {
        self.helpers
            .keys()
            .map(String::as_str)
            .chain(self.blocks.keys().map(String::as_str))
    }
}

impl Default for Registry {
    /// The base dialect.
    fn default() -> Self {
        helpers::base()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |map: &HashMap<String, HelperFn>| {
            let mut names: Vec<&String> = map.keys().collect();
            names.sort();
            names.iter().map(|name| name.to_string()).collect::<Vec<_>>()
        };
        f.debug_struct("Registry")
            .field("helpers", &names(&self.helpers))
            .field("blocks", &names(&self.blocks))
            .field("partials", &self.partials.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('.') {
        return Err(Error::InvalidHelperName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(output: &str) -> impl Fn(&Tag) -> String + Send + Sync + 'static {
        let output = output.to_string();
        move |_| output.clone()
    }

    fn invoke(callback: &HelperFn) -> CallbackResult {
        callback(&Tag::default())
    }

    #[test]
    fn registration_is_monotone() {
        let mut registry = Registry::new();
        registry.register_helper("greet", constant("hi")).unwrap();
        assert_eq!(
            invoke(&registry.lookup_helper("greet")),
            CallbackResult::Value("hi".to_string())
        );
        registry.register_helper("greet", constant("hello")).unwrap();
        assert_eq!(
            invoke(&registry.lookup_helper("greet")),
            CallbackResult::Value("hello".to_string())
        );
    }

    #[test]
    fn unknown_helpers_fall_back_to_escaped_interpolation() {
        let registry = Registry::new();
        let tag = Tag {
            name: "firstName".to_string(),
            ..Tag::default()
        };
        assert_eq!(
            registry.lookup_helper("firstName")(&tag),
            CallbackResult::Value("<%= @firstName %>".to_string())
        );
    }

    #[test]
    fn unknown_blocks_fail_the_transpile() {
        let registry = Registry::new();
        assert_eq!(
            invoke(&registry.lookup_block("bogus")),
            CallbackResult::Error("Block-helper not registered: bogus".to_string())
        );
    }

    #[test]
    fn unknown_partials_fail_the_transpile() {
        let registry = Registry::new();
        assert_eq!(
            invoke(&registry.lookup_partial("nope")),
            CallbackResult::Error("Partial not registered: nope".to_string())
        );
    }

    #[test]
    fn string_partials_become_constant_callbacks() {
        let mut registry = Registry::new();
        registry.register_partial("header", "<h1>{{title}}</h1>").unwrap();
        assert_eq!(
            invoke(&registry.lookup_partial("header")),
            CallbackResult::Value("<h1>{{title}}</h1>".to_string())
        );
    }

    #[test]
    fn reserved_names_replace_the_fallbacks() {
        let mut registry = Registry::new();
        registry.register_helper(ESCAPED, constant("custom")).unwrap();
        assert_eq!(
            invoke(&registry.lookup_helper("anything")),
            CallbackResult::Value("custom".to_string())
        );
        registry.register_helper(UNESCAPED, constant("raw")).unwrap();
        assert_eq!(
            invoke(&registry.lookup_unescaped()),
            CallbackResult::Value("raw".to_string())
        );
    }

    #[test]
    fn names_must_be_usable() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.register_helper("", constant("x")).unwrap_err(),
            Error::InvalidHelperName(String::new())
        );
        assert_eq!(
            registry.register_block(".hidden", constant("x")).unwrap_err(),
            Error::InvalidHelperName(".hidden".to_string())
        );
        assert_eq!(
            registry.register_partial("", "fragment").unwrap_err(),
            Error::InvalidHelperName(String::new())
        );
    }

    #[test]
    fn bare_strings_coerce_to_values() {
        assert_eq!(
            CallbackResult::from("text"),
            CallbackResult::Value("text".to_string())
        );
        assert_eq!(
            CallbackResult::from(Err::<String, String>("nope".to_string())),
            CallbackResult::Error("nope".to_string())
        );
    }
}
