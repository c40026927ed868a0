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

//! Sendgrid-flavoured defaults.
//!
//! Sendgrid's transactional templates extend plain Handlebars with
//! comparison blocks (`{{#greaterThan}}`, `{{#equals}}`, …), a multi-word
//! `else` vocabulary (`{{else if x}}`, `{{else greaterThan a b}}`), and the
//! `insert` helper with a default value.

use crate::registry::Registry;
use crate::tag::Tag;
use crate::transform;

use super::{truthy_condition, HelperResult};

const COMPARISONS: [(&str, &str); 6] = [
    ("and", "&&"),
    ("equals", "=="),
    ("greaterThan", ">"),
    ("lessThan", "<"),
    ("notEquals", "!="),
    ("or", "||"),
];

/// The Sendgrid dialect: the base dialect augmented with the Sendgrid
/// vocabulary.
pub fn sendgrid() -> Registry {
    let mut registry = super::base();
    registry.install_helper("insert", insert);
    registry.install_helper("else if", |tag: &Tag| -> HelperResult {
        let condition = truthy_condition(tag, "else if", "{{else if options}}")?;
        Ok(clause(&condition))
    });
    registry.install_helper("else unless", |tag: &Tag| -> HelperResult {
        let condition = truthy_condition(tag, "else unless", "{{else unless options}}")?;
        Ok(clause(&format!("!{}", condition)))
    });
    for (name, operator) in COMPARISONS {
        registry.install_block(name, move |tag: &Tag| comparison_block(tag, operator, name));
        let clause_name = format!("else {}", name);
        let registered = clause_name.clone();
        registry.install_helper(&registered, move |tag: &Tag| -> HelperResult {
            let example = format!("{{{{{} option1 option2}}}}", clause_name);
            let condition = comparison(tag, operator, &clause_name, &example)?;
            Ok(clause(&condition))
        });
    }
    registry
}

/// `{{insert name "default value"}}`: interpolate with a fallback. The
/// quoted default may carry Sendgrid's `default=` prefix.
fn insert(tag: &Tag) -> HelperResult {
    let variable = match tag.args.first() {
        Some(arg) => transform::expression(arg),
        None => {
            return Err("The insert helper requires options, e.g. {{insert options}}".to_string())
        }
    };
    match tag.args.get(1) {
        Some(fallback) => {
            let value = fallback
                .value
                .strip_prefix("default=")
                .unwrap_or(&fallback.value);
            let rendered = if fallback.quoted {
                format!("\"{}\"", value)
            } else {
                transform::literal_or_path(value)
            };
            Ok(format!("<%= {} || {} %>", variable, rendered))
        }
        None => Ok(format!("<%= {} %>", variable)),
    }
}

fn clause(condition: &str) -> String {
    format!("<% {} -> %>", condition)
}

/// Renders `left OP right` from a two-operand comparison tag.
fn comparison(tag: &Tag, operator: &str, label: &str, example: &str) -> HelperResult {
    match tag.args.as_slice() {
        [left, right] => Ok(format!(
            "{} {} {}",
            transform::expression(left),
            operator,
            transform::expression(right)
        )),
        _ => Err(format!(
            "The {} helper requires options, e.g. {}",
            label, example
        )),
    }
}

fn comparison_block(tag: &Tag, operator: &str, label: &str) -> HelperResult {
    let example = format!("{{{{#{} option1 option2}}}}", label);
    let condition = comparison(tag, operator, label, &example)?;
    Ok(format!(
        "<%= cond do %>\n<% {} -> %>{}<% end %>\n",
        condition,
        super::body(tag)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Arg;

    fn tag_with(args: &[(&str, bool)], contents: Option<&str>) -> Tag {
        Tag {
            args: args
                .iter()
                .map(|(value, quoted)| Arg {
                    value: value.to_string(),
                    quoted: *quoted,
                })
                .collect(),
            block_contents: contents.map(str::to_string),
            ..Tag::default()
        }
    }

    #[test]
    fn insert_emits_a_fallback_chain() {
        let tag = tag_with(&[("name", false), ("Customer", true)], None);
        assert_eq!(insert(&tag).unwrap(), "<%= @name || \"Customer\" %>");
    }

    #[test]
    fn insert_strips_the_default_prefix() {
        let tag = tag_with(&[("name", false), ("default=Customer", true)], None);
        assert_eq!(insert(&tag).unwrap(), "<%= @name || \"Customer\" %>");
    }

    #[test]
    fn insert_without_a_default_interpolates_plainly() {
        let tag = tag_with(&[("name", false)], None);
        assert_eq!(insert(&tag).unwrap(), "<%= @name %>");
    }

    #[test]
    fn insert_requires_a_variable() {
        assert_eq!(
            insert(&Tag::default()).unwrap_err(),
            "The insert helper requires options, e.g. {{insert options}}"
        );
    }

    #[test]
    fn comparison_blocks_render_both_operands() {
        let tag = tag_with(&[("score", false), ("100", false)], Some("big"));
        assert_eq!(
            comparison_block(&tag, ">", "greaterThan").unwrap(),
            "<%= cond do %>\n<% @score > 100 -> %>big<% end %>\n"
        );
    }

    #[test]
    fn comparison_blocks_require_two_operands() {
        let tag = tag_with(&[("score", false)], Some("big"));
        assert_eq!(
            comparison_block(&tag, ">", "greaterThan").unwrap_err(),
            "The greaterThan helper requires options, e.g. {{#greaterThan option1 option2}}"
        );
    }
}
