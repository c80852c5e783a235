//! Prompt Builder — pure interpolation of user field values into a mode's template.
//!
//! Values are inserted verbatim: no truncation, translation or escaping. Length
//! and tone limits are requested from the model in each template's rules
//! block; schema validation is the only hard backstop.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::orchestration::prompts::{
    CHATBOT_ANSWER_TEMPLATE, PRODUCT_LISTING_TEMPLATE, REVIEW_SUMMARY_TEMPLATE,
    TRANSLATION_TEMPLATE,
};
use crate::schema::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("{mode} requires input field '{field}'")]
    MissingField { mode: Mode, field: &'static str },
}

/// A named input a mode's template consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    /// Alternate keys accepted from callers (e.g. camelCase form clients).
    pub aliases: &'static [&'static str],
}

const fn input(name: &'static str) -> InputField {
    InputField { name, aliases: &[] }
}

const REVIEW_SUMMARY_INPUTS: &[InputField] = &[
    InputField {
        name: "product_name",
        aliases: &["productName"],
    },
    input("reviews"),
];

const TRANSLATION_INPUTS: &[InputField] = &[
    input("text"),
    InputField {
        name: "target_language",
        aliases: &["targetLanguage"],
    },
];

const CHATBOT_ANSWER_INPUTS: &[InputField] = &[
    InputField {
        name: "product_info",
        aliases: &["productInfo"],
    },
    input("reviews"),
    input("question"),
];

const PRODUCT_LISTING_INPUTS: &[InputField] = &[input("description")];

/// The input fields a mode requires.
pub fn required_inputs(mode: Mode) -> &'static [InputField] {
    match mode {
        Mode::ReviewSummary => REVIEW_SUMMARY_INPUTS,
        Mode::Translation => TRANSLATION_INPUTS,
        Mode::ChatbotAnswer => CHATBOT_ANSWER_INPUTS,
        Mode::ProductListing => PRODUCT_LISTING_INPUTS,
    }
}

fn template(mode: Mode) -> &'static str {
    match mode {
        Mode::ReviewSummary => REVIEW_SUMMARY_TEMPLATE,
        Mode::Translation => TRANSLATION_TEMPLATE,
        Mode::ChatbotAnswer => CHATBOT_ANSWER_TEMPLATE,
        Mode::ProductListing => PRODUCT_LISTING_TEMPLATE,
    }
}

/// Builds the task prompt for `mode` from the caller's field values.
///
/// Every required input must be present (under its name or an alias); empty
/// values are allowed and passed through as-is. Extra fields are ignored.
pub fn build_prompt(mode: Mode, fields: &BTreeMap<String, String>) -> Result<String, PromptError> {
    let mut values: BTreeMap<&'static str, &str> = BTreeMap::new();
    for input in required_inputs(mode) {
        let value = lookup(fields, input).ok_or(PromptError::MissingField {
            mode,
            field: input.name,
        })?;
        values.insert(input.name, value);
    }

    Ok(fill_template(template(mode), &values))
}

fn lookup<'a>(fields: &'a BTreeMap<String, String>, input: &InputField) -> Option<&'a str> {
    std::iter::once(input.name)
        .chain(input.aliases.iter().copied())
        .find_map(|key| fields.get(key))
        .map(String::as_str)
}

/// Single-pass `{name}` substitution. Inserted values are never rescanned, so
/// a review containing `{question}` stays literal. Unknown placeholders are
/// kept as written.
fn fill_template(template: &str, values: &BTreeMap<&'static str, &str>) -> String {
    let extra: usize = values.values().map(|v| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if values.contains_key(&after[..end]) => {
                out.push_str(values[&after[..end]]);
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_translation_prompt_interpolates_verbatim() {
        let prompt = build_prompt(
            Mode::Translation,
            &fields(&[("text", "Hello <b>world</b> & friends"), ("target_language", "Korean")]),
        )
        .unwrap();
        assert!(prompt.starts_with("Translate the following text to Korean."));
        assert!(prompt.contains("Text:\nHello <b>world</b> & friends\n"));
        assert!(prompt.contains("- Keep meaning faithful"));
    }

    #[test]
    fn test_camel_case_aliases_are_accepted() {
        let prompt = build_prompt(
            Mode::Translation,
            &fields(&[("text", "Hello"), ("targetLanguage", "Japanese")]),
        )
        .unwrap();
        assert!(prompt.contains("to Japanese."));
    }

    #[test]
    fn test_missing_field_is_reported() {
        let err = build_prompt(Mode::Translation, &fields(&[("text", "Hello")])).unwrap_err();
        assert_eq!(
            err,
            PromptError::MissingField {
                mode: Mode::Translation,
                field: "target_language"
            }
        );
    }

    #[test]
    fn test_empty_value_is_passed_through() {
        let prompt =
            build_prompt(Mode::ProductListing, &fields(&[("description", "")])).unwrap();
        assert!(prompt.contains("Product description:\n\n"));
    }

    #[test]
    fn test_placeholders_inside_values_are_not_expanded() {
        let prompt = build_prompt(
            Mode::ChatbotAnswer,
            &fields(&[
                ("product_info", "Toner {question}"),
                ("reviews", "Great {reviews}"),
                ("question", "Is it okay for sensitive skin?"),
            ]),
        )
        .unwrap();
        assert!(prompt.contains("Product info:\nToner {question}\n"));
        assert!(prompt.contains("Reviews:\nGreat {reviews}\n"));
    }

    #[test]
    fn test_review_summary_rules_block() {
        let prompt = build_prompt(
            Mode::ReviewSummary,
            &fields(&[
                ("product_name", "Dokdo Toner"),
                ("reviews", "Absorbs well.\nNo stickiness."),
            ]),
        )
        .unwrap();
        assert!(prompt.contains("Product: Dokdo Toner"));
        assert!(prompt.contains("Absorbs well.\nNo stickiness."));
        assert!(prompt.contains("max 3 each"));
    }

    #[test]
    fn test_product_listing_rules_block() {
        let prompt = build_prompt(
            Mode::ProductListing,
            &fields(&[("description", "A crimson hoodie for game day")]),
        )
        .unwrap();
        assert!(prompt.contains("Product description:\nA crimson hoodie for game day\n"));
        assert!(prompt.contains("ending with #GoUtes"));
        assert!(prompt.contains("at least $5"));
    }

    #[test]
    fn test_every_template_placeholder_is_a_declared_input() {
        for mode in Mode::ALL {
            let all: BTreeMap<String, String> = required_inputs(mode)
                .iter()
                .map(|i| (i.name.to_string(), "x".to_string()))
                .collect();
            let prompt = build_prompt(mode, &all).unwrap();
            for input in required_inputs(mode) {
                assert!(
                    !prompt.contains(&format!("{{{}}}", input.name)),
                    "{mode}: placeholder {} left unfilled",
                    input.name
                );
            }
        }
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let values = BTreeMap::from([("a", "1")]);
        assert_eq!(fill_template("{a} {b} {", &values), "1 {b} {");
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let input = fields(&[("description", "A crimson hoodie")]);
        assert_eq!(
            build_prompt(Mode::ProductListing, &input),
            build_prompt(Mode::ProductListing, &input)
        );
    }
}
