//! Local enforcement of an `OutputSchema` against a raw decoded response.
//!
//! The backend's structured-output feature is only a hint. Every response is
//! checked here before a `ValidatedResult` exists; a response that breaks any
//! constraint is rejected whole, never truncated or coerced.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use super::records::{
    ChatbotAnswer, ProductListing, ReviewSummary, Sentiment, Translation, ValidatedResult,
};
use super::{FieldKind, FieldSpec, Mode, OutputSchema};

/// The response did not satisfy its declared schema. Lists every offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("response does not match the {schema} schema: {}", .problems.join("; "))]
pub struct SchemaViolation {
    pub schema: &'static str,
    pub problems: Vec<String>,
}

impl SchemaViolation {
    pub fn new(schema: &'static str, problem: impl Into<String>) -> Self {
        Self {
            schema,
            problems: vec![problem.into()],
        }
    }
}

/// A field value that already passed its `FieldKind` check.
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    OptionalText(Option<String>),
    List(Vec<String>),
    Number(f64),
}

impl OutputSchema {
    /// Validates `raw` against this schema and builds the typed record.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedResult, SchemaViolation> {
        let mut fields = check_fields(self, raw)?;

        let result = match self.mode {
            Mode::ReviewSummary => ValidatedResult::ReviewSummary(ReviewSummary {
                overall_sentiment: fields.sentiment(self, "overall_sentiment")?,
                one_line_summary: fields.text(self, "one_line_summary")?,
                pros: fields.list(self, "pros")?,
                cons: fields.list(self, "cons")?,
                cautions: fields.list(self, "cautions")?,
            }),
            Mode::Translation => ValidatedResult::Translation(Translation {
                translated_text: fields.text(self, "translated_text")?,
                brief_notes: fields.optional_text(self, "brief_notes")?,
            }),
            Mode::ChatbotAnswer => ValidatedResult::ChatbotAnswer(ChatbotAnswer {
                answer: fields.text(self, "answer")?,
                follow_up_question: fields.optional_text(self, "follow_up_question")?,
                safety_note: fields.text(self, "safety_note")?,
            }),
            Mode::ProductListing => ValidatedResult::ProductListing(ProductListing {
                product_name: fields.text(self, "product_name")?,
                marketing_copy: fields.text(self, "marketing_copy")?,
                price: fields.number(self, "price")?,
            }),
        };

        Ok(result)
    }
}

/// Checks every declared field, collecting all problems before failing.
fn check_fields(schema: &OutputSchema, raw: &Value) -> Result<CheckedFields, SchemaViolation> {
    let object = raw.as_object().ok_or_else(|| {
        SchemaViolation::new(
            schema.name,
            format!("expected a JSON object, got {}", json_type(raw)),
        )
    })?;

    let mut values = BTreeMap::new();
    let mut problems = Vec::new();

    for spec in schema.fields {
        match check_field(spec, object.get(spec.name)) {
            Ok(value) => {
                values.insert(spec.name, value);
            }
            Err(problem) => problems.push(format!("{}: {problem}", spec.name)),
        }
    }

    if problems.is_empty() {
        Ok(CheckedFields(values))
    } else {
        Err(SchemaViolation {
            schema: schema.name,
            problems,
        })
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Result<FieldValue, String> {
    match spec.kind {
        FieldKind::RequiredText => match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(FieldValue::Text(s.clone())),
            Some(Value::String(_)) => Err("must not be empty".to_string()),
            Some(other) => Err(format!("expected string, got {}", json_type(other))),
            None => Err("missing required field".to_string()),
        },
        FieldKind::OptionalText => match value {
            None | Some(Value::Null) => Ok(FieldValue::OptionalText(None)),
            Some(Value::String(s)) => Ok(FieldValue::OptionalText(Some(s.clone()))),
            Some(other) => Err(format!("expected string or null, got {}", json_type(other))),
        },
        FieldKind::TextList {
            max_items,
            required,
        } => match value {
            None | Some(Value::Null) if !required => Ok(FieldValue::List(Vec::new())),
            None => Err("missing required field".to_string()),
            Some(Value::Array(items)) => {
                if items.len() > max_items {
                    return Err(format!(
                        "has {} items, at most {max_items} allowed",
                        items.len()
                    ));
                }
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(format!(
                            "item {i} expected string, got {}",
                            json_type(other)
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::List)
            }
            Some(other) => Err(format!("expected array, got {}", json_type(other))),
        },
        FieldKind::OneOf(allowed) => match value {
            Some(Value::String(s)) if allowed.contains(&s.as_str()) => {
                Ok(FieldValue::Text(s.clone()))
            }
            Some(Value::String(s)) => Err(format!(
                "'{s}' is not one of [{}]",
                allowed.join(", ")
            )),
            Some(other) => Err(format!("expected string, got {}", json_type(other))),
            None => Err("missing required field".to_string()),
        },
        FieldKind::Number { min } => match value {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(x) if x.is_finite() && x >= min => Ok(FieldValue::Number(x)),
                Some(x) => Err(format!("{x} is below the minimum of {min}")),
                None => Err("not representable as a number".to_string()),
            },
            Some(other) => Err(format!("expected number, got {}", json_type(other))),
            None => Err("missing required field".to_string()),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Field values that passed validation, consumed while building the record.
struct CheckedFields(BTreeMap<&'static str, FieldValue>);

impl CheckedFields {
    fn take(&mut self, schema: &OutputSchema, name: &str) -> Result<FieldValue, SchemaViolation> {
        self.0.remove(name).ok_or_else(|| {
            SchemaViolation::new(schema.name, format!("{name}: not declared in schema"))
        })
    }

    fn text(&mut self, schema: &OutputSchema, name: &str) -> Result<String, SchemaViolation> {
        match self.take(schema, name)? {
            FieldValue::Text(s) => Ok(s),
            other => Err(mismatch(schema, name, &other)),
        }
    }

    fn optional_text(
        &mut self,
        schema: &OutputSchema,
        name: &str,
    ) -> Result<Option<String>, SchemaViolation> {
        match self.take(schema, name)? {
            FieldValue::OptionalText(s) => Ok(s),
            other => Err(mismatch(schema, name, &other)),
        }
    }

    fn list(&mut self, schema: &OutputSchema, name: &str) -> Result<Vec<String>, SchemaViolation> {
        match self.take(schema, name)? {
            FieldValue::List(items) => Ok(items),
            other => Err(mismatch(schema, name, &other)),
        }
    }

    fn number(&mut self, schema: &OutputSchema, name: &str) -> Result<f64, SchemaViolation> {
        match self.take(schema, name)? {
            FieldValue::Number(x) => Ok(x),
            other => Err(mismatch(schema, name, &other)),
        }
    }

    fn sentiment(
        &mut self,
        schema: &OutputSchema,
        name: &str,
    ) -> Result<Sentiment, SchemaViolation> {
        let text = self.text(schema, name)?;
        text.parse().map_err(|_| {
            SchemaViolation::new(schema.name, format!("{name}: '{text}' is not a sentiment"))
        })
    }
}

fn mismatch(schema: &OutputSchema, name: &str, value: &FieldValue) -> SchemaViolation {
    SchemaViolation::new(
        schema.name,
        format!("{name}: declared kind does not match record field ({value:?})"),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{
        CHATBOT_ANSWER_SCHEMA, PRODUCT_LISTING_SCHEMA, REVIEW_SUMMARY_SCHEMA, TRANSLATION_SCHEMA,
    };

    fn review_json() -> Value {
        json!({
            "overall_sentiment": "positive",
            "one_line_summary": "Gentle, hydrating toner that suits sensitive skin.",
            "pros": ["absorbs quickly", "no stickiness", "good for all seasons"],
            "cons": ["can feel dry in winter"],
            "cautions": []
        })
    }

    #[test]
    fn test_valid_review_summary_builds_record() {
        let result = REVIEW_SUMMARY_SCHEMA.validate(&review_json()).unwrap();
        let ValidatedResult::ReviewSummary(summary) = result else {
            panic!("expected a review summary");
        };
        assert_eq!(summary.overall_sentiment(), Sentiment::Positive);
        assert_eq!(summary.pros().len(), 3);
        assert_eq!(summary.cons(), ["can feel dry in winter".to_string()]);
        assert!(summary.cautions().is_empty());
    }

    #[test]
    fn test_sentiment_outside_enum_is_rejected() {
        let mut raw = review_json();
        raw["overall_sentiment"] = json!("great");
        let err = REVIEW_SUMMARY_SCHEMA.validate(&raw).unwrap_err();
        assert_eq!(err.schema, "review_summary");
        assert!(err.problems[0].starts_with("overall_sentiment"));

        raw["overall_sentiment"] = json!("neutral");
        assert!(REVIEW_SUMMARY_SCHEMA.validate(&raw).is_err());
    }

    #[test]
    fn test_too_many_pros_is_rejected_not_truncated() {
        let mut raw = review_json();
        raw["pros"] = json!(["a", "b", "c", "d", "e"]);
        let err = REVIEW_SUMMARY_SCHEMA.validate(&raw).unwrap_err();
        assert_eq!(err.problems, vec!["pros: has 5 items, at most 3 allowed"]);
    }

    #[test]
    fn test_every_problem_is_reported() {
        let raw = json!({
            "overall_sentiment": "great",
            "one_line_summary": "   ",
            "pros": ["a", "b", "c", "d"],
            "cons": "none",
            "cautions": [1]
        });
        let err = REVIEW_SUMMARY_SCHEMA.validate(&raw).unwrap_err();
        assert_eq!(err.problems.len(), 5);
    }

    #[test]
    fn test_cautions_may_be_omitted_but_pros_may_not() {
        let mut raw = review_json();
        raw.as_object_mut().unwrap().remove("cautions");
        assert!(REVIEW_SUMMARY_SCHEMA.validate(&raw).is_ok());

        raw.as_object_mut().unwrap().remove("pros");
        let err = REVIEW_SUMMARY_SCHEMA.validate(&raw).unwrap_err();
        assert_eq!(err.problems, vec!["pros: missing required field"]);
    }

    #[test]
    fn test_translation_with_null_notes() {
        let raw = json!({ "translated_text": "안녕하세요", "brief_notes": null });
        let result = TRANSLATION_SCHEMA.validate(&raw).unwrap();
        let ValidatedResult::Translation(t) = result else {
            panic!("expected a translation");
        };
        assert_eq!(t.translated_text(), "안녕하세요");
        assert_eq!(t.brief_notes(), None);
    }

    #[test]
    fn test_empty_translation_is_rejected() {
        let raw = json!({ "translated_text": "" });
        assert!(TRANSLATION_SCHEMA.validate(&raw).is_err());
    }

    #[test]
    fn test_chatbot_requires_safety_note() {
        let raw = json!({
            "answer": "Yes, reviewers with sensitive skin report no irritation.",
            "follow_up_question": null
        });
        let err = CHATBOT_ANSWER_SCHEMA.validate(&raw).unwrap_err();
        assert_eq!(err.problems, vec!["safety_note: missing required field"]);
    }

    #[test]
    fn test_price_below_minimum_is_rejected() {
        let raw = json!({
            "product_name": "Crimson U Hoodie",
            "marketing_copy": "Stay warm on game day. #GoUtes",
            "price": 4.99
        });
        let err = PRODUCT_LISTING_SCHEMA.validate(&raw).unwrap_err();
        assert!(err.problems[0].starts_with("price: 4.99 is below"));
    }

    #[test]
    fn test_price_at_minimum_is_accepted() {
        let raw = json!({
            "product_name": "Crimson U Hoodie",
            "marketing_copy": "Stay warm on game day. #GoUtes",
            "price": 5
        });
        let ValidatedResult::ProductListing(listing) =
            PRODUCT_LISTING_SCHEMA.validate(&raw).unwrap()
        else {
            panic!("expected a listing");
        };
        assert_eq!(listing.price(), 5.0);
    }

    #[test]
    fn test_non_object_response_is_rejected() {
        let err = TRANSLATION_SCHEMA.validate(&json!(["hello"])).unwrap_err();
        assert_eq!(err.problems, vec!["expected a JSON object, got array"]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = json!({ "translated_text": "Bonjour", "brief_notes": null, "extra": 1 });
        assert!(TRANSLATION_SCHEMA.validate(&raw).is_ok());
    }
}
