//! Schema Registry — the declared output shape of every orchestration mode.
//!
//! Schemas are immutable `'static` data. The completion client receives one by
//! reference and is the only place that enforces it (see `validation.rs`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

pub mod records;
pub mod validation;

pub use records::{
    ChatbotAnswer, ProductListing, ReviewSummary, Sentiment, Translation, ValidatedResult,
};
pub use validation::SchemaViolation;

/// Max items the model may return for any pros / cons / cautions list.
pub const MAX_LIST_ITEMS: usize = 3;

/// Lower bound for a generated listing price, in USD.
pub const MIN_PRICE_USD: f64 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Mode
// ────────────────────────────────────────────────────────────────────────────

/// The task an orchestration call performs. Selects both the prompt template
/// and the output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    ReviewSummary,
    Translation,
    ChatbotAnswer,
    ProductListing,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::ReviewSummary,
        Mode::Translation,
        Mode::ChatbotAnswer,
        Mode::ProductListing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ReviewSummary => "review_summary",
            Mode::Translation => "translation",
            Mode::ChatbotAnswer => "chatbot_answer",
            Mode::ProductListing => "product_listing",
        }
    }

    /// The single output schema this mode maps to.
    pub fn schema(&self) -> &'static OutputSchema {
        match self {
            Mode::ReviewSummary => &REVIEW_SUMMARY_SCHEMA,
            Mode::Translation => &TRANSLATION_SCHEMA,
            Mode::ChatbotAnswer => &CHATBOT_ANSWER_SCHEMA,
            Mode::ProductListing => &PRODUCT_LISTING_SCHEMA,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown mode '{0}' (expected one of: review_summary, translation, chatbot_answer, product_listing)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field declarations
// ────────────────────────────────────────────────────────────────────────────

/// Semantic type and constraint of a single output field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Non-empty (after trimming) string. Must be present.
    RequiredText,
    /// String or null. May be absent.
    OptionalText,
    /// Array of strings with at most `max_items` entries.
    /// When `required` is false an absent or null value reads as empty.
    TextList { max_items: usize, required: bool },
    /// String drawn from a closed value set.
    OneOf(&'static [&'static str]),
    /// Finite number `>= min`.
    Number { min: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

/// A declared record shape. Pure data; no behavior beyond describing itself.
#[derive(Debug, PartialEq)]
pub struct OutputSchema {
    pub mode: Mode,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl OutputSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// JSON Schema document sent to the backend as the structured-output hint.
    ///
    /// Strict-mode structured output requires every property to be listed in
    /// `required`, so optional fields are expressed as nullable instead.
    /// Length caps and numeric bounds are carried in the descriptions; they
    /// are enforced locally, not by the backend.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            properties.insert(field.name.to_string(), field_json_schema(field));
        }
        let required: Vec<&str> = self.fields.iter().map(|f| f.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}

fn field_json_schema(field: &FieldSpec) -> Value {
    match field.kind {
        FieldKind::RequiredText => json!({
            "type": "string",
            "description": field.description
        }),
        FieldKind::OptionalText => json!({
            "type": ["string", "null"],
            "description": field.description
        }),
        FieldKind::TextList { max_items, .. } => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": format!("{} (at most {max_items} items)", field.description)
        }),
        FieldKind::OneOf(values) => json!({
            "type": "string",
            "enum": values,
            "description": field.description
        }),
        FieldKind::Number { min } => json!({
            "type": "number",
            "description": format!("{} (must be at least {min})", field.description)
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

pub const SENTIMENT_VALUES: &[&str] = &["positive", "mixed", "negative"];

pub static REVIEW_SUMMARY_SCHEMA: OutputSchema = OutputSchema {
    mode: Mode::ReviewSummary,
    name: "review_summary",
    fields: &[
        FieldSpec {
            name: "overall_sentiment",
            description: "Overall sentiment across all reviews",
            kind: FieldKind::OneOf(SENTIMENT_VALUES),
        },
        FieldSpec {
            name: "one_line_summary",
            description: "One sentence summary",
            kind: FieldKind::RequiredText,
        },
        FieldSpec {
            name: "pros",
            description: "Top pros",
            kind: FieldKind::TextList {
                max_items: MAX_LIST_ITEMS,
                required: true,
            },
        },
        FieldSpec {
            name: "cons",
            description: "Top cons",
            kind: FieldKind::TextList {
                max_items: MAX_LIST_ITEMS,
                required: true,
            },
        },
        FieldSpec {
            name: "cautions",
            description: "Potential cautions",
            kind: FieldKind::TextList {
                max_items: MAX_LIST_ITEMS,
                required: false,
            },
        },
    ],
};

pub static TRANSLATION_SCHEMA: OutputSchema = OutputSchema {
    mode: Mode::Translation,
    name: "translation",
    fields: &[
        FieldSpec {
            name: "translated_text",
            description: "Translated text",
            kind: FieldKind::RequiredText,
        },
        FieldSpec {
            name: "brief_notes",
            description: "Optional short notes about nuance or terminology",
            kind: FieldKind::OptionalText,
        },
    ],
};

pub static CHATBOT_ANSWER_SCHEMA: OutputSchema = OutputSchema {
    mode: Mode::ChatbotAnswer,
    name: "chatbot_answer",
    fields: &[
        FieldSpec {
            name: "answer",
            description: "Answer in 2-4 sentences",
            kind: FieldKind::RequiredText,
        },
        FieldSpec {
            name: "follow_up_question",
            description: "One short follow-up question if information is missing",
            kind: FieldKind::OptionalText,
        },
        FieldSpec {
            name: "safety_note",
            description: "One short safety note (e.g., patch test)",
            kind: FieldKind::RequiredText,
        },
    ],
};

pub static PRODUCT_LISTING_SCHEMA: OutputSchema = OutputSchema {
    mode: Mode::ProductListing,
    name: "product_listing",
    fields: &[
        FieldSpec {
            name: "product_name",
            description: "Professional product name",
            kind: FieldKind::RequiredText,
        },
        FieldSpec {
            name: "marketing_copy",
            description: "Two sentences of marketing copy, ending with #GoUtes",
            kind: FieldKind::RequiredText,
        },
        FieldSpec {
            name: "price",
            description: "Price in USD",
            kind: FieldKind::Number { min: MIN_PRICE_USD },
        },
    ],
};
