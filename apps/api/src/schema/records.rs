//! Typed output records. Fields are private: the only way to obtain one is
//! `OutputSchema::validate`, so a record always satisfies its schema.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Mixed,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Mixed => "mixed",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "mixed" => Ok(Sentiment::Mixed),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub(super) overall_sentiment: Sentiment,
    pub(super) one_line_summary: String,
    pub(super) pros: Vec<String>,
    pub(super) cons: Vec<String>,
    pub(super) cautions: Vec<String>,
}

impl ReviewSummary {
    pub fn overall_sentiment(&self) -> Sentiment {
        self.overall_sentiment
    }

    pub fn one_line_summary(&self) -> &str {
        &self.one_line_summary
    }

    pub fn pros(&self) -> &[String] {
        &self.pros
    }

    pub fn cons(&self) -> &[String] {
        &self.cons
    }

    pub fn cautions(&self) -> &[String] {
        &self.cautions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub(super) translated_text: String,
    pub(super) brief_notes: Option<String>,
}

impl Translation {
    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn brief_notes(&self) -> Option<&str> {
        self.brief_notes.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatbotAnswer {
    pub(super) answer: String,
    pub(super) follow_up_question: Option<String>,
    pub(super) safety_note: String,
}

impl ChatbotAnswer {
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn follow_up_question(&self) -> Option<&str> {
        self.follow_up_question.as_deref()
    }

    pub fn safety_note(&self) -> &str {
        &self.safety_note
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    pub(super) product_name: String,
    pub(super) marketing_copy: String,
    /// USD, never below `MIN_PRICE_USD`.
    pub(super) price: f64,
}

impl ProductListing {
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn marketing_copy(&self) -> &str {
        &self.marketing_copy
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A completion that satisfied its mode's schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidatedResult {
    ReviewSummary(ReviewSummary),
    Translation(Translation),
    ChatbotAnswer(ChatbotAnswer),
    ProductListing(ProductListing),
}

impl ValidatedResult {
    pub fn mode(&self) -> Mode {
        match self {
            ValidatedResult::ReviewSummary(_) => Mode::ReviewSummary,
            ValidatedResult::Translation(_) => Mode::Translation,
            ValidatedResult::ChatbotAnswer(_) => Mode::ChatbotAnswer,
            ValidatedResult::ProductListing(_) => Mode::ProductListing,
        }
    }
}
