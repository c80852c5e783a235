//! Presentation boundary: turns a `ValidatedResult` or `OrchestrationError`
//! into an HTML card fragment.
//!
//! HARD RULE: every model- or user-supplied string is passed through
//! `escape_html` before it is interpolated. Markup below is static.

use crate::orchestration::OrchestrationError;
use crate::schema::{ChatbotAnswer, ProductListing, ReviewSummary, Translation, ValidatedResult};

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps a body in the shared card chrome. `title` and `badge` are escaped;
/// `body_html` must already be safe.
fn card(title: &str, badge: &str, body_html: &str) -> String {
    format!(
        "<div class=\"card\">\
         <div class=\"card-header\">\
         <div class=\"card-title\">{}</div>\
         <div class=\"card-badge\">{}</div>\
         </div>{body_html}</div>",
        escape_html(title),
        escape_html(badge),
    )
}

fn list_html(items: &[String]) -> String {
    let mut out = String::from("<ul>");
    for item in items {
        out.push_str(&format!("<li>{}</li>", escape_html(item)));
    }
    out.push_str("</ul>");
    out
}

/// Renders a successful result as a card.
pub fn render_result(result: &ValidatedResult) -> String {
    match result {
        ValidatedResult::ReviewSummary(r) => card("Review Summary", "AI", &review_body(r)),
        ValidatedResult::Translation(t) => card("Translation", "AI", &translation_body(t)),
        ValidatedResult::ChatbotAnswer(c) => card("AI Chatbot", "AI", &chatbot_body(c)),
        ValidatedResult::ProductListing(p) => card("Product Listing", "AI", &listing_body(p)),
    }
}

fn review_body(r: &ReviewSummary) -> String {
    let mut body = format!(
        "<div class=\"meta\">Sentiment: <b>{}</b></div>\
         <div class=\"panel\"><b>One-line</b><br>{}</div>\
         <div class=\"grid\">\
         <div class=\"panel\"><b>Pros</b>{}</div>\
         <div class=\"panel\"><b>Cons</b>{}</div>\
         </div>",
        r.overall_sentiment(),
        escape_html(r.one_line_summary()),
        list_html(r.pros()),
        list_html(r.cons()),
    );
    if !r.cautions().is_empty() {
        body.push_str(&format!(
            "<div class=\"panel\"><b>Cautions</b>{}</div>",
            list_html(r.cautions())
        ));
    }
    body
}

fn translation_body(t: &Translation) -> String {
    let mut body = format!(
        "<div class=\"panel pre\">{}</div>",
        escape_html(t.translated_text())
    );
    if let Some(notes) = t.brief_notes() {
        body.push_str(&format!(
            "<div class=\"meta\"><b>Notes</b>: {}</div>",
            escape_html(notes)
        ));
    }
    body
}

fn chatbot_body(c: &ChatbotAnswer) -> String {
    let mut body = format!(
        "<div class=\"panel pre\"><b>Answer</b><br>{}</div>",
        escape_html(c.answer())
    );
    if let Some(question) = c.follow_up_question() {
        body.push_str(&format!(
            "<div class=\"meta\"><b>Follow-up</b>: {}</div>",
            escape_html(question)
        ));
    }
    body.push_str(&format!(
        "<div class=\"meta\"><b>Safety</b>: {}</div>",
        escape_html(c.safety_note())
    ));
    body
}

fn listing_body(p: &ProductListing) -> String {
    format!(
        "<h2>{}</h2><div class=\"price\">${:.2}</div><p class=\"copy\">{}</p>",
        escape_html(p.product_name()),
        p.price(),
        escape_html(p.marketing_copy()),
    )
}

/// Renders a failure as a card. The headline is the kind-specific user
/// message; the detail line is the (escaped) error text.
pub fn render_error(error: &OrchestrationError) -> String {
    let body = format!(
        "<div class=\"error\" data-kind=\"{}\">\
         <div class=\"error-message\">{}</div>\
         <div class=\"error-detail\">{}</div>\
         </div>",
        escape_html(&format!("{:?}", error.kind())),
        escape_html(error.kind().user_message()),
        escape_html(&error.to_string()),
    );
    card("Error", "AI", &body)
}
