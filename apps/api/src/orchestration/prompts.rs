// All task prompt templates for the orchestration modes.
// Placeholders are `{input_name}` and are filled by builder::build_prompt in
// a single pass, so field values are inserted verbatim.

/// Review summary prompt. Inputs: {product_name}, {reviews}
pub const REVIEW_SUMMARY_TEMPLATE: &str = r#"Summarize customer reviews for this product.

Product: {product_name}
Reviews:
{reviews}

Rules:
- pros/cons/cautions: max 3 each
- neutral, practical tone
- no marketing hype"#;

/// Translation prompt. Inputs: {target_language}, {text}
pub const TRANSLATION_TEMPLATE: &str = r#"Translate the following text to {target_language}.

Text:
{text}

Rules:
- Keep meaning faithful
- Keep it natural
- Put remarks on nuance or terminology in brief_notes, otherwise set it to null"#;

/// Chatbot answer prompt. Inputs: {product_info}, {reviews}, {question}
pub const CHATBOT_ANSWER_TEMPLATE: &str = r#"You are an in-store assistant. Answer the customer's question using only the product info and reviews below.

Product info:
{product_info}

Reviews:
{reviews}

Customer question:
{question}

Rules:
- answer: 2-4 sentences, in the customer's language if the question is written in it
- If info is missing, say what's missing briefly and ask a follow_up_question; otherwise set follow_up_question to null
- Always include a short safety_note (patch test / irritation caution when relevant)"#;

/// Product listing prompt. Inputs: {description}
pub const PRODUCT_LISTING_TEMPLATE: &str = r#"Create a store listing for the product described below.

Product description:
{description}

Rules:
- product_name: a professional product name
- marketing_copy: exactly 2 sentences, spirited on-brand tone, ending with #GoUtes
- price: a realistic price in USD, at least $5"#;
