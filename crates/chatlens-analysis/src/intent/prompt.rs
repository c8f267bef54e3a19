//! Fixed instruction prompt and structured-output schema for intent requests.

use super::IntentLabel;
use serde_json::{Value, json};

/// Name of the structured-output object requested from the model.
pub const SCHEMA_NAME: &str = "classify_user_intent";

/// Build the system instruction listing every label with its description.
pub fn system_prompt() -> String {
    let mut prompt = String::from(
        "You are an intent classification system. The correctness of the classification is crucial.\n\n\
         These are the intents and when they apply:\n",
    );

    for label in IntentLabel::ALL {
        prompt.push_str(&format!("- {}: when {}.\n", label.as_str(), label.description()));
    }

    prompt.push_str(
        "\nClassify the user query into exactly one of these intents. \
         Respond only with the intent class. If the query matches none of the descriptions, \
         answer 'Miscellaneous'. Never invent a class that is not listed above.\n",
    );
    prompt
}

/// User turn wrapping the message to classify.
pub fn user_message(text: &str) -> String {
    format!("User question: {text}")
}

/// JSON schema of the single-field `{ "intent": <label> }` answer.
pub fn intent_schema() -> Value {
    let names: Vec<&str> = IntentLabel::ALL.iter().map(IntentLabel::as_str).collect();
    json!({
        "type": "object",
        "description": "An enum value to classify user intent.",
        "properties": {
            "intent": {
                "type": "string",
                "enum": names,
                "description": format!(
                    "The classified intent of the user query, must be one of: {}.",
                    names.join(", ")
                ),
            }
        },
        "required": ["intent"],
        "additionalProperties": false,
    })
}
