//! Judgment and comparison task templates.
//!
//! Every evaluator must render these byte-for-byte identically, otherwise
//! independent evaluations stop being comparable.

use super::acquire::{ContentSource, Material};

/// Fetched content beyond this many characters is not shown to the judge.
pub const MAX_CONTENT_CHARS: usize = 8000;

pub fn judgment_task(material: &Material, required_topic: &str, content_url: &str) -> String {
    let content_header = if material.source == ContentSource::UrlOnly {
        ""
    } else {
        "Fetched Content:"
    };
    let content: String = material.body.chars().take(MAX_CONTENT_CHARS).collect();

    format!(
        "\nYou are evaluating if content is related to a topic for a rewards program.\n\
         Data source: {}\n\
         \n\
         Required Topic: {}\n\
         \n\
         Content URL: {}\n\
         \n\
         {}\n\
         {}\n\
         \n\
         VALIDATION RULES:\n\
         1. If the URL contains keywords related to the topic - ACCEPT\n\
         2. If the fetched content mentions the topic - ACCEPT\n\
         3. Social media posts about the topic ARE VALID even if brief\n\
         4. Only REJECT if clearly unrelated or spam\n\
         5. When in doubt, ACCEPT\n\
         \n\
         Answer only: YES or NO\n",
        material.source.label(),
        required_topic,
        content_url,
        content_header,
        content
    )
}

pub fn comparison_task(principal: &str, other: &str) -> String {
    format!(
        "\nTwo validators evaluated whether content is related to a topic.\n\
         Do they reach the same conclusion (both accept OR both reject)?\n\
         \n\
         Validator 1 said: {}\n\
         Validator 2 said: {}\n\
         \n\
         Answer only YES if they agree, NO if they disagree.\n",
        principal, other
    )
}
