//! Instruction text for the analysis capability
//!
//! The capability is stateless: the full refinement history is re-rendered
//! into the instructions on every call instead of keeping session state
//! server-side. Rendering is pure so refinement semantics stay testable
//! without a live model.

use crate::analysis::models::{ConversationMessage, Role};
use crate::analysis::vocab::Vocabularies;

/// Base analysis instructions, independent of conversation state.
const BASE_INSTRUCTIONS: &str = "Analyze the product image in detail and identify ALL visible clothing items and products separately.

For each item you detect:
- Identify the specific product type (e.g., t-shirt, jeans, sneakers, jacket)
- Determine the primary color and any secondary colors
- Identify the category and subcategory
- Detect the gender/demographic if discernible
- Identify any visible brand names or logos
- Describe the style, fit, material, and pattern
- Mark the most prominent item as \"primary\" and others as \"secondary\"

If the user states a price limit in words (e.g. \"under 50 pounds\"), set maxPrice/minPrice and the currency code on every item it applies to.

Be thorough and detect every visible clothing item or product in the image. If someone is wearing multiple items (e.g., shirt, pants, shoes, jacket), detect each one separately. Focus on visual details that would help someone search for similar products.";

/// Description of the JSON object the capability must return.
const RESPONSE_SHAPE: &str = "Respond with a single JSON object of the shape:
{\"items\": [{\"productType\": string, \"category\": string, \"subcategory\"?: string, \"color\": string, \"secondaryColors\"?: [string], \"gender\"?: \"Mens\"|\"Womens\"|\"Unisex\"|\"Kids\"|\"Boys\"|\"Girls\"|\"Unisex Adults\"|\"Unisex Kids\", \"brand\"?: string, \"style\"?: string, \"fit\"?: \"Slim Fit\"|\"Regular Fit\"|\"Relaxed Fit\"|\"Oversized\"|\"Tailored\", \"material\"?: string, \"pattern\"?: string, \"sleeveLength\"?: \"Sleeveless\"|\"Short Sleeve\"|\"3/4 Sleeve\"|\"Long Sleeve\", \"prominence\"?: \"primary\"|\"secondary\", \"maxPrice\"?: number, \"minPrice\"?: number, \"currency\"?: string, \"confidence\"?: number}], \"imageContext\"?: string}
with at least one item and no other text.";

/// Render the cumulative refinement history as a bulleted list.
///
/// All prior messages with role `user` and non-blank content are kept in
/// original order; the new refinement (if present) is appended as a final
/// distinguished entry. Returns `None` when there is nothing to render.
pub fn render_refinement_history(
    prior: &[ConversationMessage],
    new_refinement: Option<&str>,
) -> Option<String> {
    let mut lines: Vec<String> = prior
        .iter()
        .filter(|msg| msg.role == Role::User && !msg.content.trim().is_empty())
        .map(|msg| format!("- {}", msg.content.trim()))
        .collect();

    if let Some(refinement) = new_refinement {
        if !refinement.trim().is_empty() {
            lines.push(format!("- (latest) {}", refinement.trim()));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Build the full instruction text for one analysis call.
pub fn build_instructions(
    vocab: &Vocabularies,
    prior: &[ConversationMessage],
    new_refinement: Option<&str>,
) -> String {
    let mut sections = vec![BASE_INSTRUCTIONS.to_string()];

    if let Some(constraints) = vocab.render_constraints() {
        sections.push(format!("Use only these catalog values:\n{constraints}"));
    }

    if let Some(history) = render_refinement_history(prior, new_refinement) {
        sections.push(format!(
            "The user has refined the request across the conversation:\n{history}\n\nEvery refinement is strictly additive: never drop a previously stated constraint. Where the user explicitly states an attribute (e.g. \"everything red\"), that value overrides what the image shows for that attribute on all detected items; attributes the user has not stated are inferred from the image."
        ));
    }

    sections.push(RESPONSE_SHAPE.to_string());
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> ConversationMessage {
        ConversationMessage {
            role: Role::User,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_no_history_renders_none() {
        assert!(render_refinement_history(&[], None).is_none());
        assert!(render_refinement_history(&[], Some("   ")).is_none());
    }

    #[test]
    fn test_history_is_ordered_superset() {
        let prior = vec![
            user("blue only"),
            ConversationMessage {
                role: Role::Assistant,
                content: "found 3 items".to_string(),
            },
            user("  "),
            user("no logos"),
        ];

        let rendered = render_refinement_history(&prior, Some("under 50 pounds")).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines, vec![
            "- blue only",
            "- no logos",
            "- (latest) under 50 pounds",
        ]);
    }

    #[test]
    fn test_assistant_messages_are_excluded() {
        let prior = vec![ConversationMessage {
            role: Role::Assistant,
            content: "anything".to_string(),
        }];
        assert!(render_refinement_history(&prior, None).is_none());
    }

    #[test]
    fn test_instructions_contain_every_refinement() {
        let prior = vec![user("blue only")];
        let instructions =
            build_instructions(&Vocabularies::default(), &prior, Some("under 50 pounds"));

        assert!(instructions.contains("blue only"));
        assert!(instructions.contains("under 50 pounds"));
        assert!(instructions.contains("strictly additive"));
    }

    #[test]
    fn test_instructions_include_vocab_constraints() {
        let vocab = Vocabularies {
            brands: vec!["Nike".to_string()],
            ..Default::default()
        };
        let instructions = build_instructions(&vocab, &[], None);
        assert!(instructions.contains("brand must be one of: Nike"));
    }

    #[test]
    fn test_instructions_are_deterministic() {
        let prior = vec![user("blue only")];
        let a = build_instructions(&Vocabularies::default(), &prior, None);
        let b = build_instructions(&Vocabularies::default(), &prior, None);
        assert_eq!(a, b);
    }
}
