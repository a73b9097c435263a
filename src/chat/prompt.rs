//! Persona preambles and prompt assembly for chat turns.

use crate::classifier::Intent;
use crate::garden::model::{ChatTurn, Plant};
use crate::llm::ChatPrompt;

/// Preamble for the default assistant.
pub const ASSISTANT_PERSONA: &str = "You are a helpful AI assistant integrated into a task management app. \
Be conversational, concise, and supportive. Keep responses brief (1-3 sentences usually) unless the user \
specifically asks for detailed help.";

/// Preamble for Harold, the gardener persona.
pub const GARDENER_PERSONA: &str = "You are Harold, an experienced task management assistant who helps users \
organize their work. You're practical, encouraging, and straightforward. You provide helpful advice about \
productivity and task management.

Personality traits:
- Professional but friendly
- Focuses on practical solutions
- Encouraging and supportive
- Clear and concise communication
- Helps with productivity strategies

Keep responses conversational and helpful (1-3 sentences usually). Focus on being useful rather than using \
garden metaphors.";

/// Build the prompt for one chat turn.
pub fn build_prompt(
    message: &str,
    recent: &[ChatTurn],
    planted: Option<&Plant>,
    is_gardener: bool,
) -> ChatPrompt {
    let persona = if is_gardener {
        GARDENER_PERSONA
    } else {
        ASSISTANT_PERSONA
    };

    let mut user = format!("User's message: \"{message}\"");

    if !recent.is_empty() {
        user.push_str("\n\nRecent conversation:\n");
        let lines: Vec<String> = recent
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
            .collect();
        user.push_str(&lines.join("\n"));
    }

    if let Some(plant) = planted {
        user.push_str(&format!(
            "\n\nNote: I've already added \"{}\" as a {} {} task to their task list.",
            plant.description, plant.status, plant.size
        ));
    }

    user.push_str("\n\nRespond naturally and helpfully:");

    ChatPrompt::new(user).with_system(persona)
}

/// Suffix appended to the reply when a chat message planted a task.
pub fn planted_confirmation(plant: &Plant) -> String {
    let (emoji, label) = match plant.status {
        Intent::Completed => ("✅", "completed"),
        Intent::InProgress => ("🔄", "in-progress"),
        Intent::Todo => ("➕", "new"),
    };
    format!(
        " {emoji} I've added \"{}\" as a {label} task!",
        plant.description
    )
}
