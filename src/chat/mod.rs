//! Chat turns with the garden assistant.
//!
//! One turn: classify the message, plant any detected task, ask the LLM for a
//! reply, append a planting confirmation, and record both sides of the
//! exchange in the user's history.

pub mod prompt;

use std::sync::Arc;

use tracing::{info, warn};

use crate::classifier::{self, ClassificationResult};
use crate::error::LlmError;
use crate::garden::model::{ChatRole, ChatTurn, Plant};
use crate::garden::store::GardenStore;
use crate::llm::LlmProvider;

/// Number of prior turns quoted back to the model.
pub const RECENT_CONTEXT: usize = 6;

/// Reply shown to the user when the model cannot be reached.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

/// An inbound chat message.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub user_id: String,
    pub username: Option<String>,
    pub message: String,
    /// Talk to Harold instead of the default assistant.
    pub is_gardener: bool,
}

/// Result of a successful chat turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub plant: Option<Plant>,
    pub garden: Vec<Plant>,
}

/// Orchestrates chat turns against the store and an LLM.
pub struct ChatService {
    store: Arc<GardenStore>,
    llm: Arc<dyn LlmProvider>,
}

impl ChatService {
    pub fn new(store: Arc<GardenStore>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { store, llm }
    }

    /// Handle one chat message.
    ///
    /// A detected task stays planted even when the model call fails.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatOutcome, LlmError> {
        let user_id = request.user_id.as_str();
        self.store
            .ensure_user(user_id, request.username.as_deref())
            .await;

        let recent = self.store.recent_history(user_id, RECENT_CONTEXT).await;

        let plant = match classifier::classify(&request.message) {
            Some(ClassificationResult {
                intent,
                description,
                size,
            }) => Some(self.store.plant(user_id, &description, size, intent).await),
            None => None,
        };

        let prompt = prompt::build_prompt(
            &request.message,
            &recent,
            plant.as_ref(),
            request.is_gardener,
        );

        let mut reply = match self.llm.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    model = self.llm.model_name(),
                    error = %e,
                    "Chat completion failed"
                );
                return Err(e);
            }
        };

        if let Some(ref plant) = plant {
            reply.push_str(&prompt::planted_confirmation(plant));
        }

        let reply_role = if request.is_gardener {
            ChatRole::Harold
        } else {
            ChatRole::Assistant
        };
        self.store
            .record_turns(
                user_id,
                [
                    ChatTurn::new(ChatRole::User, request.message.as_str()),
                    ChatTurn::new(reply_role, reply.as_str()),
                ],
            )
            .await;

        info!(
            user_id = %user_id,
            plant_added = plant.is_some(),
            reply_len = reply.len(),
            "Chat turn handled"
        );

        Ok(ChatOutcome {
            reply,
            plant,
            garden: self.store.garden(user_id).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::classifier::{Intent, TaskSize};
    use crate::llm::ChatPrompt;

    /// Records prompts and answers with a fixed reply (or fails).
    struct StubLlm {
        reply: Option<String>,
        prompts: Mutex<Vec<ChatPrompt>>,
    }

    impl StubLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, prompt: ChatPrompt) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt);
            self.reply.clone().ok_or_else(|| LlmError::RequestFailed {
                provider: "stub".to_string(),
                reason: "no reply configured".to_string(),
            })
        }
    }

    fn request(user_id: &str, message: &str, is_gardener: bool) -> ChatRequest {
        ChatRequest {
            user_id: user_id.to_string(),
            username: Some("rosa".to_string()),
            message: message.to_string(),
            is_gardener,
        }
    }

    #[tokio::test]
    async fn task_message_plants_and_confirms() {
        let store = GardenStore::new();
        let llm = StubLlm::replying("Good luck!");
        let service = ChatService::new(Arc::clone(&store), llm.clone());

        let outcome = service
            .handle(request("u1", "I need to call mom", false))
            .await
            .unwrap();

        let plant = outcome.plant.expect("plant expected");
        assert_eq!(plant.description, "call mom");
        assert_eq!(plant.status, Intent::Todo);
        assert_eq!(plant.size, TaskSize::Small);
        assert_eq!(
            outcome.reply,
            "Good luck! ➕ I've added \"call mom\" as a new task!"
        );
        assert_eq!(outcome.garden.len(), 1);

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].user.contains("Note: I've already added \"call mom\""));
    }

    #[tokio::test]
    async fn small_talk_plants_nothing() {
        let store = GardenStore::new();
        let service = ChatService::new(Arc::clone(&store), StubLlm::replying("Hi!"));

        let outcome = service.handle(request("u1", "hello there", false)).await.unwrap();
        assert!(outcome.plant.is_none());
        assert_eq!(outcome.reply, "Hi!");
        assert!(outcome.garden.is_empty());
    }

    #[tokio::test]
    async fn history_records_both_sides_with_persona_role() {
        let store = GardenStore::new();
        let service = ChatService::new(Arc::clone(&store), StubLlm::replying("Noted."));

        service
            .handle(request("u1", "I just finished the quarterly report", true))
            .await
            .unwrap();

        let history = store.history("u1").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "I just finished the quarterly report");
        assert_eq!(history[1].role, ChatRole::Harold);
        assert!(history[1].content.contains("as a completed task!"));
    }

    #[tokio::test]
    async fn recent_history_is_quoted() {
        let store = GardenStore::new();
        let llm = StubLlm::replying("ok");
        let service = ChatService::new(Arc::clone(&store), llm.clone());

        service.handle(request("u1", "hello", false)).await.unwrap();
        service.handle(request("u1", "again", false)).await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(!prompts[0].user.contains("Recent conversation"));
        assert!(prompts[1].user.contains("user: hello\nassistant: ok"));
    }

    #[tokio::test]
    async fn llm_failure_keeps_plant_but_skips_history() {
        let store = GardenStore::new();
        let service = ChatService::new(Arc::clone(&store), StubLlm::failing());

        let result = service
            .handle(request("u1", "I'm working on my thesis", false))
            .await;
        assert!(matches!(result, Err(LlmError::RequestFailed { .. })));

        let garden = store.garden("u1").await;
        assert_eq!(garden.len(), 1);
        assert_eq!(garden[0].status, Intent::InProgress);
        assert!(store.history("u1").await.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_initialized() {
        let store = GardenStore::new();
        let service = ChatService::new(Arc::clone(&store), StubLlm::replying("hey"));
        service.handle(request("walk-in", "hello", false)).await.unwrap();

        let (user, _) = store.profile("walk-in").await.unwrap();
        assert_eq!(user.username, "rosa");
    }
}
