//! Bridges a rig-core `CompletionModel` to `LlmProvider`.

use async_trait::async_trait;
use rig::agent::AgentBuilder;
use rig::completion::{CompletionModel, Prompt};

use super::{ChatPrompt, LlmBackend, LlmProvider};
use crate::error::LlmError;

/// Replies are short; Anthropic requires an explicit cap.
const MAX_TOKENS: u64 = 1024;

pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    backend: LlmBackend,
}

impl<M> RigAdapter<M> {
    pub fn new(model: M, model_name: &str, backend: LlmBackend) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            backend,
        }
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Clone + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, prompt: ChatPrompt) -> Result<String, LlmError> {
        let mut builder = AgentBuilder::new(self.model.clone()).max_tokens(MAX_TOKENS);
        if let Some(system) = prompt.system.as_deref() {
            builder = builder.preamble(system);
        }
        let agent = builder.build();

        agent
            .prompt(prompt.user.as_str())
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: self.backend.to_string(),
                reason: e.to_string(),
            })
    }
}
