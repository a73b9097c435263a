//! Error types for Task Garden.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },
}

/// Garden store errors. Messages are shown to API clients as-is.
#[derive(Debug, thiserror::Error)]
pub enum GardenError {
    #[error("User not found")]
    UserNotFound { id: String },

    #[error("User not found")]
    FriendNotFound { username: String },

    #[error("Cannot add yourself as friend")]
    SelfFriendship,

    #[error("Not friends with this user")]
    NotFriends { user_id: String, friend_id: String },

    #[error("Task not found")]
    PlantNotFound { id: String },

    #[error("Invalid status")]
    InvalidStatus(String),

    #[error("Invalid task size")]
    InvalidSize(String),
}
