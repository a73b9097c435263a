//! Garden data model: users, plants, chat turns, statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::icons::random_icon;
use crate::classifier::{Intent, TaskSize};

/// A registered gardener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a user, falling back to `User<last four id chars>` for a blank name.
    pub fn new(id: impl Into<String>, username: Option<&str>) -> Self {
        let id = id.into();
        let username = match username.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_username(&id),
        };
        let now = Utc::now();
        Self {
            id,
            username,
            created_at: now,
            last_active: now,
        }
    }
}

fn default_username(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("User{tail}")
}

/// A task in a garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    /// Size bucket; named `type` on the wire.
    #[serde(rename = "type")]
    pub size: TaskSize,
    pub description: String,
    pub icon: String,
    pub status: Intent,
    pub timestamp: DateTime<Utc>,
    pub planted: bool,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plant {
    /// Plant a new task with a fresh id and an icon matching its size and status.
    pub fn new(
        user_id: impl Into<String>,
        description: impl Into<String>,
        size: TaskSize,
        status: Intent,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            size,
            description: description.into(),
            icon: random_icon(size, status).to_string(),
            status,
            timestamp: Utc::now(),
            planted: true,
            user_id: user_id.into(),
            updated_at: None,
        }
    }

    /// Move the plant to another list; the icon is re-rolled for the new status.
    pub fn set_status(&mut self, status: Intent) {
        self.status = status;
        self.icon = random_icon(self.size, status).to_string();
        self.updated_at = Some(Utc::now());
    }
}

/// Who said a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    /// The gardener persona.
    Harold,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Harold => "harold",
        }
    }
}

/// One line of chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCounts {
    pub small: usize,
    pub medium: usize,
    pub big: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Summary counts over one garden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenStats {
    pub total: usize,
    pub by_size: SizeCounts,
    pub by_status: StatusCounts,
    /// Plants planted on the current UTC date.
    pub today_count: usize,
}

impl GardenStats {
    pub fn from_plants(plants: &[Plant], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut stats = GardenStats {
            total: plants.len(),
            ..Default::default()
        };

        for plant in plants {
            match plant.size {
                TaskSize::Small => stats.by_size.small += 1,
                TaskSize::Medium => stats.by_size.medium += 1,
                TaskSize::Big => stats.by_size.big += 1,
            }
            match plant.status {
                Intent::Todo => stats.by_status.todo += 1,
                Intent::InProgress => stats.by_status.in_progress += 1,
                Intent::Completed => stats.by_status.completed += 1,
            }
            if plant.timestamp.date_naive() == today {
                stats.today_count += 1;
            }
        }

        stats
    }
}
