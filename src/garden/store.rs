//! Garden store — in-memory users, gardens, chat history and friendships.
//!
//! One store instance is shared by handle with every request handler. All
//! maps sit behind a single async `RwLock`; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{ChatTurn, GardenStats, Plant, User};
use crate::classifier::{Intent, TaskSize};
use crate::error::GardenError;

/// Maximum chat turns kept per user.
pub const MAX_HISTORY: usize = 50;

#[derive(Default)]
struct GardenData {
    users: HashMap<String, User>,
    gardens: HashMap<String, Vec<Plant>>,
    chat_history: HashMap<String, Vec<ChatTurn>>,
    friendships: HashMap<String, Vec<String>>,
}

impl GardenData {
    fn init_user(&mut self, user_id: &str, username: Option<&str>) -> bool {
        let created = if self.users.contains_key(user_id) {
            false
        } else {
            self.users
                .insert(user_id.to_string(), User::new(user_id, username));
            true
        };
        self.gardens.entry(user_id.to_string()).or_default();
        self.chat_history.entry(user_id.to_string()).or_default();
        self.friendships.entry(user_id.to_string()).or_default();
        created
    }

    fn friends_of(&self, user_id: &str) -> Vec<User> {
        self.friendships
            .get(user_id)
            .map(|ids| ids.iter().filter_map(|id| self.users.get(id)).cloned().collect())
            .unwrap_or_default()
    }
}

/// Shared in-memory garden state.
pub struct GardenStore {
    data: RwLock<GardenData>,
}

impl GardenStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            data: RwLock::new(GardenData::default()),
        })
    }

    /// Register a new user under a freshly generated id.
    pub async fn register(&self, username: Option<&str>) -> User {
        let id = Uuid::new_v4().simple().to_string();
        let mut data = self.data.write().await;
        data.init_user(&id, username);
        let user = data.users[&id].clone();
        info!(user_id = %user.id, username = %user.username, "User registered");
        user
    }

    /// Make sure a user id has a profile, garden, history and friend list.
    pub async fn ensure_user(&self, user_id: &str, username: Option<&str>) {
        let mut data = self.data.write().await;
        if data.init_user(user_id, username) {
            info!(user_id = %user_id, "User initialized on first contact");
        }
    }

    /// Fetch a profile and its friends, refreshing `last_active`.
    pub async fn profile(&self, user_id: &str) -> Result<(User, Vec<User>), GardenError> {
        let mut data = self.data.write().await;
        let user = data
            .users
            .get_mut(user_id)
            .ok_or_else(|| GardenError::UserNotFound { id: user_id.to_string() })?;
        user.last_active = Utc::now();
        let user = user.clone();
        Ok((user, data.friends_of(user_id)))
    }

    /// Befriend another user by exact username. Friendship is symmetric.
    pub async fn add_friend(
        &self,
        user_id: &str,
        friend_username: &str,
    ) -> Result<(User, Vec<User>), GardenError> {
        let mut data = self.data.write().await;

        if !data.users.contains_key(user_id) {
            return Err(GardenError::UserNotFound { id: user_id.to_string() });
        }

        let friend = data
            .users
            .values()
            .find(|u| u.username == friend_username)
            .cloned()
            .ok_or_else(|| GardenError::FriendNotFound {
                username: friend_username.to_string(),
            })?;

        if friend.id == user_id {
            return Err(GardenError::SelfFriendship);
        }

        for (from, to) in [(user_id, friend.id.as_str()), (friend.id.as_str(), user_id)] {
            let list = data.friendships.entry(from.to_string()).or_default();
            if !list.iter().any(|id| id == to) {
                list.push(to.to_string());
            }
        }

        info!(user_id = %user_id, friend_id = %friend.id, "Friendship added");
        let friends = data.friends_of(user_id);
        Ok((friend, friends))
    }

    /// Read a friend's garden. Only friends may look.
    pub async fn friend_garden(
        &self,
        user_id: &str,
        friend_id: &str,
    ) -> Result<(Vec<Plant>, User), GardenError> {
        let data = self.data.read().await;

        let is_friend = data
            .friendships
            .get(user_id)
            .is_some_and(|ids| ids.iter().any(|id| id == friend_id));
        if !is_friend {
            return Err(GardenError::NotFriends {
                user_id: user_id.to_string(),
                friend_id: friend_id.to_string(),
            });
        }

        let friend = data
            .users
            .get(friend_id)
            .cloned()
            .ok_or_else(|| GardenError::UserNotFound { id: friend_id.to_string() })?;
        let garden = data.gardens.get(friend_id).cloned().unwrap_or_default();
        Ok((garden, friend))
    }

    /// Add a plant to a user's garden.
    pub async fn plant(
        &self,
        user_id: &str,
        description: &str,
        size: TaskSize,
        status: Intent,
    ) -> Plant {
        let plant = Plant::new(user_id, description, size, status);
        let mut data = self.data.write().await;
        data.gardens
            .entry(user_id.to_string())
            .or_default()
            .push(plant.clone());
        info!(
            user_id = %user_id,
            plant_id = %plant.id,
            size = %size,
            status = %status,
            "Plant added"
        );
        plant
    }

    /// Move a plant to another status list.
    pub async fn update_status(
        &self,
        user_id: &str,
        plant_id: Uuid,
        status: Intent,
    ) -> Result<Plant, GardenError> {
        let mut data = self.data.write().await;
        let plant = data
            .gardens
            .get_mut(user_id)
            .and_then(|plants| plants.iter_mut().find(|p| p.id == plant_id))
            .ok_or_else(|| GardenError::PlantNotFound { id: plant_id.to_string() })?;

        plant.set_status(status);
        debug!(user_id = %user_id, plant_id = %plant_id, status = %status, "Plant status updated");
        Ok(plant.clone())
    }

    /// All plants in a garden; empty for unknown users.
    pub async fn garden(&self, user_id: &str) -> Vec<Plant> {
        let data = self.data.read().await;
        data.gardens.get(user_id).cloned().unwrap_or_default()
    }

    pub async fn stats(&self, user_id: &str) -> GardenStats {
        let data = self.data.read().await;
        let plants = data.gardens.get(user_id).map(Vec::as_slice).unwrap_or(&[]);
        GardenStats::from_plants(plants, Utc::now())
    }

    /// Full chat history for a user.
    pub async fn history(&self, user_id: &str) -> Vec<ChatTurn> {
        let data = self.data.read().await;
        data.chat_history.get(user_id).cloned().unwrap_or_default()
    }

    /// The last `n` chat turns, oldest first.
    pub async fn recent_history(&self, user_id: &str, n: usize) -> Vec<ChatTurn> {
        let data = self.data.read().await;
        let history = data.chat_history.get(user_id).map(Vec::as_slice).unwrap_or(&[]);
        history[history.len().saturating_sub(n)..].to_vec()
    }

    /// Append turns to a user's history, keeping only the newest `MAX_HISTORY`.
    pub async fn record_turns(&self, user_id: &str, turns: impl IntoIterator<Item = ChatTurn>) {
        let mut data = self.data.write().await;
        let history = data.chat_history.entry(user_id.to_string()).or_default();
        history.extend(turns);
        if history.len() > MAX_HISTORY {
            let excess = history.len() - MAX_HISTORY;
            history.drain(..excess);
        }
    }
}
