//! Gardens: the plants (tasks) each user grows, plus profiles, friends and chat history.

pub mod icons;
pub mod model;
pub mod store;

pub use model::{ChatRole, ChatTurn, GardenStats, Plant, User};
pub use store::GardenStore;
