//! Plant icons by task size and status.

use rand::seq::SliceRandom;

use crate::classifier::{Intent, TaskSize};

/// Icon set for a size/status pair. Every set is non-empty.
pub fn icons_for(size: TaskSize, status: Intent) -> &'static [&'static str] {
    match (size, status) {
        (TaskSize::Small, Intent::Todo) => &["🌰", "🌱", "🔸"],
        (TaskSize::Small, Intent::InProgress) => &["🌿", "☘️", "🟡"],
        (TaskSize::Small, Intent::Completed) => &["🍀", "🌾", "✅"],
        (TaskSize::Medium, Intent::Todo) => &["🌸", "🌼", "🌻"],
        (TaskSize::Medium, Intent::InProgress) => &["🌹", "🌺", "🌷"],
        (TaskSize::Medium, Intent::Completed) => &["💐", "🌽", "🍅", "🥕", "🥬"],
        (TaskSize::Big, Intent::Todo) => &["🌳", "🌲", "🏔️"],
        (TaskSize::Big, Intent::InProgress) => &["🌴", "🌵", "🔥"],
        (TaskSize::Big, Intent::Completed) => &["🎄", "🍎", "🍊", "🏆", "⭐"],
    }
}

/// Pick a random icon for a plant of the given size and status.
pub fn random_icon(size: TaskSize, status: Intent) -> &'static str {
    icons_for(size, status)
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("🌱")
}
