//! Effort estimation for extracted task descriptions.
//!
//! Scoring is additive substring matching over two keyword lists and three
//! groups of time phrases. Overlapping keywords count more than once
//! ("quick" plus "5 min" scores 3 toward small).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse effort bucket for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSize {
    Small,
    Medium,
    Big,
}

impl TaskSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskSize::Small => "small",
            TaskSize::Medium => "medium",
            TaskSize::Big => "big",
        }
    }
}

impl fmt::Display for TaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(TaskSize::Small),
            "medium" => Ok(TaskSize::Medium),
            "big" => Ok(TaskSize::Big),
            other => Err(other.to_string()),
        }
    }
}

const SMALL_KEYWORDS: &[&str] = &[
    "quick", "small", "easy", "simple", "brief", "short", "minor", "check", "email", "call",
];

const BIG_KEYWORDS: &[&str] = &[
    "big",
    "large",
    "major",
    "complex",
    "difficult",
    "project",
    "long",
    "extensive",
    "presentation",
    "report",
];

/// Time phrases and the bucket they vote for. Medium phrases are listed so
/// they are recognized, but medium has no score of its own.
const TIME_INDICATORS: &[(TaskSize, &[&str])] = &[
    (TaskSize::Small, &["minute", "minutes", "5 min", "10 min", "15 min"]),
    (
        TaskSize::Medium,
        &["hour", "hours", "1 hour", "2 hours", "afternoon", "morning"],
    ),
    (TaskSize::Big, &["day", "days", "week", "weeks", "month"]),
];

/// Weight of a matched time phrase relative to a plain keyword.
const TIME_WEIGHT: u32 = 2;

/// Estimate the effort bucket for a task description.
pub fn estimate_size(description: &str) -> TaskSize {
    let lower = description.to_lowercase();

    let mut small_score = count_matches(&lower, SMALL_KEYWORDS);
    let mut big_score = count_matches(&lower, BIG_KEYWORDS);

    for (size, indicators) in TIME_INDICATORS {
        let hits = count_matches(&lower, indicators) * TIME_WEIGHT;
        match size {
            TaskSize::Small => small_score += hits,
            TaskSize::Big => big_score += hits,
            TaskSize::Medium => {}
        }
    }

    if small_score > big_score {
        TaskSize::Small
    } else if big_score > small_score {
        TaskSize::Big
    } else {
        TaskSize::Medium
    }
}

fn count_matches(haystack: &str, needles: &[&str]) -> u32 {
    needles.iter().filter(|n| haystack.contains(*n)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_small_keyword() {
        assert_eq!(estimate_size("call mom"), TaskSize::Small);
    }

    #[test]
    fn single_big_keyword() {
        assert_eq!(estimate_size("the quarterly report"), TaskSize::Big);
    }

    #[test]
    fn no_signal_defaults_to_medium() {
        assert_eq!(estimate_size("water the plants"), TaskSize::Medium);
        assert_eq!(estimate_size(""), TaskSize::Medium);
    }

    #[test]
    fn tie_is_medium() {
        // "quick" (+1 small) vs "project" (+1 big)
        assert_eq!(estimate_size("quick project sync"), TaskSize::Medium);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(estimate_size("PREPARE PRESENTATION"), TaskSize::Big);
        assert_eq!(estimate_size("Send Email"), TaskSize::Small);
    }

    #[test]
    fn time_phrases_weigh_double() {
        // "big" +1 vs "minute", "minutes", "5 min", "15 min" +8
        assert_eq!(estimate_size("big cleanup, 15 minutes"), TaskSize::Small);
        // "quick" +1 vs "week" and "weeks" +4
        assert_eq!(estimate_size("quick fixes for two weeks"), TaskSize::Big);
    }

    #[test]
    fn medium_phrases_do_not_offset_scores() {
        assert_eq!(estimate_size("big presentation for 2 hours"), TaskSize::Big);
        assert_eq!(estimate_size("reading this afternoon"), TaskSize::Medium);
    }

    #[test]
    fn overlapping_indicators_double_count() {
        // "quick" +1, "minute" +2, "minutes" +2, "5 min" +2 => 7 small
        // "project" +1 => 1 big
        assert_eq!(estimate_size("quick 5 minutes project"), TaskSize::Small);
    }

    #[test]
    fn deterministic() {
        let text = "extensive report over several days";
        assert_eq!(estimate_size(text), estimate_size(text));
    }

    #[test]
    fn size_serde_lowercase() {
        assert_eq!(serde_json::to_string(&TaskSize::Medium).unwrap(), "\"medium\"");
        let parsed: TaskSize = serde_json::from_str("\"big\"").unwrap();
        assert_eq!(parsed, TaskSize::Big);
    }

    #[test]
    fn size_from_str() {
        assert_eq!("small".parse::<TaskSize>(), Ok(TaskSize::Small));
        assert!("huge".parse::<TaskSize>().is_err());
    }
}
