//! Chat message classifier.
//!
//! Decides whether a free-text chat message describes a task and, if so,
//! which list it belongs in:
//! - "I need to …", "todo: …", "add … to task" → new task
//! - "I just finished …", "done with …" → completed task
//! - "I'm working on …", "started …" → in-progress task
//!
//! Rule groups are tried in that order and the first accepted match wins.
//! A message that matches nothing is ordinary conversation, not an error.

pub mod size;

pub use size::{TaskSize, estimate_size};

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The task list a message points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    Todo,
    InProgress,
    Completed,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Todo => "todo",
            Intent::InProgress => "inProgress",
            Intent::Completed => "completed",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Intent::Todo),
            "inProgress" => Ok(Intent::InProgress),
            "completed" => Ok(Intent::Completed),
            other => Err(other.to_string()),
        }
    }
}

/// A task extracted from a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub description: String,
    pub size: TaskSize,
}

/// How a rule group cleans and accepts its captured text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cleanup {
    /// Strip trailing "please" and a leading article, require more than two chars.
    NewTask,
    /// Trim only, accept anything non-empty.
    TrimOnly,
}

/// A single pattern whose first capture group is the task description.
#[derive(Debug, Clone)]
struct TaskRule {
    regex: Regex,
    /// Used in logs.
    name: &'static str,
}

/// An ordered list of rules that all map to the same intent.
#[derive(Debug, Clone)]
struct RuleGroup {
    intent: Intent,
    cleanup: Cleanup,
    rules: Vec<TaskRule>,
}

static TRAILING_PLEASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*please\s*$").unwrap());

static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(a|an|the)\s+").unwrap());

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default_rules);

/// Classify a message with the built-in rule set.
pub fn classify(message: &str) -> Option<ClassificationResult> {
    DEFAULT_CLASSIFIER.classify(message)
}

/// Pattern-based task classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    groups: Vec<RuleGroup>,
}

fn rule(name: &'static str, pattern: &str) -> TaskRule {
    TaskRule {
        regex: Regex::new(pattern).unwrap(),
        name,
    }
}

impl Classifier {
    /// Create a classifier with the default new/completed/in-progress rules.
    pub fn default_rules() -> Self {
        let new_task = RuleGroup {
            intent: Intent::Todo,
            cleanup: Cleanup::NewTask,
            rules: vec![
                rule(
                    "intent phrase",
                    r"(?i)(?:i need to|i should|i have to|i want to|i'll|i will|let me|gonna|going to)\s+(.+)",
                ),
                rule(
                    "add task:",
                    r"(?i)(?:add task|new task|create task):\s*(.+)",
                ),
                rule("todo:", r"(?i)(?:task|todo):\s*(.+)"),
                rule(
                    "add … to task",
                    r"(?i)(?:can you add|please add|add)\s+(.+?)(?:\s+(?:to|as)\s+(?:task|todo))?$",
                ),
            ],
        };

        // Longer "i just …" forms come first so the verb is not captured.
        let completed = RuleGroup {
            intent: Intent::Completed,
            cleanup: Cleanup::TrimOnly,
            rules: vec![
                rule(
                    "finished phrase",
                    r"(?i)(?:i just finished|i just completed|i just did|i just|i finished|i completed|i did|just finished|just completed|just did|finished|completed|done with)\s+(.+)",
                ),
                rule("done with", r"(?i)(?:i'm done with|all done with)\s+(.+)"),
            ],
        };

        let in_progress = RuleGroup {
            intent: Intent::InProgress,
            cleanup: Cleanup::TrimOnly,
            rules: vec![rule(
                "working on",
                r"(?i)(?:i'm working on|working on|started|i started|currently doing|in the middle of)\s+(.+)",
            )],
        };

        Self {
            groups: vec![new_task, completed, in_progress],
        }
    }

    /// Classify a chat message.
    ///
    /// Returns `None` when no rule accepts the message.
    pub fn classify(&self, message: &str) -> Option<ClassificationResult> {
        for group in &self.groups {
            for rule in &group.rules {
                let Some(captured) = rule.regex.captures(message).and_then(|c| c.get(1)) else {
                    continue;
                };

                let Some(description) = clean_description(captured.as_str(), group.cleanup) else {
                    debug!(rule = rule.name, "Rule matched but description was rejected");
                    continue;
                };

                let size = estimate_size(&description);
                debug!(
                    rule = rule.name,
                    intent = %group.intent,
                    size = %size,
                    "Message classified as task"
                );
                return Some(ClassificationResult {
                    intent: group.intent,
                    description,
                    size,
                });
            }
        }

        None
    }
}

fn clean_description(raw: &str, cleanup: Cleanup) -> Option<String> {
    let trimmed = raw.trim();
    match cleanup {
        Cleanup::NewTask => {
            let without_please = TRAILING_PLEASE.replace(trimmed, "");
            let cleaned = LEADING_ARTICLE.replace(&without_please, "");
            let cleaned = cleaned.trim();
            // Length is counted in chars, so "🌱🌱" is two.
            (cleaned.chars().count() > 2).then(|| cleaned.to_string())
        }
        Cleanup::TrimOnly => (!trimmed.is_empty()).then(|| trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_task(message: &str) -> ClassificationResult {
        classify(message).unwrap_or_else(|| panic!("expected a task for {message:?}"))
    }

    #[test]
    fn need_to_is_new_task() {
        let result = expect_task("I need to call mom");
        assert_eq!(
            result,
            ClassificationResult {
                intent: Intent::Todo,
                description: "call mom".into(),
                size: TaskSize::Small,
            }
        );
    }

    #[test]
    fn just_finished_is_completed() {
        let result = expect_task("I just finished the quarterly report");
        assert_eq!(result.intent, Intent::Completed);
        // Articles are kept outside the new-task group.
        assert_eq!(result.description, "the quarterly report");
        assert_eq!(result.size, TaskSize::Big);
    }

    #[test]
    fn working_on_is_in_progress() {
        let result = expect_task("I'm working on the big presentation for 2 hours");
        assert_eq!(result.intent, Intent::InProgress);
        assert_eq!(result.description, "the big presentation for 2 hours");
        assert_eq!(result.size, TaskSize::Big);
    }

    #[test]
    fn small_talk_is_not_a_task() {
        assert!(classify("hello there").is_none());
        assert!(classify("how are you doing?").is_none());
    }

    #[test]
    fn short_description_is_discarded() {
        assert!(classify("add x").is_none());
        assert!(classify("I need to go").is_none());
    }

    #[test]
    fn empty_and_whitespace_are_not_tasks() {
        assert!(classify("").is_none());
        assert!(classify("   \t ").is_none());
        assert!(classify("?!...").is_none());
    }

    #[test]
    fn strips_trailing_please_and_article() {
        let result = expect_task("I should write a blog post please");
        assert_eq!(result.description, "write a blog post");

        let result = expect_task("todo: the laundry");
        assert_eq!(result.description, "laundry");

        let result = expect_task("I have to An Essay please");
        assert_eq!(result.description, "Essay");
    }

    #[test]
    fn task_prefixes() {
        assert_eq!(expect_task("add task: buy groceries").description, "buy groceries");
        assert_eq!(expect_task("New Task:  renew passport").description, "renew passport");
        assert_eq!(expect_task("TODO: fix the gate").description, "fix the gate");
    }

    #[test]
    fn add_to_task_suffix_is_dropped() {
        let result = expect_task("can you add water the garden to todo");
        assert_eq!(result.intent, Intent::Todo);
        assert_eq!(result.description, "water the garden");

        let result = expect_task("please add review slides as task");
        assert_eq!(result.description, "review slides");
    }

    #[test]
    fn case_insensitive_phrases() {
        assert_eq!(expect_task("LET ME clean the kitchen").intent, Intent::Todo);
        assert_eq!(expect_task("Done With taxes").intent, Intent::Completed);
        assert_eq!(expect_task("Currently Doing homework").intent, Intent::InProgress);
    }

    #[test]
    fn completed_variants() {
        assert_eq!(expect_task("finished my essay").description, "my essay");
        assert_eq!(expect_task("I'm done with the dishes").description, "the dishes");
        assert_eq!(expect_task("just did laundry").description, "laundry");
    }

    #[test]
    fn in_progress_variants() {
        let result = expect_task("in the middle of painting the fence");
        assert_eq!(result.intent, Intent::InProgress);
        assert_eq!(result.description, "painting the fence");

        assert_eq!(expect_task("started a new book").description, "a new book");
    }

    #[test]
    fn new_task_group_wins_over_completed() {
        // Matches "i'll …" and "finished …"
        let result = expect_task("I'll tell you when I finished reading");
        assert_eq!(result.intent, Intent::Todo);
        assert_eq!(result.description, "tell you when I finished reading");
    }

    #[test]
    fn new_task_group_wins_over_in_progress() {
        let result = expect_task("I'm working on it but I need to email Bob");
        assert_eq!(result.intent, Intent::Todo);
        assert_eq!(result.description, "email Bob");
    }

    #[test]
    fn rejected_new_task_falls_through_to_next_pattern() {
        // "i need to" captures "go" (too short), "todo:" captures the rest.
        let result = expect_task("todo: I need to go");
        assert_eq!(result.intent, Intent::Todo);
        assert_eq!(result.description, "I need to go");
    }

    #[test]
    fn rejected_new_task_falls_through_to_other_groups() {
        // "add" captures "it" (too short); "finished" still applies.
        let result = expect_task("finished the cake, add it");
        assert_eq!(result.intent, Intent::Completed);
        assert_eq!(result.description, "the cake, add it");
    }

    #[test]
    fn size_follows_estimate() {
        let result = expect_task("I need to plan the project for next week");
        assert_eq!(result.size, estimate_size(&result.description));
        assert_eq!(result.size, TaskSize::Big);
    }

    #[test]
    fn classification_is_idempotent() {
        let message = "going to do a quick check of the mail";
        assert_eq!(classify(message), classify(message));
    }

    #[test]
    fn intent_serde_camel_case() {
        assert_eq!(serde_json::to_string(&Intent::InProgress).unwrap(), "\"inProgress\"");
        assert_eq!(serde_json::to_string(&Intent::Todo).unwrap(), "\"todo\"");
        let parsed: Intent = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, Intent::Completed);
    }

    #[test]
    fn intent_from_str_rejects_unknown() {
        assert_eq!("inProgress".parse::<Intent>(), Ok(Intent::InProgress));
        assert!("in_progress".parse::<Intent>().is_err());
        assert!("done".parse::<Intent>().is_err());
    }

    #[test]
    fn whitespace_only_capture_is_no_task() {
        assert_eq!(classify("done with   "), None);
        assert_eq!(classify("working on \t "), None);
    }

    #[test]
    fn blank_completed_capture_falls_through_to_in_progress() {
        let result = expect_task("working on the fence, finished   ");
        assert_eq!(result.intent, Intent::InProgress);
        assert_eq!(result.description, "the fence, finished");
    }

    #[test]
    fn minimum_length_counts_chars_not_bytes() {
        assert_eq!(classify("todo: 🌱🌱"), None);
        assert_eq!(expect_task("todo: 🌱🌱🌱").description, "🌱🌱🌱");
    }
}
