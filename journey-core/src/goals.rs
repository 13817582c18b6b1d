//! Goal duration + goal context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long the user commits to a learning goal.
///
/// The duration decides both the freeze allowance and the streak length
/// that counts as "completed".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GoalDuration {
    #[default]
    Week,
    Month,
    Year,
}

impl GoalDuration {
    pub const ALL: [GoalDuration; 3] = [GoalDuration::Week, GoalDuration::Month, GoalDuration::Year];

    /// Freeze tokens available over the whole goal.
    pub fn freeze_quota(&self) -> u32 {
        match self {
            GoalDuration::Week => 2,
            GoalDuration::Month => 8,
            GoalDuration::Year => 96,
        }
    }

    /// Streak length at which the goal counts as completed.
    pub fn target_days(&self) -> u32 {
        match self {
            GoalDuration::Week => 7,
            GoalDuration::Month => 30,
            GoalDuration::Year => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GoalDuration::Week => "Week",
            GoalDuration::Month => "Month",
            GoalDuration::Year => "Year",
        }
    }

    /// Parse one of the picker labels. Anything unrecognized is a week.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Week" => GoalDuration::Week,
            "Month" => GoalDuration::Month,
            "Year" => GoalDuration::Year,
            _ => GoalDuration::Week,
        }
    }
}

impl fmt::Display for GoalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user is learning, and for how long.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalContext {
    pub learning_topic: String,
    pub duration: GoalDuration,
}

impl GoalContext {
    pub fn new(learning_topic: impl Into<String>, duration: GoalDuration) -> Self {
        Self {
            learning_topic: learning_topic.into(),
            duration,
        }
    }
}
