use anyhow::{Result, bail};
use clap::ValueEnum;
use journey_core::{GoalContext, GoalDuration};

/// Duration as typed on the command line (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DurationArg {
    Week,
    Month,
    Year,
}

impl DurationArg {
    pub fn label(self) -> &'static str {
        GoalDuration::from(self).label()
    }
}

impl From<DurationArg> for GoalDuration {
    fn from(d: DurationArg) -> Self {
        match d {
            DurationArg::Week => GoalDuration::Week,
            DurationArg::Month => GoalDuration::Month,
            DurationArg::Year => GoalDuration::Year,
        }
    }
}

/// A learning topic must have some non-whitespace text.
pub fn validate_topic(raw: &str) -> Result<String> {
    let topic = raw.trim();
    if topic.is_empty() {
        bail!("learning topic cannot be empty");
    }
    Ok(topic.to_string())
}

/// Merge an edit onto the current goal. At least one field must change.
pub fn resolve_goal_edit(
    current: &GoalContext,
    topic: Option<&str>,
    duration: Option<DurationArg>,
) -> Result<GoalContext> {
    if topic.is_none() && duration.is_none() {
        bail!("nothing to change: pass --topic and/or --duration");
    }

    let learning_topic = match topic {
        Some(t) => validate_topic(t)?,
        None => current.learning_topic.clone(),
    };
    let duration = duration.map(GoalDuration::from).unwrap_or(current.duration);

    Ok(GoalContext {
        learning_topic,
        duration,
    })
}

/// Hint shown when no goal has been set up yet.
pub fn needs_onboarding(goal: &GoalContext) -> Option<&'static str> {
    if goal.learning_topic.trim().is_empty() {
        return Some("No learning goal yet. Start one with: journey start \"<topic>\" --duration week");
    }
    None
}
