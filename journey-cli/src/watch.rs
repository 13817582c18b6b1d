//! Foreground tick loop: the periodic clock that drives expiry and day rollover.

use anyhow::{Context, Result};
use chrono::Utc;
use journey_core::{KeyValueStore, StreakEngine};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::render::{describe_event, status_text};

/// Tick the engine every `every` until Ctrl-C. Runs on the caller's task, so
/// ticks never interleave with anything else touching the engine.
pub async fn run<S: KeyValueStore>(engine: &mut StreakEngine<S>, every: Duration) -> Result<()> {
    let subscription = engine.subscribe(|event| println!("{}", describe_event(event)));

    print!("{}", status_text(&engine.status(Utc::now())));
    println!("Watching (tick every {}s). Ctrl-C to stop.", every.as_secs());

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Utc::now();
                let outcome = engine.tick(now);
                tracing::debug!(?outcome, "tick");
                if outcome.expired || outcome.rolled_over {
                    print!("{}", status_text(&engine.status(now)));
                }
            }
            res = &mut ctrl_c => {
                res.context("listen for Ctrl-C")?;
                break;
            }
        }
    }

    engine.unsubscribe(subscription);
    Ok(())
}
