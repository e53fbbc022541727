// src/pipeline/schedule.rs

//! Fixed-interval scheduling of check cycles.
//!
//! The loop wakes every `poll_tick` and runs a check inline once `every`
//! has passed since the previous one started. Checks never overlap.

use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::ScheduleConfig;

use super::check::{CatChecker, CheckOutcome};

/// Tracks when the next check is due.
#[derive(Debug, Clone)]
pub struct Schedule {
    every: Duration,
    last_run: Option<Instant>,
}

impl Schedule {
    pub fn new(every: Duration) -> Self {
        Self {
            every,
            last_run: None,
        }
    }

    /// A check is due immediately on start, then `every` after the last one.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.every,
        }
    }

    pub fn mark_run(&mut self, now: Instant) {
        self.last_run = Some(now);
    }
}

/// Run one check, logging its start, end and any non-fatal failure.
///
/// Only fatal errors are returned; everything else is logged and swallowed.
pub async fn run_cycle(checker: &CatChecker) -> Result<Option<CheckOutcome>> {
    log::info!("Running cat check");

    let outcome = match checker.run_check().await {
        Ok(outcome) => Some(outcome),
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            log::error!("Cat check failed: {}", e);
            None
        }
    };

    match &outcome {
        Some(outcome) => log::info!("Check complete: {}", outcome),
        None => log::info!("Check complete"),
    }
    Ok(outcome)
}

/// Run checks forever on the configured cadence.
///
/// Returns only if a check hits a fatal error.
pub async fn run_schedule(checker: &CatChecker, config: &ScheduleConfig) -> Result<()> {
    let mut schedule = Schedule::new(config.every());
    let mut tick = tokio::time::interval(config.poll_tick());
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "Checking every {} minutes (polling every {}s)",
        config.every_minutes,
        config.poll_tick_secs
    );

    loop {
        tick.tick().await;

        let now = Instant::now();
        if !schedule.is_due(now) {
            continue;
        }
        schedule.mark_run(now);
        run_cycle(checker).await?;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::models::AgeStyle;
    use crate::pipeline::check::tests::{FixedSource, RecordingNotifier, cat};
    use crate::services::DigestFormatter;
    use crate::storage::LocalStorage;

    #[test]
    fn test_due_immediately_on_start() {
        let schedule = Schedule::new(Duration::from_secs(1200));
        assert!(schedule.is_due(Instant::now()));
    }

    #[test]
    fn test_due_after_interval() {
        let start = Instant::now();
        let mut schedule = Schedule::new(Duration::from_secs(1200));
        schedule.mark_run(start);

        assert!(!schedule.is_due(start + Duration::from_secs(60)));
        assert!(!schedule.is_due(start + Duration::from_secs(1199)));
        assert!(schedule.is_due(start + Duration::from_secs(1200)));
        assert!(schedule.is_due(start + Duration::from_secs(1260)));
    }

    #[test]
    fn test_clock_going_backwards_is_not_due() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut schedule = Schedule::new(Duration::from_secs(1200));
        schedule.mark_run(start);

        assert!(!schedule.is_due(start - Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_cycle_swallows_check_errors() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(FixedSource::new(vec![cat("1", "")]));
        source.fail();

        let checker = CatChecker::new(
            source,
            Arc::new(LocalStorage::new(tmp.path().join("state.json"))),
            Arc::new(RecordingNotifier::default()),
            DigestFormatter::new("https://www.battersea.org.uk").unwrap(),
            AgeStyle::Calendar,
        );

        assert_eq!(run_cycle(&checker).await.unwrap(), None);
        assert!(!tmp.path().join("state.json").exists());
    }

    #[tokio::test]
    async fn test_cycle_reports_outcome() {
        let tmp = TempDir::new().unwrap();
        let checker = CatChecker::new(
            Arc::new(FixedSource::new(vec![cat("1", "")])),
            Arc::new(LocalStorage::new(tmp.path().join("state.json"))),
            Arc::new(RecordingNotifier::default()),
            DigestFormatter::new("https://www.battersea.org.uk").unwrap(),
            AgeStyle::Calendar,
        );

        assert_eq!(
            run_cycle(&checker).await.unwrap(),
            Some(CheckOutcome::Baseline { count: 1 })
        );
    }
}
