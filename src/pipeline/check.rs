// src/pipeline/check.rs

//! One check cycle: fetch, compare with the baseline, notify, persist.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::models::{AgeStyle, Snapshot};
use crate::services::{DigestFormatter, ListingSource, Notifier};
use crate::storage::SnapshotStore;

use super::diff::{ChangeSet, classify};
use super::normalize::normalize;

/// What a single check ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No baseline existed; the fetched listing became the baseline
    Baseline { count: usize },
    /// Nothing newly listed; baseline left as it was
    NoNewCats { changes: usize },
    /// New cats found; digest sent and baseline replaced
    Notified { new: usize, changes: usize },
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Baseline { count } => write!(f, "baseline of {} cats stored", count),
            CheckOutcome::NoNewCats { changes } => {
                write!(f, "no new cats ({} other changes ignored)", changes)
            }
            CheckOutcome::Notified { new, changes } => {
                write!(f, "{} new cats, digest of {} changes sent", new, changes)
            }
        }
    }
}

/// Drives check cycles against its collaborators.
pub struct CatChecker {
    source: Arc<dyn ListingSource>,
    store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    formatter: DigestFormatter,
    age_style: AgeStyle,
}

impl CatChecker {
    pub fn new(
        source: Arc<dyn ListingSource>,
        store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
        formatter: DigestFormatter,
        age_style: AgeStyle,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            formatter,
            age_style,
        }
    }

    /// Run one check with ages computed against today's local date.
    pub async fn run_check(&self) -> Result<CheckOutcome> {
        self.run_check_on(Local::now().date_naive()).await
    }

    /// Run one check with ages computed against `today`.
    ///
    /// Any error leaves the stored baseline untouched.
    pub async fn run_check_on(&self, today: NaiveDate) -> Result<CheckOutcome> {
        let mut current = self.source.fetch().await?;

        let Some(mut previous) = self.store.load().await? else {
            // Stored verbatim, but only once it would pass a later comparison
            let mut checked = current.clone();
            normalize(&mut checked, today, self.age_style)?;
            Snapshot::new(checked)?;

            self.store.save(&current).await?;
            return Ok(CheckOutcome::Baseline {
                count: current.len(),
            });
        };

        normalize(&mut current, today, self.age_style)?;
        normalize(&mut previous, today, self.age_style)?;

        let current = Snapshot::new(current)?;
        let previous = Snapshot::new(previous)?;
        let changes = classify(&current, &previous);
        log_changes(&changes);

        if !changes.has_new() {
            log::info!("No new updates");
            return Ok(CheckOutcome::NoNewCats {
                changes: changes.change_count(),
            });
        }

        log::info!("Update detected. Sending digest");
        let html = self.formatter.render(&changes);
        self.notifier
            .deliver(DigestFormatter::subject(&changes), html)
            .await?;
        self.store.save(current.records()).await?;

        Ok(CheckOutcome::Notified {
            new: changes.new.len(),
            changes: changes.change_count(),
        })
    }
}

fn log_changes(changes: &ChangeSet) {
    log::info!(
        "Diff: {} new, {} reserved, {} unreserved, {} rehomed, {} removed",
        changes.new.len(),
        changes.reserved.len(),
        changes.unreserved.len(),
        changes.rehomed.len(),
        changes.removed.len()
    );
}
