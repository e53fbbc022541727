//! Pipeline entry points for the cat watcher.
//!
//! - `normalize`: derive ages from birth dates
//! - `classify`: compare a fresh listing against the baseline
//! - `CatChecker::run_check`: one full check cycle
//! - `run_schedule`: repeat checks on a fixed interval

pub mod check;
pub mod diff;
pub mod normalize;
pub mod schedule;

pub use check::{CatChecker, CheckOutcome};
pub use diff::{
    ChangeSet, ReservationChanges, classify, find_new, find_rehomed, find_removed,
    find_reservation_transitions,
};
pub use normalize::{describe_age, normalize};
pub use schedule::{Schedule, run_cycle, run_schedule};
