//! Service layer for the cat watcher.
//!
//! This module contains the collaborators around the diff:
//! - Listing fetch (`HttpListingSource`)
//! - Digest rendering (`DigestFormatter`)
//! - Digest delivery (`SmtpMailer`)

mod digest;
mod listing;
mod mailer;

pub use digest::{DigestFormatter, map_cat_suitability};
pub use listing::{HttpListingSource, ListingSource, parse_listing};
pub use mailer::{Notifier, SmtpMailer, build_message};
