//! Vahti core: pure change-detection decisions and notification content.
mod diff;
mod notice;
mod snapshot;
mod verdict;

pub use diff::{unified_diff, DEFAULT_MAX_DIFF_LINES};
pub use notice::{
    baseline_notice, error_notice, new_listings_notice, page_changed_notice, Notice,
    LISTINGS_SHOWN,
};
pub use snapshot::{PageSnapshot, StoredSnapshot};
pub use verdict::{evaluate, Verdict};
