use crate::{PageSnapshot, StoredSnapshot};

/// Outcome of comparing the current snapshot against stored state.
///
/// Variants are listed in priority order: a baseline run short-circuits
/// everything else, new listings suppress the generic text-change report, and
/// the fingerprint comparison only matters once the listing check found
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No prior state; the current snapshot becomes the baseline.
    Baseline,
    /// Listings present now that were absent before, sorted.
    NewListings { urls: Vec<String> },
    /// No new listings, but the page text changed.
    PageChanged,
    /// Nothing to report; state must be left untouched.
    Unchanged,
}

/// Pure decision function for one check cycle.
pub fn evaluate(previous: Option<&StoredSnapshot>, current: &PageSnapshot) -> Verdict {
    let Some(previous) = previous else {
        return Verdict::Baseline;
    };

    let urls: Vec<String> = current
        .listings
        .difference(&previous.listings)
        .cloned()
        .collect();
    if !urls.is_empty() {
        return Verdict::NewListings { urls };
    }

    if current.fingerprint != previous.fingerprint {
        return Verdict::PageChanged;
    }

    Verdict::Unchanged
}
