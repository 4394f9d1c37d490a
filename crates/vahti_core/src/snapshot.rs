use std::collections::BTreeSet;

/// Everything derived from one fetch of the watched page: the normalized
/// visible text, its fingerprint, and the canonical listing URLs found on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub text: String,
    pub fingerprint: String,
    pub listings: BTreeSet<String>,
}

/// The previous snapshot as recovered from the state store.
///
/// Presence of a stored snapshot is what separates a steady-state run from a
/// baseline run. Text or listings that could not be read back degrade to
/// empty values without discarding the snapshot itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub fingerprint: String,
    pub text: String,
    pub listings: BTreeSet<String>,
}
