use std::sync::Arc;

use thiserror::Error;
use url::Url;
use vahti_core::{
    baseline_notice, evaluate, new_listings_notice, page_changed_notice, unified_diff,
    PageSnapshot, Verdict, DEFAULT_MAX_DIFF_LINES,
};
use vahti_logging::{vahti_debug, vahti_info};

use crate::decode::decode_page;
use crate::fetch::Fetcher;
use crate::fingerprint::fingerprint;
use crate::listings::extract_listings;
use crate::normalize::normalize_html;
use crate::notify::Dispatcher;
use crate::store::{StateStore, StoreError};
use crate::types::{FailureKind, FetchError};

/// Wall-clock source injected by the embedder so tests can pin timestamps.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// What to watch and how to treat the very first run.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub page_url: String,
    /// Path prefix that marks a link as a listing detail page.
    pub listing_prefix: String,
    /// Whether the baseline run sends a notice or stays quiet.
    pub notify_on_first_run: bool,
}

/// What one check cycle concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    BaselineStored { notified: bool },
    NewListings { count: usize },
    PageChanged,
    Unchanged,
}

/// Failures that abort a cycle. Notification problems are not here: sends
/// are best effort and only logged.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not persist state: {0}")]
    Store(#[from] StoreError),
}

/// One watched page, one state directory, one set of channels. Executes the
/// fetch, snapshot, compare, notify, persist cycle.
pub struct Watcher {
    settings: WatchSettings,
    fetcher: Box<dyn Fetcher>,
    store: StateStore,
    dispatcher: Dispatcher,
    clock: Clock,
}

impl Watcher {
    pub fn new(
        settings: WatchSettings,
        fetcher: Box<dyn Fetcher>,
        store: StateStore,
        dispatcher: Dispatcher,
        clock: Clock,
    ) -> Self {
        Self {
            settings,
            fetcher,
            store,
            dispatcher,
            clock,
        }
    }

    pub async fn run_once(&self) -> Result<RunOutcome, RunError> {
        let base_url = Url::parse(&self.settings.page_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        vahti_info!("checking {}", self.settings.page_url);
        let output = self.fetcher.fetch(self.settings.page_url.as_str()).await?;
        let page = decode_page(&output.bytes, output.metadata.content_type.as_deref());
        vahti_debug!(
            "fetched {} bytes from {} as {}",
            output.metadata.byte_len,
            output.metadata.final_url,
            page.encoding_label
        );

        let text = normalize_html(&page.html);
        let snapshot = PageSnapshot {
            fingerprint: fingerprint(&text),
            listings: extract_listings(&page.html, &base_url, &self.settings.listing_prefix),
            text,
        };
        vahti_debug!(
            "snapshot fingerprint {} with {} listings",
            snapshot.fingerprint,
            snapshot.listings.len()
        );

        let previous = self.store.load();
        match evaluate(previous.as_ref(), &snapshot) {
            Verdict::Baseline => {
                self.store.save(&snapshot)?;
                vahti_info!("baseline saved to {:?}", self.store.dir());
                let notified = self.settings.notify_on_first_run;
                if notified {
                    let notice = baseline_notice(&self.settings.page_url, &(self.clock)());
                    self.dispatcher.dispatch(&notice).await;
                }
                Ok(RunOutcome::BaselineStored { notified })
            }
            Verdict::NewListings { urls } => {
                vahti_info!("{} new listings detected", urls.len());
                let notice =
                    new_listings_notice(&self.settings.page_url, &(self.clock)(), &urls);
                self.dispatcher.dispatch(&notice).await;
                self.store.save(&snapshot)?;
                Ok(RunOutcome::NewListings { count: urls.len() })
            }
            Verdict::PageChanged => {
                let (old_text, old_fingerprint) = previous
                    .as_ref()
                    .map(|prior| (prior.text.as_str(), prior.fingerprint.as_str()))
                    .unwrap_or(("", ""));
                vahti_info!(
                    "page changed: {} -> {}",
                    old_fingerprint,
                    snapshot.fingerprint
                );
                let diff = unified_diff(old_text, &snapshot.text, DEFAULT_MAX_DIFF_LINES);
                let notice = page_changed_notice(
                    &self.settings.page_url,
                    &(self.clock)(),
                    old_fingerprint,
                    &snapshot.fingerprint,
                    &diff,
                );
                self.dispatcher.dispatch(&notice).await;
                self.store.save(&snapshot)?;
                Ok(RunOutcome::PageChanged)
            }
            Verdict::Unchanged => {
                vahti_info!("no change");
                Ok(RunOutcome::Unchanged)
            }
        }
    }
}
