//! Vahti engine: the I/O side of watching a page. Fetching and decoding,
//! snapshot construction, state persistence, and notification delivery,
//! wired together by [`Watcher`].

mod decode;
mod fetch;
mod fingerprint;
mod listings;
mod normalize;
mod notify;
mod run;
mod store;
mod types;

pub use decode::{decode_page, DecodedPage};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use fingerprint::fingerprint;
pub use listings::extract_listings;
pub use normalize::normalize_html;
pub use notify::{
    Channel, Dispatcher, NotifyError, SmtpChannel, SmtpConfig, TelegramChannel, TelegramConfig,
};
pub use run::{Clock, RunError, RunOutcome, WatchSettings, Watcher};
pub use store::{StateStore, StoreError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
