/// A channel-independent notification. Channels decide how subject and body
/// are rendered on the wire (email keeps them separate, messaging joins
/// them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub subject: String,
    pub body: String,
}

/// Listings shown in full before the remainder collapses into a count.
pub const LISTINGS_SHOWN: usize = 10;

pub fn baseline_notice(url: &str, timestamp: &str) -> Notice {
    Notice {
        subject: "Page baseline saved (first run)".to_string(),
        body: format!(
            "Time: {timestamp}\nURL: {url}\n\nBaseline content saved. \
             Notifications will be sent on changes."
        ),
    }
}

pub fn new_listings_notice(url: &str, timestamp: &str, urls: &[String]) -> Notice {
    let mut sample = urls
        .iter()
        .take(LISTINGS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if urls.len() > LISTINGS_SHOWN {
        let hidden = urls.len() - LISTINGS_SHOWN;
        sample.push_str(&format!("\n... and {hidden} more"));
    }

    Notice {
        subject: format!("New listings detected ({}) @ {}", urls.len(), timestamp),
        body: format!("URL: {url}\n\n{sample}"),
    }
}

pub fn page_changed_notice(
    url: &str,
    timestamp: &str,
    previous_fingerprint: &str,
    current_fingerprint: &str,
    diff: &str,
) -> Notice {
    Notice {
        subject: format!("Watched page changed @ {timestamp}"),
        body: format!(
            "URL: {url}\n\nChange detected. \
             Fingerprint: {previous_fingerprint} -> {current_fingerprint}\n\nDiff:\n{diff}"
        ),
    }
}

pub fn error_notice(detail: &str) -> Notice {
    Notice {
        subject: "Watch run failed".to_string(),
        body: detail.to_string(),
    }
}
