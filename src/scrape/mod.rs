//! Website scraping pipeline for the Cantor Cristão collection site.
//!
//! Link discovery and page fetching are the only networked parts of the
//! crate; everything downstream of the raw page text reuses the same
//! [`SegmentBuilder`] classifier as the plain-text exports. Fetches run
//! with a bounded worker count and retry transient HTTP failures with
//! exponential backoff; one bad page never aborts the run.

pub mod html;

use std::collections::BTreeSet;
use std::sync::LazyLock;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{ParsedHymn, SegmentBuilder};

/// HTTP statuses worth retrying.
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Initial backoff delay; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Regex matching href attribute values.
#[allow(clippy::expect_used)]
static RE_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="([^"]+)""#).expect("valid regex: RE_HREF")
});

/// Regex matching hymn page paths like `/015-saudosa-lembranca`.
#[allow(clippy::expect_used)]
static RE_HYMN_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(\d{3})-").expect("valid regex: RE_HYMN_PATH")
});

/// Regex matching the document title element.
#[allow(clippy::expect_used)]
static RE_PAGE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title>(.*?)</title>").expect("valid regex: RE_PAGE_TITLE")
});

/// Regex matching the `<site> - <number> - <title>` page title line.
#[allow(clippy::expect_used)]
static RE_TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-\s*(\d+)\s*-\s*(.+)").expect("valid regex: RE_TITLE_LINE")
});

/// Regex matching paragraph elements with their inner markup.
#[allow(clippy::expect_used)]
static RE_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid regex: RE_PARAGRAPH")
});

/// One scraped hymn page, reduced to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HymnPage {
    /// Hymn number from the page title line.
    pub number: u32,
    /// Hymn title from the page title line.
    pub title: String,
    /// Body text with paragraph boundaries as blank lines.
    pub body: String,
}

/// HTTP client for the hymnal site.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    base_url: String,
    concurrency: usize,
    retries: u32,
}

impl SiteClient {
    /// Create a client from config (timeout, concurrency, retry budget).
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(format!("{}/{}", config.app_name(), config.app_version()))
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            concurrency: config.fetch_concurrency,
            retries: config.fetch_retries,
        })
    }

    /// Fetch a URL as text, retrying transient failures with exponential
    /// backoff.
    async fn get_text(&self, url: &str) -> Result<String> {
        let mut delay = INITIAL_BACKOFF;
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp.text().await.map_err(|e| {
                            Error::Network(format!("Reading body from {url} failed: {e}"))
                        });
                    }
                    let code = status.as_u16();
                    if TRANSIENT_STATUSES.contains(&code) && attempt <= self.retries {
                        tracing::warn!(
                            "GET {url} returned {code}, retrying ({attempt}/{}) in {delay:?}",
                            self.retries
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                        continue;
                    }
                    return Err(Error::http_status(
                        format!("Request to {url} returned {status}"),
                        code,
                    ));
                }
                Err(e) if attempt <= self.retries => {
                    tracing::warn!(
                        "GET {url} failed: {e}, retrying ({attempt}/{}) in {delay:?}",
                        self.retries
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    return Err(Error::Network(format!("Request to {url} failed: {e}")));
                }
            }
        }
    }

    /// Discover hymn page links from the site menu.
    ///
    /// Keeps same-site links whose path contains a three-digit hymn slug
    /// (`/NNN-`, NNN > 0), deduplicated and sorted.
    pub async fn fetch_menu_links(&self) -> Result<Vec<String>> {
        tracing::info!("Fetching menu from {}", self.base_url);
        let page = self.get_text(&self.base_url).await?;

        let mut links = BTreeSet::new();
        for caps in RE_HREF.captures_iter(&page) {
            let href = html::decode_entities(&caps[1]);
            let full = join_url(&self.base_url, &href);
            let Some(path) = full.strip_prefix(self.base_url.as_str()) else {
                continue;
            };
            let number = RE_HYMN_PATH
                .captures(path)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok());
            if number.is_some_and(|n| n > 0) {
                links.insert(full);
            }
        }

        tracing::info!("Found {} hymn links", links.len());
        Ok(links.into_iter().collect())
    }

    /// Fetch many pages with a bounded worker count, preserving input
    /// order in the results.
    ///
    /// Returns one `(url, result)` pair per link; failed fetches are
    /// reported per item so callers can continue with the rest.
    pub async fn fetch_pages(&self, links: &[String]) -> Vec<(String, Result<String>)> {
        stream::iter(links.iter().cloned())
            .map(|url| async move {
                let result = self.get_text(&url).await;
                (url, result)
            })
            .buffered(self.concurrency.max(1))
            .collect()
            .await
    }
}

/// Parse one scraped page into its title-line header and body text.
///
/// The page title follows `<Site Title> - <number> - <title>`; the body is
/// nested in entity-escaped paragraph markers, so entities are decoded
/// once and the paragraphs read out of the resulting markup. Returns
/// `None` for pages that are not hymn pages.
#[must_use]
pub fn parse_page(page: &str) -> Option<HymnPage> {
    let decoded = html::decode_entities(page);

    let title_text = RE_PAGE_TITLE
        .captures(&decoded)
        .map(|caps| html::strip_tags(&caps[1]))?;
    let caps = RE_TITLE_LINE.captures(&title_text)?;
    let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let title = caps.get(2)?.as_str().trim().to_string();

    let mut paragraphs = Vec::new();
    for caps in RE_PARAGRAPH.captures_iter(&decoded) {
        let text = html::strip_tags(&caps[1]);
        let text = text.trim_matches('\n');
        if !text.trim().is_empty() {
            paragraphs.push(text.to_string());
        }
    }

    Some(HymnPage {
        number,
        title,
        body: paragraphs.join("\n\n"),
    })
}

/// Classify a page body with the shared segment classifier.
///
/// Returns `None` when classification yields no segments (index or intro
/// pages); such pages are skipped.
#[must_use]
pub fn page_to_hymn(page: &HymnPage) -> Option<ParsedHymn> {
    let mut builder = SegmentBuilder::new(None);
    for line in page.body.lines() {
        builder.push_line(line);
    }
    let segments = builder.finish();
    if segments.is_empty() {
        return None;
    }
    Some(ParsedHymn {
        number: page.number,
        title: page.title.clone(),
        segments,
    })
}

/// Resolve an href against the base URL.
fn join_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix('/') {
        return format!("{}/{rest}", origin(base));
    }
    format!("{base}/{href}")
}

/// Scheme and host of a URL, without any path.
fn origin(base: &str) -> &str {
    let Some(scheme_end) = base.find("://") else {
        return base;
    };
    let host_start = scheme_end + 3;
    base[host_start..]
        .find('/')
        .map_or(base, |slash| &base[..host_start + slash])
}
