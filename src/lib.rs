//! `hinario` - hymnal lyrics scraper and parser.
//!
//! Two independent pipelines share one downstream shape: plain-text hymnal
//! exports are split into per-hymn blocks and classified line by line into
//! labeled verse/chorus segments, and the Cantor Cristão website is scraped
//! page by page into the same segment classifier. Both end as uniform
//! `{number, title, lyrics}` records serialized to JSON and Markdown.

// Re-export public modules for use in integration tests and as a library
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod record;
pub mod scrape;
