//! Sitemap rendering.
//!
//! Turns the Wiki.js page list into a sitemaps.org document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/en/home</loc>
//!     <lastmod>2024-01-02T03:04:05Z</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::domain::Page;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use derive_more::Display;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const INDENT_WIDTH: usize = 2;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page '{path}' has an unparseable updatedAt value '{value}': {source}")]
    InvalidTimestamp {
        path: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("failed to write sitemap XML: {0}")]
    Write(#[from] std::io::Error),
    #[error("sitemap XML is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChangeFreq {
    #[display("daily")]
    Daily,
    #[display("weekly")]
    Weekly,
    #[display("monthly")]
    Monthly,
}

/// Crawl hints attached to a single `<url>` entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlPolicy {
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl CrawlPolicy {
    /// Picks the crawl hints for a page from its raw `path`, before any slash stripping.
    pub fn for_path(path: &str) -> Self {
        if path == "home" {
            Self {
                changefreq: ChangeFreq::Daily,
                priority: 1.0,
            }
        } else if path.starts_with("blog/") {
            Self {
                changefreq: ChangeFreq::Monthly,
                priority: 0.8,
            }
        } else {
            Self {
                changefreq: ChangeFreq::Weekly,
                priority: 0.5,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
    policy: CrawlPolicy,
}

impl UrlEntry {
    fn from_page(base_url: &str, page: &Page) -> Result<Self, RenderError> {
        let lastmod = page
            .updated_at
            .as_deref()
            .map(|value| {
                format_lastmod(value).map_err(|source| RenderError::InvalidTimestamp {
                    path: page.path.clone(),
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            loc: page_location(base_url, &page.locale, &page.path),
            lastmod,
            policy: CrawlPolicy::for_path(&page.path),
        })
    }
}

/// Renders every publishable page into a pretty-printed sitemap, in upstream order.
pub fn render_sitemap(base_url: &str, pages: &[Page]) -> Result<String, RenderError> {
    let entries = pages
        .iter()
        .filter(|page| page.is_publishable())
        .map(|page| UrlEntry::from_page(base_url, page))
        .collect::<Result<Vec<_>, _>>()?;

    write_urlset(&entries)
}

/// Builds the `<loc>` for a page: `{base}/{locale}/{path}`, or `{base}/{locale}` for an empty path.
pub fn page_location(base_url: &str, locale: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let url_path = path.trim_matches('/');

    if url_path.is_empty() {
        format!("{base}/{locale}")
    } else {
        format!("{base}/{locale}/{url_path}")
    }
}

/// Normalises an ISO-8601 timestamp to UTC with second precision and a `Z` suffix.
///
/// Accepts RFC 3339 (any offset), naive date-times (taken as UTC) and bare dates (midnight).
pub fn format_lastmod(value: &str) -> Result<String, chrono::ParseError> {
    let rfc3339_err = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc).format(LASTMOD_FORMAT).to_string()),
        Err(e) => e,
    };

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.format(LASTMOD_FORMAT).to_string());
    }

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(NaiveTime::MIN).format(LASTMOD_FORMAT).to_string()),
        Err(_) => Err(rfc3339_err),
    }
}

fn write_urlset(entries: &[UrlEntry]) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::with_capacity(4096), b' ', INDENT_WIDTH);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;

        writer
            .create_element("loc")
            .write_text_content(BytesText::new(&entry.loc))?;

        if let Some(lastmod) = &entry.lastmod {
            writer
                .create_element("lastmod")
                .write_text_content(BytesText::new(lastmod))?;
        }

        let changefreq = entry.policy.changefreq.to_string();
        writer
            .create_element("changefreq")
            .write_text_content(BytesText::new(&changefreq))?;

        let priority = format!("{:.1}", entry.policy.priority);
        writer
            .create_element("priority")
            .write_text_content(BytesText::new(&priority))?;

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}
