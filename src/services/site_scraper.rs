// src/services/site_scraper.rs

//! Latest-chapter scraping for the supported sites.
//!
//! A URL is classified into a [`Site`] and the page is fetched with a
//! browser-like User-Agent. Extraction works on a parsed document so the
//! per-site rules can be exercised without network access.

use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, Site};
use crate::utils::http;

/// Anything that can report the latest chapter token for a URL.
///
/// `Err` means the token could not be determined ("absent"); the caller
/// decides whether that aborts the operation or is skipped.
pub trait ChapterSource {
    fn fetch_latest_chapter(&self, url: &str) -> Result<String>;
}

/// Scraper that fetches the live series page.
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    /// Create a new scraper with the given HTTP settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn fetch(&self, url: &str) -> Result<Html> {
        http::fetch_page(&self.client, url).map_err(|e| AppError::scrape(url, e))
    }
}

impl ChapterSource for WebScraper {
    fn fetch_latest_chapter(&self, url: &str) -> Result<String> {
        let site = Site::classify(url).ok_or_else(|| AppError::UnsupportedDomain {
            url: url.to_string(),
        })?;

        log::debug!("Fetching {} page: {}", site, url);
        let document = self.fetch(url)?;
        let chapter = extract_latest_chapter(site, &document, url)?;
        log::debug!("Latest chapter for {}: {:?}", url, chapter);
        Ok(chapter)
    }
}

/// Run the extraction routine for `site` over a parsed page.
///
/// A token that is empty or only whitespace is a failure; any other token is
/// returned untrimmed.
pub fn extract_latest_chapter(site: Site, document: &Html, url: &str) -> Result<String> {
    let chapter = match site {
        Site::Wln => extract_wln(document),
        Site::NovelUpdates => extract_novelupdates(document),
    }?;

    match chapter {
        Some(chapter) if !chapter.trim().is_empty() => Ok(chapter),
        Some(_) => Err(AppError::scrape(url, "latest chapter text is empty")),
        None => Err(AppError::scrape(
            url,
            format!("no latest-release marker found on {site} page"),
        )),
    }
}

/// First `h5` heading, minus its `"Latest release - "` prefix.
///
/// e.g. `<h5>Latest release - vol 2.0  chp. 351.0</h5>`
fn extract_wln(document: &Html) -> Result<Option<String>> {
    let heading = parse_selector("h5")?;
    Ok(document.select(&heading).next().map(|el| {
        el.text()
            .collect::<String>()
            .chars()
            .skip(Site::WLN_PREFIX_LEN)
            .collect()
    }))
}

/// Text of the first release anchor; the page lists newest first.
///
/// e.g. `<a class="chp-release" href="...">c153</a>`
fn extract_novelupdates(document: &Html) -> Result<Option<String>> {
    let release = parse_selector(&format!("a.{}", Site::NOVELUPDATES_RELEASE_CLASS))?;
    Ok(document
        .select(&release)
        .next()
        .map(|el| el.text().collect::<String>()))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const WLN_URL: &str = "https://www.wlnupdates.com/series-id/1234/some-novel";
    const NU_URL: &str = "https://www.novelupdates.com/series/some-novel/";

    #[test]
    fn test_extract_wln_strips_prefix() {
        let doc = Html::parse_document(
            "<html><body><h4>Other</h4>\
             <h5>Latest release - vol 2.0  chp. 351.0</h5>\
             <h5>Latest release - vol 1.0  chp. 1.0</h5></body></html>",
        );
        assert_eq!(
            extract_latest_chapter(Site::Wln, &doc, WLN_URL).unwrap(),
            "vol 2.0  chp. 351.0"
        );
    }

    #[test]
    fn test_extract_wln_missing_heading() {
        let doc = Html::parse_document("<html><body><h4>Nothing here</h4></body></html>");
        let err = extract_latest_chapter(Site::Wln, &doc, WLN_URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
    }

    #[test]
    fn test_extract_wln_prefix_only_is_failure() {
        let doc = Html::parse_document("<h5>Latest release - </h5>");
        assert!(extract_latest_chapter(Site::Wln, &doc, WLN_URL).is_err());
    }

    #[test]
    fn test_whitespace_only_token_is_failure() {
        let doc = Html::parse_document(r#"<a class="chp-release" href="/r/3">  </a>"#);
        let err = extract_latest_chapter(Site::NovelUpdates, &doc, NU_URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScrapeFailed);

        let doc = Html::parse_document("<h5>Latest release -    </h5>");
        let err = extract_latest_chapter(Site::Wln, &doc, WLN_URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
    }

    #[test]
    fn test_extract_novelupdates_takes_first_release() {
        let doc = Html::parse_document(
            r#"<table id="myTable">
                 <tr><td><a class="chp-release" href="/r/3">c153</a></td></tr>
                 <tr><td><a class="chp-release" href="/r/2">c152</a></td></tr>
                 <tr><td><a class="other" href="/r/1">c999</a></td></tr>
               </table>"#,
        );
        assert_eq!(
            extract_latest_chapter(Site::NovelUpdates, &doc, NU_URL).unwrap(),
            "c153"
        );
    }

    #[test]
    fn test_extract_novelupdates_matches_among_multiple_classes() {
        let doc = Html::parse_document(
            r#"<a class="chp-release sttitle" href="/r/9">v2c10</a>"#,
        );
        assert_eq!(
            extract_latest_chapter(Site::NovelUpdates, &doc, NU_URL).unwrap(),
            "v2c10"
        );
    }

    #[test]
    fn test_extract_novelupdates_no_releases() {
        let doc = Html::parse_document(r#"<a href="/r/3">c153</a>"#);
        let err = extract_latest_chapter(Site::NovelUpdates, &doc, NU_URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
    }

    #[test]
    fn test_unsupported_url_rejected_before_fetch() {
        let scraper = WebScraper::with_client(Client::new());
        let err = scraper
            .fetch_latest_chapter("https://example.com/abc")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedDomain);
    }

    /// Answer a single request on a local port and hand back the raw request.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        let url = format!("http://127.0.0.1:{port}/novelupdates/series/some-novel/");
        (url, handle)
    }

    fn live_scraper() -> WebScraper {
        WebScraper::new(&CrawlerConfig::default()).unwrap()
    }

    const RELEASE_PAGE: &str = r#"<a class="chp-release" href="/r/3">c153</a>"#;

    #[test]
    fn test_fetch_sends_browser_user_agent() {
        let (url, server) = serve_once("200 OK", RELEASE_PAGE);

        let chapter = live_scraper().fetch_latest_chapter(&url).unwrap();
        assert_eq!(chapter, "c153");

        let request = server.join().unwrap().to_lowercase();
        assert!(request.contains("user-agent: mozilla/5.0\r\n"));
    }

    #[test]
    fn test_error_status_is_scrape_failure() {
        let (url, server) = serve_once("403 Forbidden", RELEASE_PAGE);

        let err = live_scraper().fetch_latest_chapter(&url).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
        server.join().unwrap();
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }
}
