//! Finds the master playlist and thumbnail behind a debate page. Each
//! broadcaster hides them differently.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use lol_html::{rewrite_str, text, RewriteStrSettings};
use regex::Regex;
use serde_json::Value;

use crate::error::PipelineError;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:122.0) Gecko/20100101 Firefox/122.0";

/// What a debate page resolves to: the stream's master playlist and the
/// poster image.
#[derive(Debug, PartialEq)]
pub struct MediaRefs {
    pub m3u8_url: String,
    pub thumbnail_url: String,
}

/// Fetch a debate page and scrape its stream. Returns `None` for hosts the
/// pipeline does not know how to read, or when the page has no video.
pub async fn find_stream(
    client: &reqwest::Client,
    url: &str,
) -> Result<Option<MediaRefs>, PipelineError> {
    let refs = if url.contains("sicnoticias.pt") {
        extract_sic(&fetch_text(client, url).await?)
    } else if url.contains("rtp.pt") {
        extract_rtp(url, &fetch_text(client, url).await?)
    } else {
        None
    };

    Ok(refs)
}

/// The request headers a host insists on before serving its stream.
/// RTP's CDN rejects anything that does not look like their own player.
pub fn request_headers(url: &str) -> Option<BTreeMap<String, String>> {
    if !url.contains("rtp.pt") {
        return None;
    }

    let headers = [
        ("User-Agent", BROWSER_USER_AGENT),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Referer", "https://www.rtp.pt/"),
        ("Origin", "https://www.rtp.pt"),
        ("DNT", "1"),
        ("Sec-GPC", "1"),
        ("Connection", "keep-alive"),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "same-site"),
        ("TE", "trailers"),
    ];

    Some(
        headers
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    )
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, PipelineError> {
    let fetch_error = |source| PipelineError::Fetch {
        url: url.to_string(),
        source,
    };

    client
        .get(url)
        .send()
        .await
        .map_err(fetch_error)?
        .text()
        .await
        .map_err(fetch_error)
}

/// SIC Notícias embeds the stream in a `VideoObject` ld+json block.
fn extract_sic(html: &str) -> Option<MediaRefs> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();

    let element_content_handlers = vec![text!(
        "script[type='application/ld+json']",
        |chunk| {
            current.push_str(chunk.as_str());
            if chunk.last_in_text_node() {
                blocks.push(std::mem::take(&mut current));
            }
            Ok(())
        }
    )];

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::new()
        },
    )
    .ok()?;

    for block in blocks {
        let Ok(data) = serde_json::from_str::<Value>(&block) else {
            continue;
        };
        if data["@type"] != "VideoObject" {
            continue;
        }
        if let (Some(m3u8_url), Some(thumbnail_url)) =
            (data["contentUrl"].as_str(), data["thumbnailUrl"].as_str())
        {
            return Some(MediaRefs {
                m3u8_url: m3u8_url.to_string(),
                thumbnail_url: thumbnail_url.to_string(),
            });
        }
    }

    None
}

/// RTP Play never exposes the playlist directly, but the player config
/// leaks a screenshot reference the stream paths can be derived from:
///
/// `seekBarThumbnailsLoc: '//cdn-images.rtp.pt/.../preview/p12900_1_2024020515461_preview.vtt',`
fn extract_rtp(url: &str, html: &str) -> Option<MediaRefs> {
    static SEEK_BAR_THUMBNAILS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"seekBarThumbnailsLoc: '[^']*preview/([^']+)\.vtt',").unwrap()
    });

    // https://www.rtp.pt/play/{series}/e746061/debates-legislativas-2024
    let series = url.split('/').rev().nth(2)?;

    let captured = SEEK_BAR_THUMBNAILS.captures(html)?;
    let reference = captured.get(1)?.as_str();
    if !reference.starts_with(series) {
        return None;
    }

    // The reference ends in `_preview`.
    let (reference, _) = reference.rsplit_once('_')?;

    Some(MediaRefs {
        m3u8_url: format!(
            "https://streaming-vod.rtp.pt/hls/nas2.share,/h264/512x384/{series}/{reference}.mp4,.urlset/master.m3u8"
        ),
        thumbnail_url: format!(
            "https://cdn-images.rtp.pt/multimedia/screenshots/{series}/{reference}.jpg?q=100&format=pjpg&auto=webp&v=3&w=400"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sic_pages_resolve_through_the_video_object() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"NewsArticle","headline":"Debate"}</script>
            <script type="application/ld+json">{"@type":"VideoObject","contentUrl":"https://cdn.sic.pt/master.m3u8","thumbnailUrl":"https://cdn.sic.pt/poster.jpg"}</script>
            </head><body></body></html>"#;

        let refs = extract_sic(html).unwrap();

        assert_eq!(
            refs,
            MediaRefs {
                m3u8_url: "https://cdn.sic.pt/master.m3u8".to_string(),
                thumbnail_url: "https://cdn.sic.pt/poster.jpg".to_string(),
            }
        );
    }

    #[test]
    fn sic_pages_without_a_video_resolve_to_nothing() {
        let html = r#"<script type="application/ld+json">{"@type":"NewsArticle"}</script>"#;
        assert_eq!(extract_sic(html), None);
    }

    #[test]
    fn rtp_pages_resolve_through_the_screenshot_reference() {
        let url = "https://www.rtp.pt/play/p12900/e746061/debates-legislativas-2024";
        let html = "var player = {
            seekBarThumbnailsLoc: '//cdn-images.rtp.pt/multimedia/screenshots/p12900/preview/p12900_1_2024020515461_preview.vtt',
        };";

        let refs = extract_rtp(url, html).unwrap();

        assert_eq!(
            refs.m3u8_url,
            "https://streaming-vod.rtp.pt/hls/nas2.share,/h264/512x384/p12900/p12900_1_2024020515461.mp4,.urlset/master.m3u8"
        );
        assert_eq!(
            refs.thumbnail_url,
            "https://cdn-images.rtp.pt/multimedia/screenshots/p12900/p12900_1_2024020515461.jpg?q=100&format=pjpg&auto=webp&v=3&w=400"
        );
    }

    #[test]
    fn rtp_pages_without_the_reference_resolve_to_nothing() {
        let url = "https://www.rtp.pt/play/p12900/e746061/debates";
        assert_eq!(extract_rtp(url, "<html></html>"), None);

        // A reference from another series is not trusted.
        let html = "seekBarThumbnailsLoc: '//cdn/preview/p99999_1_1_preview.vtt',";
        assert_eq!(extract_rtp(url, html), None);
    }

    #[test]
    fn only_rtp_needs_request_headers() {
        let headers =
            request_headers("https://www.rtp.pt/play/p12900/e746061/debates").unwrap();
        assert_eq!(headers.len(), 13);
        assert_eq!(headers["Referer"], "https://www.rtp.pt/");

        assert_eq!(
            request_headers("https://sicnoticias.pt/especiais/eleicoes-legislativas"),
            None
        );
    }

    #[tokio::test]
    async fn unknown_hosts_are_skipped_without_a_request() {
        let client = reqwest::Client::new();

        let refs = find_stream(&client, "https://example.pt/debate")
            .await
            .unwrap();

        assert_eq!(refs, None);
    }
}
