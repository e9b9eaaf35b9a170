//! Rewriting of `[block:image]` blocks into markdown image tags.
//!
//! The platform stores images as a JSON payload fenced by two markers:
//!
//! ```text
//! [block:image]
//! {
//!   "images": [{ "image": ["https://files.readme.io/abc-chart.png", "chart.png", "Sales"] }]
//! }
//! [/block]
//! ```
//!
//! Each block becomes one `![caption](target)\n` line per image. Images under
//! the hosted-asset prefix are downloaded next to the markdown file and
//! referenced by file name; everything else keeps its remote URL.

use crate::{Error, ImageBlock, ImageDescriptor, Result};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use reqwest::Client;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

/// Regex for image blocks: non-greedy JSON span between the two markers.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static IMAGE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[block:image\]\n(\{.*?\n\})\n\[/block\]").unwrap());

/// Bytes escaped when a local file name is used as a markdown link target.
const LINK_TARGET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// Result of decoding the JSON span of one image block.
#[derive(Debug)]
pub enum BlockParse {
    /// The payload decoded into an image list
    Valid(ImageBlock),
    /// The payload is not valid JSON or lacks the image list
    Malformed(Error),
}

/// Decode the JSON captured between the block markers.
pub fn parse_block(json: &str) -> BlockParse {
    match serde_json::from_str::<ImageBlock>(json) {
        Ok(block) => BlockParse::Valid(block),
        Err(e) => BlockParse::Malformed(e.into()),
    }
}

/// Fetches a remote image into a local directory.
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    /// Download `url` into `dir`, returning the file name written.
    async fn download(&self, url: &str, dir: &Path) -> Result<String>;
}

/// [`ImageDownloader`] backed by a `reqwest` client.
///
/// Requests are unauthenticated; the timeout is whatever the client was
/// built with.
pub struct HttpImageDownloader {
    client: Client,
}

impl HttpImageDownloader {
    /// Wrap an existing client (usually the API client's).
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageDownloader for HttpImageDownloader {
    async fn download(&self, url: &str, dir: &Path) -> Result<String> {
        let file_name = file_name_from_url(url)?;
        fs::create_dir_all(dir)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        fs::write(dir.join(&file_name), &bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), dir.join(&file_name).display());
        Ok(file_name)
    }
}

/// Local file name for a remote asset: the final path segment of its URL,
/// percent-decoded.
///
/// Query strings and fragments are not part of the name.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let name = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| Error::InvalidUrl(format!("{url}: file name is not valid UTF-8")))?;

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidUrl(format!("{url}: no file name in path")));
    }
    Ok(name.into_owned())
}

/// Markdown link target for a file written next to the document.
pub fn link_target(file_name: &str) -> String {
    utf8_percent_encode(file_name, LINK_TARGET).to_string()
}

/// Counters describing what a rewrite did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageStats {
    /// Images downloaded and referenced locally
    pub downloaded: usize,
    /// Hosted images whose download failed; referenced remotely
    pub failed: usize,
    /// Images referenced by remote URL without a download attempt
    pub remote: usize,
    /// Blocks left untouched because their payload did not decode
    pub malformed_blocks: usize,
}

impl ImageStats {
    /// Add another rewrite's counters to this one.
    pub const fn absorb(&mut self, other: Self) {
        self.downloaded += other.downloaded;
        self.failed += other.failed;
        self.remote += other.remote;
        self.malformed_blocks += other.malformed_blocks;
    }
}

/// Body text after image rewriting, with counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Body with every decodable block replaced
    pub body: String,
    /// What happened to the images along the way
    pub stats: ImageStats,
}

/// Replaces image blocks in document bodies.
pub struct ImageRewriter<'a> {
    downloader: Option<&'a dyn ImageDownloader>,
    host_prefix: &'a str,
}

impl<'a> ImageRewriter<'a> {
    /// Rewriter that downloads images under `host_prefix` through `downloader`.
    pub const fn new(downloader: &'a dyn ImageDownloader, host_prefix: &'a str) -> Self {
        Self {
            downloader: Some(downloader),
            host_prefix,
        }
    }

    /// Rewriter that keeps every image's remote URL.
    pub const fn without_downloads() -> Self {
        Self {
            downloader: None,
            host_prefix: "",
        }
    }

    /// Replace every image block in `body`, downloading hosted images into `dir`.
    ///
    /// Malformed blocks are kept verbatim. A failed download falls back to the
    /// remote URL, except for local I/O failures, which are returned.
    pub async fn rewrite(&self, body: &str, dir: &Path) -> Result<Rewritten> {
        // Collect spans up front so no regex state lives across an await.
        let blocks: Vec<(Range<usize>, Range<usize>)> = IMAGE_BLOCK_RE
            .captures_iter(body)
            .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.range())))
            .collect();

        let mut stats = ImageStats::default();
        if blocks.is_empty() {
            return Ok(Rewritten {
                body: body.to_string(),
                stats,
            });
        }

        let mut out = String::with_capacity(body.len());
        let mut last = 0;
        for (whole, payload) in blocks {
            out.push_str(&body[last..whole.start]);
            match parse_block(&body[payload]) {
                BlockParse::Valid(block) => {
                    for image in &block.images {
                        self.render_image(image, dir, &mut out, &mut stats).await?;
                    }
                },
                BlockParse::Malformed(e) => {
                    warn!("Leaving malformed image block unchanged: {e}");
                    stats.malformed_blocks += 1;
                    out.push_str(&body[whole.clone()]);
                },
            }
            last = whole.end;
        }
        out.push_str(&body[last..]);

        Ok(Rewritten { body: out, stats })
    }

    async fn render_image(
        &self,
        image: &ImageDescriptor,
        dir: &Path,
        out: &mut String,
        stats: &mut ImageStats,
    ) -> Result<()> {
        let Some(url) = image.url() else {
            warn!("Skipping image without URL: {:?}", image.image);
            return Ok(());
        };
        let caption = image.caption();

        let downloader = self
            .downloader
            .filter(|_| !self.host_prefix.is_empty() && url.starts_with(self.host_prefix));

        let target = match downloader {
            Some(downloader) => match downloader.download(url, dir).await {
                Ok(file_name) => {
                    info!("    * {file_name}");
                    stats.downloaded += 1;
                    link_target(&file_name)
                },
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    warn!(category = e.category(), "Failed to download {url}: {e}");
                    stats.failed += 1;
                    url.to_string()
                },
            },
            None => {
                stats.remote += 1;
                url.to_string()
            },
        };

        out.push_str(&format!("![{caption}]({target})\n"));
        Ok(())
    }
}
