//! Category and document tree walk that writes the markdown export.
//!
//! Layout of the output root:
//!
//! ```text
//! {root}/{category-slug}/{doc-slug}.md
//! {root}/{category-slug}/{downloaded-image}
//! ```
//!
//! Child documents land in their category directory next to their parents.

use crate::client::ApiClient;
use crate::image::{HttpImageDownloader, ImageDownloader, ImageRewriter, ImageStats};
use crate::links::normalize_links;
use crate::{Category, Config, DocSummary, Document, Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do when an API request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log a warning and carry on as if the request returned no data.
    #[default]
    Continue,
    /// Stop the run and return the error.
    Abort,
}

/// Settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory receiving one sub-directory per category
    pub root: PathBuf,
    /// Download hosted images instead of linking them remotely
    pub download_images: bool,
    /// URL prefix of platform-hosted images
    pub host_prefix: String,
    /// Deepest document nesting followed; top-level documents are depth 1
    pub max_depth: usize,
    /// Reaction to API failures
    pub policy: FailurePolicy,
}

impl ExportOptions {
    /// Options for `root` taken from a loaded [`Config`].
    pub fn from_config(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            download_images: config.images.download,
            host_prefix: config.images.host_prefix.clone(),
            max_depth: config.export.max_depth,
            policy: if config.export.fail_fast {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Category directories created
    pub categories: usize,
    /// Markdown files written
    pub documents: usize,
    /// Documents not written (failed fetch, invalid slug, guards)
    pub skipped: usize,
    /// API requests that failed and were treated as empty
    pub api_failures: usize,
    /// The category listing ended on a failure rather than an empty page
    pub categories_truncated: bool,
    /// Image rewriting totals
    pub images: ImageStats,
}

/// Render the markdown file for a document.
pub fn render_document(title: &str, body: &str) -> String {
    format!("# {title}\n\n---\n\n{body}")
}

/// Check that a slug is usable as a single file or directory name.
pub fn validate_slug(slug: &str) -> Result<&str> {
    let mut components = Path::new(slug).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !slug.contains(['/', '\\']) => Ok(slug),
        _ => Err(Error::InvalidSlug(slug.to_string())),
    }
}

/// Walks the platform's categories and documents and writes them to disk.
pub struct Exporter<'a> {
    client: &'a ApiClient,
    downloader: Box<dyn ImageDownloader + 'a>,
    options: ExportOptions,
}

impl<'a> Exporter<'a> {
    /// Exporter downloading images over the API client's HTTP connection pool.
    pub fn new(client: &'a ApiClient, options: ExportOptions) -> Self {
        let downloader = HttpImageDownloader::new(client.http().clone());
        Self::with_downloader(client, Box::new(downloader), options)
    }

    /// Exporter with a custom image downloader.
    pub fn with_downloader(
        client: &'a ApiClient,
        downloader: Box<dyn ImageDownloader + 'a>,
        options: ExportOptions,
    ) -> Self {
        Self {
            client,
            downloader,
            options,
        }
    }

    /// Export every category in API order.
    ///
    /// Filesystem errors end the run. API errors end it only under
    /// [`FailurePolicy::Abort`].
    pub async fn run(&self) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();

        let listing = self.client.list_categories().await;
        if let Some(e) = listing.stopped_by {
            summary.categories_truncated = true;
            self.api_failure(e, "listing categories", &mut summary)?;
        }

        for category in &listing.items {
            self.export_category(category, &mut summary).await?;
        }

        info!(
            categories = summary.categories,
            documents = summary.documents,
            skipped = summary.skipped,
            "Export finished"
        );
        Ok(summary)
    }

    async fn export_category(&self, category: &Category, summary: &mut ExportSummary) -> Result<()> {
        info!(
            "Category: {}, Slug: {}, Order: {}",
            category.title, category.slug, category.order
        );

        if let Err(e) = validate_slug(&category.slug) {
            warn!("Skipping category: {e}");
            return Ok(());
        }

        let dir = self.options.root.join(&category.slug);
        fs::create_dir_all(&dir)?;
        summary.categories += 1;

        let docs = match self.client.list_documents_for_category(&category.slug).await {
            Ok(docs) => docs,
            Err(e) => {
                self.api_failure(e, &format!("listing documents of '{}'", category.slug), summary)?;
                Vec::new()
            },
        };

        let mut visited = HashSet::new();
        for doc in &docs {
            self.export_doc(doc, &dir, 1, &mut visited, summary).await?;
        }
        Ok(())
    }

    async fn export_doc(
        &self,
        node: &DocSummary,
        dir: &Path,
        depth: usize,
        visited: &mut HashSet<String>,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            warn!(
                "Skipping '{}': nested deeper than {} levels",
                node.slug, self.options.max_depth
            );
            summary.skipped += 1;
            return Ok(());
        }
        if !visited.insert(node.slug.clone()) {
            warn!("Skipping '{}': already exported in this category", node.slug);
            summary.skipped += 1;
            return Ok(());
        }
        if let Err(e) = validate_slug(&node.slug) {
            warn!("Skipping document and its children: {e}");
            summary.skipped += 1;
            return Ok(());
        }

        match self.client.get_document_detail(&node.slug).await {
            Ok(doc) => self.write_document(&node.slug, &doc, dir, summary).await?,
            Err(e) => {
                self.api_failure(e, &format!("fetching document '{}'", node.slug), summary)?;
                summary.skipped += 1;
            },
        }

        for child in &node.children {
            Box::pin(self.export_doc(child, dir, depth + 1, visited, summary)).await?;
        }
        Ok(())
    }

    async fn write_document(
        &self,
        file_stem: &str,
        doc: &Document,
        dir: &Path,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let path = dir.join(format!("{file_stem}.md"));
        info!(" * Title: {}, Slug: {}", doc.title, doc.slug);

        let rewriter = if self.options.download_images {
            ImageRewriter::new(self.downloader.as_ref(), &self.options.host_prefix)
        } else {
            ImageRewriter::without_downloads()
        };
        let rewritten = rewriter.rewrite(&doc.body, dir).await?;
        let body = normalize_links(&rewritten.body);

        fs::write(&path, render_document(&doc.title, &body))?;
        debug!("Wrote {}", path.display());

        summary.documents += 1;
        summary.images.absorb(rewritten.stats);
        Ok(())
    }

    fn api_failure(&self, err: Error, action: &str, summary: &mut ExportSummary) -> Result<()> {
        summary.api_failures += 1;
        match self.options.policy {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::Continue => {
                warn!(
                    category = err.category(),
                    recoverable = err.is_recoverable(),
                    "Treating failure as empty while {action}: {err}"
                );
                Ok(())
            },
        }
    }
}
