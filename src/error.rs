/// Failure modes of an [`AssetResolver`](crate::AssetResolver).
///
/// The recoverable/fatal boundary is carried in the type, never inferred
/// from error message text.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The source asset does not exist. Recoverable: the image is left
    /// unresolved and the page still completes.
    #[error("asset not found: {0}")]
    NotFound(String),
    /// Anything else (auth failure, unexpected response). Fatal for the page.
    #[error("asset resolution failed: {0}")]
    Failed(String),
}

/// Errors surfaced by the migration pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MigrateError {
    /// An asset resolver failure that was not a plain not-found.
    #[error("failed to resolve asset {url}: {source}")]
    AssetResolution {
        url: String,
        source: ResolveError,
    },
    /// A caption-like element with no recognizable preceding content to
    /// attach to. Raised by importers; silent mis-placement would corrupt
    /// content rather than merely omit it.
    #[error("no preceding content to attach caption to: {0}")]
    UnplaceableCaption(String),
    /// Markup the calling importer declines to handle.
    #[error("unsupported markup: {0}")]
    Unsupported(String),
}
