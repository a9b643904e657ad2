// blockmark: block-to-table normalization and Markdown serialization for
// site migrations.
//
// Pipeline (driven by an external per-site importer):
//   cleaned DOM subtree → convert_blocks_to_tables → review_inline_element
//     → to_markdown (DOM → MDAST → Markdown + asset resolution)
//
// The importer owns fetching, DOM cleanup, and storage; this crate owns the
// transformations in between.

pub mod dom;
pub mod mdast;

mod assets;
mod blocks;
mod dom_to_mdast;
mod error;
mod inline;
mod stringify;
mod table;

pub use assets::{AssetResolver, ImageAsset, MarkdownDocument};
pub use blocks::{
    convert_blocks_to_tables, convert_blocks_to_tables_with, derive_block_name, BlockOptions,
};
pub use error::{MigrateError, ResolveError};
pub use inline::{review_inline_element, InlineTag};
pub use stringify::{HeadingStyle, StringifyOptions};
pub use table::{create_table, Cell};

/// Conversion options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Serializer formatting options.
    pub stringify: StringifyOptions,
    /// Whether to preserve newlines in whitespace normalization.
    pub newlines: bool,
}

impl Options {
    /// Create a new Options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading style.
    pub fn with_heading_style(mut self, style: HeadingStyle) -> Self {
        self.stringify.heading_style = style;
        self
    }

    /// Set the unordered list bullet character.
    pub fn with_bullet(mut self, bullet: char) -> Self {
        self.stringify.bullet = bullet;
        self
    }

    /// Set the emphasis marker character.
    pub fn with_emphasis(mut self, marker: char) -> Self {
        self.stringify.emphasis = marker;
        self
    }

    /// Set the strong marker character.
    pub fn with_strong(mut self, marker: char) -> Self {
        self.stringify.strong = marker;
        self
    }

    /// Set the fenced code block marker character.
    pub fn with_fence(mut self, fence: char) -> Self {
        self.stringify.fence = fence;
        self
    }

    /// Set the thematic break rule character.
    pub fn with_rule(mut self, rule: char) -> Self {
        self.stringify.rule = rule;
        self
    }

    /// Set whether to preserve newlines in whitespace normalization.
    pub fn with_newlines(mut self, newlines: bool) -> Self {
        self.newlines = newlines;
        self
    }
}

/// Serialize a normalized DOM subtree to Markdown with default options.
///
/// Images discovered in the tree are migrated through `resolver`,
/// sequentially in document order; see [`AssetResolver`].
pub fn to_markdown(
    root: &dom::Element,
    resolver: &mut dyn AssetResolver,
) -> Result<MarkdownDocument, MigrateError> {
    to_markdown_with(root, resolver, &Options::default())
}

/// Serialize a normalized DOM subtree to Markdown with custom options.
pub fn to_markdown_with(
    root: &dom::Element,
    resolver: &mut dyn AssetResolver,
    options: &Options,
) -> Result<MarkdownDocument, MigrateError> {
    let transform_options = dom_to_mdast::TransformOptions {
        newlines: options.newlines,
    };
    let tree = dom_to_mdast::transform(root, &transform_options);
    let text = stringify::stringify(&tree, &options.stringify);
    assets::finalize(text, &tree, root, resolver)
}
