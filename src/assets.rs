// Image asset collection and URL substitution.
//
// After serialization, every image whose source URL survived into the text
// is migrated through an AssetResolver, strictly sequentially in document
// order: later replacements operate on the accumulated string, and asset
// stores used downstream do not guarantee safe concurrent writes of the
// same filename.

use std::collections::HashSet;

use tracing::{debug, warn};
use url::Url;

use crate::dom::{self, Element};
use crate::error::{MigrateError, ResolveError};
use crate::mdast;

/// Migrates an image/file reference to a new hosting location.
///
/// Retry and backoff belong behind this trait; the pipeline never retries.
pub trait AssetResolver {
    /// Resolve a source URL to its migrated destination URL.
    fn resolve(&mut self, source: &str) -> Result<String, ResolveError>;
}

/// One discovered image and the outcome of its migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// URL found in the source markup.
    pub source: String,
    /// Destination URL, when resolution succeeded.
    pub resolved: Option<String>,
}

/// The serialized page plus its image migration manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub text: String,
    pub images: Vec<ImageAsset>,
}

/// Run the asset pass over serialized text.
///
/// Images whose URL is missing from the text or belongs to an embed marker
/// are skipped. Not-found resolutions are logged and left in place; any
/// other resolver failure aborts the page.
pub(crate) fn finalize(
    text: String,
    tree: &mdast::Node,
    root: &Element,
    resolver: &mut dyn AssetResolver,
) -> Result<MarkdownDocument, MigrateError> {
    let embeds = embed_urls(root);
    let mut out = text;
    let mut images = Vec::new();

    for source in image_urls(tree) {
        if !out.contains(&source) || embeds.contains(&source) {
            continue;
        }
        if !is_resolvable(&source) {
            debug!(url = %source, "skipping non-absolute image url");
            images.push(ImageAsset {
                source,
                resolved: None,
            });
            continue;
        }
        match resolver.resolve(&source) {
            Ok(destination) => {
                out = out.replace(&source, &destination);
                images.push(ImageAsset {
                    source,
                    resolved: Some(destination),
                });
            }
            Err(ResolveError::NotFound(_)) => {
                warn!(url = %source, "image asset not found, leaving unresolved");
                images.push(ImageAsset {
                    source,
                    resolved: None,
                });
            }
            Err(err) => {
                return Err(MigrateError::AssetResolution {
                    url: source,
                    source: err,
                });
            }
        }
    }

    // Stray non-breaking spaces are artifacts of the source markup.
    out.retain(|c| c != '\u{a0}');

    Ok(MarkdownDocument { text: out, images })
}

/// Only absolute http(s) URLs are candidates for migration.
fn is_resolvable(source: &str) -> bool {
    matches!(Url::parse(source), Ok(url) if url.scheme() == "http" || url.scheme() == "https")
}

/// Image URLs in document order, deduplicated to first occurrence.
fn image_urls(tree: &mdast::Node) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    collect_images(tree, &mut seen, &mut urls);
    urls
}

fn collect_images(node: &mdast::Node, seen: &mut HashSet<String>, urls: &mut Vec<String>) {
    if let mdast::Node::Image(image) = node {
        if seen.insert(image.url.clone()) {
            urls.push(image.url.clone());
        }
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_images(child, seen, urls);
        }
    }
}

/// URLs carried by embed markers under `root`.
fn embed_urls(root: &Element) -> HashSet<String> {
    let mut urls = HashSet::new();
    collect_embeds(root, &mut urls);
    urls
}

fn collect_embeds(el: &Element, urls: &mut HashSet<String>) {
    if el.tag == dom::EMBED_TAG {
        urls.insert(el.text_content().trim().to_string());
        return;
    }
    for child in &el.children {
        if let dom::Node::Element(inner) = child {
            collect_embeds(inner, urls);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{Image, Node, Paragraph, Root};

    struct MapResolver(Vec<(String, Result<String, ()>)>);

    impl AssetResolver for MapResolver {
        fn resolve(&mut self, source: &str) -> Result<String, ResolveError> {
            for (from, to) in &self.0 {
                if from == source {
                    return match to {
                        Ok(dest) => Ok(dest.clone()),
                        Err(()) => Err(ResolveError::NotFound(source.to_string())),
                    };
                }
            }
            Err(ResolveError::Failed(format!("unexpected url: {source}")))
        }
    }

    fn image_tree(urls: &[&str]) -> Node {
        let children = urls
            .iter()
            .map(|url| {
                Node::Paragraph(Paragraph {
                    children: vec![Node::Image(Image {
                        url: (*url).to_string(),
                        title: None,
                        alt: String::new(),
                    })],
                })
            })
            .collect();
        Node::Root(Root { children })
    }

    #[test]
    fn test_resolved_url_replaces_all_occurrences() {
        let old = "https://legacy.example.com/a.png";
        let new = "https://cdn.example.com/a.png";
        let tree = image_tree(&[old]);
        let text = format!("![]({old})\n\n![]({old})\n");
        let mut resolver = MapResolver(vec![(old.into(), Ok(new.into()))]);
        let doc = finalize(text, &tree, &Element::new("body"), &mut resolver).unwrap();
        assert!(!doc.text.contains(old));
        assert_eq!(doc.text.matches(new).count(), 2);
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].resolved.as_deref(), Some(new));
    }

    #[test]
    fn test_not_found_is_recoverable() {
        let old = "https://legacy.example.com/missing.png";
        let tree = image_tree(&[old]);
        let text = format!("![]({old})\n");
        let mut resolver = MapResolver(vec![(old.into(), Err(()))]);
        let doc = finalize(text, &tree, &Element::new("body"), &mut resolver).unwrap();
        assert!(doc.text.contains(old));
        assert_eq!(doc.images[0].resolved, None);
    }

    #[test]
    fn test_other_failures_are_fatal() {
        let old = "https://legacy.example.com/forbidden.png";
        let tree = image_tree(&[old]);
        let text = format!("![]({old})\n");
        let mut resolver = MapResolver(vec![]);
        let err = finalize(text, &tree, &Element::new("body"), &mut resolver).unwrap_err();
        assert!(matches!(err, MigrateError::AssetResolution { .. }));
    }

    #[test]
    fn test_relative_url_skipped_but_listed() {
        let tree = image_tree(&["/media/a.png"]);
        let text = "![](/media/a.png)\n".to_string();
        let mut resolver = MapResolver(vec![]);
        let doc = finalize(text, &tree, &Element::new("body"), &mut resolver).unwrap();
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].resolved, None);
    }

    #[test]
    fn test_embed_image_not_resolved() {
        let url = "https://video.example.com/thumb.png";
        let tree = image_tree(&[url]);
        let text = format!("{url}\n");
        let root = Element::new("body").with_child(dom::embed_marker(url));
        let mut resolver = MapResolver(vec![]);
        let doc = finalize(text, &tree, &root, &mut resolver).unwrap();
        assert!(doc.text.contains(url));
        assert!(doc.images.is_empty());
    }

    #[test]
    fn test_nbsp_stripped() {
        let tree = image_tree(&[]);
        let mut resolver = MapResolver(vec![]);
        let doc = finalize("a\u{a0}b\n".into(), &tree, &Element::new("body"), &mut resolver)
            .unwrap();
        assert_eq!(doc.text, "ab\n");
    }
}
