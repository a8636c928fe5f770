//! Header/content reconciliation against the mounted document

use log::debug;
use thiserror::Error;

use super::dom::{Document, Node};

/// Why a module's DOM update did not happen.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("module {0} is not registered")]
    UnknownModule(String),

    #[error("module {0} tries to update the DOM without being displayed")]
    NotDisplayed(String),

    #[error("content generation failed for {identifier}: {source}")]
    Content {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Whether the mounted header or content differs from the new output.
///
/// A module without a mounted wrapper never needs an update.
pub fn needs_update(document: &Document, identifier: &str, header: &str, content: &Node) -> bool {
    let Some(wrapper) = document.wrapper(identifier) else {
        return false;
    };
    wrapper.header.html != header || wrapper.content_html() != content.to_html()
}

/// Write the new header and content into the module's wrapper, touching
/// only the slots that changed. Returns whether anything was mutated.
pub fn apply_update(document: &mut Document, identifier: &str, header: &str, content: Node) -> bool {
    let Some(wrapper) = document.wrapper_mut(identifier) else {
        return false;
    };

    let mut changed = 0;
    if wrapper.header.html != header {
        wrapper.header.html = header.to_string();
        changed += 1;
    }
    wrapper.header.visible = !header.is_empty();

    if wrapper.content_html() != content.to_html() {
        wrapper.content = Some(content);
        changed += 1;
    }

    for _ in 0..changed {
        document.record_mutation();
    }
    if changed > 0 {
        debug!("Updated {} slot(s) of {}", changed, identifier);
    }
    changed > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::Region;

    fn mounted() -> Document {
        let mut document = Document::new();
        document.mount(Region::TopLeft, "module_0_test", "module test", "");
        document
    }

    #[test]
    fn test_first_apply_mutates_content() {
        let mut document = mounted();
        let content = Node::element("div").with_text("hello");
        assert!(needs_update(&document, "module_0_test", "", &content));
        assert!(apply_update(&mut document, "module_0_test", "", content.clone()));
        assert_eq!(document.mutations(), 1);
        assert!(!needs_update(&document, "module_0_test", "", &content));
    }

    #[test]
    fn test_identical_apply_is_a_no_op() {
        let mut document = mounted();
        let content = Node::element("div").with_text("hello");
        apply_update(&mut document, "module_0_test", "Title", content.clone());
        let before = document.mutations();

        assert!(!apply_update(&mut document, "module_0_test", "Title", content));
        assert_eq!(document.mutations(), before);
    }

    #[test]
    fn test_header_visibility_follows_text() {
        let mut document = mounted();
        apply_update(&mut document, "module_0_test", "News", Node::default());
        assert!(document.wrapper("module_0_test").unwrap().header.visible);

        apply_update(&mut document, "module_0_test", "", Node::default());
        assert!(!document.wrapper("module_0_test").unwrap().header.visible);
    }

    #[test]
    fn test_unmounted_module_is_ignored() {
        let mut document = Document::new();
        assert!(!needs_update(&document, "module_9_x", "h", &Node::default()));
        assert!(!apply_update(&mut document, "module_9_x", "h", Node::default()));
        assert_eq!(document.mutations(), 0);
    }
}
