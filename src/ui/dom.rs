//! Virtual render tree and the live document modules are mounted into.
//!
//! A [`Node`] is what a module produces for its content. The [`Document`]
//! keeps one [`RegionContainer`] per [`Region`], each holding the mounted
//! [`ModuleWrapper`]s in declaration order. Only the manager mutates the
//! document; modules never get a handle to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layout::Region;
use crate::grid::CellRect;

/// A node of a module's render tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: BTreeMap<String, String>,
        children: Vec<Node>,
    },
    Text(String),
}

impl Default for Node {
    fn default() -> Self {
        Self::element("div")
    }
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Add a class. No-op on text nodes.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let Node::Element { classes, .. } = &mut self {
            classes.push(class.into());
        }
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    /// Structural serialization used to decide whether mounted content
    /// differs from freshly generated content.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element { children, .. } => children.iter().map(Node::text_content).collect(),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Element {
                tag,
                classes,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape(&classes.join(" "))));
                }
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Layout flow of a module wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Takes part in normal flow
    Static,
    /// Pinned out of flow so siblings reflow over it
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HeaderSlot {
    pub html: String,
    pub visible: bool,
}

/// The mounted container of one module instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleWrapper {
    pub identifier: String,
    pub classes: String,
    pub header: HeaderSlot,
    /// `None` until the first content is applied
    pub content: Option<Node>,
    pub opacity: f32,
    pub transition_ms: u64,
    pub flow: Flow,
}

impl ModuleWrapper {
    fn new(identifier: &str, classes: &str, header: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            classes: classes.to_string(),
            header: HeaderSlot {
                html: header.to_string(),
                visible: !header.is_empty(),
            },
            content: None,
            opacity: 1.0,
            transition_ms: 0,
            flow: Flow::Static,
        }
    }

    pub fn content_html(&self) -> String {
        self.content.as_ref().map(Node::to_html).unwrap_or_default()
    }

    pub fn is_in_flow(&self) -> bool {
        self.flow == Flow::Static
    }

    fn to_html(&self) -> String {
        let header_display = if self.header.visible { "block" } else { "none" };
        format!(
            "<div id=\"{}\" class=\"{}\" style=\"opacity: {}; position: {};\"><header class=\"module-header\" style=\"display: {};\">{}</header><div class=\"module-content\">{}</div></div>",
            self.identifier,
            escape(&self.classes),
            self.opacity,
            match self.flow {
                Flow::Static => "static",
                Flow::Fixed => "fixed",
            },
            header_display,
            self.header.html,
            self.content_html()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionContainer {
    region: Region,
    displayed: bool,
    rect: Option<CellRect>,
    wrappers: Vec<ModuleWrapper>,
}

impl RegionContainer {
    fn new(region: Region) -> Self {
        Self {
            region,
            displayed: false,
            rect: None,
            wrappers: Vec::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Whether the region currently takes up space.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Cell rectangle on the layout grid, when regions are grid placed.
    pub fn rect(&self) -> Option<CellRect> {
        self.rect
    }

    pub fn wrappers(&self) -> &[ModuleWrapper] {
        &self.wrappers
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.wrappers.iter().map(|w| w.identifier.as_str()).collect()
    }
}

/// The live render tree shared by all modules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    containers: Vec<RegionContainer>,
    mutations: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            containers: Region::ALL.into_iter().map(RegionContainer::new).collect(),
            mutations: 0,
        }
    }

    pub fn container(&self, region: Region) -> &RegionContainer {
        // Containers are created for every region in `Region::ALL` order.
        &self.containers[region_slot(region)]
    }

    pub fn containers(&self) -> impl Iterator<Item = &RegionContainer> {
        self.containers.iter()
    }

    pub fn wrapper(&self, identifier: &str) -> Option<&ModuleWrapper> {
        self.containers
            .iter()
            .flat_map(|c| c.wrappers.iter())
            .find(|w| w.identifier == identifier)
    }

    pub(crate) fn wrapper_mut(&mut self, identifier: &str) -> Option<&mut ModuleWrapper> {
        self.containers
            .iter_mut()
            .flat_map(|c| c.wrappers.iter_mut())
            .find(|w| w.identifier == identifier)
    }

    /// Region a module is mounted in.
    pub fn region_of(&self, identifier: &str) -> Option<Region> {
        self.containers
            .iter()
            .find(|c| c.wrappers.iter().any(|w| w.identifier == identifier))
            .map(|c| c.region)
    }

    /// Number of header/content mutations applied so far.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    pub(crate) fn set_region_rect(&mut self, region: Region, rect: CellRect) {
        self.containers[region_slot(region)].rect = Some(rect);
    }

    /// Append a wrapper to a region. Returns false if the identifier is
    /// already mounted.
    pub(crate) fn mount(&mut self, region: Region, identifier: &str, classes: &str, header: &str) -> bool {
        if self.wrapper(identifier).is_some() {
            return false;
        }
        self.containers[region_slot(region)]
            .wrappers
            .push(ModuleWrapper::new(identifier, classes, header));
        true
    }

    pub(crate) fn record_mutation(&mut self) {
        self.mutations += 1;
    }

    /// A region is displayed only while at least one of its wrappers is in
    /// normal flow.
    pub(crate) fn update_wrapper_states(&mut self) {
        for container in &mut self.containers {
            container.displayed = container.wrappers.iter().any(ModuleWrapper::is_in_flow);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for container in &self.containers {
            out.push_str(&format!(
                "<div class=\"region {}\" style=\"display: {};\"><div class=\"container\">",
                container.region.classes(),
                if container.displayed { "block" } else { "none" }
            ));
            for wrapper in &container.wrappers {
                out.push_str(&wrapper.to_html());
            }
            out.push_str("</div></div>\n");
        }
        out
    }
}

fn region_slot(region: Region) -> usize {
    Region::ALL.iter().position(|r| *r == region).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_is_structural() {
        let a = Node::element("div").with_class("time").with_text("10:30");
        let b = Node::element("div").with_class("time").with_text("10:30");
        assert_eq!(a.to_html(), b.to_html());
        assert_eq!(a.to_html(), "<div class=\"time\">10:30</div>");

        let c = Node::element("div").with_class("time").with_text("10:31");
        assert_ne!(a.to_html(), c.to_html());
    }

    #[test]
    fn test_text_is_escaped() {
        let node = Node::element("span").with_attr("title", "a\"b").with_text("<b>");
        assert_eq!(node.to_html(), "<span title=\"a&quot;b\">&lt;b&gt;</span>");
        assert_eq!(node.text_content(), "<b>");
    }

    #[test]
    fn test_mount_keeps_declaration_order() {
        let mut document = Document::new();
        assert!(document.mount(Region::TopLeft, "module_0_a", "module a", ""));
        assert!(document.mount(Region::TopLeft, "module_1_b", "module b", "B"));
        assert!(!document.mount(Region::TopRight, "module_0_a", "module a", ""));

        let container = document.container(Region::TopLeft);
        assert_eq!(container.identifiers(), vec!["module_0_a", "module_1_b"]);
        assert!(!container.wrappers()[0].header.visible);
        assert!(container.wrappers()[1].header.visible);
        assert_eq!(document.region_of("module_1_b"), Some(Region::TopLeft));
    }

    #[test]
    fn test_region_collapses_without_flowing_wrappers() {
        let mut document = Document::new();
        document.mount(Region::TopBar, "module_0_a", "module a", "");
        document.update_wrapper_states();
        assert!(document.container(Region::TopBar).is_displayed());
        assert!(!document.container(Region::BottomBar).is_displayed());

        if let Some(wrapper) = document.wrapper_mut("module_0_a") {
            wrapper.flow = Flow::Fixed;
        }
        document.update_wrapper_states();
        assert!(!document.container(Region::TopBar).is_displayed());
    }
}
