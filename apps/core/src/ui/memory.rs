//! A small in-memory document tree implementing the DOM and UI-library
//! boundaries without a browser.

use std::collections::{BTreeMap, BTreeSet};

use super::dom::{Banner, Document, Selector, UiToolkit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    value: Option<String>,
    text: String,
    valid: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    viewport_width: u32,
    path: String,
    tooltips: BTreeSet<NodeId>,
}

impl MemoryDocument {
    pub fn new(viewport_width: u32, path: impl Into<String>) -> Self {
        let body = Node {
            tag: "body".to_string(),
            valid: true,
            ..Node::default()
        };
        Self {
            nodes: vec![body],
            viewport_width,
            path: path.into(),
            tooltips: BTreeSet::new(),
        }
    }

    pub const fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new `tag` element under `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_lowercase(),
            valid: true,
            parent: Some(parent),
            ..Node::default()
        });
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.id = Some(id.to_string());
        }
        self
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.value = Some(value.to_string());
        }
        self
    }

    pub fn set_valid(&mut self, node: NodeId, valid: bool) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.valid = valid;
        }
        self
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|node| node.text.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    pub fn has_tooltip(&self, node: NodeId) -> bool {
        self.tooltips.contains(&node)
    }

    /// Removes `node` (and its subtree) from the tree.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node.0).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.retain(|child| *child != node);
        }
    }

    fn matches(&self, node: NodeId, selector: &Selector<'_>) -> bool {
        let Some(node) = self.nodes.get(node.0) else {
            return false;
        };
        match selector {
            Selector::Tag(tag) => node.tag.eq_ignore_ascii_case(tag),
            Selector::Class(class) => node.classes.contains(*class),
            Selector::Attribute { name, value } => match (node.attributes.get(*name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
        }
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body())
            .into_iter()
            .find(|node| self.nodes[node.0].id.as_deref() == Some(id))
    }

    fn select_all(&self, selector: &Selector<'_>) -> Vec<NodeId> {
        self.select_within(&self.body(), selector)
    }

    fn select_within(&self, root: &NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.nodes
            .get(element.0)
            .is_some_and(|node| node.classes.contains(class))
    }

    fn add_class(&mut self, element: &NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.remove(class);
        }
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(element.0)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    fn value(&self, element: &NodeId) -> Option<String> {
        self.nodes.get(element.0).and_then(|node| node.value.clone())
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    fn is_connected(&self, element: &NodeId) -> bool {
        self.contains(&self.body(), element)
    }

    fn check_validity(&self, form: &NodeId) -> bool {
        std::iter::once(*form)
            .chain(self.descendants(*form))
            .all(|node| self.nodes[node.0].valid)
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn append_banner(&mut self, banner: &Banner) -> Option<NodeId> {
        let body = self.body();
        let element = self.append(body, "div");
        for class in banner.classes() {
            self.add_class(&element, class);
        }
        self.set_attribute(element, "role", "alert")
            .set_attribute(element, "style", Banner::STYLE);
        self.nodes[element.0].text.clone_from(&banner.message);

        let close = self.append(element, "button");
        self.add_class(&close, "btn-close");
        self.set_attribute(close, "type", "button")
            .set_attribute(close, "data-bs-dismiss", "alert");

        Some(element)
    }
}

impl UiToolkit for MemoryDocument {
    fn init_tooltip(&mut self, element: &NodeId) {
        self.tooltips.insert(*element);
    }

    fn close_alert(&mut self, element: &NodeId) {
        self.remove_class(element, "show");
        self.detach(*element);
    }
}
