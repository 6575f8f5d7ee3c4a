#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::{BTreeMap, BTreeSet};

use css_orchestrator::{NodeAttribute, StateFlag, StateFlags, StyleableWidgets, WidgetKey};
use css_selectors::{ElementAdapter, PseudoClass};

/// Initialise test logging.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<WidgetKey>,
    children: Vec<WidgetKey>,
    flags: StateFlags,
    attributes: BTreeMap<String, String>,
    transactions: usize,
    open: bool,
}

/// In-memory widget tree recording what the engine pushes to it.
#[derive(Default)]
pub struct TestTree {
    nodes: BTreeMap<WidgetKey, Node>,
    missing_states: BTreeSet<(WidgetKey, StateFlag)>,
    next_key: u64,
}

impl TestTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a widget under `parent`. `selector` is `tag#id.class.class`.
    pub fn add(&mut self, parent: Option<WidgetKey>, selector: &str) -> WidgetKey {
        self.next_key += 1;
        let key = WidgetKey(self.next_key);
        let (head, classes) = selector.split_once('.').unwrap_or((selector, ""));
        let (tag, id) = head.split_once('#').unwrap_or((head, ""));
        let node = Node {
            tag: tag.to_owned(),
            id: (!id.is_empty()).then(|| id.to_owned()),
            classes: classes
                .split('.')
                .filter(|class| !class.is_empty())
                .map(str::to_owned)
                .collect(),
            parent,
            flags: StateFlags::NONE.with(StateFlag::Normal),
            ..Node::default()
        };
        if let Some(parent_node) = parent.and_then(|parent_key| self.nodes.get_mut(&parent_key)) {
            parent_node.children.push(key);
        }
        self.nodes.insert(key, node);
        key
    }

    pub fn set_flags(&mut self, widget: WidgetKey, flags: &[StateFlag]) {
        if let Some(node) = self.nodes.get_mut(&widget) {
            node.flags = flags.iter().copied().collect();
        }
    }

    pub fn mark_missing(&mut self, widget: WidgetKey, flag: StateFlag) {
        self.missing_states.insert((widget, flag));
    }

    /// Last value pushed for `name`.
    pub fn attribute(&self, widget: WidgetKey, name: &str) -> Option<&str> {
        self.nodes
            .get(&widget)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    pub fn attribute_names(&self, widget: WidgetKey) -> Vec<&str> {
        self.nodes
            .get(&widget)
            .map(|node| node.attributes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Completed attribute transactions.
    pub fn transactions(&self, widget: WidgetKey) -> usize {
        self.nodes.get(&widget).map_or(0, |node| node.transactions)
    }

    pub fn has_open_transaction(&self) -> bool {
        self.nodes.values().any(|node| node.open)
    }

    fn sibling(&self, element: WidgetKey, offset: isize) -> Option<WidgetKey> {
        let parent = self.nodes.get(&element)?.parent?;
        let siblings = &self.nodes.get(&parent)?.children;
        let index = siblings.iter().position(|key| *key == element)?;
        siblings.get(index.checked_add_signed(offset)?).copied()
    }
}

impl ElementAdapter for TestTree {
    type Handle = WidgetKey;

    fn parent(&self, element: WidgetKey) -> Option<WidgetKey> {
        self.nodes.get(&element).and_then(|node| node.parent)
    }

    fn previous_sibling_element(&self, element: WidgetKey) -> Option<WidgetKey> {
        self.sibling(element, -1)
    }

    fn next_sibling_element(&self, element: WidgetKey) -> Option<WidgetKey> {
        self.sibling(element, 1)
    }

    fn tag_name(&self, element: WidgetKey) -> &str {
        self.nodes.get(&element).map_or("", |node| node.tag.as_str())
    }

    fn element_id(&self, element: WidgetKey) -> Option<&str> {
        self.nodes.get(&element).and_then(|node| node.id.as_deref())
    }

    fn has_class(&self, element: WidgetKey, class: &str) -> bool {
        self.nodes
            .get(&element)
            .is_some_and(|node| node.classes.iter().any(|known| known == class))
    }

    fn attr(&self, _element: WidgetKey, _name: &str) -> Option<&str> {
        None
    }

    fn matches_pseudo_class(&self, element: WidgetKey, pseudo: &PseudoClass) -> bool {
        self.nodes
            .get(&element)
            .is_some_and(|node| node.flags.matches_pseudo_class(pseudo))
    }
}

impl StyleableWidgets for TestTree {
    fn state_flags(&self, widget: WidgetKey) -> StateFlags {
        self.nodes.get(&widget).map_or(StateFlags::NONE, |node| node.flags)
    }

    fn state_exists(&self, widget: WidgetKey, flag: StateFlag) -> bool {
        !self.missing_states.contains(&(widget, flag))
    }

    fn begin_attributes_transaction(&mut self, widget: WidgetKey) {
        if let Some(node) = self.nodes.get_mut(&widget) {
            node.open = true;
            node.attributes.clear();
        }
    }

    fn set_attribute(&mut self, widget: WidgetKey, attribute: NodeAttribute, _state: StateFlag) {
        if let Some(node) = self.nodes.get_mut(&widget) {
            node.attributes.insert(attribute.name, attribute.value);
        }
    }

    fn end_attributes_transaction(&mut self, widget: WidgetKey) {
        if let Some(node) = self.nodes.get_mut(&widget) {
            node.open = false;
            node.transactions += 1;
        }
    }
}
