#![cfg(test)]

use css_selectors::{ElementAdapter, PseudoClass, Selector};
use std::collections::HashSet;

/// Flat test tree: element index is the handle.
#[derive(Default)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    active: HashSet<&'static str>,
}

impl Tree {
    fn add(
        &mut self,
        parent: Option<usize>,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            tag: tag.to_owned(),
            id: id.map(ToOwned::to_owned),
            classes: classes.iter().map(|class| (*class).to_owned()).collect(),
            parent,
            ..Node::default()
        });
        if let Some(parent_index) = parent {
            self.nodes[parent_index].children.push(index);
        }
        index
    }

    fn set(&mut self, node: usize, pseudo: &'static str) {
        self.nodes[node].active.insert(pseudo);
    }

    fn sibling(&self, node: usize, offset: isize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let siblings = &self.nodes[parent].children;
        let position = siblings.iter().position(|&child| child == node)?;
        let target = position.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }
}

impl ElementAdapter for Tree {
    type Handle = usize;

    fn parent(&self, element: usize) -> Option<usize> {
        self.nodes[element].parent
    }

    fn previous_sibling_element(&self, element: usize) -> Option<usize> {
        self.sibling(element, -1)
    }

    fn next_sibling_element(&self, element: usize) -> Option<usize> {
        self.sibling(element, 1)
    }

    fn tag_name(&self, element: usize) -> &str {
        &self.nodes[element].tag
    }

    fn element_id(&self, element: usize) -> Option<&str> {
        self.nodes[element].id.as_deref()
    }

    fn has_class(&self, element: usize, class: &str) -> bool {
        self.nodes[element].classes.iter().any(|value| value == class)
    }

    fn attr(&self, element: usize, name: &str) -> Option<&str> {
        self.nodes[element]
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn matches_pseudo_class(&self, element: usize, pseudo: &PseudoClass) -> bool {
        self.nodes[element].active.contains(pseudo.name())
    }
}

fn selector(text: &str) -> Selector {
    Selector::parse(text).unwrap_or_else(Selector::universal)
}

/// root(div.menu) > [tab(#t1.tab), panel(#p1.panel > span.title), tab(#t2.tab)]
fn menu_tree() -> (Tree, [usize; 5]) {
    let mut tree = Tree::default();
    let root = tree.add(None, "div", Some("root"), &["menu"]);
    let tab = tree.add(Some(root), "button", Some("t1"), &["tab"]);
    let panel = tree.add(Some(root), "div", Some("p1"), &["panel"]);
    let title = tree.add(Some(panel), "span", None, &["title"]);
    let tab2 = tree.add(Some(root), "button", Some("t2"), &["tab"]);
    (tree, [root, tab, panel, title, tab2])
}

#[test]
fn descendant_combinator_backtracks_over_ancestors() {
    let (tree, [_, _, _, title, _]) = menu_tree();
    assert!(selector(".menu span").matches(&tree, title, true));
    assert!(selector(".menu > .panel > .title").matches(&tree, title, true));
    assert!(!selector(".menu > .title").matches(&tree, title, true));
}

#[test]
fn sibling_combinators() {
    let (tree, [_, tab, panel, _, tab2]) = menu_tree();
    assert!(selector(".tab + .panel").matches(&tree, panel, true));
    assert!(selector("#t1 ~ #t2").matches(&tree, tab2, true));
    assert!(!selector("#t1 + #t2").matches(&tree, tab2, true));
    assert!(!selector(".panel ~ #t1").matches(&tree, tab, true));
}

#[test]
fn structural_pseudo_classes_are_always_evaluated() {
    let (tree, [_, tab, panel, title, tab2]) = menu_tree();
    assert!(selector(".tab:first-child").matches(&tree, tab, false));
    assert!(!selector(".tab:first-child").matches(&tree, tab2, false));
    assert!(selector(":last-child").matches(&tree, tab2, false));
    assert!(selector(".title:only-child").matches(&tree, title, false));
    assert!(!selector(":only-child").matches(&tree, panel, false));
}

#[test]
fn interaction_pseudo_classes_respect_apply_flag() {
    let (mut tree, [_, tab, _, _, _]) = menu_tree();
    let hover = selector(".tab:hover");
    assert!(hover.matches(&tree, tab, false));
    assert!(!hover.matches(&tree, tab, true));
    tree.set(tab, "hover");
    assert!(hover.matches(&tree, tab, true));
}

#[test]
fn related_elements_are_empty_for_local_selectors() {
    let (tree, [_, _, panel, title, _]) = menu_tree();
    assert!(selector(".panel:hover").related_elements(&tree, panel, false).is_empty());
    assert!(selector(".menu .title").related_elements(&tree, title, false).is_empty());
}

#[test]
fn related_elements_report_state_bearing_neighbours() {
    let (tree, [root, tab, panel, title, _]) = menu_tree();
    assert_eq!(
        selector(".tab:checked + .panel").related_elements(&tree, panel, false),
        vec![tab]
    );
    assert_eq!(
        selector(".menu:hover .title").related_elements(&tree, title, false),
        vec![root]
    );
    assert_eq!(
        selector(".panel:hover .title:focus").related_elements(&tree, title, true),
        vec![title, panel]
    );
}

#[test]
fn related_elements_cover_every_matching_sibling() {
    let (mut tree, [root, tab, _, _, tab2]) = menu_tree();
    let last = tree.add(Some(root), "div", Some("last"), &["panel"]);
    let related = selector(".tab:hover ~ #last").related_elements(&tree, last, false);
    assert_eq!(related, vec![tab2, tab]);
}

#[test]
fn related_elements_empty_when_structure_does_not_match() {
    let (tree, [_, tab, _, _, _]) = menu_tree();
    assert!(selector(".panel:checked + .tab").related_elements(&tree, tab, false).is_empty());
}

#[test]
fn related_elements_in_a_deep_descendant_chain() {
    let mut tree = Tree::default();
    let mut boxes = Vec::new();
    let mut parent = None;
    for depth in 0..30 {
        let id = format!("d{depth}");
        let node = tree.add(parent, "div", Some(id.as_str()), &["box"]);
        boxes.push(node);
        parent = Some(node);
    }
    let leaf = tree.add(parent, "span", None, &[]);

    let chain = selector(".box:hover .box .box:hover .box .box:hover span");
    let mut related = chain.related_elements(&tree, leaf, false);
    related.sort_unstable();
    assert_eq!(related, boxes);

    assert_eq!(
        selector("#d0:hover .box .box .box .box span").related_elements(&tree, leaf, false),
        vec![boxes[0]]
    );
    assert!(
        selector("#d29:hover .box span")
            .related_elements(&tree, leaf, false)
            .is_empty()
    );
}
