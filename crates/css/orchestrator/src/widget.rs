//! What the style engine needs from a widget tree.

use css_selectors::ElementAdapter;

use crate::state::{StateFlag, StateFlags};

/// Stable identity of a widget inside one tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetKey(pub u64);

/// A resolved property as pushed to a widget.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NodeAttribute {
    pub name: String,
    pub value: String,
    /// The value is recomputed by the widget on every application.
    pub volatile: bool,
}

impl NodeAttribute {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Capability interface of a styleable widget tree.
///
/// Selector matching goes through [`ElementAdapter`]; interaction
/// pseudo-classes answered there should agree with [`Self::state_flags`].
pub trait StyleableWidgets: ElementAdapter<Handle = WidgetKey> {
    /// Current interaction bitmask of `widget`.
    fn state_flags(&self, widget: WidgetKey) -> StateFlags;

    /// Whether `flag` is meaningful for this kind of widget. Flags that do not
    /// exist are skipped when picking the current state.
    fn state_exists(&self, _widget: WidgetKey, _flag: StateFlag) -> bool {
        true
    }

    fn begin_attributes_transaction(&mut self, widget: WidgetKey);

    /// Apply one resolved attribute while `state` is the widget's current state.
    fn set_attribute(&mut self, widget: WidgetKey, attribute: NodeAttribute, state: StateFlag);

    fn end_attributes_transaction(&mut self, widget: WidgetKey);
}

/// Scoped attribute batch; the transaction is closed when this is dropped.
pub struct AttributeTransaction<'tree, T: StyleableWidgets + ?Sized> {
    tree: &'tree mut T,
    widget: WidgetKey,
}

impl<'tree, T: StyleableWidgets + ?Sized> AttributeTransaction<'tree, T> {
    pub fn begin(tree: &'tree mut T, widget: WidgetKey) -> Self {
        tree.begin_attributes_transaction(widget);
        Self { tree, widget }
    }

    #[inline]
    pub fn set(&mut self, attribute: NodeAttribute, state: StateFlag) {
        self.tree.set_attribute(self.widget, attribute, state);
    }
}

impl<T: StyleableWidgets + ?Sized> Drop for AttributeTransaction<'_, T> {
    fn drop(&mut self) {
        self.tree.end_attributes_transaction(self.widget);
    }
}
