//! Scene-level driver: one [`UiStyle`] per widget, the shared sheet and the
//! dependency graph between widgets.

use std::collections::BTreeMap;
use std::rc::Rc;

use css::StyleSheet;
use css_media_queries::MediaFeatures;
use css_selectors::ElementAdapter;
use log::{debug, trace};
use tracing::{debug_span, info_span};

use crate::subscriptions::Subscriptions;
use crate::ui_style::UiStyle;
use crate::widget::{AttributeTransaction, StyleableWidgets, WidgetKey};

/// Owns every widget's cascade state for one scene.
///
/// The widget tree itself stays with the caller and is passed into each
/// operation; the engine never keeps a reference to it.
#[derive(Debug)]
pub struct StyleEngine {
    style_sheet: Rc<StyleSheet>,
    media_features: MediaFeatures,
    styles: BTreeMap<WidgetKey, UiStyle>,
    subscriptions: Subscriptions,
}

impl StyleEngine {
    /// Create an engine for `style_sheet`, evaluating its media lists
    /// against `media_features`.
    pub fn new(style_sheet: Rc<StyleSheet>, media_features: MediaFeatures) -> Self {
        style_sheet.update_media_lists(&media_features);
        Self {
            style_sheet,
            media_features,
            styles: BTreeMap::new(),
            subscriptions: Subscriptions::new(),
        }
    }

    #[inline]
    pub const fn style_sheet(&self) -> &Rc<StyleSheet> {
        &self.style_sheet
    }

    #[inline]
    pub const fn media_features(&self) -> &MediaFeatures {
        &self.media_features
    }

    #[inline]
    pub const fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Cascade state of `widget`, if it has one.
    #[inline]
    pub fn style(&self, widget: WidgetKey) -> Option<&UiStyle> {
        self.styles.get(&widget)
    }

    #[inline]
    pub fn style_mut(&mut self, widget: WidgetKey) -> Option<&mut UiStyle> {
        self.styles.get_mut(&widget)
    }

    /// Register `widget`, or return its existing state.
    pub fn create_style(&mut self, widget: WidgetKey) -> &mut UiStyle {
        self.styles
            .entry(widget)
            .or_insert_with(|| UiStyle::new(widget))
    }

    /// Re-query the sheet for `widget`, split the matches into cacheable and
    /// non-cacheable rules and rebuild the widget's outgoing subscriptions.
    ///
    /// Resolved properties are cleared; call [`Self::on_state_change`] (or
    /// use [`Self::refresh`]) to push new values.
    pub fn load<T: StyleableWidgets>(&mut self, tree: &T, widget: WidgetKey) {
        let _span = debug_span!("style_engine.load", widget = widget.0).entered();
        self.unsubscribe_non_cacheable_styles(widget);

        let mut cacheable = Vec::new();
        let mut non_cacheable = Vec::new();
        for style in self.style_sheet.get_element_styles(tree, widget, false) {
            if style.selector().related_elements(tree, widget, false).is_empty() {
                cacheable.push(style);
            } else {
                non_cacheable.push(style);
            }
        }
        debug!(
            target: "css_orchestrator",
            "{widget:?}: {} cacheable, {} non-cacheable rules",
            cacheable.len(),
            non_cacheable.len()
        );
        self.create_style(widget).set_rules(cacheable, non_cacheable);
        self.subscribe_non_cacheable_styles(tree, widget);
    }

    /// Load `widget`, sync its state with the tree and resolve it.
    pub fn refresh<T: StyleableWidgets>(&mut self, tree: &mut T, widget: WidgetKey) {
        self.load(&*tree, widget);
        self.sync_state(&*tree, widget);
        self.on_state_change(tree, widget);
    }

    /// Pick up the widget's current bitmask; resolve again if it changed.
    /// Returns whether a cascade pass ran.
    pub fn update_state<T: StyleableWidgets>(&mut self, tree: &mut T, widget: WidgetKey) -> bool {
        if self.style(widget).is_some_and(UiStyle::is_changing_state) {
            trace!(target: "css_orchestrator", "{widget:?}: state update absorbed while resolving");
            return false;
        }
        let changed = self.sync_state(&*tree, widget);
        if changed {
            self.on_state_change(tree, widget);
        }
        changed
    }

    fn sync_state<T: StyleableWidgets>(&mut self, tree: &T, widget: WidgetKey) -> bool {
        let Some(style) = self.styles.get_mut(&widget) else {
            return false;
        };
        style.update_state(tree.state_flags(widget), |flag| tree.state_exists(widget, flag))
    }

    /// Run the cascade for `widget`, push the result in one attribute
    /// transaction and re-resolve every widget that depends on it.
    ///
    /// A call for a widget that is already being resolved returns at once,
    /// so dependency cycles terminate.
    pub fn on_state_change<T: StyleableWidgets>(&mut self, tree: &mut T, widget: WidgetKey) {
        let Some(style) = self.styles.get_mut(&widget) else {
            return;
        };
        if style.is_changing_state() {
            trace!(target: "css_orchestrator", "{widget:?}: re-entrant cascade absorbed");
            return;
        }
        let _span = debug_span!("style_engine.on_state_change", widget = widget.0).entered();
        style.set_changing_state(true);
        style.resolve(&*tree);
        {
            let state = style.current_state();
            let mut transaction = AttributeTransaction::begin(&mut *tree, widget);
            for attribute in style.attributes() {
                transaction.set(attribute, state);
            }
        }

        for dependent in self.subscriptions.dependents_of(widget) {
            self.on_state_change(tree, dependent);
        }

        if let Some(style) = self.styles.get_mut(&widget) {
            style.set_changing_state(false);
        }
    }

    /// Tear `widget` down: drop its edges in both directions and its state.
    pub fn destroy(&mut self, widget: WidgetKey) -> Option<UiStyle> {
        self.unsubscribe_non_cacheable_styles(widget);
        self.remove_related_widgets(widget);
        debug!(target: "css_orchestrator", "{widget:?}: destroyed");
        self.styles.remove(&widget)
    }

    /// Make `dependent` re-resolve whenever `target` does.
    pub fn subscribe_related(&mut self, target: WidgetKey, dependent: WidgetKey) -> bool {
        self.subscriptions.subscribe(dependent, target)
    }

    pub fn unsubscribe_related(&mut self, target: WidgetKey, dependent: WidgetKey) -> bool {
        self.subscriptions.unsubscribe(dependent, target)
    }

    /// Subscribe `widget` to every element its non-cacheable rules read.
    pub fn subscribe_non_cacheable_styles<A: ElementAdapter<Handle = WidgetKey>>(
        &mut self,
        adapter: &A,
        widget: WidgetKey,
    ) {
        let Some(style) = self.styles.get(&widget) else {
            return;
        };
        for rule in style.non_cacheable_styles() {
            for target in rule.selector().related_elements(adapter, widget, false) {
                self.subscriptions.subscribe(widget, target);
            }
        }
    }

    /// Drop every edge leaving `widget`.
    pub fn unsubscribe_non_cacheable_styles(&mut self, widget: WidgetKey) {
        self.subscriptions.unsubscribe_all_from(widget);
    }

    /// Drop every edge arriving at `widget`.
    pub fn remove_related_widgets(&mut self, widget: WidgetKey) {
        self.subscriptions.remove_dependents_of(widget);
    }

    /// Swap in a new sheet and re-resolve every widget against it.
    pub fn replace_style_sheet<T: StyleableWidgets>(
        &mut self,
        tree: &mut T,
        style_sheet: Rc<StyleSheet>,
    ) {
        let _span = info_span!("style_engine.replace_style_sheet").entered();
        style_sheet.update_media_lists(&self.media_features);
        self.style_sheet = style_sheet;
        self.reload_all(tree);
    }

    /// Store new environment features; when any media list flips, every
    /// widget is reloaded and resolved again. Returns whether that happened.
    pub fn update_media_features<T: StyleableWidgets>(
        &mut self,
        tree: &mut T,
        media_features: MediaFeatures,
    ) -> bool {
        let _span = info_span!("style_engine.update_media_features").entered();
        self.media_features = media_features;
        let changed = self.style_sheet.update_media_lists(&self.media_features);
        if changed {
            self.reload_all(tree);
        }
        changed
    }

    /// Load every widget first so the graph is complete, then resolve them.
    pub fn reload_all<T: StyleableWidgets>(&mut self, tree: &mut T) {
        let widgets: Vec<WidgetKey> = self.styles.keys().copied().collect();
        debug!(target: "css_orchestrator", "reloading {} widgets", widgets.len());
        for widget in &widgets {
            self.load(&*tree, *widget);
        }
        for widget in widgets {
            self.sync_state(&*tree, widget);
            self.on_state_change(tree, widget);
        }
    }
}
