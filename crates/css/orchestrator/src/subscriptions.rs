//! Cross-widget dependency edges.
//!
//! An edge `subscriber -> target` means one of the subscriber's
//! non-cacheable rules reads the target's interaction state, so the
//! subscriber must be re-resolved whenever the target is. Both directions are
//! stored and always mutated together.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::widget::WidgetKey;

#[derive(Clone, Debug, Default)]
pub struct Subscriptions {
    /// subscriber -> widgets it tracks.
    subscribed_to: HashMap<WidgetKey, BTreeSet<WidgetKey>>,
    /// target -> widgets tracking it.
    dependents: HashMap<WidgetKey, BTreeSet<WidgetKey>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `subscriber` depends on `target`. Self edges are ignored.
    /// Returns whether the edge is new.
    pub fn subscribe(&mut self, subscriber: WidgetKey, target: WidgetKey) -> bool {
        if subscriber == target {
            return false;
        }
        let added = self.subscribed_to.entry(subscriber).or_default().insert(target);
        self.dependents.entry(target).or_default().insert(subscriber);
        if added {
            debug!(target: "css_orchestrator", "subscribe {subscriber:?} -> {target:?}");
        }
        added
    }

    /// Drop the edge `subscriber -> target`. Returns whether it existed.
    pub fn unsubscribe(&mut self, subscriber: WidgetKey, target: WidgetKey) -> bool {
        let removed = remove_edge(&mut self.subscribed_to, subscriber, target);
        remove_edge(&mut self.dependents, target, subscriber);
        if removed {
            debug!(target: "css_orchestrator", "unsubscribe {subscriber:?} -> {target:?}");
        }
        removed
    }

    /// Widgets that must be re-resolved after `target`, in key order.
    pub fn dependents_of(&self, target: WidgetKey) -> Vec<WidgetKey> {
        self.dependents
            .get(&target)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Widgets whose state `subscriber` reads, in key order.
    pub fn subscribed_to(&self, subscriber: WidgetKey) -> Vec<WidgetKey> {
        self.subscribed_to
            .get(&subscriber)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Remove every edge leaving `subscriber`.
    pub fn unsubscribe_all_from(&mut self, subscriber: WidgetKey) {
        for target in self.subscribed_to(subscriber) {
            self.unsubscribe(subscriber, target);
        }
    }

    /// Remove every edge arriving at `target`.
    pub fn remove_dependents_of(&mut self, target: WidgetKey) {
        for subscriber in self.dependents_of(target) {
            self.unsubscribe(subscriber, target);
        }
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.subscribed_to.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every edge is stored in both directions.
    pub fn is_symmetric(&self) -> bool {
        let forward = self.subscribed_to.iter().all(|(subscriber, targets)| {
            targets.iter().all(|target| {
                self.dependents
                    .get(target)
                    .is_some_and(|set| set.contains(subscriber))
            })
        });
        let backward = self.dependents.iter().all(|(target, subscribers)| {
            subscribers.iter().all(|subscriber| {
                self.subscribed_to
                    .get(subscriber)
                    .is_some_and(|set| set.contains(target))
            })
        });
        forward && backward
    }
}

fn remove_edge(
    map: &mut HashMap<WidgetKey, BTreeSet<WidgetKey>>,
    from: WidgetKey,
    to: WidgetKey,
) -> bool {
    let Some(set) = map.get_mut(&from) else {
        return false;
    };
    let removed = set.remove(&to);
    if set.is_empty() {
        map.remove(&from);
    }
    removed
}
