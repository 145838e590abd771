//! Keyed data join: diff the bars on screen against the next subset.

use std::collections::HashSet;

use barflow_protocol::Key;

use crate::model::Record;

/// Partition of keys for one tick. The three lists are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPlan {
    /// In the subset but not on screen, in subset order.
    pub enter: Vec<Key>,
    /// In both, in subset order.
    pub update: Vec<Key>,
    /// On screen but not in the subset, in render order.
    pub exit: Vec<Key>,
}

impl JoinPlan {
    pub fn is_noop(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

pub fn reconcile(live: &[Key], subset: &[&Record]) -> JoinPlan {
    let live_set: HashSet<&str> = live.iter().map(Key::as_str).collect();
    let subset_set: HashSet<&str> = subset.iter().map(|r| r.name.as_str()).collect();

    let (update, enter): (Vec<Key>, Vec<Key>) = subset
        .iter()
        .map(|r| r.name.clone())
        .partition(|name| live_set.contains(name.as_str()));
    let exit = live
        .iter()
        .filter(|key| !subset_set.contains(key.as_str()))
        .cloned()
        .collect();

    JoinPlan {
        enter,
        update,
        exit,
    }
}
