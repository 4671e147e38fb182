//! Layer-to-layer projection rules.
//!
//! A rule `(source_layer, target_layer)` says that, while projecting from an
//! element in `source_layer`, an edge into `target_layer` is a valid
//! continuation. The rule set therefore defines a reachability relation
//! among layers, which [`RuleTable::reachable_layers`] and
//! [`RuleTable::layers_reaching`] compute.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectionRule {
    pub source_layer: String,
    pub target_layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectionRule {
    #[must_use]
    pub fn new(source_layer: impl Into<String>, target_layer: impl Into<String>) -> Self {
        Self {
            source_layer: source_layer.into(),
            target_layer: target_layer.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Rules keyed by ordered layer pair; at most one rule per pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<(String, String), ProjectionRule>,
}

impl RuleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `rule`, returning the rule it replaced for the same pair.
    pub fn insert(&mut self, rule: ProjectionRule) -> Option<ProjectionRule> {
        let key = (rule.source_layer.clone(), rule.target_layer.clone());
        self.rules.insert(key, rule)
    }

    pub fn remove(&mut self, source_layer: &str, target_layer: &str) -> Option<ProjectionRule> {
        self.rules
            .remove(&(source_layer.to_string(), target_layer.to_string()))
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    #[must_use]
    pub fn get(&self, source_layer: &str, target_layer: &str) -> Option<&ProjectionRule> {
        self.rules
            .get(&(source_layer.to_string(), target_layer.to_string()))
    }

    #[must_use]
    pub fn allows(&self, source_layer: &str, target_layer: &str) -> bool {
        self.get(source_layer, target_layer).is_some()
    }

    /// Rules sorted by `(source_layer, target_layer)`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ProjectionRule> {
        self.rules.values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Layers reachable from `layer` by following one or more rules.
    ///
    /// `layer` itself is included only if some rule chain leads back to it.
    #[must_use]
    pub fn reachable_layers(&self, layer: &str) -> BTreeSet<String> {
        self.layer_closure(layer, |rule| (&rule.source_layer, &rule.target_layer))
    }

    /// Layers from which `layer` is reachable by one or more rules.
    #[must_use]
    pub fn layers_reaching(&self, layer: &str) -> BTreeSet<String> {
        self.layer_closure(layer, |rule| (&rule.target_layer, &rule.source_layer))
    }

    fn layer_closure<'a>(
        &'a self,
        layer: &str,
        orient: impl Fn(&'a ProjectionRule) -> (&'a String, &'a String),
    ) -> BTreeSet<String> {
        let mut found: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([layer.to_string()]);

        while let Some(current) = queue.pop_front() {
            for rule in self.rules.values() {
                let (from, to) = orient(rule);
                if *from == current && found.insert(to.clone()) {
                    queue.push_back(to.clone());
                }
            }
        }

        found
    }
}

impl FromIterator<ProjectionRule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = ProjectionRule>>(iter: T) -> Self {
        let mut table = Self::new();
        for rule in iter {
            table.insert(rule);
        }
        table
    }
}
