//! Reference registry: indexes every typed reference declared in the model.
//!
//! # Overview
//!
//! The registry is the single source of truth for edges. Each declared
//! reference on an element becomes one [`ElementReference`], appended to an
//! edge list and indexed by source, target, and kind for O(1) lookups.
//!
//! ```text
//! ArchitectureModel
//!        ↓  ReferenceRegistry::register_element()
//! edges + by_source / by_target / by_kind indexes
//!        ↓  ReferenceRegistry::dependency_graph()
//! DependencyGraph (petgraph DiGraph, id → NodeIndex map)
//! ```
//!
//! ## No Deduplication
//!
//! Self-loops and duplicates are recorded verbatim. Registering the same
//! element twice duplicates its edges; callers that need distinct results
//! deduplicate on read.
//!
//! ## Broken References
//!
//! Targets are not validated on registration. Use
//! [`ReferenceRegistry::find_broken_references`] with the model's id set to
//! surface references whose target does not exist.

pub mod graph;

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, instrument};

use crate::model::{ArchitectureModel, Element};

pub use graph::{DependencyGraph, ReferenceEdge};

// ---------------------------------------------------------------------------
// ElementReference
// ---------------------------------------------------------------------------

/// One directed, typed reference from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementReference {
    pub source: String,
    pub target: String,
    pub kind: String,
    pub description: Option<String>,
}

impl ElementReference {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Aggregate counts over the registered references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered references, duplicates included.
    pub total: usize,
    pub distinct_sources: usize,
    pub distinct_targets: usize,
    /// Reference count per kind.
    pub by_kind: BTreeMap<String, usize>,
}

// ---------------------------------------------------------------------------
// ReferenceRegistry
// ---------------------------------------------------------------------------

/// Indexed collection of every reference extracted from a model snapshot.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    references: Vec<ElementReference>,
    by_source: HashMap<String, Vec<usize>>,
    by_target: HashMap<String, Vec<usize>>,
    by_kind: HashMap<String, Vec<usize>>,
}

impl ReferenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every reference declared in `model`, in
    /// element declaration order.
    #[must_use]
    #[instrument(skip(model), fields(elements = model.len()))]
    pub fn from_model(model: &ArchitectureModel) -> Self {
        let mut registry = Self::new();
        registry.register_model(model);
        registry
    }

    pub fn register_model(&mut self, model: &ArchitectureModel) {
        for element in model.elements() {
            self.register_element(element);
        }
        debug!(references = self.references.len(), "registered model references");
    }

    /// Record one edge per reference declared on `element`.
    ///
    /// Targets are not checked and nothing is deduplicated. An element with
    /// no references leaves the registry unchanged.
    pub fn register_element(&mut self, element: &Element) {
        for declared in &element.references {
            self.insert(ElementReference {
                source: element.id.clone(),
                target: declared.target.clone(),
                kind: declared.kind.clone(),
                description: declared.description.clone(),
            });
        }
    }

    /// Append a single reference and index it.
    pub fn insert(&mut self, reference: ElementReference) {
        let pos = self.references.len();
        self.by_source
            .entry(reference.source.clone())
            .or_default()
            .push(pos);
        self.by_target
            .entry(reference.target.clone())
            .or_default()
            .push(pos);
        self.by_kind
            .entry(reference.kind.clone())
            .or_default()
            .push(pos);
        self.references.push(reference);
    }

    /// References whose target is not in `valid_ids`, in registration order.
    #[must_use]
    pub fn find_broken_references(&self, valid_ids: &HashSet<&str>) -> Vec<&ElementReference> {
        self.references
            .iter()
            .filter(|reference| !valid_ids.contains(reference.target.as_str()))
            .collect()
    }

    /// Convenience wrapper using every element id in `model` as the valid set.
    #[must_use]
    pub fn find_broken_references_in(&self, model: &ArchitectureModel) -> Vec<&ElementReference> {
        let valid: HashSet<&str> = model.element_ids().collect();
        self.find_broken_references(&valid)
    }

    /// Materialize the registered references as a directed graph.
    #[must_use]
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_references(&self.references)
    }

    #[must_use]
    pub fn references_from(&self, source: &str) -> Vec<&ElementReference> {
        self.lookup(&self.by_source, source)
    }

    #[must_use]
    pub fn references_to(&self, target: &str) -> Vec<&ElementReference> {
        self.lookup(&self.by_target, target)
    }

    #[must_use]
    pub fn references_of_kind(&self, kind: &str) -> Vec<&ElementReference> {
        self.lookup(&self.by_kind, kind)
    }

    #[must_use]
    pub fn references(&self) -> &[ElementReference] {
        &self.references
    }

    /// Reference kinds seen so far, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.by_kind.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total: self.references.len(),
            distinct_sources: self.by_source.len(),
            distinct_targets: self.by_target.len(),
            by_kind: self
                .by_kind
                .iter()
                .map(|(kind, positions)| (kind.clone(), positions.len()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn clear(&mut self) {
        self.references.clear();
        self.by_source.clear();
        self.by_target.clear();
        self.by_kind.clear();
    }

    fn lookup(&self, index: &HashMap<String, Vec<usize>>, key: &str) -> Vec<&ElementReference> {
        index
            .get(key)
            .map(|positions| positions.iter().map(|&pos| &self.references[pos]).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
