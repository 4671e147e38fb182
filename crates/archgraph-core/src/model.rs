//! In-memory architecture model consumed by the registry and projection engine.
//!
//! The model is handed over already loaded and validated. Nothing here reads
//! files or checks schemas; it only indexes elements by id so the graph
//! components can look up layers in O(1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A typed outgoing reference declared on an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredReference {
    /// Id of the referenced element. May name an element absent from the model.
    pub target: String,
    /// Reference type, e.g. `implements` or `supports-goal`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DeclaredReference {
    #[must_use]
    pub fn new(target: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: kind.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named entity belonging to exactly one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub layer: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub references: Vec<DeclaredReference>,
}

impl Element {
    #[must_use]
    pub fn new(id: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer: layer.into(),
            element_type: None,
            name: None,
            references: Vec::new(),
        }
    }

    /// Append a reference of `kind` pointing at `target`.
    #[must_use]
    pub fn references(mut self, target: impl Into<String>, kind: impl Into<String>) -> Self {
        self.references.push(DeclaredReference::new(target, kind));
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: DeclaredReference) -> Self {
        self.references.push(reference);
        self
    }
}

/// Snapshot of an architecture model: elements in declaration order plus an
/// id index.
///
/// Duplicate ids are kept verbatim in the element list; lookups resolve to
/// the last element declared with that id.
#[derive(Debug, Clone, Default)]
pub struct ArchitectureModel {
    elements: Vec<Element>,
    index: HashMap<String, usize>,
}

impl ArchitectureModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut model = Self::new();
        for element in elements {
            model.insert(element);
        }
        model
    }

    pub fn insert(&mut self, element: Element) {
        self.index.insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&pos| &self.elements[pos])
    }

    #[must_use]
    pub fn layer_of(&self, id: &str) -> Option<&str> {
        self.element(id).map(|element| element.layer.as_str())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every element id present in the model, suitable as the valid-id set
    /// for broken reference detection.
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn elements_in_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |element| element.layer == layer)
    }

    /// Layer names in order of first appearance.
    #[must_use]
    pub fn layers(&self) -> Vec<&str> {
        let mut layers: Vec<&str> = Vec::new();
        for element in &self.elements {
            if !layers.contains(&element.layer.as_str()) {
                layers.push(&element.layer);
            }
        }
        layers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<Element> for ArchitectureModel {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        Self::from_elements(iter)
    }
}
