#![forbid(unsafe_code)]
//! archgraph-core library.
//!
//! Builds a directed reference graph from an in-memory architecture model
//! and answers structural queries over it.
//!
//! ```text
//! ArchitectureModel
//!        ↓  ReferenceRegistry::from_model()
//! ReferenceRegistry (edges indexed by source / target / kind)
//!        ↓  ReferenceRegistry::dependency_graph()
//! DependencyGraph
//!   ├─ DependencyTracker   (closures, cycles, metrics, depth)
//!   └─ ProjectionEngine    (rule-guided cross-layer traversal)
//! ```
//!
//! Every query is total: unknown ids and layers produce empty results, and
//! depth limits truncate silently. The core performs no I/O.
//!
//! # Conventions
//!
//! - **Errors**: Queries never fail. Configuration parsing returns
//!   `anyhow::Result` carrying [`error::ConfigError`] for validation faults.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`). The library
//!   never installs a subscriber.

pub mod config;
pub mod error;
pub mod model;
pub mod projection;
pub mod registry;
pub mod tracker;

pub use config::AnalysisConfig;
pub use model::{ArchitectureModel, DeclaredReference, Element};
pub use projection::{ProjectedElement, ProjectionEngine, ProjectionRule, Reachability};
pub use registry::{DependencyGraph, ElementReference, ReferenceRegistry, RegistryStats};
pub use tracker::{DependencyTracker, GraphMetrics};
