//! Known-topology scenarios over a full model → registry → tracker/engine
//! pipeline. Expected values are derived by hand and hardcoded.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use archgraph_core::{
    ArchitectureModel, DependencyTracker, Element, ProjectionEngine, ProjectionRule,
    ReferenceRegistry,
};

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

// ===========================================================================
// Linear chain: A → B → C → D, one layer each, one rule per consecutive pair
// ===========================================================================

fn chain_model() -> ArchitectureModel {
    ArchitectureModel::from_elements([
        Element::new("A", "motivation").references("B", "realized-by"),
        Element::new("B", "business").references("C", "realized-by"),
        Element::new("C", "application").references("D", "deployed-on"),
        Element::new("D", "technology"),
    ])
}

fn chain_rules() -> Vec<ProjectionRule> {
    vec![
        ProjectionRule::new("motivation", "business"),
        ProjectionRule::new("business", "application"),
        ProjectionRule::new("application", "technology"),
    ]
}

#[test]
fn chain_tracker_queries() {
    let tracker = DependencyTracker::from_registry(&ReferenceRegistry::from_model(&chain_model()));

    assert_eq!(tracker.transitive_dependencies("A"), set(&["B", "C", "D"]));
    assert_eq!(tracker.dependency_depth("A"), 3);
    assert_eq!(tracker.sink_elements(), set(&["D"]));
    assert_eq!(tracker.source_elements(), set(&["A"]));
    assert!(tracker.detect_cycles().is_empty());
}

#[test]
fn chain_metrics() {
    let tracker = DependencyTracker::from_registry(&ReferenceRegistry::from_model(&chain_model()));
    let metrics = tracker.metrics();

    assert_eq!(metrics.nodes, 4);
    assert_eq!(metrics.edges, 3);
    assert_eq!(metrics.cycles, 0);
    assert_eq!(metrics.components, 1);
}

#[test]
fn chain_projection_reaches_technology() {
    let model = chain_model();
    let mut engine =
        ProjectionEngine::new(ReferenceRegistry::from_model(&model).dependency_graph());
    for rule in chain_rules() {
        engine.add_rule(rule);
    }

    let forward = engine.project(&model, "A", "technology");
    assert_eq!(forward.len(), 1);
    assert_eq!(forward[0].id, "D");
    assert_eq!(forward[0].path, vec!["A", "B", "C", "D"]);

    let reverse = engine.project_reverse(&model, "D", "motivation");
    assert_eq!(reverse.len(), 1);
    assert_eq!(reverse[0].id, "A");
}

// ===========================================================================
// Simple cycle: A → B, B → A
// ===========================================================================

#[test]
fn simple_cycle() {
    let model = ArchitectureModel::from_elements([
        Element::new("A", "application").references("B", "calls"),
        Element::new("B", "application").references("A", "calls"),
    ]);
    let tracker = DependencyTracker::from_registry(&ReferenceRegistry::from_model(&model));

    assert_eq!(tracker.detect_cycles(), vec![vec!["A", "B", "A"]]);
    assert_eq!(tracker.metrics().cycles, 1);
    assert_eq!(tracker.impact_radius("A"), 1);
    assert!(tracker.has_cycles());
}

// ===========================================================================
// Broken reference: A → Z where Z is not in the model
// ===========================================================================

#[test]
fn broken_reference() {
    let model = ArchitectureModel::from_elements([
        Element::new("A", "business").references("Z", "uses"),
        Element::new("B", "business"),
    ]);
    let registry = ReferenceRegistry::from_model(&model);

    let valid: HashSet<&str> = ["A", "B"].into_iter().collect();
    let broken = registry.find_broken_references(&valid);

    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].source, "A");
    assert_eq!(broken[0].target, "Z");
    assert_eq!(broken[0].kind, "uses");

    // Z still exists as a graph node.
    let graph = registry.dependency_graph();
    assert!(graph.contains("Z"));
}

// ===========================================================================
// Reachability with a depth cap: A → B → C → D → E
// ===========================================================================

#[test]
fn reachability_depth_cap() {
    let model = ArchitectureModel::from_elements([
        Element::new("A", "application").references("B", "calls"),
        Element::new("B", "application").references("C", "calls"),
        Element::new("C", "application").references("D", "calls"),
        Element::new("D", "application").references("E", "calls"),
        Element::new("E", "application"),
    ]);
    let engine = ProjectionEngine::new(ReferenceRegistry::from_model(&model).dependency_graph());

    let reach = engine.reachable(&model, "A", 2);

    assert_eq!(
        reach.depths(),
        &BTreeMap::from([("B".to_string(), 1), ("C".to_string(), 2)])
    );
    assert_eq!(reach.depth_of("D"), None);
    assert_eq!(reach.depth_of("E"), None);
}

#[test]
fn reachability_reports_minimum_distance() {
    // A → B → C and A → C: C is first discovered at depth 1.
    let model = ArchitectureModel::from_elements([
        Element::new("A", "application")
            .references("B", "calls")
            .references("C", "calls"),
        Element::new("B", "application").references("C", "calls"),
        Element::new("C", "application"),
    ]);
    let engine = ProjectionEngine::new(ReferenceRegistry::from_model(&model).dependency_graph());

    let reach = engine.reachable(&model, "A", 5);
    assert_eq!(reach.depth_of("C"), Some(1));
    assert_eq!(reach.len(), 2);
}

// ===========================================================================
// Witness paths: ties resolve to canonical neighbor order
// ===========================================================================

#[test]
fn projection_witness_prefers_fewest_hops_then_id_order() {
    // app → svc-b → goal and app → svc-a → goal; both two hops.
    let model = ArchitectureModel::from_elements([
        Element::new("app", "application")
            .references("svc-b", "realizes")
            .references("svc-a", "realizes"),
        Element::new("svc-a", "business").references("goal", "supports-goal"),
        Element::new("svc-b", "business").references("goal", "supports-goal"),
        Element::new("goal", "motivation"),
    ]);
    let mut engine =
        ProjectionEngine::new(ReferenceRegistry::from_model(&model).dependency_graph());
    engine.add_rule(ProjectionRule::new("application", "business"));
    engine.add_rule(ProjectionRule::new("business", "motivation"));

    let results = engine.project(&model, "app", "motivation");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, vec!["app", "svc-a", "goal"]);
}

#[test]
fn broken_targets_are_never_projected() {
    let model = ArchitectureModel::from_elements([
        Element::new("app", "application").references("ghost", "realizes"),
    ]);
    let mut engine =
        ProjectionEngine::new(ReferenceRegistry::from_model(&model).dependency_graph());
    engine.add_rule(ProjectionRule::new("application", "business"));

    assert!(engine.project(&model, "app", "business").is_empty());
}
