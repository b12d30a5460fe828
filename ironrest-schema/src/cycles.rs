//! Cycle analysis over the type reference graph.
//!
//! Nodes are registered types and edges are direct references. Two shapes
//! count as cycles:
//!
//! - every node of a strongly connected component with more than one member,
//!   or with a self-reference;
//! - a chain that leaves a namespace and comes back into it, or leaves a
//!   package root and comes back into it, even when no type repeats. The
//!   generated modules on such a chain would import each other.
//!
//! A cycle confined to one package root is tolerated: its members and every
//! same-root descendant become cyclic and are embedded through indirection.
//! A cycle touching several package roots would make compiled units import
//! each other and is fatal.
//!
//! [`analyze`] only computes the outcome; the registry commits it.

use crate::error::SchemaError;
use crate::identifier::{Identifier, IdentifierSet, Path};
use crate::registry::TypeRegistry;
use petgraph::algo::{astar, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::info;

/// Outcome of a cycle analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleAnalysis {
    /// Every type that must be flagged cyclic.
    pub cyclic: IdentifierSet,
    /// One representative chain per package-internal cycle. Component chains
    /// start and end on the component's smallest member; re-entry chains end
    /// on the node that re-enters.
    pub cycles: Vec<Path>,
}

struct ReferenceGraph<'a> {
    graph: DiGraph<&'a Identifier, ()>,
}

impl<'a> ReferenceGraph<'a> {
    fn build(registry: &'a TypeRegistry) -> Self {
        let mut graph = DiGraph::new();
        let index: BTreeMap<&Identifier, NodeIndex> = registry
            .identifiers()
            .map(|id| (id, graph.add_node(id)))
            .collect();
        for (id, registered) in registry.iter() {
            let from = index[id];
            for dep in registered.descriptor().references() {
                if let Some(&to) = index.get(dep) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        Self { graph }
    }

    fn is_cycle(&self, component: &[NodeIndex]) -> bool {
        component.len() > 1 || self.graph.contains_edge(component[0], component[0])
    }

    fn shortest_path(&self, from: NodeIndex, to: NodeIndex) -> Vec<NodeIndex> {
        astar(&self.graph, from, |n| n == to, |_| 1, |_| 0)
            .map(|(_, path)| path)
            .unwrap_or_else(|| vec![from, to])
    }

    /// Builds `start -> .. -> via -> .. -> start`.
    fn chain_through(&self, start: NodeIndex, via: NodeIndex) -> Path {
        let mut nodes = self.shortest_path(start, via);
        nodes.extend(self.shortest_path(via, start).into_iter().skip(1));
        self.to_path(&nodes)
    }

    fn to_path(&self, nodes: &[NodeIndex]) -> Path {
        nodes.iter().map(|&n| self.graph[n].clone()).collect()
    }

    fn sorted_members(&self, component: &[NodeIndex]) -> Vec<NodeIndex> {
        let mut members = component.to_vec();
        members.sort_by(|a, b| self.graph[*a].cmp(self.graph[*b]));
        members.dedup();
        members
    }

    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let neighbors: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        self.sorted_members(&neighbors)
    }

    /// Finds the shortest chain from `start` that leaves its namespace and
    /// comes back into it, or leaves its package root and comes back into it.
    ///
    /// The returned chain starts at `start` and ends on the re-entering node.
    fn find_reentry(&self, registry: &TypeRegistry, start: NodeIndex) -> Option<Vec<NodeIndex>> {
        let namespace = self.graph[start].namespace();
        let root = registry.package_root(self.graph[start]);

        // State: (node, whether the chain has left the package root).
        let mut parents: HashMap<(NodeIndex, bool), (NodeIndex, bool)> = HashMap::new();
        let mut queue = VecDeque::new();
        for child in self.children(start) {
            let id = self.graph[child];
            if id.namespace() == namespace {
                continue;
            }
            let state = (child, registry.package_root(id) != root);
            if !parents.contains_key(&state) {
                parents.insert(state, (start, false));
                queue.push_back(state);
            }
        }

        while let Some((node, left_root)) = queue.pop_front() {
            for child in self.children(node) {
                let id = self.graph[child];
                let child_root = registry.package_root(id);
                if id.namespace() == namespace || (left_root && child_root == root) {
                    let mut chain = vec![child, node];
                    let mut state = (node, left_root);
                    while let Some(&parent) = parents.get(&state) {
                        chain.push(parent.0);
                        state = parent;
                    }
                    chain.reverse();
                    return Some(chain);
                }
                let state = (child, left_root || child_root != root);
                if !parents.contains_key(&state) {
                    parents.insert(state, (node, left_root));
                    queue.push_back(state);
                }
            }
        }
        None
    }
}

/// Finds every cycle in the registry and the types it forces cyclic.
///
/// # Arguments
/// * `registry` - A registry whose references all resolve
///
/// # Returns
/// The set of types to flag and one chain per package-internal cycle.
///
/// # Errors
/// Returns `SchemaError::CrossRootCycle` for the first cycle, in identifier
/// order, that touches more than one package root. Strongly connected
/// components are checked before re-entry chains.
pub fn analyze(registry: &TypeRegistry) -> Result<CycleAnalysis, SchemaError> {
    let refs = ReferenceGraph::build(registry);
    let root_of = |n: NodeIndex| registry.package_root(refs.graph[n]);

    let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&refs.graph)
        .into_iter()
        .filter(|c| refs.is_cycle(c))
        .map(|c| refs.sorted_members(&c))
        .collect();
    components.sort_by(|a, b| refs.graph[a[0]].cmp(refs.graph[b[0]]));

    let mut analysis = CycleAnalysis::default();
    for members in &components {
        let start = members[0];
        let root = root_of(start);

        if let Some(&foreign) = members.iter().find(|&&n| root_of(n) != root) {
            return Err(SchemaError::CrossRootCycle {
                path: refs.chain_through(start, foreign),
            });
        }

        let via = refs
            .children(start)
            .into_iter()
            .find(|n| members.contains(n))
            .unwrap_or(start);
        let path = if via == start {
            Path::from(vec![refs.graph[start].clone(), refs.graph[start].clone()])
        } else {
            refs.chain_through(start, via)
        };
        info!(package_root = %root, "detected cyclic dependency: {path}");
        analysis.cycles.push(path);

        for &member in members {
            flood_fill(&refs, registry, member, &mut analysis.cyclic);
        }
    }

    let nodes: Vec<NodeIndex> = refs.graph.node_indices().collect();
    for start in refs.sorted_members(&nodes) {
        let Some(chain) = refs.find_reentry(registry, start) else {
            continue;
        };
        let root = root_of(start);
        if chain.iter().any(|&n| root_of(n) != root) {
            return Err(SchemaError::CrossRootCycle {
                path: refs.to_path(&chain),
            });
        }
        if chain.iter().all(|&n| analysis.cyclic.contains(refs.graph[n])) {
            continue;
        }
        let path = refs.to_path(&chain);
        info!(package_root = %root, "detected cyclic dependency: {path}");
        analysis.cycles.push(path);

        for &member in &chain {
            flood_fill(&refs, registry, member, &mut analysis.cyclic);
        }
    }

    Ok(analysis)
}

/// Flags `node` and every descendant reachable through same-root edges.
fn flood_fill(
    refs: &ReferenceGraph<'_>,
    registry: &TypeRegistry,
    node: NodeIndex,
    cyclic: &mut IdentifierSet,
) {
    let mut stack = vec![node];
    cyclic.insert(refs.graph[node].clone());
    while let Some(current) = stack.pop() {
        let root = registry.package_root(refs.graph[current]);
        for child in refs.graph.neighbors(current) {
            let id = refs.graph[child];
            if registry.package_root(id) == root && !cyclic.contains(id) {
                cyclic.insert(id.clone());
                stack.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComplexType, Field, FieldType, NamedType, RecordDef};
    use tracing_test::traced_test;

    fn record(namespace: &str, name: &str, refs: &[(&str, &str)]) -> ComplexType {
        ComplexType::Record(RecordDef {
            named: NamedType::new(Identifier::new(namespace, name)),
            fields: refs
                .iter()
                .enumerate()
                .map(|(i, (ns, n))| Field::optional(format!("f{i}"), FieldType::reference(ns, n)))
                .collect(),
        })
    }

    fn registry_of(types: Vec<(ComplexType, &str)>) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for (descriptor, root) in types {
            registry.register(descriptor, root).expect("Failed to register");
        }
        registry
    }

    fn id(namespace: &str, name: &str) -> Identifier {
        Identifier::new(namespace, name)
    }

    #[test]
    #[traced_test]
    fn test_package_internal_cycle_is_flagged() {
        let registry = registry_of(vec![
            (record("pkg1", "A", &[("pkg1", "B")]), "pkg1"),
            (record("pkg1", "B", &[("pkg1", "A")]), "pkg1"),
        ]);
        let analysis = analyze(&registry).expect("Failed to analyze");
        assert!(analysis.cyclic.contains(&id("pkg1", "A")));
        assert!(analysis.cyclic.contains(&id("pkg1", "B")));
        assert_eq!(analysis.cycles.len(), 1);
        assert_eq!(analysis.cycles[0].to_string(), "pkg1.A -> pkg1.B -> pkg1.A");
        assert!(logs_contain("detected cyclic dependency: pkg1.A -> pkg1.B -> pkg1.A"));
    }

    #[test]
    fn test_cross_root_cycle_is_fatal() {
        let registry = registry_of(vec![
            (record("pkg1", "A", &[("pkg2", "B")]), "pkg1"),
            (record("pkg2", "B", &[("pkg1", "A")]), "pkg2"),
        ]);
        let err = analyze(&registry).unwrap_err();
        match err {
            SchemaError::CrossRootCycle { path } => {
                assert_eq!(path.to_string(), "pkg1.A -> pkg2.B -> pkg1.A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_three_root_cycle_is_fatal() {
        let registry = registry_of(vec![
            (record("r1", "A", &[("r2", "B")]), "r1"),
            (record("r2", "B", &[("r3", "C")]), "r2"),
            (record("r3", "C", &[("r1", "A")]), "r3"),
        ]);
        let err = analyze(&registry).unwrap_err();
        match err {
            SchemaError::CrossRootCycle { path } => {
                assert_eq!(path.to_string(), "r1.A -> r2.B -> r3.C -> r1.A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_flood_fill_stays_within_root() {
        let registry = registry_of(vec![
            (record("pkg1", "A", &[("pkg1", "B"), ("pkg1", "Child")]), "pkg1"),
            (record("pkg1", "B", &[("pkg1", "A"), ("pkg2", "Foreign")]), "pkg1"),
            (record("pkg1", "Child", &[("pkg1", "Grandchild")]), "pkg1"),
            (record("pkg1", "Grandchild", &[]), "pkg1"),
            (record("pkg2", "Foreign", &[("pkg2", "ForeignChild")]), "pkg2"),
            (record("pkg2", "ForeignChild", &[]), "pkg2"),
            (record("pkg1", "Unrelated", &[("pkg1", "A")]), "pkg1"),
        ]);
        let analysis = analyze(&registry).unwrap();
        let expected: IdentifierSet = [
            id("pkg1", "A"),
            id("pkg1", "B"),
            id("pkg1", "Child"),
            id("pkg1", "Grandchild"),
        ]
        .into_iter()
        .collect();
        assert_eq!(analysis.cyclic, expected);
    }

    #[test]
    fn test_self_reference() {
        let registry = registry_of(vec![(record("pkg", "Node", &[("pkg", "Node")]), "pkg")]);
        let analysis = analyze(&registry).unwrap();
        assert!(analysis.cyclic.contains(&id("pkg", "Node")));
        assert_eq!(analysis.cycles[0].to_string(), "pkg.Node -> pkg.Node");
    }

    #[test]
    fn test_diamond_without_cycle() {
        let registry = registry_of(vec![
            (record("pkg", "Top", &[("pkg", "Left"), ("pkg", "Right")]), "pkg"),
            (record("pkg", "Left", &[("pkg", "Bottom")]), "pkg"),
            (record("pkg", "Right", &[("pkg", "Bottom")]), "pkg"),
            (record("pkg", "Bottom", &[]), "pkg"),
        ]);
        let analysis = analyze(&registry).unwrap();
        assert!(analysis.cyclic.is_empty());
        assert!(analysis.cycles.is_empty());
    }

    #[test]
    fn test_overlapping_cycles_share_one_component() {
        let registry = registry_of(vec![
            (record("pkg", "A", &[("pkg", "B"), ("pkg", "C")]), "pkg"),
            (record("pkg", "B", &[("pkg", "A")]), "pkg"),
            (record("pkg", "C", &[("pkg", "A")]), "pkg"),
        ]);
        let analysis = analyze(&registry).unwrap();
        assert_eq!(analysis.cyclic.len(), 3);
        assert_eq!(analysis.cycles.len(), 1);
    }

    #[test]
    fn test_internal_cycle_beside_foreign_root_is_tolerated() {
        // pkg2 depends on the pkg1 cycle without closing a loop back into it.
        let registry = registry_of(vec![
            (record("pkg1", "A", &[("pkg1", "B")]), "pkg1"),
            (record("pkg1", "B", &[("pkg1", "A")]), "pkg1"),
            (record("pkg2", "User", &[("pkg1", "A")]), "pkg2"),
        ]);
        let analysis = analyze(&registry).unwrap();
        assert!(!analysis.cyclic.contains(&id("pkg2", "User")));
    }

    #[test]
    fn test_cross_root_bounce_is_fatal() {
        // No type repeats, but pkg1 is left and re-entered.
        let registry = registry_of(vec![
            (record("pkg1", "X", &[("pkg2", "Y")]), "pkg1"),
            (record("pkg2", "Y", &[("pkg1", "Z")]), "pkg2"),
            (record("pkg1", "Z", &[]), "pkg1"),
        ]);
        let err = analyze(&registry).unwrap_err();
        match err {
            SchemaError::CrossRootCycle { path } => {
                assert_eq!(path.to_string(), "pkg1.X -> pkg2.Y -> pkg1.Z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_root_reentry_through_other_namespace_is_fatal() {
        let registry = registry_of(vec![
            (record("pkg1.a", "X", &[("pkg2", "Y")]), "pkg1"),
            (record("pkg2", "Y", &[("pkg1.b", "Z")]), "pkg2"),
            (record("pkg1.b", "Z", &[]), "pkg1"),
        ]);
        let err = analyze(&registry).unwrap_err();
        assert!(
            matches!(err, SchemaError::CrossRootCycle { ref path } if path.to_string() == "pkg1.a.X -> pkg2.Y -> pkg1.b.Z")
        );
    }

    #[test]
    #[traced_test]
    fn test_namespace_bounce_within_root_is_flagged() {
        let registry = registry_of(vec![
            (record("r.a", "X", &[("r.b", "Y")]), "r"),
            (record("r.b", "Y", &[("r.a", "Z")]), "r"),
            (record("r.a", "Z", &[("r.c", "Leaf")]), "r"),
            (record("r.c", "Leaf", &[]), "r"),
            (record("r.d", "Outside", &[("r.a", "X")]), "r"),
        ]);
        let analysis = analyze(&registry).expect("Failed to analyze");
        let expected: IdentifierSet = [
            id("r.a", "X"),
            id("r.b", "Y"),
            id("r.a", "Z"),
            id("r.c", "Leaf"),
        ]
        .into_iter()
        .collect();
        assert_eq!(analysis.cyclic, expected);
        assert_eq!(analysis.cycles.len(), 1);
        assert_eq!(analysis.cycles[0].to_string(), "r.a.X -> r.b.Y -> r.a.Z");
        assert!(logs_contain("detected cyclic dependency: r.a.X -> r.b.Y -> r.a.Z"));
    }

    #[test]
    fn test_leaving_namespace_without_returning_is_acyclic() {
        let registry = registry_of(vec![
            (record("r.a", "X", &[("r.b", "Y"), ("r.a", "Z")]), "r"),
            (record("r.b", "Y", &[("r.c", "W")]), "r"),
            (record("r.c", "W", &[]), "r"),
            (record("r.a", "Z", &[]), "r"),
        ]);
        let analysis = analyze(&registry).unwrap();
        assert!(analysis.cyclic.is_empty());
    }
}
