//! Phase 2: dependency graph over classified types.
//!
//! Nodes are every non-`Unclassified` result; edges come from field types, supertypes
//! and implemented interfaces. The petgraph digraph is paired with a name index so
//! callers only ever deal in [`TypeName`]s.

use crate::classify::Classification;
use crate::model::{ParsedType, SymbolModel, TypeDescriptor};
use hexguard_types::TypeName;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Reference,
    Extends,
    Implements,
    Contains,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Reference => "reference",
            EdgeKind::Extends => "extends",
            EdgeKind::Implements => "implements",
            EdgeKind::Contains => "contains",
        }
    }
}

/// Canonical order is `(from, to, kind)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: TypeName,
    pub to: TypeName,
    pub kind: EdgeKind,
}

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TypeName, EdgeKind>,
    index: BTreeMap<TypeName, NodeIndex>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    fn from_parts(nodes: Vec<TypeName>, edges: BTreeSet<DependencyEdge>) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut index = BTreeMap::new();
        for name in nodes {
            let idx = graph.add_node(name.clone());
            index.insert(name, idx);
        }
        for e in &edges {
            if let (Some(&a), Some(&b)) = (index.get(&e.from), index.get(&e.to)) {
                graph.add_edge(a, b, e.kind);
            }
        }
        Self {
            graph,
            index,
            edges: edges.into_iter().collect(),
        }
    }

    /// Nodes in ascending name order.
    pub fn nodes(&self) -> impl Iterator<Item = &TypeName> {
        self.index.keys()
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in canonical order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn outgoing(&self, name: &TypeName) -> Vec<DependencyEdge> {
        self.adjacent(name, Direction::Outgoing)
    }

    pub fn incoming(&self, name: &TypeName) -> Vec<DependencyEdge> {
        self.adjacent(name, Direction::Incoming)
    }

    fn adjacent(&self, name: &TypeName, dir: Direction) -> Vec<DependencyEdge> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut out: Vec<DependencyEdge> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| DependencyEdge {
                from: self.graph[e.source()].clone(),
                to: self.graph[e.target()].clone(),
                kind: *e.weight(),
            })
            .collect();
        out.sort();
        out
    }

    /// Strongly connected components with more than one member, restricted to `members`
    /// and to edges of the given kinds.
    ///
    /// Each component is sorted, and components are ordered by their smallest member.
    pub fn cycles_among(&self, members: &BTreeSet<TypeName>, kinds: &[EdgeKind]) -> Vec<Vec<TypeName>> {
        let mut sub: DiGraph<&TypeName, ()> = DiGraph::new();
        let mut sub_index: BTreeMap<&TypeName, NodeIndex> = BTreeMap::new();
        for name in members.iter().filter(|n| self.contains(n)) {
            sub_index.insert(name, sub.add_node(name));
        }
        for e in self.edges.iter().filter(|e| kinds.contains(&e.kind)) {
            if let (Some(&a), Some(&b)) = (sub_index.get(&e.from), sub_index.get(&e.to)) {
                sub.update_edge(a, b, ());
            }
        }

        let mut components: Vec<Vec<TypeName>> = tarjan_scc(&sub)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<TypeName> = scc.into_iter().map(|i| sub[i].clone()).collect();
                names.sort();
                names
            })
            .collect();
        components.sort();
        components
    }

    /// A shortest cycle through `component`, starting and ending at its smallest member.
    ///
    /// Breadth-first with neighbors visited in name order, so the path is canonical and the
    /// search is linear in the component's edges.
    pub fn cycle_path(&self, component: &[TypeName], kinds: &[EdgeKind]) -> Vec<TypeName> {
        let Some(start) = component.iter().min() else {
            return Vec::new();
        };
        let allowed: BTreeSet<&TypeName> = component.iter().collect();

        let mut parent: BTreeMap<TypeName, TypeName> = BTreeMap::new();
        let mut queue: VecDeque<TypeName> = VecDeque::from([start.clone()]);
        while let Some(current) = queue.pop_front() {
            let mut next: Vec<TypeName> = self
                .outgoing(&current)
                .into_iter()
                .filter(|e| kinds.contains(&e.kind) && allowed.contains(&e.to))
                .map(|e| e.to)
                .collect();
            next.dedup();

            for n in next {
                if &n == start {
                    let mut back = Vec::new();
                    let mut at = Some(current.clone());
                    while let Some(node) = at.filter(|node| node != start) {
                        at = parent.get(&node).cloned();
                        back.push(node);
                    }
                    let mut path = vec![start.clone()];
                    path.extend(back.into_iter().rev());
                    path.push(start.clone());
                    return path;
                }
                if !parent.contains_key(&n) {
                    parent.insert(n.clone(), current.clone());
                    queue.push_back(n);
                }
            }
        }
        Vec::new()
    }
}

/// Build the graph from a complete classification. Per-type edge discovery runs in parallel.
pub fn build_graph(classification: &Classification, model: &SymbolModel) -> DependencyGraph {
    let nodes: Vec<TypeName> = classification
        .iter()
        .filter(|r| r.is_classified())
        .map(|r| r.name.clone())
        .collect();
    debug!(nodes = nodes.len(), "graph build started");

    let edges: BTreeSet<DependencyEdge> = nodes
        .par_iter()
        .filter_map(|name| model.get(name))
        .map(|ty| edges_from(ty, model, classification))
        .reduce(BTreeSet::new, |mut a, b| {
            a.extend(b);
            a
        });

    let graph = DependencyGraph::from_parts(nodes, edges);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built"
    );
    graph
}

fn edges_from(
    ty: &TypeDescriptor,
    model: &SymbolModel,
    classification: &Classification,
) -> BTreeSet<DependencyEdge> {
    let mut out = BTreeSet::new();
    let mut add = |base: &str, kind: EdgeKind| {
        if let Some(target) = model.resolve(ty, base) {
            if target != &ty.name && classification.is_classified(target) {
                out.insert(DependencyEdge {
                    from: ty.name.clone(),
                    to: target.clone(),
                    kind,
                });
            }
        }
    };

    for f in &ty.fields {
        match f.type_ref.parse() {
            Ok(parsed) => walk_field_type(&parsed, false, &mut add),
            Err(err) => debug!(type_name = %ty.name, field = %f.name, error = %err, "field skipped"),
        }
    }
    if let Some(parsed) = ty.supertype.as_ref().and_then(|s| s.parse().ok()) {
        add(&parsed.base, EdgeKind::Extends);
        walk_args(&parsed, &mut add);
    }
    for i in &ty.interfaces {
        if let Ok(parsed) = i.parse() {
            add(&parsed.base, EdgeKind::Implements);
            walk_args(&parsed, &mut add);
        }
    }
    out
}

/// Arrays and container arguments are `contains`; everything else is `reference`.
fn walk_field_type(t: &ParsedType, contained: bool, add: &mut impl FnMut(&str, EdgeKind)) {
    if t.is_wildcard() {
        return;
    }
    if t.is_container() {
        for arg in &t.args {
            walk_field_type(arg, true, add);
        }
        return;
    }
    let kind = if contained || t.array_dims > 0 {
        EdgeKind::Contains
    } else {
        EdgeKind::Reference
    };
    add(&t.base, kind);
    walk_args(t, add);
}

fn walk_args(t: &ParsedType, add: &mut impl FnMut(&str, EdgeKind)) {
    for arg in &t.args {
        walk_field_type(arg, false, add);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::policy::PolicyConfig;
    use crate::test_support::{aggregate, field, order_domain};

    fn graph_for(types: Vec<TypeDescriptor>) -> DependencyGraph {
        let model = SymbolModel::new(types).expect("model");
        let c = classify(&model, &PolicyConfig::default());
        build_graph(&c, &model)
    }

    fn edge(from: &str, to: &str, kind: EdgeKind) -> DependencyEdge {
        DependencyEdge {
            from: TypeName::new(from),
            to: TypeName::new(to),
            kind,
        }
    }

    #[test]
    fn order_domain_edges() {
        let g = graph_for(order_domain());
        assert_eq!(
            g.edges(),
            &[
                edge(
                    "com.acme.order.domain.Order",
                    "com.acme.order.domain.LineItem",
                    EdgeKind::Contains
                ),
                edge(
                    "com.acme.order.domain.Order",
                    "com.acme.order.domain.OrderId",
                    EdgeKind::Reference
                ),
            ]
        );
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.incoming(&TypeName::new("com.acme.order.domain.OrderId")).len(), 1);
    }

    #[test]
    fn unclassified_endpoints_are_dropped() {
        let mut types = order_domain();
        types[1] = types[1]
            .clone()
            .with_field(field("audit", "com.acme.order.domain.AuditTrail"));
        types.push(crate::test_support::class("com.acme.order.domain.AuditTrail"));
        let g = graph_for(types);
        assert!(!g.contains(&TypeName::new("com.acme.order.domain.AuditTrail")));
        assert!(g
            .edges()
            .iter()
            .all(|e| e.to.as_str() != "com.acme.order.domain.AuditTrail"));
    }

    #[test]
    fn generic_arguments_of_non_containers_are_references() {
        let mut types = aggregate("com.acme", "Order", None);
        types[0] = types[0]
            .clone()
            .with_field(field("lastSeen", "Snapshot<OrderId>"))
            .with_field(field("history", "java.util.Map<String, java.util.List<OrderId>>"));
        let g = graph_for(types);
        let out = g.outgoing(&TypeName::new("com.acme.Order"));
        assert!(out.contains(&edge("com.acme.Order", "com.acme.OrderId", EdgeKind::Reference)));
        assert!(out.contains(&edge("com.acme.Order", "com.acme.OrderId", EdgeKind::Contains)));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn supertypes_and_interfaces() {
        let mut types = order_domain();
        types.push(
            crate::test_support::class("com.acme.order.domain.ExpressOrder")
                .extending("Order")
                .with_field(crate::test_support::final_field("id", "OrderId")),
        );
        let g = graph_for(types);
        let out = g.outgoing(&TypeName::new("com.acme.order.domain.ExpressOrder"));
        assert!(out.iter().any(|e| e.kind == EdgeKind::Extends));
        assert_eq!(g.edges_of_kind(EdgeKind::Extends).count(), 1);
    }

    #[test]
    fn aggregate_cycle_component_and_path() {
        let mut types = aggregate("com.acme", "Order", Some("Customer"));
        types.extend(aggregate("com.acme", "Customer", Some("Order")));
        let g = graph_for(types);

        let members: BTreeSet<TypeName> =
            [TypeName::new("com.acme.Order"), TypeName::new("com.acme.Customer")].into();
        let kinds = [EdgeKind::Reference, EdgeKind::Contains];
        let cycles = g.cycles_among(&members, &kinds);
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            g.cycle_path(&cycles[0], &kinds),
            vec![
                TypeName::new("com.acme.Customer"),
                TypeName::new("com.acme.Order"),
                TypeName::new("com.acme.Customer"),
            ]
        );
    }

    #[test]
    fn cycle_path_is_shortest_and_fast_on_dense_components() {
        let names: Vec<TypeName> = (0..40).map(|i| TypeName::new(format!("com.acme.N{i:02}"))).collect();
        let mut edges = BTreeSet::new();
        for a in &names {
            for b in &names {
                if a != b {
                    edges.insert(edge(a.as_str(), b.as_str(), EdgeKind::Reference));
                }
            }
        }
        let g = DependencyGraph::from_parts(names.clone(), edges);
        let kinds = [EdgeKind::Reference];
        assert_eq!(
            g.cycle_path(&names, &kinds),
            vec![names[0].clone(), names[1].clone(), names[0].clone()]
        );

        let ring: Vec<TypeName> = ["com.acme.A", "com.acme.B", "com.acme.C"]
            .into_iter()
            .map(TypeName::new)
            .collect();
        let ring_edges: BTreeSet<DependencyEdge> = [
            edge("com.acme.A", "com.acme.B", EdgeKind::Reference),
            edge("com.acme.B", "com.acme.C", EdgeKind::Reference),
            edge("com.acme.C", "com.acme.A", EdgeKind::Reference),
        ]
        .into();
        let g = DependencyGraph::from_parts(ring.clone(), ring_edges);
        assert_eq!(
            g.cycle_path(&ring, &kinds),
            vec![ring[0].clone(), ring[1].clone(), ring[2].clone(), ring[0].clone()]
        );
    }
}
