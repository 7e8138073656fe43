//! Property-based tests for relative resolution using proptest.
//!
//! Random same-type graphs (cycles and self-loops included) are loaded into
//! an in-memory store, and the BFS closure is checked against a plain
//! reachability search over the same edge list.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use megagraph::graph::mega::MegaResolver;
use megagraph::graph::store::GraphStore;
use megagraph::graph::traversal::RelativesResolver;
use megagraph::request::RequestContext;
use megagraph::types::{Direction, NodeRef};

const MAX_ID: i64 = 12;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_edges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0..MAX_ID, 0..MAX_ID), 0..40)
}

/// Edges with `source < destination`, so the graph is acyclic.
fn arb_dag_edges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0..MAX_ID, 0..MAX_ID), 0..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect()
    })
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Children), Just(Direction::Parents)]
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn program(id: i64) -> NodeRef {
    NodeRef::new("Program", id)
}

fn build_store(edges: &[(i64, i64)]) -> GraphStore {
    let store = GraphStore::in_memory().expect("in-memory store should open");
    for id in 0..MAX_ID {
        store.insert_node(&program(id), None).unwrap();
    }
    let pairs: Vec<_> = edges
        .iter()
        .map(|&(s, d)| (program(s), program(d)))
        .collect();
    store.insert_relationships(&pairs).unwrap();
    // Cross-type noise that must never show up in a closure.
    for &(s, d) in edges {
        store
            .insert_relationship(&program(s), &NodeRef::new("Control", d + 100))
            .unwrap();
    }
    store
}

/// Reference reachability: depth-first search over an adjacency map.
fn reachable(edges: &[(i64, i64)], start: i64, direction: Direction) -> HashSet<i64> {
    let mut adjacency: HashMap<i64, Vec<i64>> = HashMap::new();
    for &(s, d) in edges {
        let (from, to) = match direction {
            Direction::Children => (s, d),
            Direction::Parents => (d, s),
        };
        adjacency.entry(from).or_default().push(to);
    }
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    while let Some(n) = stack.pop() {
        for &next in adjacency.get(&n).into_iter().flatten() {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen.remove(&start);
    seen
}

fn one_hop(edges: &[(i64, i64)], start: i64, direction: Direction) -> HashSet<i64> {
    edges
        .iter()
        .filter_map(|&(s, d)| match direction {
            Direction::Children if s == start => Some(d),
            Direction::Parents if d == start => Some(s),
            _ => None,
        })
        .filter(|&id| id != start)
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dag_closure_equals_reachability(edges in arb_dag_edges(), start in 0..MAX_ID) {
        let store = build_store(&edges);
        let resolver = RelativesResolver::new(&store);
        let closure = resolver
            .relatives_ids(&program(start), Direction::Children, true)
            .unwrap();
        prop_assert_eq!(closure, reachable(&edges, start, Direction::Children));
    }

    #[test]
    fn closure_matches_reachability_with_cycles(
        edges in arb_edges(),
        start in 0..MAX_ID,
        direction in arb_direction(),
    ) {
        let store = build_store(&edges);
        let resolver = RelativesResolver::new(&store);
        let closure = resolver.relatives_ids(&program(start), direction, true).unwrap();
        prop_assert!(!closure.contains(&start));
        prop_assert_eq!(closure, reachable(&edges, start, direction));
    }

    #[test]
    fn one_hop_is_subset_of_closure(
        edges in arb_edges(),
        start in 0..MAX_ID,
        direction in arb_direction(),
    ) {
        let store = build_store(&edges);
        let resolver = RelativesResolver::new(&store);
        let hop = resolver.relatives_ids(&program(start), direction, false).unwrap();
        let all = resolver.relatives_ids(&program(start), direction, true).unwrap();
        prop_assert!(hop.is_subset(&all));
        prop_assert!(!hop.contains(&start));
        prop_assert_eq!(hop, one_hop(&edges, start, direction));
    }

    #[test]
    fn children_and_parents_are_dual(edges in arb_edges(), a in 0..MAX_ID, b in 0..MAX_ID) {
        let store = build_store(&edges);
        let resolver = RelativesResolver::new(&store);
        let a_reaches_b = resolver
            .relatives_ids(&program(a), Direction::Children, true)
            .unwrap()
            .contains(&b);
        let b_has_ancestor_a = resolver
            .relatives_ids(&program(b), Direction::Parents, true)
            .unwrap()
            .contains(&a);
        prop_assert_eq!(a_reaches_b, b_has_ancestor_a);
    }

    #[test]
    fn ancestor_predicate_is_stable_within_request(
        edges in arb_edges(),
        a in 0..MAX_ID,
        b in 0..MAX_ID,
    ) {
        let store = build_store(&edges);
        let mega = MegaResolver::new(&store, ["Program"]);
        let mut ctx = RequestContext::new();
        let first = mega.is_ancestor_of(&mut ctx, &program(a), &program(b)).unwrap();
        let second = mega.is_ancestor_of(&mut ctx, &program(a), &program(b)).unwrap();
        prop_assert_eq!(first, second);
        let expected = a != b && reachable(&edges, b, Direction::Parents).contains(&a);
        prop_assert_eq!(first, expected);
        prop_assert_eq!(ctx.metrics().cache_misses, 1);
        prop_assert_eq!(ctx.metrics().cache_hits, 1);
    }

    #[test]
    fn skip_mapping_follows_policy(
        edges in arb_edges(),
        source in 0..MAX_ID,
        dst in 0..MAX_ID,
        related in 0..MAX_ID,
    ) {
        let store = build_store(&edges);
        let mega = MegaResolver::new(&store, ["Program"]);
        let mut ctx = RequestContext::new();
        let skip = mega
            .should_skip_mapping(&mut ctx, &program(source), &program(dst), &program(related))
            .unwrap();
        let ancestors = reachable(&edges, dst, Direction::Parents);
        let expected = !ancestors.contains(&related) || !ancestors.contains(&source);
        prop_assert_eq!(skip, expected);
    }
}
