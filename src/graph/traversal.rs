//! Same-type relative resolution.
//!
//! A breadth-first walk over the relationship edge set, restricted to edges
//! whose endpoints both share the starting node's type. Each BFS layer is a
//! single [`EdgeStore::find_edges`] call. Ids already visited never re-enter
//! the frontier, so the walk terminates on cyclic graphs.

use std::collections::HashSet;

use crate::error::Result;
use crate::graph::store::EdgeStore;
use crate::observability::Metrics;
use crate::types::{Direction, NodeRef};

/// Computes parent/child relative sets over a same-type relationship graph.
pub struct RelativesResolver<S> {
    store: S,
}

impl<S: EdgeStore> RelativesResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ids of `node`'s relatives in `direction`.
    ///
    /// With `all_generations == false` only the immediate neighbours are
    /// returned; otherwise the full transitive closure. `node.id` itself is
    /// never part of the result, even when a cycle leads back to it.
    pub fn relatives_ids(
        &self,
        node: &NodeRef,
        direction: Direction,
        all_generations: bool,
    ) -> Result<HashSet<i64>> {
        let mut metrics = Metrics::new();
        self.relatives_ids_counted(node, direction, all_generations, &mut metrics)
    }

    /// Same as [`relatives_ids`](Self::relatives_ids), recording work in `metrics`.
    pub fn relatives_ids_counted(
        &self,
        node: &NodeRef,
        direction: Direction,
        all_generations: bool,
        metrics: &mut Metrics,
    ) -> Result<HashSet<i64>> {
        let mut visited: HashSet<i64> = HashSet::new();
        let mut frontier: HashSet<i64> = HashSet::from([node.id]);
        let mut depth = 0u32;

        while !frontier.is_empty() {
            let edges = self.store.find_edges(direction, &frontier, &node.kind)?;
            metrics.edge_queries += 1;
            depth += 1;

            visited.extend(frontier.iter().copied());
            let next: HashSet<i64> = edges
                .iter()
                .map(|edge| direction.advancing_id(edge))
                .filter(|id| !visited.contains(id))
                .collect();

            tracing::trace!(
                node = %node,
                %direction,
                depth,
                discovered = next.len(),
                "bfs layer"
            );

            if !all_generations {
                visited.extend(next);
                break;
            }
            frontier = next;
        }

        visited.remove(&node.id);
        metrics.closures_computed += 1;
        tracing::debug!(
            node = %node,
            %direction,
            all_generations,
            relatives = visited.len(),
            "relatives resolved"
        );
        Ok(visited)
    }

    /// Parse `direction` and resolve relatives. Unknown directions fail with
    /// [`MegaGraphError::InvalidArgument`](crate::error::MegaGraphError::InvalidArgument).
    pub fn relatives_ids_by_name(
        &self,
        node: &NodeRef,
        direction: &str,
        all_generations: bool,
    ) -> Result<HashSet<i64>> {
        let direction: Direction = direction.parse()?;
        self.relatives_ids(node, direction, all_generations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::GraphStore;
    use pretty_assertions::assert_eq;

    fn program(id: i64) -> NodeRef {
        NodeRef::new("Program", id)
    }

    fn ids(values: &[i64]) -> HashSet<i64> {
        values.iter().copied().collect()
    }

    fn store_with(edges: &[(i64, i64)]) -> GraphStore {
        let store = GraphStore::in_memory().expect("in-memory store should open");
        let pairs: Vec<_> = edges
            .iter()
            .map(|&(s, d)| (program(s), program(d)))
            .collect();
        store.insert_relationships(&pairs).unwrap();
        store
    }

    /// 1 -> 2 -> 3 -> 4, plus 1 -> 5
    fn seed_chain() -> GraphStore {
        store_with(&[(1, 2), (2, 3), (3, 4), (1, 5)])
    }

    #[test]
    fn one_hop_children() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(1), Direction::Children, false)
                .unwrap(),
            ids(&[2, 5])
        );
    }

    #[test]
    fn all_generations_children() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(1), Direction::Children, true)
                .unwrap(),
            ids(&[2, 3, 4, 5])
        );
    }

    #[test]
    fn one_hop_parents() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(3), Direction::Parents, false)
                .unwrap(),
            ids(&[2])
        );
    }

    #[test]
    fn all_generations_parents() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(4), Direction::Parents, true)
                .unwrap(),
            ids(&[1, 2, 3])
        );
    }

    #[test]
    fn leaf_and_root_have_no_relatives() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        assert!(resolver
            .relatives_ids(&program(4), Direction::Children, true)
            .unwrap()
            .is_empty());
        assert!(resolver
            .relatives_ids(&program(1), Direction::Parents, true)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn cycle_terminates_and_excludes_start() {
        let store = store_with(&[(1, 2), (2, 3), (3, 1)]);
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(1), Direction::Children, true)
                .unwrap(),
            ids(&[2, 3])
        );
        assert_eq!(
            resolver
                .relatives_ids(&program(1), Direction::Parents, true)
                .unwrap(),
            ids(&[2, 3])
        );
    }

    #[test]
    fn self_loop_is_excluded() {
        let store = store_with(&[(1, 1), (1, 2)]);
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(1), Direction::Children, false)
                .unwrap(),
            ids(&[2])
        );
    }

    #[test]
    fn cross_type_edges_are_not_followed() {
        let store = store_with(&[(1, 2)]);
        store
            .insert_relationship(&program(2), &NodeRef::new("Control", 3))
            .unwrap();
        store
            .insert_relationship(&NodeRef::new("Control", 3), &program(4))
            .unwrap();
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids(&program(1), Direction::Children, true)
                .unwrap(),
            ids(&[2])
        );
    }

    #[test]
    fn diamond_visits_shared_child_once() {
        // 1 -> {2, 3} -> 4
        let store = store_with(&[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let resolver = RelativesResolver::new(&store);
        let mut metrics = Metrics::new();
        let result = resolver
            .relatives_ids_counted(&program(1), Direction::Children, true, &mut metrics)
            .unwrap();
        assert_eq!(result, ids(&[2, 3, 4]));
        // {1}, {2,3}, {4}, then an empty layer ends the walk.
        assert_eq!(metrics.edge_queries, 3);
        assert_eq!(metrics.closures_computed, 1);
    }

    #[test]
    fn one_hop_issues_a_single_query() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        let mut metrics = Metrics::new();
        resolver
            .relatives_ids_counted(&program(1), Direction::Children, false, &mut metrics)
            .unwrap();
        assert_eq!(metrics.edge_queries, 1);
    }

    #[test]
    fn direction_by_name() {
        let store = seed_chain();
        let resolver = RelativesResolver::new(&store);
        assert_eq!(
            resolver
                .relatives_ids_by_name(&program(2), "parents", false)
                .unwrap(),
            ids(&[1])
        );
        let err = resolver
            .relatives_ids_by_name(&program(2), "sideways", true)
            .unwrap_err();
        assert!(err.is_invalid_argument(), "got {err:?}");
    }
}
