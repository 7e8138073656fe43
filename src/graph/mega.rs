//! Mega objects: objects that can be mapped to objects of their own type.
//!
//! Holds the request-cached ancestor predicate and the policy deciding when
//! an automatic mapping must not propagate between same-typed objects.

use std::collections::HashSet;

use crate::config::schema::MegaConfig;
use crate::error::Result;
use crate::graph::store::{EdgeStore, NodeLoader};
use crate::graph::traversal::RelativesResolver;
use crate::request::RequestContext;
use crate::types::{Direction, NodeRef};

/// Ancestor queries and automapping decisions for Mega types.
pub struct MegaResolver<S> {
    relatives: RelativesResolver<S>,
    mega_types: HashSet<String>,
}

impl<S: EdgeStore + NodeLoader> MegaResolver<S> {
    pub fn new<I, T>(store: S, mega_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            relatives: RelativesResolver::new(store),
            mega_types: mega_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(store: S, config: &MegaConfig) -> Self {
        Self::new(store, config.types.iter().cloned())
    }

    pub fn relatives(&self) -> &RelativesResolver<S> {
        &self.relatives
    }

    pub fn is_mega_type(&self, kind: &str) -> bool {
        self.mega_types.contains(kind)
    }

    /// True when `node` has at least one child of its own type.
    pub fn is_mega(&self, node: &NodeRef) -> Result<bool> {
        let edges = self.relatives.store().find_edges(
            Direction::Children,
            &HashSet::from([node.id]),
            &node.kind,
        )?;
        Ok(!edges.is_empty())
    }

    /// Whether `candidate_parent` is in the transitive parent closure of `node`.
    ///
    /// The closure for `(node.kind, node.id)` is computed at most once per
    /// request. On a miss the node is re-loaded from the store first, so a
    /// missing node fails with `NotFound`. Only ids are compared.
    pub fn is_ancestor_of(
        &self,
        ctx: &mut RequestContext,
        candidate_parent: &NodeRef,
        node: &NodeRef,
    ) -> Result<bool> {
        let cached = ctx
            .parents_cache()
            .get(&node.kind, node.id)
            .map(|parents| parents.contains(&candidate_parent.id));
        if let Some(found) = cached {
            ctx.metrics_mut().cache_hits += 1;
            tracing::debug!(node = %node, candidate = %candidate_parent, found, "parents cache hit");
            return Ok(found);
        }

        ctx.metrics_mut().cache_misses += 1;
        let fresh = self.relatives.store().load(&node.kind, node.id)?;
        let parents = self.relatives.relatives_ids_counted(
            &fresh,
            Direction::Parents,
            true,
            ctx.metrics_mut(),
        )?;
        let found = parents.contains(&candidate_parent.id);
        tracing::debug!(
            node = %fresh,
            candidate = %candidate_parent,
            ancestors = parents.len(),
            found,
            "parents cache miss"
        );
        ctx.parents_cache().insert(&fresh.kind, fresh.id, parents);
        Ok(found)
    }

    /// Decide whether propagating a mapping from `source` to `related_to_dst`
    /// through `dst` must be skipped.
    ///
    /// Skips when `related_to_dst` has `dst`'s type but is not one of its
    /// ancestors, or when `source` has `dst`'s type but is not one of its
    /// ancestors. Propagation therefore only ever flows toward ancestors.
    pub fn should_skip_mapping(
        &self,
        ctx: &mut RequestContext,
        source: &NodeRef,
        dst: &NodeRef,
        related_to_dst: &NodeRef,
    ) -> Result<bool> {
        let to_not_parent =
            related_to_dst.same_kind(dst) && !self.is_ancestor_of(ctx, related_to_dst, dst)?;
        let from_not_parent = source.same_kind(dst) && !self.is_ancestor_of(ctx, source, dst)?;
        let skip = to_not_parent || from_not_parent;
        tracing::debug!(
            source = %source,
            dst = %dst,
            related = %related_to_dst,
            to_not_parent,
            from_not_parent,
            skip,
            "automapping decision"
        );
        Ok(skip)
    }

    /// Entry point for callers that do not know whether `dst` is a Mega type.
    /// Non-Mega destinations never skip and never touch the graph.
    pub fn skip_automapping(
        &self,
        ctx: &mut RequestContext,
        source: &NodeRef,
        dst: &NodeRef,
        related_to_dst: &NodeRef,
    ) -> Result<bool> {
        if !self.is_mega_type(&dst.kind) {
            return Ok(false);
        }
        self.should_skip_mapping(ctx, source, dst, related_to_dst)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
