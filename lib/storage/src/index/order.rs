//! Functions for moving quads and patterns between the subject, predicate, object, graph order
//! and the native order of an index.

use crate::index::IndexComponents;
use quadstore_model::{is_wildcard, TermPattern};

/// Reorders `quad` (subject, predicate, object, graph) into the order of `components`.
pub fn order_quad_components<T: Clone>(components: IndexComponents, quad: &[T; 4]) -> [T; 4] {
    components
        .inner()
        .map(|component| quad[component.quad_index()].clone())
}

/// Reverts [order_quad_components], i.e., turns a quad in the order of `components` back into
/// subject, predicate, object, graph order.
pub fn restore_quad_components<T: Clone>(components: IndexComponents, quad: &[T; 4]) -> [T; 4] {
    let inner = components.inner();
    std::array::from_fn(|quad_index| {
        let position = inner
            .iter()
            .position(|component| component.quad_index() == quad_index)
            .unwrap_or(quad_index);
        quad[position].clone()
    })
}

/// Computes how well an index with the given `components` serves a pattern with the `bound`
/// positions (subject, predicate, object, graph order).
///
/// Each bound component contributes `4 - i`, where `i` is its position in the index. Indexes that
/// start with the bound components score higher.
pub fn index_score(components: IndexComponents, bound: [bool; 4]) -> usize {
    components
        .inner()
        .iter()
        .enumerate()
        .filter(|(_, component)| bound[component.quad_index()])
        .map(|(i, _)| 4 - i)
        .sum()
}

/// Returns the position of the index in `candidates` that best serves `pattern` (subject,
/// predicate, object, graph order).
///
/// Ties are resolved in favor of the earlier candidate. Returns [None] if there are no candidates.
pub fn best_index(candidates: &[IndexComponents], pattern: &TermPattern<'_>) -> Option<usize> {
    best_index_for_bound(candidates, pattern.map(|term| !is_wildcard(term)))
}

/// Same as [best_index], but only considers which positions are bound.
pub fn best_index_for_bound(candidates: &[IndexComponents], bound: [bool; 4]) -> Option<usize> {
    if candidates.len() <= 1 || bound.iter().all(|bound| *bound) {
        return (!candidates.is_empty()).then_some(0);
    }

    candidates
        .iter()
        .enumerate()
        .rev() // Prefer the first candidate (max_by_key uses the last on equality)
        .max_by_key(|(_, components)| index_score(**components, bound))
        .map(|(i, _)| i)
}
