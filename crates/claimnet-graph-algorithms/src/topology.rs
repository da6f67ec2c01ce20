//! Graph topology analysis algorithms
//!
//! Maximal clique enumeration (Bron–Kerbosch with pivoting) and triangle counting.

use super::common::GraphView;
use std::collections::HashSet;

/// Enumerate all maximal cliques of the graph.
///
/// Each clique is a list of dense node indices in ascending order; the
/// returned list is sorted lexicographically, so the output is a pure
/// function of the view. Isolated nodes are reported as cliques of size 1.
pub fn maximal_cliques(view: &GraphView) -> Vec<Vec<usize>> {
    if view.node_count == 0 {
        return Vec::new();
    }

    let adjacency: Vec<HashSet<usize>> = (0..view.node_count)
        .map(|i| view.neighbors(i).iter().copied().filter(|&n| n != i).collect())
        .collect();

    let mut cliques = Vec::new();
    let mut current = Vec::new();
    let candidates: Vec<usize> = (0..view.node_count).collect();

    expand(&adjacency, &mut current, candidates, Vec::new(), &mut cliques);

    cliques.sort();
    cliques
}

fn expand(
    adjacency: &[HashSet<usize>],
    current: &mut Vec<usize>,
    mut candidates: Vec<usize>,
    mut excluded: Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            let mut clique = current.clone();
            clique.sort_unstable();
            out.push(clique);
        }
        return;
    }

    // Pivot on the vertex covering the most candidates
    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|&&v| adjacency[u].contains(&v)).count())
        .unwrap_or(candidates[0]);

    let branch: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|v| !adjacency[pivot].contains(v))
        .collect();

    for v in branch {
        let next_candidates: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|u| adjacency[v].contains(u))
            .collect();
        let next_excluded: Vec<usize> = excluded
            .iter()
            .copied()
            .filter(|u| adjacency[v].contains(u))
            .collect();

        current.push(v);
        expand(adjacency, current, next_candidates, next_excluded, out);
        current.pop();

        candidates.retain(|&u| u != v);
        excluded.push(v);
    }
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph, each counted once.
pub fn count_triangles(view: &GraphView) -> usize {
    let mut triangle_count = 0;

    // For each edge (u, v) with u < v, count common neighbors w > v.
    for u in 0..view.node_count {
        let u_neighbors: HashSet<usize> = view.neighbors(u).iter().copied().collect();

        for &v in view.neighbors(u) {
            if v <= u {
                continue;
            }
            for &w in view.neighbors(v) {
                if w > v && u_neighbors.contains(&w) {
                    triangle_count += 1;
                }
            }
        }
    }

    triangle_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::unit_view;

    #[test]
    fn test_triangle_counting() {
        // Complete graph K4: (0,1,2), (0,1,3), (0,2,3), (1,2,3) -> 4 triangles.
        let view = unit_view(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(count_triangles(&view), 4);
    }

    #[test]
    fn test_maximal_cliques_two_triangles_sharing_edge() {
        // 0-1-2 and 1-2-3 share edge (1,2); 4 is isolated
        let view = unit_view(5, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        let cliques = maximal_cliques(&view);

        assert_eq!(cliques, vec![vec![0, 1, 2], vec![1, 2, 3], vec![4]]);
    }

    #[test]
    fn test_maximal_cliques_complete_graph() {
        let view = unit_view(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(maximal_cliques(&view), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_maximal_cliques_path() {
        let view = unit_view(3, &[(0, 1), (1, 2)]);
        assert_eq!(maximal_cliques(&view), vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn test_maximal_cliques_empty_graph() {
        let view = unit_view(0, &[]);
        assert!(maximal_cliques(&view).is_empty());
    }
}
