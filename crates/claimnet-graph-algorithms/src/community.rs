//! Community detection algorithms
//!
//! Connected components (union-find) and overlapping k-clique percolation communities.

use super::common::{GraphView, NodeId};
use super::topology::maximal_cliques;
use std::collections::HashMap;

/// Result of the connected components algorithm
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComponentResult {
    /// Components ordered by their smallest member index; members in index order
    pub components: Vec<Vec<NodeId>>,
    /// Map of NodeId -> position in `components`
    pub node_component: HashMap<NodeId, usize>,
}

/// Result of k-clique community detection
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CliqueCommunityResult {
    /// Clique size used for percolation
    pub k: usize,
    /// Communities in discovery order; members in index order
    pub communities: Vec<Vec<NodeId>>,
    /// Map of NodeId -> communities it belongs to (ascending)
    pub node_communities: HashMap<NodeId, Vec<usize>>,
}

/// Union-Find data structure
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub(crate) fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    pub(crate) fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }

    /// Group `0..size` by root, ordered by each group's smallest element
    pub(crate) fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for i in 0..n {
            let root = self.find(i);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(i);
        }

        groups
    }
}

/// Connected components as dense index groups
pub(crate) fn component_indices(view: &GraphView) -> Vec<Vec<usize>> {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.neighbors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    uf.groups()
}

/// Connected Components
///
/// Finds all disjoint subgraphs of the (undirected) graph.
pub fn connected_components(view: &GraphView) -> ComponentResult {
    let mut components = Vec::new();
    let mut node_component = HashMap::new();

    for (slot, group) in component_indices(view).into_iter().enumerate() {
        let members: Vec<NodeId> = group.iter().map(|&i| view.index_to_node[i]).collect();
        for &id in &members {
            node_component.insert(id, slot);
        }
        components.push(members);
    }

    ComponentResult {
        components,
        node_component,
    }
}

/// k-clique percolation communities
///
/// Two maximal cliques of size >= k are adjacent when they share at least
/// k - 1 nodes; each connected group of adjacent cliques forms one community
/// whose members are the union of its cliques. A node may belong to many
/// communities, or to none. Communities are numbered by the first clique
/// (in lexicographic clique order) that belongs to them. For `k < 2` no
/// communities are produced.
pub fn k_clique_communities(view: &GraphView, k: usize) -> CliqueCommunityResult {
    let mut result = CliqueCommunityResult {
        k,
        communities: Vec::new(),
        node_communities: HashMap::new(),
    };
    if k < 2 {
        return result;
    }

    let cliques: Vec<Vec<usize>> = maximal_cliques(view)
        .into_iter()
        .filter(|c| c.len() >= k)
        .collect();

    // node index -> cliques containing it
    let mut membership: HashMap<usize, Vec<usize>> = HashMap::new();
    for (ci, clique) in cliques.iter().enumerate() {
        for &node in clique {
            membership.entry(node).or_default().push(ci);
        }
    }

    let mut uf = UnionFind::new(cliques.len());
    for (ci, clique) in cliques.iter().enumerate() {
        for &node in clique {
            for &cj in &membership[&node] {
                if cj <= ci {
                    continue;
                }
                let shared = clique.iter().filter(|&&n| cliques[cj].binary_search(&n).is_ok()).count();
                if shared >= k - 1 {
                    uf.union(ci, cj);
                }
            }
        }
    }

    for (community_id, group) in uf.groups().into_iter().enumerate() {
        let mut members: Vec<usize> = group.iter().flat_map(|&ci| cliques[ci].iter().copied()).collect();
        members.sort_unstable();
        members.dedup();

        let ids: Vec<NodeId> = members.iter().map(|&i| view.index_to_node[i]).collect();
        for &id in &ids {
            result.node_communities.entry(id).or_default().push(community_id);
        }
        result.communities.push(ids);
    }

    result
}
