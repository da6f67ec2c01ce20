pub mod common;
pub mod centrality;
pub mod community;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use centrality::{
    betweenness_centrality, degree_centrality, eigenvector_centrality, EigenvectorConfig,
    EigenvectorResult,
};
pub use community::{
    connected_components, k_clique_communities, CliqueCommunityResult, ComponentResult,
};
pub use topology::{count_triangles, maximal_cliques};
