//! cdpem-network: directed weighted graphs and their centrality.
//!
//! Provides:
//! - Directed weighted network with one edge per ordered pair
//! - Incremental builder that accumulates repeated pairs into edge weights
//! - Degree and betweenness centrality
//!
//! # Example
//!
//! ```
//! use cdpem_network::{NetworkBuilder, compute_centrality};
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add_pair("Farm", "Processor");
//! builder.add_pair("Processor", "Retail");
//! builder.add_pair("Processor", "Retail");
//! let network = builder.build();
//!
//! assert_eq!(network.node_count(), 3);
//! assert_eq!(network.edge_count(), 2);
//! assert_eq!(network.edge_weight("Processor", "Retail"), Some(2.0));
//!
//! let centrality = compute_centrality(&network);
//! assert!(centrality.betweenness["Processor"] > centrality.betweenness["Farm"]);
//! ```

pub mod builder;
pub mod centrality;
pub mod graph;

// Re-exports for ergonomics
pub use builder::{NetworkBuilder, build_network, synthetic_supply_chain};
pub use centrality::{Centrality, compute_centrality};
pub use graph::{EdgeView, Network};
