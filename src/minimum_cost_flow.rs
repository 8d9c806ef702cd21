pub mod error;
pub mod residual_network;
pub mod successive_shortest_path;

pub use error::FlowError;
pub use residual_network::{ArcId, ResidualArc, ResidualNetwork};
pub use successive_shortest_path::SuccessiveShortestPath;
