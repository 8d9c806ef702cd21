use thiserror::Error;

/// Invalid arguments rejected while building a [`ResidualNetwork`](super::ResidualNetwork).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FlowError {
    #[error("a network needs at least one node")]
    NoNodes,

    #[error("node {node} is out of range for a network of {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    #[error("arc {from} -> {to} has a negative capacity")]
    NegativeCapacity { from: usize, to: usize },
}
