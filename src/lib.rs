pub mod assignment;
pub mod minimum_cost_flow;
