//! Many-to-many assignment (papers to reviewers, say) solved as a min-cost flow.
//!
//! Every demand entity `i` must be matched `quota[i]` times, every supply entity
//! `j` can take at most `capacity[j]` matches, and each allowed pairing carries a
//! non-negative cost and can be used once.
use crate::minimum_cost_flow::{FlowError, ResidualNetwork, SuccessiveShortestPath};
use log::debug;
use num_traits::NumAssign;
use std::fmt::Debug;
use std::ops::Neg;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AssignmentError<Flow: Debug> {
    #[error("demand index {0} is out of range")]
    DemandOutOfRange(usize),

    #[error("supply index {0} is out of range")]
    SupplyOutOfRange(usize),

    #[error("negative value {value:?} for {what}")]
    Negative { what: &'static str, value: Flow },

    #[error("only {achieved:?} of {required:?} demanded units can be assigned")]
    Infeasible { required: Flow, achieved: Flow },

    #[error(transparent)]
    Network(#[from] FlowError),
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Pairing<Flow> {
    pub demand: usize,
    pub supply: usize,
    pub cost: Flow,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Assignment<Flow> {
    pub total_cost: Flow,
    /// `(demand, supply)` for every pairing used, by demand and then insertion order.
    pub pairs: Vec<(usize, usize)>,
}

/// Flow network of an [`AssignmentProblem`] and where its node ranges start.
#[derive(Debug, Clone)]
pub struct AssignmentNetwork<Flow> {
    pub network: ResidualNetwork<Flow>,
    pub source: usize,
    pub sink: usize,
    pub demand_start: usize,
    pub supply_start: usize,
}

#[derive(Debug, Clone)]
pub struct AssignmentProblem<Flow> {
    quotas: Vec<Flow>,
    capacities: Vec<Flow>,
    pairings: Vec<Pairing<Flow>>,
}

impl<Flow> AssignmentProblem<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
{
    /// Problem with `num_demands` demand and `num_supplies` supply entities, all
    /// quotas and capacities zero and no pairings.
    pub fn new(num_demands: usize, num_supplies: usize) -> Self {
        AssignmentProblem { quotas: vec![Flow::zero(); num_demands], capacities: vec![Flow::zero(); num_supplies], pairings: Vec::new() }
    }

    #[inline]
    pub fn num_demands(&self) -> usize {
        self.quotas.len()
    }

    #[inline]
    pub fn num_supplies(&self) -> usize {
        self.capacities.len()
    }

    pub fn pairings(&self) -> &[Pairing<Flow>] {
        &self.pairings
    }

    pub fn total_demand(&self) -> Flow {
        self.quotas.iter().fold(Flow::zero(), |sum, &quota| sum + quota)
    }

    pub fn set_demand(&mut self, demand: usize, quota: Flow) -> Result<(), AssignmentError<Flow>> {
        if demand >= self.num_demands() {
            return Err(AssignmentError::DemandOutOfRange(demand));
        }
        if quota < Flow::zero() {
            return Err(AssignmentError::Negative { what: "quota", value: quota });
        }
        self.quotas[demand] = quota;
        Ok(())
    }

    pub fn set_capacity(&mut self, supply: usize, capacity: Flow) -> Result<(), AssignmentError<Flow>> {
        if supply >= self.num_supplies() {
            return Err(AssignmentError::SupplyOutOfRange(supply));
        }
        if capacity < Flow::zero() {
            return Err(AssignmentError::Negative { what: "capacity", value: capacity });
        }
        self.capacities[supply] = capacity;
        Ok(())
    }

    /// Allows `demand` to be matched with `supply` once at `cost`. Adding the same
    /// pair twice allows it twice.
    pub fn add_pairing(&mut self, demand: usize, supply: usize, cost: Flow) -> Result<(), AssignmentError<Flow>> {
        if demand >= self.num_demands() {
            return Err(AssignmentError::DemandOutOfRange(demand));
        }
        if supply >= self.num_supplies() {
            return Err(AssignmentError::SupplyOutOfRange(supply));
        }
        if cost < Flow::zero() {
            return Err(AssignmentError::Negative { what: "cost", value: cost });
        }
        self.pairings.push(Pairing { demand, supply, cost });
        Ok(())
    }

    /// Encodes the problem as a flow network: source `0`, demand nodes from
    /// `demand_start`, supply nodes from `supply_start`, sink last. Pairing arcs
    /// follow insertion order and all have capacity one.
    pub fn build_network(&self) -> Result<AssignmentNetwork<Flow>, AssignmentError<Flow>> {
        let (m, n) = (self.num_demands(), self.num_supplies());
        let source = 0;
        let demand_start = 1;
        let supply_start = demand_start + m;
        let sink = supply_start + n;

        let mut network = ResidualNetwork::new(sink + 1)?;
        for (i, &quota) in self.quotas.iter().enumerate() {
            network.add_arc(source, demand_start + i, quota, Flow::zero())?;
        }
        for pairing in self.pairings.iter() {
            network.add_arc(demand_start + pairing.demand, supply_start + pairing.supply, Flow::one(), pairing.cost)?;
        }
        for (j, &capacity) in self.capacities.iter().enumerate() {
            network.add_arc(supply_start + j, sink, capacity, Flow::zero())?;
        }

        Ok(AssignmentNetwork { network, source, sink, demand_start, supply_start })
    }

    /// Finds a cheapest assignment meeting every quota.
    pub fn solve(&self) -> Result<Assignment<Flow>, AssignmentError<Flow>> {
        let AssignmentNetwork { mut network, source, sink, demand_start, supply_start } = self.build_network()?;
        let m = self.num_demands();

        let required = self.total_demand();
        let (achieved, total_cost) = SuccessiveShortestPath::default().solve(&mut network, source, sink, Some(required));
        if achieved != required {
            debug!("assignment infeasible: {:?} of {:?} units", achieved, required);
            return Err(AssignmentError::Infeasible { required, achieved });
        }

        // pairing arcs are unit capacity, so a saturated one carries exactly one match
        let supply_range = supply_start..sink;
        let mut pairs = Vec::new();
        for i in 0..m {
            for arc in network.arcs_from(demand_start + i) {
                if !arc.is_reverse && supply_range.contains(&arc.to) && arc.capacity == Flow::one() && arc.residual_capacity == Flow::zero() {
                    pairs.push((i, arc.to - supply_start));
                }
            }
        }

        debug!("assigned {} pairs at total cost {:?}", pairs.len(), total_cost);
        Ok(Assignment { total_cost, pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_input() {
        let mut problem = AssignmentProblem::<i64>::new(2, 1);
        assert_eq!(problem.set_demand(2, 1), Err(AssignmentError::DemandOutOfRange(2)));
        assert_eq!(problem.set_capacity(1, 1), Err(AssignmentError::SupplyOutOfRange(1)));
        assert_eq!(problem.set_demand(0, -1), Err(AssignmentError::Negative { what: "quota", value: -1 }));
        assert_eq!(problem.add_pairing(0, 0, -3), Err(AssignmentError::Negative { what: "cost", value: -3 }));
        assert_eq!(problem.add_pairing(0, 5, 3), Err(AssignmentError::SupplyOutOfRange(5)));
        assert!(problem.pairings().is_empty());
    }

    #[test]
    fn network_layout() {
        let mut problem = AssignmentProblem::<i64>::new(2, 3);
        problem.set_demand(0, 2).unwrap();
        problem.set_capacity(2, 4).unwrap();
        problem.add_pairing(1, 2, 6).unwrap();

        let layout = problem.build_network().unwrap();
        assert_eq!((layout.source, layout.demand_start, layout.supply_start, layout.sink), (0, 1, 3, 6));
        assert_eq!(layout.network.num_nodes(), 7);
        assert_eq!(layout.network.num_arcs(), 2 + 1 + 3);

        let pairing = layout.network.arcs_from(2).find(|arc| !arc.is_reverse).unwrap();
        assert_eq!((pairing.to, pairing.capacity, pairing.cost), (5, 1, 6));
    }

    #[test]
    fn empty_problem_is_trivially_feasible() {
        let problem = AssignmentProblem::<i64>::new(0, 0);
        assert_eq!(problem.solve(), Ok(Assignment { total_cost: 0, pairs: vec![] }));
    }
}
