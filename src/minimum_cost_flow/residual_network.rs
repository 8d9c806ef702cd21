use crate::minimum_cost_flow::error::FlowError;
use num_traits::NumAssign;
use std::fmt::Debug;
use std::ops::Neg;

/// Position of an arc inside the adjacency list of its tail node.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct ArcId {
    pub node: usize,
    pub index: usize,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ResidualArc<Flow> {
    pub to: usize,
    // index of the paired arc in `to`'s adjacency list
    pub rev: usize,
    pub residual_capacity: Flow,
    pub cost: Flow,
    // capacity as inserted; zero for reverse arcs
    pub capacity: Flow,
    pub is_reverse: bool,
}

impl<Flow> ResidualArc<Flow>
where
    Flow: NumAssign + Copy,
{
    /// Flow currently routed through a forward arc. Always zero for reverse arcs.
    pub fn flow(&self) -> Flow {
        if self.is_reverse {
            Flow::zero()
        } else {
            self.capacity - self.residual_capacity
        }
    }
}

/// Directed multigraph where every inserted arc is paired with a reverse arc of
/// zero capacity and negated cost.
///
/// The network is append-only; after construction only the residual capacities
/// change, and only through a solver.
#[derive(Debug, Clone)]
pub struct ResidualNetwork<Flow> {
    num_arcs: usize,
    pub(crate) adjacency: Vec<Vec<ResidualArc<Flow>>>,
}

impl<Flow> ResidualNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
{
    pub fn new(num_nodes: usize) -> Result<Self, FlowError> {
        if num_nodes == 0 {
            return Err(FlowError::NoNodes);
        }
        Ok(ResidualNetwork { num_arcs: 0, adjacency: (0..num_nodes).map(|_| Vec::new()).collect() })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of forward arcs added so far.
    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    /// Adds `from -> to` with the given capacity and per-unit cost, together with
    /// its reverse arc. Parallel arcs are kept apart.
    ///
    /// Costs are expected to be non-negative; the solver relies on it and does not
    /// check.
    pub fn add_arc(&mut self, from: usize, to: usize, capacity: Flow, cost: Flow) -> Result<ArcId, FlowError> {
        let num_nodes = self.num_nodes();
        for node in [from, to] {
            if node >= num_nodes {
                return Err(FlowError::NodeOutOfRange { node, num_nodes });
            }
        }
        if capacity < Flow::zero() {
            return Err(FlowError::NegativeCapacity { from, to });
        }

        let index = self.adjacency[from].len();
        // a self-loop puts both arcs into the same list
        let rev_index = if from == to { index + 1 } else { self.adjacency[to].len() };

        self.adjacency[from].push(ResidualArc { to, rev: rev_index, residual_capacity: capacity, cost, capacity, is_reverse: false });
        self.adjacency[to].push(ResidualArc {
            to: from,
            rev: index,
            residual_capacity: Flow::zero(),
            cost: -cost,
            capacity: Flow::zero(),
            is_reverse: true,
        });

        self.num_arcs += 1;
        Ok(ArcId { node: from, index })
    }

    /// Arcs leaving `u` in insertion order, reverse arcs included.
    ///
    /// # Panics
    ///
    /// If `u` is not a node of the network.
    #[inline]
    pub fn arcs_from(&self, u: usize) -> std::slice::Iter<'_, ResidualArc<Flow>> {
        self.adjacency[u].iter()
    }

    pub fn arc(&self, id: ArcId) -> Option<&ResidualArc<Flow>> {
        self.adjacency.get(id.node)?.get(id.index)
    }

    pub fn flow(&self, id: ArcId) -> Option<Flow> {
        self.arc(id).map(|arc| arc.flow())
    }

    /// Paired arc of the arc at `u`'s `index`-th position.
    ///
    /// # Panics
    ///
    /// If `u` is not a node or `index` is past the end of its list.
    #[inline]
    pub fn reverse_of(&self, u: usize, index: usize) -> &ResidualArc<Flow> {
        let arc = &self.adjacency[u][index];
        &self.adjacency[arc.to][arc.rev]
    }

    /// Moves `amount` units of residual capacity from the arc to its pair.
    #[inline]
    pub(crate) fn push_flow(&mut self, u: usize, index: usize, amount: Flow) {
        let (to, rev) = {
            let arc = &mut self.adjacency[u][index];
            debug_assert!(arc.residual_capacity >= amount);
            arc.residual_capacity -= amount;
            (arc.to, arc.rev)
        };
        self.adjacency[to][rev].residual_capacity += amount;
    }

    /// Cost of the flow currently held by the network.
    pub fn total_cost(&self) -> Flow {
        self.adjacency
            .iter()
            .flatten()
            .filter(|arc| !arc.is_reverse)
            .fold(Flow::zero(), |cost, arc| cost + arc.flow() * arc.cost)
    }

    /// Net flow leaving `u`: outgoing forward flow minus incoming forward flow.
    pub fn net_outflow(&self, u: usize) -> Flow {
        self.arcs_from(u).fold(Flow::zero(), |sum, arc| {
            if arc.is_reverse {
                // pair of an arc entering u
                sum - self.adjacency[arc.to][arc.rev].flow()
            } else {
                sum + arc.flow()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_arguments() {
        assert_eq!(ResidualNetwork::<i64>::new(0).unwrap_err(), FlowError::NoNodes);

        let mut network = ResidualNetwork::<i64>::new(2).unwrap();
        assert_eq!(network.add_arc(0, 2, 1, 0), Err(FlowError::NodeOutOfRange { node: 2, num_nodes: 2 }));
        assert_eq!(network.add_arc(3, 1, 1, 0), Err(FlowError::NodeOutOfRange { node: 3, num_nodes: 2 }));
        assert_eq!(network.add_arc(0, 1, -1, 0), Err(FlowError::NegativeCapacity { from: 0, to: 1 }));
        assert_eq!(network.num_arcs(), 0);
    }

    #[test]
    fn reverse_arcs_point_back() {
        let mut network = ResidualNetwork::<i64>::new(3).unwrap();
        let a = network.add_arc(0, 1, 4, 3).unwrap();
        let b = network.add_arc(0, 1, 2, 1).unwrap();
        let c = network.add_arc(1, 2, 5, 2).unwrap();

        assert_eq!(a, ArcId { node: 0, index: 0 });
        assert_eq!(b, ArcId { node: 0, index: 1 });
        assert_eq!(c, ArcId { node: 1, index: 2 });
        assert_eq!(network.num_arcs(), 3);

        for u in 0..network.num_nodes() {
            for (i, arc) in network.arcs_from(u).enumerate() {
                let rev = network.reverse_of(u, i);
                assert_eq!(rev.to, u);
                assert_eq!(rev.cost, -arc.cost);
                assert_ne!(rev.is_reverse, arc.is_reverse);
            }
        }

        let rev = network.reverse_of(0, 1);
        assert_eq!(rev.residual_capacity, 0);
        assert_eq!(rev.capacity, 0);
    }

    #[test]
    #[should_panic]
    fn arcs_from_unknown_node_panics() {
        let network = ResidualNetwork::<i64>::new(2).unwrap();
        let _ = network.arcs_from(2);
    }

    #[test]
    #[should_panic]
    fn reverse_of_unknown_arc_panics() {
        let mut network = ResidualNetwork::<i64>::new(2).unwrap();
        network.add_arc(0, 1, 1, 0).unwrap();
        network.reverse_of(0, 1);
    }

    #[test]
    fn self_loop_pairs_within_one_list() {
        let mut network = ResidualNetwork::<i64>::new(1).unwrap();
        network.add_arc(0, 0, 3, 2).unwrap();

        let arcs: Vec<_> = network.arcs_from(0).collect();
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0].rev, 1);
        assert_eq!(arcs[1].rev, 0);
    }

    #[test]
    fn push_flow_keeps_pair_capacity() {
        let mut network = ResidualNetwork::<i64>::new(2).unwrap();
        let id = network.add_arc(0, 1, 5, 7).unwrap();

        network.push_flow(0, 0, 3);
        assert_eq!(network.flow(id), Some(3));
        assert_eq!(network.reverse_of(0, 0).residual_capacity, 3);
        assert_eq!(network.total_cost(), 21);
        assert_eq!(network.net_outflow(0), 3);
        assert_eq!(network.net_outflow(1), -3);

        // cancel through the reverse arc
        network.push_flow(1, 0, 1);
        assert_eq!(network.flow(id), Some(2));
        let arc = network.arc(id).unwrap();
        assert_eq!(arc.residual_capacity + network.reverse_of(0, 0).residual_capacity, arc.capacity);
    }
}
