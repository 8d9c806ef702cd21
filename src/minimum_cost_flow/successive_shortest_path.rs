use crate::minimum_cost_flow::residual_network::ResidualNetwork;
use log::{debug, trace};
use num_traits::NumAssign;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::ops::Neg;

/// Min-cost flow by successive shortest augmenting paths.
///
/// Each round runs Dijkstra from the source over reduced costs
/// `cost(u, v) + potential[u] - potential[v]`, raises the potentials by the
/// distances found, and pushes the bottleneck amount along the path to the sink.
/// Since every augmentation follows a cheapest residual path, the accumulated
/// cost is minimal for every intermediate flow value.
///
/// All forward arc costs of the network must be non-negative, so that zero
/// potentials are a valid starting point. This is not checked.
pub struct SuccessiveShortestPath<Flow> {
    potentials: Vec<Flow>,
    dist: Vec<Option<Flow>>,
    // (tail node, arc index in the tail's list) of the arc reaching each node
    prev: Vec<Option<(usize, usize)>>,
}

// no `Flow: Default` bound, unlike a derive
impl<Flow> Default for SuccessiveShortestPath<Flow> {
    fn default() -> Self {
        SuccessiveShortestPath { potentials: Vec::new(), dist: Vec::new(), prev: Vec::new() }
    }
}

impl<Flow> SuccessiveShortestPath<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
{
    /// Sends as much flow as possible from `source` to `sink`, at most `flow_limit`
    /// (`None` means unbounded), and returns `(flow, cost)`.
    ///
    /// The residual capacities of `network` are left describing the flow found.
    /// Reaching less than `flow_limit` is not an error; compare the returned flow
    /// against the target to decide feasibility.
    pub fn solve(&mut self, network: &mut ResidualNetwork<Flow>, source: usize, sink: usize, flow_limit: Option<Flow>) -> (Flow, Flow) {
        let num_nodes = network.num_nodes();
        assert!(source < num_nodes && sink < num_nodes, "source {source} or sink {sink} out of range for {num_nodes} nodes");
        assert_ne!(source, sink, "source and sink must differ");

        self.potentials.clear();
        self.potentials.resize(num_nodes, Flow::zero());
        self.dist.clear();
        self.dist.resize(num_nodes, None);
        self.prev.clear();
        self.prev.resize(num_nodes, None);
        let mut bh = BinaryHeap::new();

        let mut flow = Flow::zero();
        let mut cost = Flow::zero();
        let mut augmentations = 0usize;
        while flow_limit.map_or(true, |limit| flow < limit) {
            if !self.calculate_distance(network, source, sink, &mut bh) {
                break;
            }

            // update potentials
            for (potential, dist) in self.potentials.iter_mut().zip(self.dist.iter()) {
                if let Some(d) = *dist {
                    *potential += d;
                }
            }

            let delta = self.bottleneck(network, source, sink, flow_limit.map(|limit| limit - flow));
            let path_cost = self.update_flow(network, source, sink, delta);
            flow += delta;
            cost += path_cost;
            augmentations += 1;
            trace!("augmentation {}: pushed {:?} at unit cost {:?}", augmentations, delta, self.potentials[sink] - self.potentials[source]);
        }

        debug!("min cost flow {} -> {}: flow {:?}, cost {:?} after {} augmentations", source, sink, flow, cost, augmentations);
        (flow, cost)
    }

    // Dijkstra over reduced costs; returns whether the sink was reached.
    fn calculate_distance(&mut self, network: &ResidualNetwork<Flow>, source: usize, sink: usize, bh: &mut BinaryHeap<(Reverse<Flow>, usize)>) -> bool {
        self.dist.fill(None);
        self.prev.fill(None);
        bh.clear();

        bh.push((Reverse(Flow::zero()), source));
        self.dist[source] = Some(Flow::zero());

        while let Some((Reverse(d), u)) = bh.pop() {
            // stale entry
            if self.dist[u] != Some(d) {
                continue;
            }

            for (arc_index, arc) in network.arcs_from(u).enumerate() {
                if arc.residual_capacity == Flow::zero() {
                    continue;
                }

                let reduced_cost = arc.cost + self.potentials[u] - self.potentials[arc.to];
                debug_assert!(reduced_cost >= Flow::zero(), "negative reduced cost on {} -> {}", u, arc.to);

                let new_dist = d + reduced_cost;
                if self.dist[arc.to].map_or(true, |current| new_dist < current) {
                    self.dist[arc.to] = Some(new_dist);
                    self.prev[arc.to] = Some((u, arc_index));
                    bh.push((Reverse(new_dist), arc.to));
                }
            }
        }

        self.dist[sink].is_some()
    }

    fn bottleneck(&self, network: &ResidualNetwork<Flow>, source: usize, sink: usize, room: Option<Flow>) -> Flow {
        let mut delta: Option<Flow> = room;
        let mut v = sink;
        while let Some((u, arc_index)) = self.prev[v] {
            let residual_capacity = network.adjacency[u][arc_index].residual_capacity;
            delta = Some(delta.map_or(residual_capacity, |d| d.min(residual_capacity)));
            v = u;
        }
        debug_assert_eq!(v, source);

        let delta = delta.unwrap_or_else(Flow::zero);
        debug_assert!(delta > Flow::zero());
        delta
    }

    // pushes `delta` along the recorded path and returns its true cost
    fn update_flow(&self, network: &mut ResidualNetwork<Flow>, source: usize, sink: usize, delta: Flow) -> Flow {
        let mut path_cost = Flow::zero();
        let mut v = sink;
        while let Some((u, arc_index)) = self.prev[v] {
            path_cost += delta * network.adjacency[u][arc_index].cost;
            network.push_flow(u, arc_index, delta);
            v = u;
        }
        debug_assert_eq!(v, source);
        path_cost
    }
}
