use assignment_flow::assignment::{AssignmentError, AssignmentNetwork, AssignmentProblem};
use assignment_flow::minimum_cost_flow::SuccessiveShortestPath;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

// every paper needs three reviews; every reviewer may be paired with every paper
fn random_instance(num_papers: usize, num_reviewers: usize) -> Result<AssignmentProblem<i64>, AssignmentError<i64>> {
    let mut problem = AssignmentProblem::new(num_papers, num_reviewers);
    let capacity = (num_papers * 3 / num_reviewers + 2) as i64;
    let mut rng = StdRng::seed_from_u64(42);

    for p in 0..num_papers {
        problem.set_demand(p, 3)?;
    }
    for r in 0..num_reviewers {
        problem.set_capacity(r, capacity)?;
    }
    for p in 0..num_papers {
        for r in 0..num_reviewers {
            problem.add_pairing(p, r, rng.gen_range(1..=10))?;
        }
    }
    Ok(problem)
}

fn main() -> Result<(), AssignmentError<i64>> {
    env_logger::init();

    let sizes = [(10, 6), (20, 10), (50, 20), (100, 30), (150, 40), (200, 60), (300, 80)];

    println!("papers,reviewers,runtime_ms,feasible");
    for (num_papers, num_reviewers) in sizes {
        let problem = random_instance(num_papers, num_reviewers)?;

        let required = problem.total_demand();
        let AssignmentNetwork { mut network, source, sink, .. } = problem.build_network()?;

        // only the flow computation is timed
        let start = Instant::now();
        let (flow, _cost) = SuccessiveShortestPath::default().solve(&mut network, source, sink, Some(required));
        let elapsed = start.elapsed();
        let feasible = flow == required;

        println!("{},{},{:.3},{}", num_papers, num_reviewers, elapsed.as_secs_f64() * 1000.0, feasible as u8);
    }

    Ok(())
}
