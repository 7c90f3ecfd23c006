//! End-to-end smoke test: seed, run the MOVNS driver for a short budget,
//! and check the archive satisfies the core invariants of §8.

mod fixtures;

use movns_planner::driver::{run, DriverConfig};
use movns_planner::evaluator::evaluate;

#[test]
fn driver_run_yields_a_valid_archive() {
    let catalog = fixtures::las_vegas_catalog::build();
    let config = DriverConfig {
        initial_solutions: 10,
        archive_max: 15,
        max_time_seconds: 3.0,
        idle_limit: 8,
        seed: Some(20260728),
        ..DriverConfig::default()
    };

    let output = run(&catalog, &config).expect("driver should produce an archive on a well-formed catalog");

    assert!(!output.archive.is_empty());
    assert!(output.archive.len() <= config.archive_max);
    assert!(output.archive.is_mutually_nondominated());

    for solution in output.archive.members() {
        let (recomputed, _) = evaluate(solution, &catalog).expect("archive members must stay feasible");
        assert_eq!(recomputed, solution.objectives, "memoized F must match recomputation");
    }

    assert!(!output.execution_log.is_empty());
    for row in &output.execution_log {
        assert!(row.hv >= 0.0);
        assert!(row.archive_size <= config.archive_max);
    }
}

#[test]
fn initial_population_is_exactly_the_configured_count() {
    let catalog = fixtures::las_vegas_catalog::build();
    let config = DriverConfig { initial_solutions: 12, max_time_seconds: 0.5, idle_limit: 1, seed: Some(5), ..DriverConfig::default() };
    let output = run(&catalog, &config).unwrap();
    assert_eq!(output.initial_population.len(), 12);
}
