//! MOVNS Driver: the outer loop that ties constructors, neighborhoods,
//! the archive, and the quality monitor together (§4.6 of SPEC_FULL.md).
//!
//! Follows the teacher's `SolveOptions`/`solve()` shape (see `solver.rs`):
//! a plain config struct with `Default`, validated up front, and a free
//! function that borrows its inputs rather than a long-lived `self`.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, trace};

use crate::archive::Archive;
use crate::catalog::{HotelId, ProblemData};
use crate::constructors::{seed_population, RANDOM_FEASIBLE_P};
use crate::error::{ConfigurationError, DriverError};
use crate::evaluator::evaluate;
use crate::model::{Objectives, Solution};
use crate::neighborhoods::Neighborhood;
use crate::quality::{MonitorReport, QualityMonitor, QualityMonitorConfig};
use crate::repair::repair;

/// Local search strategy used inside each outer-loop iteration (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSearchMode {
    /// Pareto Local Search / VND: restart at N1 on any non-dominated
    /// acceptance against a local archive.
    Pareto,
    /// Weighted descent: first-improvement minimization of a random
    /// convex combination of the (negated) objectives.
    Weighted,
}

/// Driver configuration (§6 of SPEC_FULL.md). All fields are validated by
/// [`DriverConfig::validate`] before [`run`] does any work.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub initial_solutions: usize,
    pub archive_max: usize,
    pub k_max: usize,
    pub max_time_seconds: f64,
    pub max_iterations: Option<u64>,
    pub idle_limit: u32,
    pub local_search_mode: LocalSearchMode,
    pub seed: Option<u64>,
    pub spread_threshold: f64,
    pub spread_window: u32,
    pub epsilon_threshold: f64,
    pub epsilon_windows: u32,
    pub snapshot_interval: u32,
    /// τ: minimum HV improvement to reset the idle-loop counter (§4.6
    /// pseudocode; default 0, any improvement resets it).
    pub tau: f64,
    /// Hotel the initial population is anchored at; N6 may later swap it.
    pub initial_hotel: HotelId,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            initial_solutions: 20,
            archive_max: 60,
            k_max: 5,
            max_time_seconds: 120.0,
            max_iterations: None,
            idle_limit: 30,
            local_search_mode: LocalSearchMode::Pareto,
            seed: None,
            spread_threshold: 0.35,
            spread_window: 50,
            epsilon_threshold: 0.05,
            epsilon_windows: 3,
            snapshot_interval: 10,
            tau: 0.0,
            initial_hotel: HotelId(0),
        }
    }
}

impl DriverConfig {
    /// Validates parameter ranges before [`run`] starts any work, raising
    /// [`ConfigurationError`] rather than panicking or silently clamping.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.initial_solutions == 0 {
            return Err(ConfigurationError::NotPositive { field: "initial_solutions", value: 0.0 });
        }
        if self.archive_max == 0 {
            return Err(ConfigurationError::NotPositive { field: "archive_max", value: 0.0 });
        }
        if self.k_max == 0 || self.k_max > Neighborhood::ORDER.len() {
            return Err(ConfigurationError::OutOfRange {
                field: "k_max",
                value: self.k_max as f64,
                min: 1.0,
                max: Neighborhood::ORDER.len() as f64,
            });
        }
        if self.max_time_seconds <= 0.0 {
            return Err(ConfigurationError::NotPositive { field: "max_time_seconds", value: self.max_time_seconds });
        }
        if self.idle_limit == 0 {
            return Err(ConfigurationError::NotPositive { field: "idle_limit", value: 0.0 });
        }
        if !(0.0..=1.0).contains(&self.spread_threshold) {
            return Err(ConfigurationError::OutOfRange {
                field: "spread_threshold",
                value: self.spread_threshold,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.spread_window == 0 {
            return Err(ConfigurationError::NotPositive { field: "spread_window", value: 0.0 });
        }
        if self.epsilon_threshold < 0.0 {
            return Err(ConfigurationError::NotPositive { field: "epsilon_threshold", value: self.epsilon_threshold });
        }
        if self.epsilon_windows == 0 {
            return Err(ConfigurationError::NotPositive { field: "epsilon_windows", value: 0.0 });
        }
        if self.snapshot_interval == 0 {
            return Err(ConfigurationError::NotPositive { field: "snapshot_interval", value: 0.0 });
        }
        Ok(())
    }

    fn quality_config(&self) -> QualityMonitorConfig {
        QualityMonitorConfig {
            snapshot_interval: self.snapshot_interval,
            spread_threshold: self.spread_threshold,
            spread_window: self.spread_window,
            epsilon_threshold: self.epsilon_threshold,
            epsilon_windows: self.epsilon_windows,
        }
    }
}

/// One row of the in-memory execution log (§6): iteration, HV, spread,
/// epsilon, a representative's objectives, current `k`, archive size.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExecutionLogRow {
    pub iteration: u64,
    pub hv: f64,
    pub spread: f64,
    pub epsilon: Option<f64>,
    pub representative: Objectives,
    pub k: usize,
    pub archive_size: usize,
}

/// Result of a full [`run`]: the final archive, its execution log, and the
/// initial-population dump (same output schema as the final archive, per
/// §6).
#[derive(Debug, Clone)]
pub struct DriverOutput {
    pub archive: Archive,
    pub execution_log: Vec<ExecutionLogRow>,
    pub initial_population: Vec<Solution>,
}

/// Why the outer loop stopped, for diagnostics / tests (§4.6 termination
/// precedence: time budget > idle-loop count > ε-convergence > iteration
/// cap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TimeBudget,
    IdleLimit,
    EpsilonConverged,
    IterationCap,
}

/// Runs the MOVNS outer loop to completion (§4.6 of SPEC_FULL.md).
///
/// Fatal errors (`ConfigurationError`, `DataError`-rooted `EmptyArchive`)
/// propagate to the caller; per-candidate infeasibility never does (§4.8).
#[instrument(skip(catalog), fields(initial_solutions = config.initial_solutions, archive_max = config.archive_max))]
pub fn run(catalog: &ProblemData, config: &DriverConfig) -> Result<DriverOutput, DriverError> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let initial_population = seed_population(config.initial_hotel, catalog, &mut rng, config.initial_solutions);
    let mut archive = Archive::new(config.archive_max);
    for seed in &initial_population {
        if !seed.is_empty() {
            archive.try_insert(seed.clone());
        }
    }
    if archive.is_empty() {
        return Err(DriverError::EmptyArchive);
    }
    info!(archive_size = archive.len(), "seeded initial archive");

    let mut monitor = QualityMonitor::new(config.quality_config());
    let start = Instant::now();
    let time_budget = Duration::from_secs_f64(config.max_time_seconds);

    let mut idle_loops: u32 = 0;
    let mut last_hv = monitor.tick(&archive).hv;
    let mut execution_log = Vec::new();
    let mut iteration: u64 = 0;
    let mut forced_neighborhood: Option<Neighborhood> = None;
    let mut stop_reason = StopReason::TimeBudget;

    'outer: loop {
        if start.elapsed() >= time_budget {
            stop_reason = StopReason::TimeBudget;
            break;
        }
        if idle_loops >= config.idle_limit {
            stop_reason = StopReason::IdleLimit;
            break;
        }
        if let Some(cap) = config.max_iterations {
            if iteration >= cap {
                stop_reason = StopReason::IterationCap;
                break;
            }
        }

        let Some(representative) = archive.round_robin_next().cloned() else {
            stop_reason = StopReason::IdleLimit;
            break;
        };

        let mut k = 1usize;
        let mut last_k_tried = 1usize;
        while k <= config.k_max {
            if start.elapsed() >= time_budget {
                stop_reason = StopReason::TimeBudget;
                break 'outer;
            }
            last_k_tried = k;
            let neighborhood = forced_neighborhood.take().unwrap_or(Neighborhood::ORDER[k - 1]);
            let shaken = shake(&representative, neighborhood, k, catalog, &mut rng);
            let searched = match config.local_search_mode {
                LocalSearchMode::Pareto => pareto_local_search(shaken, catalog),
                LocalSearchMode::Weighted => weighted_descent(shaken, catalog, &mut rng),
            };
            if archive.try_insert(searched) {
                k = 1;
            } else {
                k += 1;
            }
        }

        iteration += 1;
        let report = monitor.tick(&archive);
        trace!(iteration, hv = report.hv, spread = report.spread, "outer loop tick");

        if report.hv > last_hv + config.tau {
            idle_loops = 0;
            last_hv = report.hv;
        } else {
            idle_loops += 1;
        }

        execution_log.push(log_row(iteration, &report, &archive, last_k_tried));

        if report.spread_stuck {
            debug!(iteration, "spread-stuck: forcing next shake to N5");
            forced_neighborhood = Some(Neighborhood::TwoOptReversal);
        }
        if report.epsilon_converged {
            stop_reason = StopReason::EpsilonConverged;
            break;
        }
    }

    info!(?stop_reason, iterations = iteration, archive_size = archive.len(), "driver finished");
    Ok(DriverOutput { archive, execution_log, initial_population })
}

fn log_row(iteration: u64, report: &MonitorReport, archive: &Archive, k: usize) -> ExecutionLogRow {
    let representative =
        archive.members().iter().map(|m| m.objectives).max_by(|a, b| a.f2.partial_cmp(&b.f2).expect("f2 is never NaN"));
    ExecutionLogRow {
        iteration,
        hv: report.hv,
        spread: report.spread,
        epsilon: report.epsilon,
        representative: representative.unwrap_or(Objectives::ZERO),
        k,
        archive_size: archive.len(),
    }
}

/// Shake(R, Nk): applies `size` independent random moves drawn from
/// `neighborhood`, feeding each move's result into the next, then repairs
/// once at the end (§4.5 of SPEC_FULL.md).
fn shake<Rg: Rng + ?Sized>(
    solution: &Solution,
    neighborhood: Neighborhood,
    size: usize,
    catalog: &ProblemData,
    rng: &mut Rg,
) -> Solution {
    let mut current = solution.clone();
    for _ in 0..size {
        if let Some(moved) = neighborhood.sample_one(&current, catalog, rng) {
            current = moved;
        }
    }
    repair(&current, catalog)
}

/// Evaluates `solution`, returning a fully re-memoized, feasible
/// `Solution` or `None` if it can't be evaluated (already-infeasible
/// candidates are the caller's problem to repair first).
fn finalize(solution: Solution, catalog: &ProblemData) -> Option<Solution> {
    if solution.is_empty() {
        return None;
    }
    let (objectives, _) = evaluate(&solution, catalog).ok()?;
    Some(Solution::new(solution.days[0].clone(), solution.days[1].clone(), objectives, true))
}

/// Pareto Local Search (VND): sweeps N1..N7 in order, restarting at N1 on
/// any acceptance against a local archive, terminating when N7 yields
/// none (§4.5 of SPEC_FULL.md).
fn pareto_local_search(initial: Solution, catalog: &ProblemData) -> Solution {
    let Some(mut current) = finalize(initial.clone(), catalog) else { return initial };
    let mut local_archive = Archive::new(usize::MAX);
    local_archive.try_insert(current.clone());

    let mut idx = 0;
    while idx < Neighborhood::ORDER.len() {
        let neighborhood = Neighborhood::ORDER[idx];
        let mut accepted = false;
        for candidate in neighborhood.enumerate(&current, catalog) {
            let repaired = repair(&candidate, catalog);
            let Some(finalized) = finalize(repaired, catalog) else { continue };
            if local_archive.try_insert(finalized.clone()) {
                current = finalized;
                accepted = true;
            }
        }
        idx = if accepted { 0 } else { idx + 1 };
    }
    current
}

/// Negated-maximize weighted sum Σ λᵢ·fᵢ in the same min-space convention
/// as the hyper-volume module: lower is better on every axis.
fn weighted_sum(objectives: &Objectives, lambda: &[f64; 4]) -> f64 {
    lambda[0] * -(objectives.f1 as f64)
        + lambda[1] * -objectives.f2
        + lambda[2] * objectives.f3 as f64
        + lambda[3] * objectives.f4
}

/// Draws λ uniformly from the 4-dimensional simplex via normalized
/// Exponential(1) draws (the standard Dirichlet(1,1,1,1) construction).
fn sample_simplex_4<Rg: Rng + ?Sized>(rng: &mut Rg) -> [f64; 4] {
    let mut draws = [0.0; 4];
    for slot in draws.iter_mut() {
        let u: f64 = rng.random_range(f64::EPSILON..1.0);
        *slot = -u.ln();
    }
    let total: f64 = draws.iter().sum();
    draws.map(|d| d / total)
}

/// Weighted descent: draws λ once, then performs first-improvement
/// minimization of `weighted_sum` over N1..N7 in order, without
/// restarting on improvement (§4.5 of SPEC_FULL.md).
fn weighted_descent<Rg: Rng + ?Sized>(initial: Solution, catalog: &ProblemData, rng: &mut Rg) -> Solution {
    let Some(mut current) = finalize(initial.clone(), catalog) else { return initial };
    let lambda = sample_simplex_4(rng);
    let mut current_score = weighted_sum(&current.objectives, &lambda);

    for neighborhood in Neighborhood::ORDER {
        for candidate in neighborhood.enumerate(&current, catalog) {
            let repaired = repair(&candidate, catalog);
            let Some(finalized) = finalize(repaired, catalog) else { continue };
            let score = weighted_sum(&finalized.objectives, &lambda);
            if score < current_score {
                current = finalized;
                current_score = score;
                break;
            }
        }
    }
    current
}
