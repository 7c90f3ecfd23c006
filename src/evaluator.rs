//! Pure evaluation of a [`Solution`] against the catalog: schedule
//! computation, feasibility, and the memoized objective vector.
//!
//! No side effects, no mutation of its inputs - a solution is either fully
//! re-evaluated or rejected with the first encountered [`EvalError`] kind.

use std::collections::HashSet;

use crate::catalog::{Place, ProblemData};
use crate::error::EvalError;
use crate::model::{DayRoute, Objectives, Solution};

const DAY_START_MINUTE: u32 = 480; // 08:00
const DAY_END_MINUTE: u32 = 1200; // 20:00

/// Per-day schedule produced while evaluating a route: arrival time at
/// each POI and the duration/cost of the leg that reached it.
#[derive(Debug, Clone, Default)]
pub struct DaySchedule {
    pub arrivals: Vec<u32>,
    pub leg_minutes: Vec<u32>,
    pub leg_costs: Vec<f64>,
    pub travel_minutes_total: u32,
    pub visit_minutes_total: u32,
    pub travel_cost_total: f64,
}

/// Evaluates a solution: computes both days' schedules, checks every
/// invariant from §3/§4.1 of SPEC_FULL.md, and returns the objective
/// vector plus per-day schedules on success.
pub fn evaluate(solution: &Solution, catalog: &ProblemData) -> Result<(Objectives, [DaySchedule; 2]), EvalError> {
    check_no_duplicate_attractions(solution)?;

    let schedule1 = evaluate_day(&solution.days[0], catalog)?;
    let schedule2 = evaluate_day(&solution.days[1], catalog)?;

    let f1 = (solution.days[0].pois.len() + solution.days[1].pois.len()) as u32;
    let f2: f64 = solution
        .visited_attractions()
        .map(|id| catalog.attraction(id).rating)
        .sum();
    let f3 = schedule1.travel_minutes_total
        + schedule1.visit_minutes_total
        + schedule2.travel_minutes_total
        + schedule2.visit_minutes_total;
    let entrance_cost: f64 = solution
        .visited_attractions()
        .map(|id| catalog.attraction(id).entrance_cost)
        .sum();
    let f4 = entrance_cost + schedule1.travel_cost_total + schedule2.travel_cost_total;

    Ok((Objectives { f1, f2, f3, f4 }, [schedule1, schedule2]))
}

fn check_no_duplicate_attractions(solution: &Solution) -> Result<(), EvalError> {
    let mut seen = HashSet::new();
    for id in solution.visited_attractions() {
        if !seen.insert(id) {
            return Err(EvalError::DuplicatePoi);
        }
    }
    Ok(())
}

/// Walks one day's route, advancing a clock from 08:00, waiting at doors
/// that open late, and failing on the first opening-hours or day-window
/// violation (§4.1 of SPEC_FULL.md).
fn evaluate_day(route: &DayRoute, catalog: &ProblemData) -> Result<DaySchedule, EvalError> {
    let mut schedule = DaySchedule {
        arrivals: Vec::with_capacity(route.pois.len()),
        leg_minutes: Vec::with_capacity(route.modes.len()),
        leg_costs: Vec::with_capacity(route.modes.len()),
        travel_minutes_total: 0,
        visit_minutes_total: 0,
        travel_cost_total: 0.0,
    };

    if route.pois.is_empty() {
        return Ok(schedule);
    }

    let mut clock = DAY_START_MINUTE;
    let places = route.places();

    for (leg_idx, window) in places.windows(2).enumerate() {
        let (from, to) = (window[0], window[1]);
        let mode = route.modes[leg_idx];
        let (minutes, cost) = catalog
            .leg_lookup(from, to, mode)
            .ok_or(EvalError::InvalidMode)?;

        clock += minutes;
        schedule.travel_minutes_total += minutes;
        schedule.travel_cost_total += cost;
        schedule.leg_minutes.push(minutes);
        schedule.leg_costs.push(cost);

        if let Place::Attraction(attraction_id) = to {
            let attraction = catalog.attraction(attraction_id);
            if clock < attraction.open as u32 {
                // Waiting at a door that opens late counts as travel time
                // per the day-window invariant (§3): it occupies the
                // traveler's day just as a longer leg would.
                let wait = attraction.open as u32 - clock;
                schedule.travel_minutes_total += wait;
                clock = attraction.open as u32;
            }
            if clock + attraction.visit_minutes > attraction.close as u32 {
                return Err(EvalError::InfeasibleOpening);
            }
            schedule.arrivals.push(clock);
            schedule.visit_minutes_total += attraction.visit_minutes;
            clock += attraction.visit_minutes;
        }
    }

    if clock > DAY_END_MINUTE {
        return Err(EvalError::InfeasibleTime);
    }

    Ok(schedule)
}
