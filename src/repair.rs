//! Feasibility repair: dedup, then greedy truncation, then re-evaluation.
//!
//! Never reorders and never changes a mode - only drops attractions
//! (§4.2 of SPEC_FULL.md).

use std::collections::HashSet;

use crate::catalog::ProblemData;
use crate::evaluator::evaluate;
use crate::model::{DayRoute, Objectives, Solution};

/// Repairs `solution` in place until both day-window and opening-hours
/// invariants hold, or the day is truncated to empty.
pub fn repair(solution: &Solution, catalog: &ProblemData) -> Solution {
    let [day1, day2] = dedup(solution);
    let day1 = truncate_until_feasible(day1, catalog);
    let day2 = truncate_until_feasible(day2, catalog);

    let candidate = Solution::new(day1, day2, Objectives::ZERO, false);
    match evaluate(&candidate, catalog) {
        Ok((objectives, _)) => Solution::new(
            candidate.days[0].clone(),
            candidate.days[1].clone(),
            objectives,
            true,
        ),
        Err(_) => {
            // Dedup + per-day truncation should always converge to a
            // feasible (possibly empty) pair of days. If it somehow
            // doesn't - e.g. a leg mode became infeasible - fall back to
            // the fully empty solution rather than return a lie.
            let hotel = solution.hotel();
            let empty1 = DayRoute::new(hotel);
            let empty2 = DayRoute::new(hotel);
            Solution::new(empty1, empty2, Objectives::ZERO, true)
        }
    }
}

/// Drops every attraction id seen before in this solution, keeping the
/// first occurrence. Day 1 is scanned before day 2, matching §4.2's
/// "keeping the first occurrence" rule.
fn dedup(solution: &Solution) -> [DayRoute; 2] {
    let mut seen = HashSet::new();
    let days = solution.days.clone();
    let deduped: Vec<DayRoute> = days
        .into_iter()
        .map(|route| {
            let mut kept_pois = Vec::new();
            let mut kept_modes = vec![route.modes[0]];
            for (idx, poi) in route.pois.iter().enumerate() {
                if seen.insert(*poi) {
                    kept_pois.push(*poi);
                    kept_modes.push(route.modes[idx + 1]);
                }
            }
            DayRoute::with_pois(route.hotel, kept_pois, kept_modes)
        })
        .collect();
    [deduped[0].clone(), deduped[1].clone()]
}

/// Greedily drops the last attraction of `route` until a solution with
/// only this day populated (the other left empty) evaluates without a
/// time or opening-hours error.
fn truncate_until_feasible(mut route: DayRoute, catalog: &ProblemData) -> DayRoute {
    loop {
        if route.is_empty() {
            return route;
        }
        let probe_day = route.clone();
        let other = DayRoute::new(route.hotel);
        let probe = Solution::new(probe_day, other, Objectives::ZERO, false);
        match evaluate(&probe, catalog) {
            Ok(_) => return route,
            Err(_) => {
                route.pois.pop();
                route.modes.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attraction, AttractionId, Hotel, HotelId, TravelMatrixSet, TravelMode};

    fn catalog_three_pois() -> ProblemData {
        let hotels = vec![Hotel { id: HotelId(0), name: "h".into(), lat: 0.0, lon: 0.0, nightly_cost: 0.0 }];
        let mk = |id: usize, visit: u32, open: u32, close: u32| Attraction {
            id: AttractionId(id),
            name: format!("a{id}"),
            lat: 0.0,
            lon: 0.0,
            visit_minutes: visit,
            open,
            close,
            entrance_cost: 0.0,
            rating: 4.0,
        };
        let attractions = vec![mk(0, 400, 480, 1200), mk(1, 400, 480, 1200), mk(2, 400, 480, 1200)];
        let mut matrices = TravelMatrixSet::new(4); // hotel, a0, a1, a2
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    matrices.set(i, j, TravelMode::Walk, 5, 0.0);
                }
            }
        }
        ProblemData::new(attractions, hotels, matrices).unwrap()
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let catalog = catalog_three_pois();
        let modes = vec![TravelMode::Walk, TravelMode::Walk];
        let day1 = DayRoute::with_pois(HotelId(0), vec![AttractionId(0)], modes.clone());
        let day2 = DayRoute::with_pois(HotelId(0), vec![AttractionId(0)], modes);
        let solution = Solution::new(day1, day2, Objectives::ZERO, false);
        let repaired = repair(&solution, &catalog);
        assert_eq!(repaired.days[0].pois, vec![AttractionId(0)]);
        assert!(repaired.days[1].pois.is_empty());
    }

    #[test]
    fn truncation_drops_from_the_end_until_window_fits() {
        let catalog = catalog_three_pois();
        // 3 attractions of 400 minutes each plus travel cannot all fit in
        // a 720-minute window (08:00-20:00); only one or two survive.
        let modes = vec![TravelMode::Walk; 4];
        let day1 = DayRoute::with_pois(
            HotelId(0),
            vec![AttractionId(0), AttractionId(1), AttractionId(2)],
            modes,
        );
        let day2 = DayRoute::new(HotelId(0));
        let solution = Solution::new(day1, day2, Objectives::ZERO, false);
        let repaired = repair(&solution, &catalog);
        assert!(repaired.feasible);
        assert!(repaired.days[0].pois.len() < 3);
        assert_eq!(repaired.days[0].pois.first(), Some(&AttractionId(0)));
    }

    #[test]
    fn repair_never_reorders_surviving_pois() {
        let catalog = catalog_three_pois();
        let modes = vec![TravelMode::Walk; 3];
        let day1 = DayRoute::with_pois(HotelId(0), vec![AttractionId(1), AttractionId(0)], modes);
        let day2 = DayRoute::new(HotelId(0));
        let solution = Solution::new(day1, day2, Objectives::ZERO, false);
        let repaired = repair(&solution, &catalog);
        assert_eq!(repaired.days[0].pois, vec![AttractionId(1), AttractionId(0)]);
    }

    #[test]
    fn fully_infeasible_route_repairs_to_empty_solution() {
        let catalog = catalog_three_pois();
        let modes = vec![TravelMode::Car; 2]; // no car matrix entries
        let day1 = DayRoute::with_pois(HotelId(0), vec![AttractionId(0)], modes);
        let day2 = DayRoute::new(HotelId(0));
        let solution = Solution::new(day1, day2, Objectives::ZERO, false);
        let repaired = repair(&solution, &catalog);
        assert!(repaired.is_empty());
        assert!(repaired.feasible);
    }
}
