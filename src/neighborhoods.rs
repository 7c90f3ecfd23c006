//! Neighborhoods N1-N7: move generators shared by Shake (random, size k)
//! and Pareto Local Search (exhaustive enumeration).
//!
//! Modeled as a tagged variant with a uniform `sample_one`/`enumerate`
//! contract, per §9 of SPEC_FULL.md ("dynamic dispatch over
//! neighborhoods"). Moves are produced unevaluated and unrepaired; callers
//! (Shake, VND) run them through `evaluator`/`repair`.

use rand::Rng;

use crate::catalog::{AttractionId, HotelId, Place, ProblemData, TravelMode};
use crate::model::{DayRoute, Objectives, Solution};

/// The seven neighborhoods, in the fixed escalation order used by Shake
/// (`k` indexes into this list) and by VND (`N1..N7` traversal order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// N1: exchange positions i < j within one day.
    InternalSwap,
    /// N2: move the POI at position i of day d to position j of day 1-d.
    CrossDayMove,
    /// N3: insert an unvisited POI, or remove a visited one.
    InsertRemove,
    /// N4: replace the POI at a position with a random unvisited POI.
    Substitution,
    /// N5: reverse a sub-sequence [i..j] within one day.
    TwoOptReversal,
    /// N6: replace the shared hotel.
    ChangeHotel,
    /// N7: change one leg's transport mode.
    ChangeTransportMode,
}

impl Neighborhood {
    /// Fixed order N1..N7, used both for Shake's `k` escalation and VND's
    /// traversal/restart order.
    pub const ORDER: [Neighborhood; 7] = [
        Neighborhood::InternalSwap,
        Neighborhood::CrossDayMove,
        Neighborhood::InsertRemove,
        Neighborhood::Substitution,
        Neighborhood::TwoOptReversal,
        Neighborhood::ChangeHotel,
        Neighborhood::ChangeTransportMode,
    ];

    /// Draws one random move from this neighborhood, or `None` if the
    /// current solution offers no valid move here (e.g. a day too short
    /// to swap).
    pub fn sample_one<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        catalog: &ProblemData,
        rng: &mut R,
    ) -> Option<Solution> {
        match self {
            Neighborhood::InternalSwap => sample_internal_swap(solution, catalog, rng),
            Neighborhood::CrossDayMove => sample_cross_day_move(solution, catalog, rng),
            Neighborhood::InsertRemove => sample_insert_remove(solution, catalog, rng),
            Neighborhood::Substitution => sample_substitution(solution, catalog, rng),
            Neighborhood::TwoOptReversal => sample_two_opt(solution, catalog, rng),
            Neighborhood::ChangeHotel => sample_change_hotel(solution, catalog, rng),
            Neighborhood::ChangeTransportMode => sample_change_mode(solution, catalog, rng),
        }
    }

    /// Exhaustively enumerates every move in this neighborhood, for
    /// Pareto Local Search / weighted descent.
    pub fn enumerate(&self, solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
        match self {
            Neighborhood::InternalSwap => enumerate_internal_swap(solution, catalog),
            Neighborhood::CrossDayMove => enumerate_cross_day_move(solution, catalog),
            Neighborhood::InsertRemove => enumerate_insert_remove(solution, catalog),
            Neighborhood::Substitution => enumerate_substitution(solution, catalog),
            Neighborhood::TwoOptReversal => enumerate_two_opt(solution, catalog),
            Neighborhood::ChangeHotel => enumerate_change_hotel(solution, catalog),
            Neighborhood::ChangeTransportMode => enumerate_change_mode(solution, catalog),
        }
    }
}

fn placeholder_objectives() -> Objectives {
    Objectives::ZERO
}

fn unvisited_attractions(solution: &Solution, catalog: &ProblemData) -> Vec<AttractionId> {
    let visited: std::collections::HashSet<_> = solution.visited_attractions().collect();
    (0..catalog.attractions.len())
        .map(AttractionId)
        .filter(|id| !visited.contains(id))
        .collect()
}

/// Rebuilds a day's mode vector after its POI order/membership changed,
/// keeping legs whose endpoints are unchanged and assigning the fastest
/// feasible mode to any new or altered leg (§4.4/§4.5 of SPEC_FULL.md).
fn rebuild_modes(hotel: HotelId, pois: &[AttractionId], old: &DayRoute, catalog: &ProblemData) -> Vec<TravelMode> {
    let old_places = old.places();
    let new_day = DayRoute { hotel, pois: pois.to_vec(), modes: vec![TravelMode::Walk; pois.len() + 1] };
    let new_places = new_day.places();

    (0..new_places.len() - 1)
        .map(|i| {
            let (from, to) = (new_places[i], new_places[i + 1]);
            let reused = old_places
                .windows(2)
                .zip(old.modes.iter())
                .find(|(w, _)| w[0] == from && w[1] == to)
                .map(|(_, m)| *m);
            reused.or_else(|| catalog.fastest_feasible_mode(from, to)).unwrap_or(TravelMode::Walk)
        })
        .collect()
}

fn rebuilt_day(hotel: HotelId, pois: Vec<AttractionId>, old: &DayRoute, catalog: &ProblemData) -> DayRoute {
    let modes = rebuild_modes(hotel, &pois, old, catalog);
    DayRoute::with_pois(hotel, pois, modes)
}

// ---------------------------------------------------------------------
// N1: Internal swap
// ---------------------------------------------------------------------

fn swappable_days(solution: &Solution) -> Vec<usize> {
    (0..2).filter(|&d| solution.days[d].pois.len() >= 2).collect()
}

fn apply_internal_swap(solution: &Solution, day_idx: usize, i: usize, j: usize, catalog: &ProblemData) -> Solution {
    let mut days = solution.days.clone();
    let mut pois = days[day_idx].pois.clone();
    pois.swap(i, j);
    days[day_idx] = rebuilt_day(days[day_idx].hotel, pois, &days[day_idx], catalog);
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn sample_internal_swap<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    let days = swappable_days(solution);
    let day_idx = *days.get(rng.random_range(0..days.len().max(1)))?;
    let n = solution.days[day_idx].pois.len();
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n);
    while j == i {
        j = rng.random_range(0..n);
    }
    let (i, j) = (i.min(j), i.max(j));
    Some(apply_internal_swap(solution, day_idx, i, j, catalog))
}

fn enumerate_internal_swap(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    let mut out = Vec::new();
    for day_idx in swappable_days(solution) {
        let n = solution.days[day_idx].pois.len();
        for i in 0..n {
            for j in (i + 1)..n {
                out.push(apply_internal_swap(solution, day_idx, i, j, catalog));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------
// N2: Cross-day move
// ---------------------------------------------------------------------

fn apply_cross_day_move(solution: &Solution, from_day: usize, i: usize, j: usize, catalog: &ProblemData) -> Solution {
    let to_day = 1 - from_day;
    let days = solution.days.clone();

    let mut from_pois = days[from_day].pois.clone();
    let moved = from_pois.remove(i);
    let mut to_pois = days[to_day].pois.clone();
    let insert_at = j.min(to_pois.len());
    to_pois.insert(insert_at, moved);

    let new_from = rebuilt_day(days[from_day].hotel, from_pois, &days[from_day], catalog);
    let new_to = rebuilt_day(days[to_day].hotel, to_pois, &days[to_day], catalog);

    let mut result = days;
    result[from_day] = new_from;
    result[to_day] = new_to;
    let [d0, d1] = result;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn sample_cross_day_move<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    let candidates: Vec<usize> = (0..2).filter(|&d| !solution.days[d].pois.is_empty()).collect();
    if candidates.is_empty() {
        return None;
    }
    let from_day = candidates[rng.random_range(0..candidates.len())];
    let i = rng.random_range(0..solution.days[from_day].pois.len());
    let to_len = solution.days[1 - from_day].pois.len();
    let j = rng.random_range(0..=to_len);
    Some(apply_cross_day_move(solution, from_day, i, j, catalog))
}

fn enumerate_cross_day_move(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    let mut out = Vec::new();
    for from_day in 0..2 {
        let from_len = solution.days[from_day].pois.len();
        let to_len = solution.days[1 - from_day].pois.len();
        for i in 0..from_len {
            for j in 0..=to_len {
                out.push(apply_cross_day_move(solution, from_day, i, j, catalog));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------
// N3: Insert / Remove
// ---------------------------------------------------------------------

fn apply_insert(solution: &Solution, day_idx: usize, position: usize, poi: AttractionId, catalog: &ProblemData) -> Solution {
    let mut days = solution.days.clone();
    let mut pois = days[day_idx].pois.clone();
    let position = position.min(pois.len());
    pois.insert(position, poi);
    days[day_idx] = rebuilt_day(days[day_idx].hotel, pois, &days[day_idx], catalog);
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn apply_remove(solution: &Solution, day_idx: usize, position: usize, catalog: &ProblemData) -> Solution {
    let mut days = solution.days.clone();
    let mut pois = days[day_idx].pois.clone();
    pois.remove(position);
    days[day_idx] = rebuilt_day(days[day_idx].hotel, pois, &days[day_idx], catalog);
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn sample_insert_remove<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    if rng.random_bool(0.5) {
        let unvisited = unvisited_attractions(solution, catalog);
        if unvisited.is_empty() {
            return None;
        }
        let poi = unvisited[rng.random_range(0..unvisited.len())];
        let day_idx = rng.random_range(0..2);
        let position = rng.random_range(0..=solution.days[day_idx].pois.len());
        Some(apply_insert(solution, day_idx, position, poi, catalog))
    } else {
        let days_with_pois: Vec<usize> = (0..2).filter(|&d| !solution.days[d].pois.is_empty()).collect();
        if days_with_pois.is_empty() {
            return None;
        }
        let day_idx = days_with_pois[rng.random_range(0..days_with_pois.len())];
        let position = rng.random_range(0..solution.days[day_idx].pois.len());
        Some(apply_remove(solution, day_idx, position, catalog))
    }
}

fn enumerate_insert_remove(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    let mut out = Vec::new();
    let unvisited = unvisited_attractions(solution, catalog);
    for day_idx in 0..2 {
        for position in 0..=solution.days[day_idx].pois.len() {
            for &poi in &unvisited {
                out.push(apply_insert(solution, day_idx, position, poi, catalog));
            }
        }
        for position in 0..solution.days[day_idx].pois.len() {
            out.push(apply_remove(solution, day_idx, position, catalog));
        }
    }
    out
}

// ---------------------------------------------------------------------
// N4: Substitution
// ---------------------------------------------------------------------

fn apply_substitution(solution: &Solution, day_idx: usize, position: usize, poi: AttractionId, catalog: &ProblemData) -> Solution {
    let mut days = solution.days.clone();
    let mut pois = days[day_idx].pois.clone();
    pois[position] = poi;
    days[day_idx] = rebuilt_day(days[day_idx].hotel, pois, &days[day_idx], catalog);
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn sample_substitution<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    let days_with_pois: Vec<usize> = (0..2).filter(|&d| !solution.days[d].pois.is_empty()).collect();
    let unvisited = unvisited_attractions(solution, catalog);
    if days_with_pois.is_empty() || unvisited.is_empty() {
        return None;
    }
    let day_idx = days_with_pois[rng.random_range(0..days_with_pois.len())];
    let position = rng.random_range(0..solution.days[day_idx].pois.len());
    let poi = unvisited[rng.random_range(0..unvisited.len())];
    Some(apply_substitution(solution, day_idx, position, poi, catalog))
}

fn enumerate_substitution(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    let mut out = Vec::new();
    let unvisited = unvisited_attractions(solution, catalog);
    for day_idx in 0..2 {
        for position in 0..solution.days[day_idx].pois.len() {
            for &poi in &unvisited {
                out.push(apply_substitution(solution, day_idx, position, poi, catalog));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------
// N5: 2-opt reversal
// ---------------------------------------------------------------------

fn apply_two_opt(solution: &Solution, day_idx: usize, i: usize, j: usize, catalog: &ProblemData) -> Solution {
    let mut days = solution.days.clone();
    let mut pois = days[day_idx].pois.clone();
    pois[i..=j].reverse();
    days[day_idx] = rebuilt_day(days[day_idx].hotel, pois, &days[day_idx], catalog);
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn sample_two_opt<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    let days = swappable_days(solution);
    if days.is_empty() {
        return None;
    }
    let day_idx = days[rng.random_range(0..days.len())];
    let n = solution.days[day_idx].pois.len();
    let i = rng.random_range(0..n - 1);
    let j = rng.random_range(i + 1..n);
    Some(apply_two_opt(solution, day_idx, i, j, catalog))
}

fn enumerate_two_opt(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    let mut out = Vec::new();
    for day_idx in swappable_days(solution) {
        let n = solution.days[day_idx].pois.len();
        for i in 0..n - 1 {
            for j in (i + 1)..n {
                out.push(apply_two_opt(solution, day_idx, i, j, catalog));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------
// N6: Change hotel
// ---------------------------------------------------------------------

fn apply_change_hotel(solution: &Solution, new_hotel: HotelId) -> Solution {
    let days = [
        DayRoute { hotel: new_hotel, pois: solution.days[0].pois.clone(), modes: solution.days[0].modes.clone() },
        DayRoute { hotel: new_hotel, pois: solution.days[1].pois.clone(), modes: solution.days[1].modes.clone() },
    ];
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn other_hotels(solution: &Solution, catalog: &ProblemData) -> Vec<HotelId> {
    (0..catalog.hotels.len()).map(HotelId).filter(|&h| h != solution.hotel()).collect()
}

fn sample_change_hotel<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    let candidates = other_hotels(solution, catalog);
    if candidates.is_empty() {
        return None;
    }
    let hotel = candidates[rng.random_range(0..candidates.len())];
    Some(apply_change_hotel(solution, hotel))
}

fn enumerate_change_hotel(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    other_hotels(solution, catalog).into_iter().map(|h| apply_change_hotel(solution, h)).collect()
}

// ---------------------------------------------------------------------
// N7: Change transport mode
// ---------------------------------------------------------------------

/// All (day, leg_index) pairs across both days, for picking a leg to
/// re-mode.
fn all_legs(solution: &Solution) -> Vec<(usize, usize)> {
    (0..2).flat_map(|d| (0..solution.days[d].modes.len()).map(move |leg| (d, leg))).collect()
}

fn feasible_modes_for_leg(solution: &Solution, catalog: &ProblemData, day_idx: usize, leg_idx: usize) -> Vec<TravelMode> {
    let places = solution.days[day_idx].places();
    let (from, to) = (places[leg_idx], places[leg_idx + 1]);
    TravelMode::ALL.into_iter().filter(|&m| catalog.leg_lookup(from, to, m).is_some()).collect()
}

fn apply_change_mode(solution: &Solution, day_idx: usize, leg_idx: usize, mode: TravelMode) -> Solution {
    let mut days = solution.days.clone();
    days[day_idx].modes[leg_idx] = mode;
    let [d0, d1] = days;
    Solution::new(d0, d1, placeholder_objectives(), false)
}

fn sample_change_mode<R: Rng + ?Sized>(solution: &Solution, catalog: &ProblemData, rng: &mut R) -> Option<Solution> {
    let legs = all_legs(solution);
    if legs.is_empty() {
        return None;
    }
    let (day_idx, leg_idx) = legs[rng.random_range(0..legs.len())];
    let current = solution.days[day_idx].modes[leg_idx];
    let alternatives: Vec<TravelMode> =
        feasible_modes_for_leg(solution, catalog, day_idx, leg_idx).into_iter().filter(|&m| m != current).collect();
    if alternatives.is_empty() {
        return None;
    }
    let mode = alternatives[rng.random_range(0..alternatives.len())];
    Some(apply_change_mode(solution, day_idx, leg_idx, mode))
}

fn enumerate_change_mode(solution: &Solution, catalog: &ProblemData) -> Vec<Solution> {
    let mut out = Vec::new();
    for (day_idx, leg_idx) in all_legs(solution) {
        let current = solution.days[day_idx].modes[leg_idx];
        for mode in feasible_modes_for_leg(solution, catalog, day_idx, leg_idx) {
            if mode != current {
                out.push(apply_change_mode(solution, day_idx, leg_idx, mode));
            }
        }
    }
    out
}
