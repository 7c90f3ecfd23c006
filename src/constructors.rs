//! Constructors: five deterministic heuristic seeds plus Bernoulli
//! random-feasible seeding (§4.4 of SPEC_FULL.md).
//!
//! Every constructor returns a [`Solution`] that has already been through
//! [`crate::repair::repair`], so callers can insert it into the archive
//! directly.

use rand::Rng;

use crate::catalog::{AttractionId, HotelId, Place, ProblemData, TravelMode};
use crate::evaluator::evaluate;
use crate::model::{DayRoute, Objectives, Solution};
use crate::repair::repair;

/// Default fraction of attractions kept by the min-cost greedy
/// constructor's threshold (§4.4: "skip entries above a threshold θ").
const MIN_COST_THRESHOLD_FRACTION: f64 = 0.75;

/// Builds an empty two-day solution anchored at `hotel`, with placeholder
/// objectives - callers must run it through [`repair`] before use.
fn empty_solution(hotel: HotelId) -> Solution {
    Solution::new(DayRoute::new(hotel), DayRoute::new(hotel), Objectives::ZERO, false)
}

/// Appends `poi` to whichever of the two days currently has fewer
/// attractions, using the fastest feasible mode for the new closing leg
/// back to the hotel (and the new entry leg), per §4.4's mode default.
fn push_poi_to_shorter_day(solution: &mut Solution, poi: AttractionId, catalog: &ProblemData) {
    let day_idx = if solution.days[0].pois.len() <= solution.days[1].pois.len() { 0 } else { 1 };
    let hotel = solution.days[day_idx].hotel;
    let mut pois = solution.days[day_idx].pois.clone();
    pois.push(poi);
    let modes = default_modes(hotel, &pois, catalog);
    solution.days[day_idx] = DayRoute::with_pois(hotel, pois, modes);
}

/// Assigns each leg of a freshly built POI sequence its fastest feasible
/// mode, falling back to `Walk` if nothing else is feasible (walk is
/// always feasible per §3).
fn default_modes(hotel: HotelId, pois: &[AttractionId], catalog: &ProblemData) -> Vec<TravelMode> {
    let day = DayRoute { hotel, pois: pois.to_vec(), modes: vec![TravelMode::Walk; pois.len() + 1] };
    let places = day.places();
    places
        .windows(2)
        .map(|w| catalog.fastest_feasible_mode(w[0], w[1]).unwrap_or(TravelMode::Walk))
        .collect()
}

/// Max-attractions greedy: insert POIs by descending rating until no
/// further POI fits either day's time window.
pub fn max_attractions_greedy(hotel: HotelId, catalog: &ProblemData) -> Solution {
    let mut order: Vec<AttractionId> = (0..catalog.attractions.len()).map(AttractionId).collect();
    order.sort_by(|&a, &b| {
        catalog.attraction(b).rating.partial_cmp(&catalog.attraction(a).rating).expect("rating is never NaN")
    });

    let mut solution = empty_solution(hotel);
    for poi in order {
        let mut candidate = solution.clone();
        push_poi_to_shorter_day(&mut candidate, poi, catalog);
        let repaired = repair(&candidate, catalog);
        if repaired.objectives.f1 > solution.objectives.f1 || solution.is_empty() {
            // Only keep the insertion if the repaired solution still
            // contains this poi somewhere - otherwise truncation rejected
            // it and the greedy scan should move on without regressing.
            if repaired.visited_attractions().any(|id| id == poi) {
                solution = repaired;
            }
        }
    }
    solution
}

/// True iff `day` alone (the other day left empty) evaluates without a
/// time or opening-hours violation - the same per-day feasibility probe
/// [`crate::repair::repair`] uses to decide what to truncate.
fn day_is_feasible(day: &DayRoute, catalog: &ProblemData) -> bool {
    let other = DayRoute::new(day.hotel);
    let probe = Solution::new(day.clone(), other, Objectives::ZERO, false);
    evaluate(&probe, catalog).is_ok()
}

/// Max-rating greedy: descending rating, filling each day as a strict
/// rating-ordered prefix and stopping at that day's *first* infeasible
/// insertion, rather than skipping past it to try lower-rated POIs (which
/// is what [`max_attractions_greedy`] does). This front-loads the
/// highest-rated POIs per day at the cost of potentially shorter days.
pub fn max_rating_greedy(hotel: HotelId, catalog: &ProblemData) -> Solution {
    let mut order: Vec<AttractionId> = (0..catalog.attractions.len()).map(AttractionId).collect();
    order.sort_by(|&a, &b| {
        catalog.attraction(b).rating.partial_cmp(&catalog.attraction(a).rating).expect("rating is never NaN")
    });

    let mut solution = empty_solution(hotel);
    let mut idx = 0;
    for day_idx in 0..2 {
        while idx < order.len() {
            let poi = order[idx];
            let mut pois = solution.days[day_idx].pois.clone();
            pois.push(poi);
            let modes = default_modes(hotel, &pois, catalog);
            let candidate_day = DayRoute::with_pois(hotel, pois, modes);

            if day_is_feasible(&candidate_day, catalog) {
                solution.days[day_idx] = candidate_day;
                idx += 1;
            } else {
                break; // this day's first infeasibility - move on to the next day
            }
        }
    }

    repair(&solution, catalog)
}

/// Min-cost greedy: ascending entrance cost, skipping any attraction whose
/// cost exceeds `θ` (a fraction of the catalog's median-ish spread, taken
/// here as `MIN_COST_THRESHOLD_FRACTION` of the maximum entrance cost).
pub fn min_cost_greedy(hotel: HotelId, catalog: &ProblemData) -> Solution {
    let max_cost = catalog.attractions.iter().map(|a| a.entrance_cost).fold(0.0_f64, f64::max);
    let theta = max_cost * MIN_COST_THRESHOLD_FRACTION;

    let mut order: Vec<AttractionId> = (0..catalog.attractions.len())
        .map(AttractionId)
        .filter(|id| catalog.attraction(*id).entrance_cost <= theta)
        .collect();
    order.sort_by(|&a, &b| {
        catalog.attraction(a).entrance_cost.partial_cmp(&catalog.attraction(b).entrance_cost).expect("cost is never NaN")
    });

    let mut solution = empty_solution(hotel);
    for poi in order {
        let mut candidate = solution.clone();
        push_poi_to_shorter_day(&mut candidate, poi, catalog);
        let repaired = repair(&candidate, catalog);
        if repaired.visited_attractions().any(|id| id == poi) {
            solution = repaired;
        }
    }
    solution
}

/// Min-travel-time greedy: nearest-neighbor construction from the hotel,
/// always appending the closest remaining unvisited POI to the end of
/// whichever day it was reached from.
pub fn min_travel_time_greedy(hotel: HotelId, catalog: &ProblemData) -> Solution {
    let mut remaining: Vec<AttractionId> = (0..catalog.attractions.len()).map(AttractionId).collect();
    let mut solution = empty_solution(hotel);
    let mut current_place = [Place::Hotel(hotel), Place::Hotel(hotel)];

    loop {
        let day_idx = if solution.days[0].pois.len() <= solution.days[1].pois.len() { 0 } else { 1 };
        let from = current_place[day_idx];

        let nearest = remaining
            .iter()
            .filter_map(|&poi| {
                catalog
                    .fastest_feasible_mode(from, Place::Attraction(poi))
                    .and_then(|mode| catalog.leg_lookup(from, Place::Attraction(poi), mode))
                    .map(|(minutes, _)| (poi, minutes))
            })
            .min_by_key(|&(_, minutes)| minutes);

        let Some((poi, _)) = nearest else { break };

        let mut candidate = solution.clone();
        let hotel_id = candidate.days[day_idx].hotel;
        let mut pois = candidate.days[day_idx].pois.clone();
        pois.push(poi);
        let modes = default_modes(hotel_id, &pois, catalog);
        candidate.days[day_idx] = DayRoute::with_pois(hotel_id, pois, modes);
        let repaired = repair(&candidate, catalog);

        if !repaired.visited_attractions().any(|id| id == poi) {
            remaining.retain(|&id| id != poi);
            continue;
        }

        solution = repaired;
        current_place[day_idx] = Place::Attraction(poi);
        remaining.retain(|&id| id != poi);
    }
    solution
}

/// Balanced: descending ratio rating / (visit_minutes + minimum travel
/// time from the hotel to this POI), a cheap proxy for "worth the time it
/// costs to reach and visit".
pub fn balanced_greedy(hotel: HotelId, catalog: &ProblemData) -> Solution {
    let min_travel_from_hotel = |poi: AttractionId| -> u32 {
        TravelMode::ALL
            .into_iter()
            .filter_map(|mode| catalog.leg_lookup(Place::Hotel(hotel), Place::Attraction(poi), mode))
            .map(|(minutes, _)| minutes)
            .min()
            .unwrap_or(u32::MAX / 2)
    };

    let mut order: Vec<AttractionId> = (0..catalog.attractions.len()).map(AttractionId).collect();
    order.sort_by(|&a, &b| {
        let ratio = |id: AttractionId| {
            let attraction = catalog.attraction(id);
            attraction.rating / (attraction.visit_minutes + min_travel_from_hotel(id)).max(1) as f64
        };
        ratio(b).partial_cmp(&ratio(a)).expect("ratio is never NaN")
    });

    let mut solution = empty_solution(hotel);
    for poi in order {
        let mut candidate = solution.clone();
        push_poi_to_shorter_day(&mut candidate, poi, catalog);
        let repaired = repair(&candidate, catalog);
        if repaired.visited_attractions().any(|id| id == poi) {
            solution = repaired;
        }
    }
    solution
}

/// Random-feasible seed: samples each POI with Bernoulli(`p`), shuffles
/// the sample into Day 1 overflowing into Day 2, then repairs (dedup is a
/// no-op here since the sample has no duplicates, but `repair` still runs
/// the full pipeline for consistency with every other constructor).
pub fn random_feasible<Rg: Rng + ?Sized>(hotel: HotelId, catalog: &ProblemData, rng: &mut Rg, p: f64) -> Solution {
    let mut sampled: Vec<AttractionId> = (0..catalog.attractions.len())
        .map(AttractionId)
        .filter(|_| rng.random_bool(p))
        .collect();

    for i in (1..sampled.len()).rev() {
        let j = rng.random_range(0..=i);
        sampled.swap(i, j);
    }

    let half = sampled.len().div_ceil(2);
    let (day1_pois, day2_pois) = sampled.split_at(half);

    let day1_modes = default_modes(hotel, day1_pois, catalog);
    let day2_modes = default_modes(hotel, day2_pois, catalog);
    let day1 = DayRoute::with_pois(hotel, day1_pois.to_vec(), day1_modes);
    let day2 = DayRoute::with_pois(hotel, day2_pois.to_vec(), day2_modes);
    let candidate = Solution::new(day1, day2, Objectives::ZERO, false);
    repair(&candidate, catalog)
}

/// Probability used by the random-feasible sampler (§4.4: "Bernoulli(p=0.3)").
pub const RANDOM_FEASIBLE_P: f64 = 0.3;

/// Builds the full initial population: the five deterministic heuristics
/// (if `count` allows) followed by random-feasible seeds until `count`
/// solutions have been produced, all anchored at `hotel`.
pub fn seed_population<Rg: Rng + ?Sized>(
    hotel: HotelId,
    catalog: &ProblemData,
    rng: &mut Rg,
    count: usize,
) -> Vec<Solution> {
    let deterministic: Vec<Solution> = vec![
        max_attractions_greedy(hotel, catalog),
        max_rating_greedy(hotel, catalog),
        min_cost_greedy(hotel, catalog),
        min_travel_time_greedy(hotel, catalog),
        balanced_greedy(hotel, catalog),
    ];

    let mut population: Vec<Solution> = deterministic.into_iter().take(count).collect();
    while population.len() < count {
        population.push(random_feasible(hotel, catalog, rng, RANDOM_FEASIBLE_P));
    }
    population
}
