//! Solution model: two ordered day routes sharing one hotel, plus the
//! memoized objective vector.

use crate::catalog::{AttractionId, HotelId, Place, TravelMode};

/// A single traversed leg, derived from a [`DayRoute`] - never stored
/// independently of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub from: Place,
    pub to: Place,
    pub mode: TravelMode,
    pub travel_minutes: u32,
    pub travel_cost: f64,
}

/// Ordered sequence `[hotel, p1, p2, ..., pm, hotel]` with a parallel
/// sequence of `m + 1` modes (hotel->p1, p_i->p_i+1, p_m->hotel).
#[derive(Debug, Clone, PartialEq)]
pub struct DayRoute {
    pub hotel: HotelId,
    pub pois: Vec<AttractionId>,
    /// `modes[i]` is the mode of the leg arriving at `pois[i]`, except
    /// `modes[pois.len()]` which is the closing leg back to the hotel.
    pub modes: Vec<TravelMode>,
}

impl DayRoute {
    pub fn new(hotel: HotelId) -> Self {
        Self { hotel, pois: Vec::new(), modes: vec![TravelMode::Walk] }
    }

    pub fn with_pois(hotel: HotelId, pois: Vec<AttractionId>, modes: Vec<TravelMode>) -> Self {
        debug_assert_eq!(modes.len(), pois.len() + 1);
        Self { hotel, pois, modes }
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// Places visited in order, including the bookending hotel.
    pub fn places(&self) -> Vec<Place> {
        let mut places = Vec::with_capacity(self.pois.len() + 2);
        places.push(Place::Hotel(self.hotel));
        places.extend(self.pois.iter().map(|&p| Place::Attraction(p)));
        places.push(Place::Hotel(self.hotel));
        places
    }
}

/// Memoized multi-objective vector. F1/F2 maximize, F3/F4 minimize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objectives {
    /// Number of attractions visited.
    pub f1: u32,
    /// Sum of ratings.
    pub f2: f64,
    /// Total travel + visit minutes across both days.
    pub f3: u32,
    /// Total entrance + travel cost across both days.
    pub f4: f64,
}

impl Objectives {
    pub const ZERO: Objectives = Objectives { f1: 0, f2: 0.0, f3: 0, f4: 0.0 };

    /// Pareto dominance: `self` dominates `other` iff it is at least as
    /// good on every objective and strictly better on at least one, with
    /// maximized objectives compared `>=` and minimized objectives `<=`.
    pub fn dominates(&self, other: &Objectives) -> bool {
        let at_least_as_good =
            self.f1 >= other.f1 && self.f2 >= other.f2 && self.f3 <= other.f3 && self.f4 <= other.f4;
        let strictly_better =
            self.f1 > other.f1 || self.f2 > other.f2 || self.f3 < other.f3 || self.f4 < other.f4;
        at_least_as_good && strictly_better
    }
}

/// Two ordered day routes sharing one hotel, plus the memoized objective
/// vector and feasibility flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub days: [DayRoute; 2],
    pub objectives: Objectives,
    pub feasible: bool,
}

impl Solution {
    pub fn new(day1: DayRoute, day2: DayRoute, objectives: Objectives, feasible: bool) -> Self {
        debug_assert_eq!(day1.hotel, day2.hotel, "both days must share one hotel");
        Self { days: [day1, day2], objectives, feasible }
    }

    pub fn hotel(&self) -> HotelId {
        self.days[0].hotel
    }

    /// True iff both days contain only the hotel - the empty solution that
    /// a failed repair may produce (§4.8 of SPEC_FULL.md).
    pub fn is_empty(&self) -> bool {
        self.days[0].is_empty() && self.days[1].is_empty()
    }

    /// All attraction ids visited across both days, in day-then-position
    /// order. Used by repair's dedup pass and by neighborhoods that need to
    /// know which attractions remain unvisited.
    pub fn visited_attractions(&self) -> impl Iterator<Item = AttractionId> + '_ {
        self.days[0].pois.iter().chain(self.days[1].pois.iter()).copied()
    }
}

/// One output row per visited attraction, matching the external content
/// contract of §6 of SPEC_FULL.md: (day, order, poi_id, arrival, departure,
/// mode, leg_duration, leg_cost, rating). Produced only for downstream CSV
/// serialization - this crate never writes a file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SolutionRow {
    pub day: u8,
    pub order: usize,
    pub poi_id: usize,
    pub arrival_minute: u32,
    pub departure_minute: u32,
    pub mode: &'static str,
    pub leg_minutes: u32,
    pub leg_cost: f64,
    pub rating: f64,
}

fn mode_name(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "walk",
        TravelMode::Subway => "subway",
        TravelMode::Bus => "bus",
        TravelMode::Car => "car",
    }
}

impl Solution {
    /// Renders the output schema rows for both days from a schedule
    /// already computed by [`crate::evaluator::evaluate`]. Callers that
    /// only need the objective vector should use `evaluate` directly;
    /// this is purely a presentation helper for external serializers.
    pub fn to_rows(
        &self,
        catalog: &crate::catalog::ProblemData,
        schedules: &[crate::evaluator::DaySchedule; 2],
    ) -> Vec<SolutionRow> {
        let mut rows = Vec::new();
        for (day_idx, (route, schedule)) in self.days.iter().zip(schedules.iter()).enumerate() {
            for (order, (&poi, arrival)) in route.pois.iter().zip(schedule.arrivals.iter()).enumerate() {
                let attraction = catalog.attraction(poi);
                let departure = arrival + attraction.visit_minutes;
                rows.push(SolutionRow {
                    day: day_idx as u8 + 1,
                    order,
                    poi_id: poi.0,
                    arrival_minute: *arrival,
                    departure_minute: departure,
                    mode: mode_name(route.modes[order]),
                    leg_minutes: schedule.leg_minutes[order],
                    leg_cost: schedule.leg_costs[order],
                    rating: attraction.rating,
                });
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(f1: u32, f2: f64, f3: u32, f4: f64) -> Objectives {
        Objectives { f1, f2, f3, f4 }
    }

    #[test]
    fn dominance_requires_strict_improvement_somewhere() {
        let a = obj(3, 10.0, 100, 20.0);
        let b = obj(3, 10.0, 100, 20.0);
        assert!(!a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn dominance_is_strict_on_one_axis_nonworse_on_rest() {
        let a = obj(4, 10.0, 100, 20.0);
        let b = obj(3, 10.0, 100, 20.0);
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn dominance_false_when_mixed_directions() {
        let a = obj(4, 10.0, 150, 20.0);
        let b = obj(3, 10.0, 100, 20.0);
        assert!(!a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn dominance_is_irreflexive() {
        let a = obj(4, 10.0, 100, 20.0);
        assert!(!a.dominates(&a));
    }

    #[test]
    fn empty_solution_has_no_attractions() {
        let hotel = HotelId(0);
        let day = DayRoute::new(hotel);
        let solution = Solution::new(day.clone(), day, Objectives::ZERO, true);
        assert!(solution.is_empty());
    }
}
