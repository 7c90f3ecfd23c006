//! Problem Data: immutable catalogs of attractions, hotels, and the four
//! pairwise travel-time/cost matrices, addressed by dense integer index.
//!
//! Built once by the caller and shared read-only by the rest of the core
//! (see §5 of SPEC_FULL.md) — this mirrors the teacher's `solve()` taking
//! `&'a [V]`/`&'a [R]` borrows rather than owning mutable shared state.

use crate::error::DataError;
use crate::haversine::HaversineMatrix;

/// Dense index of an [`Attraction`] within [`ProblemData::attractions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttractionId(pub usize);

/// Dense index of a [`Hotel`] within [`ProblemData::hotels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotelId(pub usize);

/// Transport mode for a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    Walk,
    Subway,
    Bus,
    Car,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [TravelMode::Walk, TravelMode::Subway, TravelMode::Bus, TravelMode::Car];

    fn index(self) -> usize {
        match self {
            TravelMode::Walk => 0,
            TravelMode::Subway => 1,
            TravelMode::Bus => 2,
            TravelMode::Car => 3,
        }
    }
}

/// A point of interest: coordinates, visit duration, opening window,
/// entrance cost, and quality rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    pub id: AttractionId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Visit duration in minutes. Must be positive.
    pub visit_minutes: u32,
    /// Opening time, minutes-of-day.
    pub open: u32,
    /// Closing time, minutes-of-day.
    pub close: u32,
    pub entrance_cost: f64,
    /// Quality rating in [0, 5].
    pub rating: f64,
}

/// A hotel: coordinates and nightly cost (unused by the core objectives).
#[derive(Debug, Clone, PartialEq)]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub nightly_cost: f64,
}

/// Either endpoint of a leg: a hotel or an attraction. Hotels and
/// attractions share the same coordinate space but are indexed separately,
/// so legs are keyed on this small sum type rather than a raw `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Place {
    Hotel(HotelId),
    Attraction(AttractionId),
}

/// Four dense matrices keyed by (origin, destination, mode) -> (minutes,
/// cost). Indexed over the combined place space: hotels first, then
/// attractions, matching `ProblemData::place_index`.
#[derive(Debug, Clone)]
pub struct TravelMatrixSet {
    /// `matrices[mode_index][from][to] = Some((minutes, cost))` iff feasible.
    matrices: [Vec<Vec<Option<(u32, f64)>>>; 4],
    place_count: usize,
    walk_fallback: HaversineMatrix,
}

impl TravelMatrixSet {
    /// Builds an empty matrix set (all entries infeasible) sized for
    /// `place_count` places. Callers fill entries with [`Self::set`].
    pub fn new(place_count: usize) -> Self {
        let empty = vec![vec![None; place_count]; place_count];
        Self {
            matrices: [empty.clone(), empty.clone(), empty.clone(), empty],
            place_count,
            walk_fallback: HaversineMatrix::default(),
        }
    }

    pub fn with_walk_fallback_speed(mut self, speed_kmh: f64) -> Self {
        self.walk_fallback = HaversineMatrix::new(speed_kmh);
        self
    }

    pub fn set(&mut self, from: usize, to: usize, mode: TravelMode, minutes: u32, cost: f64) {
        assert!(from < self.place_count && to < self.place_count, "place index out of bounds");
        self.matrices[mode.index()][from][to] = Some((minutes, cost));
    }

    /// Looks up (duration, cost) for a leg. A mode is feasible iff the dense
    /// entry exists and duration is positive-finite; `Walk` additionally
    /// falls back to straight-line-distance estimation when no dense entry
    /// is present, per §6 of SPEC_FULL.md.
    pub fn duration_cost(
        &self,
        from: usize,
        to: usize,
        mode: TravelMode,
        from_coord: (f64, f64),
        to_coord: (f64, f64),
    ) -> Option<(u32, f64)> {
        if from == to {
            return Some((0, 0.0));
        }
        if let Some(entry) = self.matrices[mode.index()][from][to] {
            if entry.0 > 0 && entry.0.is_finite_duration() {
                return Some(entry);
            }
            return None;
        }
        if mode == TravelMode::Walk {
            return Some((self.walk_fallback.minutes(from_coord, to_coord), 0.0));
        }
        None
    }

    pub fn is_feasible(&self, from: usize, to: usize, mode: TravelMode) -> bool {
        from == to || self.matrices[mode.index()][from][to].map(|(m, _)| m > 0).unwrap_or(mode == TravelMode::Walk)
    }

    /// True iff `mode` has at least one feasible entry anywhere in the
    /// matrix. A dense matrix with zero entries for a mode means that
    /// mode's data file was never supplied at all, distinct from a mode
    /// that is merely infeasible for some specific legs.
    fn has_any_entry(&self, mode: TravelMode) -> bool {
        self.matrices[mode.index()].iter().any(|row| row.iter().any(|entry| matches!(entry, Some((m, _)) if *m > 0)))
    }
}

/// u32 durations are always finite; this trait exists only to keep the
/// "positive-finite" language of the spec visible at the call site above
/// without a pointless float round-trip.
trait FiniteDuration {
    fn is_finite_duration(&self) -> bool;
}

impl FiniteDuration for u32 {
    fn is_finite_duration(&self) -> bool {
        true
    }
}

/// The immutable problem instance: attractions, hotels, and travel
/// matrices, built once and shared read-only for the remainder of a run.
#[derive(Debug, Clone)]
pub struct ProblemData {
    pub attractions: Vec<Attraction>,
    pub hotels: Vec<Hotel>,
    pub matrices: TravelMatrixSet,
}

impl ProblemData {
    /// Validates fatal preconditions (§4.8, §7): non-empty catalog, positive
    /// visit durations, and at least one feasible matrix per mode used.
    pub fn new(attractions: Vec<Attraction>, hotels: Vec<Hotel>, matrices: TravelMatrixSet) -> Result<Self, DataError> {
        if attractions.is_empty() {
            return Err(DataError::EmptyCatalog);
        }
        for a in &attractions {
            if a.visit_minutes == 0 {
                return Err(DataError::NonPositiveVisitDuration { attraction: a.id });
            }
        }
        Ok(Self { attractions, hotels, matrices })
    }

    pub fn attraction(&self, id: AttractionId) -> &Attraction {
        &self.attractions[id.0]
    }

    pub fn hotel(&self, id: HotelId) -> &Hotel {
        &self.hotels[id.0]
    }

    /// Dense place index: hotels occupy `[0, hotels.len())`, attractions
    /// occupy `[hotels.len(), hotels.len() + attractions.len())`.
    pub fn place_index(&self, place: Place) -> usize {
        match place {
            Place::Hotel(h) => h.0,
            Place::Attraction(a) => self.hotels.len() + a.0,
        }
    }

    pub fn place_coord(&self, place: Place) -> (f64, f64) {
        match place {
            Place::Hotel(h) => {
                let hotel = self.hotel(h);
                (hotel.lat, hotel.lon)
            }
            Place::Attraction(a) => {
                let attraction = self.attraction(a);
                (attraction.lat, attraction.lon)
            }
        }
    }

    pub fn leg_lookup(&self, from: Place, to: Place, mode: TravelMode) -> Option<(u32, f64)> {
        let from_idx = self.place_index(from);
        let to_idx = self.place_index(to);
        self.matrices
            .duration_cost(from_idx, to_idx, mode, self.place_coord(from), self.place_coord(to))
    }

    /// Validates that every mode in `modes` has at least one feasible
    /// entry in the travel matrix, for callers (typically the external
    /// ingestion layer) that know in advance which transport modes this
    /// dataset is expected to cover. A dense matrix with zero entries for a
    /// required mode means the mode's data source was never loaded, which
    /// is fatal per §4.8/§7 of SPEC_FULL.md — distinct from a mode that is
    /// merely infeasible on a handful of legs, which the evaluator/repair
    /// pipeline already handles as a normal, recoverable outcome.
    pub fn require_modes(&self, modes: &[TravelMode]) -> Result<(), DataError> {
        for &mode in modes {
            if mode != TravelMode::Walk && !self.matrices.has_any_entry(mode) {
                return Err(DataError::MissingMatrix { mode });
            }
        }
        Ok(())
    }

    /// The fastest feasible mode for a leg, used by constructors as the
    /// default mode for newly inserted legs (§4.4 of SPEC_FULL.md).
    pub fn fastest_feasible_mode(&self, from: Place, to: Place) -> Option<TravelMode> {
        TravelMode::ALL
            .into_iter()
            .filter_map(|mode| self.leg_lookup(from, to, mode).map(|(minutes, _)| (mode, minutes)))
            .min_by_key(|&(_, minutes)| minutes)
            .map(|(mode, _)| mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attraction(id: usize) -> Attraction {
        Attraction {
            id: AttractionId(id),
            name: format!("poi-{id}"),
            lat: 0.0,
            lon: 0.0,
            visit_minutes: 30,
            open: 480,
            close: 1200,
            entrance_cost: 0.0,
            rating: 4.0,
        }
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let matrices = TravelMatrixSet::new(1);
        let err = ProblemData::new(Vec::new(), Vec::new(), matrices).unwrap_err();
        assert_eq!(err, DataError::EmptyCatalog);
    }

    #[test]
    fn non_positive_visit_duration_is_fatal() {
        let mut a = sample_attraction(0);
        a.visit_minutes = 0;
        let matrices = TravelMatrixSet::new(1);
        let err = ProblemData::new(vec![a], Vec::new(), matrices).unwrap_err();
        assert_eq!(err, DataError::NonPositiveVisitDuration { attraction: AttractionId(0) });
    }

    #[test]
    fn walk_falls_back_to_haversine_when_matrix_missing() {
        let matrices = TravelMatrixSet::new(2);
        let got = matrices.duration_cost(0, 1, TravelMode::Walk, (36.1, -115.1), (36.2, -115.2));
        assert!(got.is_some());
        assert!(got.unwrap().0 > 0);
    }

    #[test]
    fn non_walk_mode_without_entry_is_infeasible() {
        let matrices = TravelMatrixSet::new(2);
        assert!(matrices.duration_cost(0, 1, TravelMode::Car, (0.0, 0.0), (0.0, 0.0)).is_none());
    }

    #[test]
    fn require_modes_rejects_a_mode_with_no_entries_at_all() {
        let matrices = TravelMatrixSet::new(2);
        let attractions = vec![sample_attraction(0)];
        let hotels = vec![Hotel { id: HotelId(0), name: "h".into(), lat: 0.0, lon: 0.0, nightly_cost: 0.0 }];
        let data = ProblemData::new(attractions, hotels, matrices).unwrap();
        let err = data.require_modes(&[TravelMode::Subway]).unwrap_err();
        assert_eq!(err, DataError::MissingMatrix { mode: TravelMode::Subway });
    }

    #[test]
    fn require_modes_accepts_walk_even_without_dense_entries() {
        let matrices = TravelMatrixSet::new(2);
        let attractions = vec![sample_attraction(0)];
        let hotels = vec![Hotel { id: HotelId(0), name: "h".into(), lat: 0.0, lon: 0.0, nightly_cost: 0.0 }];
        let data = ProblemData::new(attractions, hotels, matrices).unwrap();
        assert!(data.require_modes(&[TravelMode::Walk]).is_ok());
    }

    #[test]
    fn fastest_feasible_mode_picks_minimum_duration() {
        let mut matrices = TravelMatrixSet::new(2);
        matrices.set(0, 1, TravelMode::Car, 10, 2.0);
        matrices.set(0, 1, TravelMode::Bus, 20, 1.0);
        let attractions = vec![sample_attraction(0)];
        let hotels = vec![Hotel { id: HotelId(0), name: "h".into(), lat: 0.0, lon: 0.0, nightly_cost: 0.0 }];
        let data = ProblemData::new(attractions, hotels, matrices).unwrap();
        let mode = data.fastest_feasible_mode(Place::Hotel(HotelId(0)), Place::Attraction(AttractionId(0)));
        assert_eq!(mode, Some(TravelMode::Car));
    }
}
