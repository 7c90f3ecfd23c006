//! Small, realistic two-day-itinerary catalog built from real Las Vegas
//! Strip coordinates, reused here from the teacher's OSRM fixture set.
//! `Car` legs are a fixed multiple faster than the haversine `Walk`
//! fallback, giving N7 (change transport mode) something real to trade
//! off between F3 (time) and F4 (cost).

use movns_planner::catalog::{Attraction, AttractionId, Hotel, HotelId, ProblemData, TravelMatrixSet, TravelMode};

pub struct NamedPoint {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const HOTEL: NamedPoint = NamedPoint { name: "Bellagio", lat: 36.1126, lon: -115.1767 };

pub const ATTRACTIONS: &[NamedPoint] = &[
    NamedPoint { name: "Wynn Las Vegas", lat: 36.1263781, lon: -115.1658180 },
    NamedPoint { name: "Caesars Palace", lat: 36.1162, lon: -115.1745 },
    NamedPoint { name: "MGM Grand", lat: 36.1023654, lon: -115.1688720 },
    NamedPoint { name: "The Venetian", lat: 36.1214, lon: -115.1697 },
    NamedPoint { name: "Fremont Street Experience", lat: 36.1699, lon: -115.1436 },
    NamedPoint { name: "Neon Museum", lat: 36.1725, lon: -115.1395 },
];

/// Builds a one-hotel, six-attraction catalog. `Walk` legs use the
/// haversine fallback; `Car` legs are set to a third of the walking
/// duration at a small monetary cost, so N7 has a genuine trade-off.
pub fn build() -> ProblemData {
    let hotels = vec![Hotel { id: HotelId(0), name: HOTEL.name.into(), lat: HOTEL.lat, lon: HOTEL.lon, nightly_cost: 220.0 }];

    let attractions: Vec<Attraction> = ATTRACTIONS
        .iter()
        .enumerate()
        .map(|(i, p)| Attraction {
            id: AttractionId(i),
            name: p.name.into(),
            lat: p.lat,
            lon: p.lon,
            visit_minutes: 60 + (i as u32 % 3) * 30,
            open: 540,  // 09:00
            close: 1320, // 22:00
            entrance_cost: (i as f64) * 4.0,
            rating: 3.5 + (i as f64 % 4.0) * 0.35,
        })
        .collect();

    let places: Vec<(f64, f64)> = std::iter::once((HOTEL.lat, HOTEL.lon))
        .chain(ATTRACTIONS.iter().map(|p| (p.lat, p.lon)))
        .collect();
    let n = places.len();
    let mut matrices = TravelMatrixSet::new(n);
    let haversine = movns_planner::haversine::HaversineMatrix::default();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let walk_minutes = haversine.minutes(places[i], places[j]);
            matrices.set(i, j, TravelMode::Walk, walk_minutes, 0.0);
            matrices.set(i, j, TravelMode::Car, (walk_minutes / 3).max(2), 6.0);
        }
    }

    ProblemData::new(attractions, hotels, matrices).expect("fixture catalog must be valid")
}
