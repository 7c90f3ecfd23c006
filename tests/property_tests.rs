//! Property tests for the dominance relation and HV-truncation determinism
//! (§8 of SPEC_FULL.md: "Dominance is reflexive-free, antisymmetric, and
//! transitive (property-test)"; "HV truncation is deterministic given
//! identical input and reference point").

use movns_planner::archive::Archive;
use movns_planner::catalog::HotelId;
use movns_planner::hypervolume::{hypervolume, worst_observed, ReferencePoint};
use movns_planner::model::{DayRoute, Objectives, Solution};
use proptest::prelude::*;

fn arb_objectives() -> impl Strategy<Value = Objectives> {
    (0u32..20, 0.0f64..25.0, 0u32..2000, 0.0f64..500.0)
        .prop_map(|(f1, f2, f3, f4)| Objectives { f1, f2, f3, f4 })
}

fn solution_with(objectives: Objectives) -> Solution {
    let hotel = HotelId(0);
    let day = DayRoute::new(hotel);
    Solution::new(day.clone(), day, objectives, true)
}

proptest! {
    /// No objective vector dominates itself.
    #[test]
    fn dominance_is_irreflexive(a in arb_objectives()) {
        prop_assert!(!a.dominates(&a));
    }

    /// If `a` dominates `b`, `b` never dominates `a`.
    #[test]
    fn dominance_is_antisymmetric(a in arb_objectives(), b in arb_objectives()) {
        if a.dominates(&b) {
            prop_assert!(!b.dominates(&a));
        }
    }

    /// Dominance chains transitively: `a` dominates `b` dominates `c`
    /// implies `a` dominates `c`.
    #[test]
    fn dominance_is_transitive(a in arb_objectives(), b in arb_objectives(), c in arb_objectives()) {
        if a.dominates(&b) && b.dominates(&c) {
            prop_assert!(a.dominates(&c));
        }
    }

    /// An archive never ends up with a member dominating another,
    /// regardless of insertion order.
    #[test]
    fn archive_insertion_never_leaves_dominated_pairs(points in prop::collection::vec(arb_objectives(), 0..12)) {
        let mut archive = Archive::new(5);
        for objectives in points {
            archive.try_insert(solution_with(objectives));
        }
        prop_assert!(archive.is_mutually_nondominated());
        prop_assert!(archive.len() <= 5);
    }

    /// HV-truncation is a deterministic function of its input set and
    /// reference point: replaying the same insertion sequence twice always
    /// yields archives with the same objective multiset.
    #[test]
    fn hv_truncation_is_deterministic_given_same_input(points in prop::collection::vec(arb_objectives(), 0..12)) {
        let mut a = Archive::new(4);
        let mut b = Archive::new(4);
        for objectives in &points {
            a.try_insert(solution_with(*objectives));
        }
        for objectives in &points {
            b.try_insert(solution_with(*objectives));
        }
        let mut a_objs: Vec<_> = a.members().iter().map(|m| m.objectives).collect();
        let mut b_objs: Vec<_> = b.members().iter().map(|m| m.objectives).collect();
        let key = |o: &Objectives| (o.f1, (o.f2 * 1000.0) as i64, o.f3, (o.f4 * 1000.0) as i64);
        a_objs.sort_by_key(key);
        b_objs.sort_by_key(key);
        prop_assert_eq!(a_objs, b_objs);
    }

    /// Hyper-volume never decreases when a non-dominated point is added to
    /// a front, for any fixed reference point that weakly dominates every
    /// point in play (§8 property 4: elitism under insert/truncate).
    #[test]
    fn hypervolume_is_monotone_under_union(points in prop::collection::vec(arb_objectives(), 1..8)) {
        let reference = ReferencePoint { f1: -1.0, f2: -1.0, f3: 5000.0, f4: 2000.0 };
        let base_hv = hypervolume(&points[..points.len() - 1], &reference);
        let extended_hv = hypervolume(&points, &reference);
        prop_assert!(extended_hv >= base_hv - 1e-9);
    }

    /// `worst_observed` always returns a point weakly dominated by (i.e. at
    /// least as bad as) every input point on every axis.
    #[test]
    fn worst_observed_is_weakly_worse_than_every_point(points in prop::collection::vec(arb_objectives(), 1..10)) {
        let reference = worst_observed(&points);
        for o in &points {
            prop_assert!(reference.f1 <= o.f1 as f64);
            prop_assert!(reference.f2 <= o.f2);
            prop_assert!(reference.f3 >= o.f3 as f64);
            prop_assert!(reference.f4 >= o.f4);
        }
    }
}
