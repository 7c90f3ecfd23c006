//! Exact 4-objective dominated hyper-volume (HV), computed by recursive
//! dimension slicing (the HSO/WFG family of exact algorithms named in
//! §4.7 of SPEC_FULL.md). Approximation is not acceptable here because the
//! quality monitor uses HV monotonicity to decide termination.

use crate::model::Objectives;

/// A reference point in raw objective units (not yet negated/transformed).
/// Callers build this from the "worst observed" values per axis, with
/// whatever slack policy applies to them (Archive truncation vs. the
/// Quality Monitor use different slack rules - see §4.3/§4.7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
}

/// Raw worst-observed value per axis across a set of objective vectors:
/// minimum for the maximized axes (F1, F2), maximum for the minimized axes
/// (F3, F4). Callers apply their own slack on top of this.
pub fn worst_observed(objs: &[Objectives]) -> ReferencePoint {
    let mut f1 = f64::INFINITY;
    let mut f2 = f64::INFINITY;
    let mut f3 = f64::NEG_INFINITY;
    let mut f4 = f64::NEG_INFINITY;
    for o in objs {
        f1 = f1.min(o.f1 as f64);
        f2 = f2.min(o.f2);
        f3 = f3.max(o.f3 as f64);
        f4 = f4.max(o.f4);
    }
    ReferencePoint { f1, f2, f3, f4 }
}

fn to_min_space(o: &Objectives) -> [f64; 4] {
    [-(o.f1 as f64), -o.f2, o.f3 as f64, o.f4]
}

fn ref_to_min_space(r: &ReferencePoint) -> [f64; 4] {
    [-r.f1, -r.f2, r.f3, r.f4]
}

/// Dominated hyper-volume of `objs` relative to `reference`, with maximized
/// objectives (F1, F2) negated per the glossary definition of HV. Points
/// that do not dominate the reference on some axis are clipped to it
/// rather than excluded, so a partially-dominating point still
/// contributes its dominating slices.
pub fn hypervolume(objs: &[Objectives], reference: &ReferencePoint) -> f64 {
    if objs.is_empty() {
        return 0.0;
    }
    let ref_vec = ref_to_min_space(reference);
    let points: Vec<Vec<f64>> = objs
        .iter()
        .map(|o| {
            let raw = to_min_space(o);
            (0..4).map(|i| raw[i].min(ref_vec[i])).collect()
        })
        .collect();
    hv_recursive(points, &ref_vec)
}

/// Generic exact volume of the union of axis-aligned boxes `[p, reference]`
/// for `p` in `points`, via recursive slicing on the last coordinate. Does
/// not assume `points` form a non-dominated front.
fn hv_recursive(mut points: Vec<Vec<f64>>, reference: &[f64]) -> f64 {
    let dim = reference.len();
    if points.is_empty() || dim == 0 {
        return 0.0;
    }
    if dim == 1 {
        let min_coord = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - min_coord).max(0.0);
    }

    let last = dim - 1;
    points.sort_by(|a, b| a[last].partial_cmp(&b[last]).expect("NaN objective coordinate"));

    let mut volume = 0.0;
    for i in 0..points.len() {
        let z = points[i][last];
        let next_z = if i + 1 < points.len() { points[i + 1][last] } else { reference[last] };
        let height = next_z - z;
        if height <= 0.0 {
            continue;
        }
        let subset: Vec<Vec<f64>> = points[..=i].iter().map(|p| p[..last].to_vec()).collect();
        volume += height * hv_recursive(subset, &reference[..last]);
    }
    volume
}
