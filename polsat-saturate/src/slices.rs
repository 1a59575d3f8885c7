//! Read-only queries relating polynomial variables through the slice
//! e-graph.
//!
//! Each query walks the congruence closure from the slice node attached
//! to a polynomial variable and reports other theory variables sharing
//! a class with one of its slices, de-duplicated by theory variable.
//! Callers see polynomial-variable indices and bit offsets; e-graph
//! nodes stay internal except in the explanation sinks.

use num_bigint::BigUint;
use polsat_core::{NodeId, PVar, SolverState};
use rustc_hash::FxHashSet;

/// A theory variable overlapping another at a bit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSlice {
    /// The overlapping polynomial variable.
    pub var: PVar,
    /// Bit offset of the overlap.
    pub offset: u32,
}

/// A sub-range of a variable fixed to a numeric constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSlice {
    /// Low bit of the range.
    pub lo: u32,
    /// Width of the fixed slice's node (exclusive bound of the range).
    pub hi: u32,
    /// The constant value.
    pub value: BigUint,
}

fn collect_class_vars(
    s: &SolverState,
    n: NodeId,
    offset: u32,
    seen: &mut FxHashSet<u32>,
    out: &mut Vec<OffsetSlice>,
) {
    for sib in s.slices().class_iter(n) {
        let Some(w) = s.slices().th_var(sib) else {
            continue;
        };
        if !seen.insert(w) {
            continue;
        }
        let Some(p) = s.thvar_pdd(w) else {
            continue;
        };
        let Some(var) = p.as_var() else {
            continue;
        };
        out.push(OffsetSlice { var, offset });
    }
}

/// Variables equal to a suffix (offset-0 slice) of `pv`.
pub fn get_bitvector_suffixes(s: &SolverState, pv: PVar, out: &mut Vec<OffsetSlice>) {
    let Some(node) = s.slice_node(pv) else {
        return;
    };
    let mut seen = FxHashSet::default();
    s.slices().sub_slices(node, &mut |n, offset| {
        if offset != 0 {
            return false;
        }
        collect_class_vars(s, n, offset, &mut seen, out);
        true
    });
}

/// Variables equal to any slice of `pv`.
pub fn get_bitvector_sub_slices(s: &SolverState, pv: PVar, out: &mut Vec<OffsetSlice>) {
    let Some(node) = s.slice_node(pv) else {
        return;
    };
    let mut seen = FxHashSet::default();
    s.slices().sub_slices(node, &mut |n, offset| {
        collect_class_vars(s, n, offset, &mut seen, out);
        true
    });
}

/// Variables containing `pv` as a slice.
pub fn get_bitvector_super_slices(s: &SolverState, pv: PVar, out: &mut Vec<OffsetSlice>) {
    let Some(node) = s.slice_node(pv) else {
        return;
    };
    let mut seen = FxHashSet::default();
    s.slices().super_slices(node, &mut |n, offset| {
        collect_class_vars(s, n, offset, &mut seen, out);
        true
    });
}

/// Sub-ranges of `pv` fixed to interpreted constants.
///
/// Descent below a hit is terminated.
pub fn get_fixed_bits(s: &SolverState, pv: PVar, out: &mut Vec<FixedSlice>) {
    let Some(node) = s.slice_node(pv) else {
        return;
    };
    s.slices().sub_slices(node, &mut |n, offset| {
        if !s.slices().interpreted(n) {
            return true;
        }
        let root = s.slices().root(n);
        let Some(w) = s.slices().th_var(root) else {
            return true;
        };
        let Some(p) = s.thvar_pdd(w) else {
            return true;
        };
        if !p.is_var() {
            return true;
        }
        let Some(value) = s.slices().value(n) else {
            return true;
        };
        out.push(FixedSlice {
            lo: offset,
            hi: s.slices().width(n),
            value: value.clone(),
        });
        false
    });
}

/// Emit the equality pairs explaining why `pw` is the slice of `pv` at
/// `offset`. Returns false when the relation is not derivable.
pub fn explain_slice(
    s: &SolverState,
    pv: PVar,
    pw: PVar,
    offset: u32,
    consume_eq: &mut dyn FnMut(NodeId, NodeId),
) -> bool {
    let (Some(nv), Some(nw)) = (s.slice_node(pv), s.slice_node(pw)) else {
        return false;
    };
    s.slices().explain_slice(nv, offset, nw, consume_eq)
}

/// Emit the equality pairs explaining why bits `[lo, hi]` of `pv` are
/// fixed to `value`. Returns false when no interpreted node of the
/// derived width carries the value.
pub fn explain_fixed(
    s: &SolverState,
    pv: PVar,
    lo: u32,
    hi: u32,
    value: &BigUint,
    consume_eq: &mut dyn FnMut(NodeId, NodeId),
) -> bool {
    let Some(nv) = s.slice_node(pv) else {
        return false;
    };
    let width = hi - lo + 1;
    let Some(b) = s.slices().find_value(width, value) else {
        return false;
    };
    s.slices().explain_slice(nv, lo, b, consume_eq)
}
