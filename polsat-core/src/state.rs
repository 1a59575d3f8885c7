//! Solver-side state borrowed by the saturation engine.
//!
//! [`SolverState`] bundles what the rules read: the variable registry,
//! the partial model, the boolean valuation (with the constraint
//! interner mapping atoms to boolean variables), and the search trail.
//! It also hosts the constraint factory, so rule code can say
//! `s.eq(&p)` or `s.umul_ovfl(&a, &x)` the way the surrounding solver
//! does.

use crate::constraint::{Constraint, SignedConstraint};
use crate::egraph::{NodeId, SliceGraph};
use crate::error::{CoreError, CoreResult};
use crate::literal::{BVar, LBool, Lit};
use num_bigint::BigUint;
use num_traits::One;
use polsat_math::{Assignment, PVar, Pdd, PddManager};
use rustc_hash::FxHashMap;

/// An entry of the search trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchItem {
    /// A value assignment to a polynomial variable.
    Assignment {
        /// The assigned variable.
        var: PVar,
    },
    /// A boolean assignment of a constraint literal.
    Boolean {
        /// The literal assigned true.
        lit: Lit,
        /// True once conflict analysis has consumed this entry.
        resolved: bool,
    },
}

impl SearchItem {
    /// True for boolean entries.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, SearchItem::Boolean { .. })
    }

    /// True for boolean entries already consumed by conflict analysis.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, SearchItem::Boolean { resolved: true, .. })
    }

    /// The literal of a boolean entry.
    #[must_use]
    pub fn lit(&self) -> Option<Lit> {
        match self {
            SearchItem::Boolean { lit, .. } => Some(*lit),
            SearchItem::Assignment { .. } => None,
        }
    }
}

/// Variable registry, model, boolean valuation and trail.
#[derive(Debug, Default)]
pub struct SolverState {
    widths: Vec<u32>,
    assignment: Assignment,
    atoms: Vec<Constraint>,
    atom_ids: FxHashMap<Constraint, BVar>,
    bvalues: Vec<LBool>,
    search: Vec<SearchItem>,
    slices: SliceGraph,
    pvar_nodes: FxHashMap<PVar, NodeId>,
    thvar_pdds: Vec<Pdd>,
}

impl SolverState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Variables and the model

    /// Register a fresh polynomial variable of the given bit width.
    pub fn add_var(&mut self, width: u32) -> PVar {
        let v = self.widths.len() as PVar;
        self.widths.push(width);
        v
    }

    /// Number of registered variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.widths.len()
    }

    /// The polynomial manager for a variable's width.
    #[must_use]
    pub fn var2pdd(&self, v: PVar) -> PddManager {
        PddManager::new(self.widths[v as usize])
    }

    /// The polynomial consisting of variable `v`.
    #[must_use]
    pub fn var(&self, v: PVar) -> Pdd {
        self.var2pdd(v).var(v)
    }

    /// True if `v` has a committed value.
    #[must_use]
    pub fn is_assigned(&self, v: PVar) -> bool {
        self.assignment.contains_key(&v)
    }

    /// The committed value of `v`, if any.
    #[must_use]
    pub fn value(&self, v: PVar) -> Option<&BigUint> {
        self.assignment.get(&v)
    }

    /// The current partial model.
    #[must_use]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Commit a value for `v` and push it on the trail.
    pub fn assign_value(&mut self, v: PVar, value: BigUint) -> CoreResult<()> {
        let width = *self
            .widths
            .get(v as usize)
            .ok_or(CoreError::UnknownVar(v))?;
        if value >= BigUint::one() << width {
            return Err(CoreError::ValueOutOfRange { value, width });
        }
        self.assignment.insert(v, value);
        self.search.push(SearchItem::Assignment { var: v });
        Ok(())
    }

    /// Evaluate a polynomial under the current model.
    #[must_use]
    pub fn try_eval(&self, p: &Pdd) -> Option<BigUint> {
        p.try_eval(&self.assignment)
    }

    // ------------------------------------------------------------------
    // Boolean valuation and the trail

    /// Assign `c` true on the boolean trail; interns the atom if needed
    /// and pushes a boolean trail entry. Returns the assigned literal.
    pub fn assign_constraint(&mut self, c: &SignedConstraint, resolved: bool) -> Lit {
        let var = self.intern(c.cnstr());
        self.bvalues[var as usize] = LBool::from_bool(c.is_positive());
        let lit = Lit::new(var, c.is_positive());
        self.search.push(SearchItem::Boolean { lit, resolved });
        lit
    }

    fn intern(&mut self, atom: &Constraint) -> BVar {
        if let Some(&var) = self.atom_ids.get(atom) {
            return var;
        }
        let var = self.atoms.len() as BVar;
        self.atoms.push(atom.clone());
        self.atom_ids.insert(atom.clone(), var);
        self.bvalues.push(LBool::Undef);
        var
    }

    /// Boolean valuation of a constraint; `Undef` when its atom was
    /// never assigned.
    #[must_use]
    pub fn bvalue(&self, c: &SignedConstraint) -> LBool {
        match self.atom_ids.get(c.cnstr()) {
            Some(&var) => {
                let v = self.bvalues[var as usize];
                if c.is_positive() {
                    v
                } else {
                    v.negate()
                }
            }
            None => LBool::Undef,
        }
    }

    /// Boolean valuation of a literal.
    #[must_use]
    pub fn bvalue_lit(&self, lit: Lit) -> LBool {
        let v = self.bvalues[lit.atom() as usize];
        if lit.is_positive() {
            v
        } else {
            v.negate()
        }
    }

    /// The signed constraint a literal stands for.
    #[must_use]
    pub fn lit2cnstr(&self, lit: Lit) -> SignedConstraint {
        let atom = self.atoms[lit.atom() as usize].clone();
        if lit.is_positive() {
            SignedConstraint::positive(atom)
        } else {
            SignedConstraint::negative(atom)
        }
    }

    /// The search trail, in assignment order.
    #[must_use]
    pub fn search(&self) -> &[SearchItem] {
        &self.search
    }

    /// Mark the boolean trail entry for `lit` as resolved.
    pub fn resolve(&mut self, lit: Lit) {
        for item in &mut self.search {
            if let SearchItem::Boolean { lit: l, resolved } = item {
                if *l == lit {
                    *resolved = true;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Constraint factory

    /// `lhs <= rhs`.
    #[must_use]
    pub fn ule(&self, lhs: &Pdd, rhs: &Pdd) -> SignedConstraint {
        SignedConstraint::positive(Constraint::Ule {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        })
    }

    /// `lhs < rhs`, as the negation of `rhs <= lhs`.
    #[must_use]
    pub fn ult(&self, lhs: &Pdd, rhs: &Pdd) -> SignedConstraint {
        !self.ule(rhs, lhs)
    }

    /// `p = 0`.
    #[must_use]
    pub fn eq(&self, p: &Pdd) -> SignedConstraint {
        self.ule(p, &p.manager().zero())
    }

    /// `p = k`, with `k` a signed value that wraps mod 2^K.
    #[must_use]
    pub fn eq_val(&self, p: &Pdd, k: i64) -> SignedConstraint {
        let m = p.manager();
        self.eq(&(p - &m.from_signed(k)))
    }

    /// `p >= k`.
    #[must_use]
    pub fn uge(&self, p: &Pdd, k: &BigUint) -> SignedConstraint {
        self.ule(&p.manager().constant(k.clone()), p)
    }

    /// `p * q` overflows mod 2^K.
    #[must_use]
    pub fn umul_ovfl(&self, p: &Pdd, q: &Pdd) -> SignedConstraint {
        SignedConstraint::positive(Constraint::UmulOvfl {
            p: p.clone(),
            q: q.clone(),
        })
    }

    /// The low `k` bits of `p` are zero, expressed as `p * 2^(K-k) = 0`.
    #[must_use]
    pub fn parity(&self, p: &Pdd, k: u32) -> SignedConstraint {
        let m = p.manager();
        debug_assert!(k <= m.power_of_2());
        let shift = m.power_of_2() - k;
        self.eq(&(p * &m.constant(BigUint::one() << shift)))
    }

    /// `p` is even.
    #[must_use]
    pub fn even(&self, p: &Pdd) -> SignedConstraint {
        self.parity(p, 1)
    }

    /// `p` is odd.
    #[must_use]
    pub fn odd(&self, p: &Pdd) -> SignedConstraint {
        !self.even(p)
    }

    // ------------------------------------------------------------------
    // Slice e-graph bindings

    /// Read access to the slice e-graph.
    #[must_use]
    pub fn slices(&self) -> &SliceGraph {
        &self.slices
    }

    /// Mutable access to the slice e-graph.
    pub fn slices_mut(&mut self) -> &mut SliceGraph {
        &mut self.slices
    }

    /// Associate a polynomial variable with its slice node.
    pub fn attach_slice_node(&mut self, v: PVar, node: NodeId) {
        self.pvar_nodes.insert(v, node);
    }

    /// The slice node of a polynomial variable, if attached.
    #[must_use]
    pub fn slice_node(&self, v: PVar) -> Option<NodeId> {
        self.pvar_nodes.get(&v).copied()
    }

    /// Bind a fresh theory variable to `node`, carrying the polynomial
    /// the theory associates with it.
    pub fn bind_theory_var(&mut self, node: NodeId, p: Pdd) -> u32 {
        let tv = self.thvar_pdds.len() as u32;
        self.thvar_pdds.push(p);
        self.slices.set_th_var(node, tv);
        tv
    }

    /// The polynomial bound to a theory variable.
    #[must_use]
    pub fn thvar_pdd(&self, tv: u32) -> Option<&Pdd> {
        self.thvar_pdds.get(tv as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_eval() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        s.assign_value(x, BigUint::from(3u32)).unwrap();
        s.assign_value(y, BigUint::from(5u32)).unwrap();
        let m = s.var2pdd(x);
        let p = s.var(x) * s.var(y) + m.one();
        assert_eq!(s.try_eval(&p), Some(BigUint::from(0u32))); // 16 mod 16
        assert!(matches!(
            s.assign_value(x, BigUint::from(16u32)),
            Err(CoreError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            s.assign_value(99, BigUint::from(1u32)),
            Err(CoreError::UnknownVar(99))
        ));
    }

    #[test]
    fn test_bvalue_roundtrip() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let c = s.eq(&s.var(x));
        assert_eq!(s.bvalue(&c), LBool::Undef);
        let lit = s.assign_constraint(&!&c, false);
        assert_eq!(s.bvalue(&c), LBool::False);
        assert_eq!(s.bvalue(&!&c), LBool::True);
        assert_eq!(s.bvalue_lit(lit), LBool::True);
        assert_eq!(s.lit2cnstr(lit), !&c);
    }

    #[test]
    fn test_trail_order() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        let c = s.ule(&s.var(x), &s.var(y));
        s.assign_value(x, BigUint::from(1u32)).unwrap();
        let lit = s.assign_constraint(&c, false);
        assert_eq!(s.search().len(), 2);
        assert!(!s.search()[0].is_boolean());
        assert!(s.search()[1].is_boolean());
        assert!(!s.search()[1].is_resolved());
        s.resolve(lit);
        assert!(s.search()[1].is_resolved());
    }

    #[test]
    fn test_factory_semantics() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        s.assign_value(x, BigUint::from(6u32)).unwrap();
        let xv = s.var(x);

        // 6 = 6, 6 < 7, 6 >= 6
        assert!(s.eq_val(&xv, 6).is_currently_true(&s));
        assert!(s.ult(&xv, &s.var2pdd(x).constant(BigUint::from(7u32))).is_currently_true(&s));
        assert!(s.uge(&xv, &BigUint::from(6u32)).is_currently_true(&s));
        assert!(s.uge(&xv, &BigUint::from(7u32)).is_currently_false(&s));

        // 6 is even with parity exactly 1
        assert!(s.even(&xv).is_currently_true(&s));
        assert!(s.odd(&xv).is_currently_false(&s));
        assert!(s.parity(&xv, 1).is_currently_true(&s));
        assert!(s.parity(&xv, 2).is_currently_false(&s));

        // parity(x, 0) is trivially true
        assert!(s.parity(&xv, 0).is_currently_true(&s));
    }

    #[test]
    fn test_eq_val_wraps() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        s.assign_value(x, BigUint::from(15u32)).unwrap();
        assert!(s.eq_val(&s.var(x), -1).is_currently_true(&s));
    }
}
