//! Accumulator for lemma clauses under construction.

use polsat_core::{Clause, ClauseLit, SignedConstraint};
use smallvec::SmallVec;

/// Builds a lemma clause one literal at a time.
///
/// Literals come in two strengths: [`insert_eval`](Self::insert_eval)
/// adds a model-witness literal (expected to be false under the current
/// assignment), [`insert`](Self::insert) adds a literal backed by the
/// boolean trail. The distinction is carried into the finished clause.
/// Storage is reused across rule attempts; rules call
/// [`reset`](Self::reset) before filling it.
#[derive(Debug, Default)]
pub struct LemmaBuilder {
    lits: SmallVec<[ClauseLit; 8]>,
}

impl LemmaBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all accumulated literals.
    pub fn reset(&mut self) {
        self.lits.clear();
    }

    /// Add a trail-backed literal; duplicates are ignored.
    pub fn insert(&mut self, c: SignedConstraint) {
        self.push(c, false);
    }

    /// Add a model-witness literal; duplicates are ignored.
    pub fn insert_eval(&mut self, c: SignedConstraint) {
        self.push(c, true);
    }

    fn push(&mut self, c: SignedConstraint, from_eval: bool) {
        if !self.lits.iter().any(|l| l.cnstr == c) {
            self.lits.push(ClauseLit {
                cnstr: c,
                from_eval,
            });
        }
    }

    /// Iterate the accumulated literals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ClauseLit> {
        self.lits.iter()
    }

    /// Number of accumulated literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// True when no literal was added since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Finish the clause, draining the builder.
    pub fn build(&mut self) -> Clause {
        Clause::new(self.lits.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polsat_core::SolverState;

    #[test]
    fn test_insert_order_and_tags() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let y = s.add_var(4);
        let c1 = s.eq(&s.var(x));
        let c2 = s.ule(&s.var(x), &s.var(y));

        let mut b = LemmaBuilder::new();
        b.insert_eval(c1.clone());
        b.insert(c2.clone());
        b.insert_eval(c1.clone()); // duplicate, dropped
        assert_eq!(b.len(), 2);

        let clause = b.build();
        assert!(b.is_empty());
        assert_eq!(clause.lits()[0].cnstr, c1);
        assert!(clause.lits()[0].from_eval);
        assert_eq!(clause.lits()[1].cnstr, c2);
        assert!(!clause.lits()[1].from_eval);
    }

    #[test]
    fn test_reset_reuses_storage() {
        let mut s = SolverState::new();
        let x = s.add_var(4);
        let c = s.eq(&s.var(x));
        let mut b = LemmaBuilder::new();
        b.insert(c.clone());
        b.reset();
        assert!(b.is_empty());
        b.insert(c);
        assert_eq!(b.len(), 1);
    }
}
