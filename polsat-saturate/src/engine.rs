//! The saturation rule engine.
//!
//! [`Saturation::perform`] walks the conflict's constraints and tries
//! the rules in a fixed order, stopping at the first one that fires.
//! Multiplicative-bound and parity rules come first because they give
//! the strongest propagations when they apply; the overflow-guarded
//! chaining rules need a trail literal to pair with the inequality and
//! come next; the tangent rule always applies in principle and would
//! mask more informative derivations, so it runs last.

use crate::inequality::Inequality;
use crate::lemma::LemmaBuilder;
use crate::premise::{is_forced_false, is_forced_true};
use polsat_core::{Conflict, LBool, PVar, Pdd, SignedConstraint, SolverState};
use tracing::{debug, trace};

/// Gates for the rule families tried by [`Saturation::perform`].
#[derive(Debug, Clone)]
pub struct SaturationConfig {
    /// Enable the multiplicative bound rule.
    pub enable_mul_bounds: bool,
    /// Enable parity propagation.
    pub enable_parity: bool,
    /// Enable factor-equality rewriting.
    pub enable_factor_equality: bool,
    /// Enable the overflow-guarded monotonicity rules (ugt_x/y/z).
    pub enable_ugt: bool,
    /// Enable inequality chaining through a trail literal.
    pub enable_chain: bool,
    /// Enable the tangent fallback rule.
    pub enable_tangent: bool,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            enable_mul_bounds: true,
            enable_parity: true,
            enable_factor_equality: true,
            enable_ugt: true,
            enable_chain: true,
            enable_tangent: true,
        }
    }
}

/// Counters over the engine's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SaturationStats {
    /// Constraints handed to the rule chain.
    pub attempts: u64,
    /// Lemmas finalised as propagations.
    pub propagations: u64,
    /// Lemmas finalised as conflicts.
    pub conflicts: u64,
}

/// The saturation engine.
///
/// Owns the lemma builder (reused across rule attempts) and the tag of
/// the rule currently being tried. All solver state is borrowed per
/// call.
#[derive(Debug, Default)]
pub struct Saturation {
    pub(crate) lemma: LemmaBuilder,
    pub(crate) rule: &'static str,
    config: SaturationConfig,
    stats: SaturationStats,
}

impl Saturation {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with an explicit configuration.
    #[must_use]
    pub fn with_config(config: SaturationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The engine's counters.
    #[must_use]
    pub fn stats(&self) -> &SaturationStats {
        &self.stats
    }

    /// Install the tag stored with the next emitted lemma.
    pub fn set_rule(&mut self, tag: &'static str) {
        self.rule = tag;
    }

    /// The tag of the rule currently being tried.
    #[must_use]
    pub fn rule(&self) -> &'static str {
        self.rule
    }

    /// Try to derive one lemma for variable `v` from the conflict.
    ///
    /// Returns true when a rule fired; at most one lemma is added per
    /// call.
    pub fn perform(&mut self, s: &SolverState, v: PVar, core: &mut Conflict) -> bool {
        let cnstrs: Vec<SignedConstraint> = core.iter().cloned().collect();
        for c in &cnstrs {
            if self.perform_on(s, v, c, core) {
                return true;
            }
        }
        false
    }

    /// Try the rule chain on a single conflict constraint.
    pub fn perform_on(
        &mut self,
        s: &SolverState,
        v: PVar,
        c: &SignedConstraint,
        core: &mut Conflict,
    ) -> bool {
        self.stats.attempts += 1;
        trace!(var = v, cnstr = %c, "saturate");
        if !c.is_ule() {
            return false;
        }
        if c.is_currently_true(s) {
            return false;
        }
        let Some(i) = Inequality::from_ule(c) else {
            return false;
        };
        if self.config.enable_mul_bounds && self.try_mul_bounds(s, v, core, &i) {
            return true;
        }
        if self.config.enable_parity && self.try_parity(s, v, core, &i) {
            return true;
        }
        if self.config.enable_factor_equality && self.try_factor_equality(s, v, core, &i) {
            return true;
        }
        if self.config.enable_ugt && self.try_ugt_x(s, v, core, &i) {
            return true;
        }
        if self.config.enable_ugt && self.try_ugt_y(s, v, core, &i) {
            return true;
        }
        if self.config.enable_ugt && self.try_ugt_z(s, v, core, &i) {
            return true;
        }
        if self.config.enable_chain && self.try_y_l_ax_and_x_l_z(s, v, core, &i) {
            return true;
        }
        if self.config.enable_tangent && self.try_tangent(s, v, core, &i) {
            return true;
        }
        false
    }

    /// A `<=` or `<` constraint matching the given strictness.
    pub(crate) fn ineq(
        &self,
        s: &SolverState,
        strict: bool,
        lhs: &Pdd,
        rhs: &Pdd,
    ) -> SignedConstraint {
        if strict {
            s.ult(lhs, rhs)
        } else {
            s.ule(lhs, rhs)
        }
    }

    /// Finalise the accumulated lemma as a propagation of `c`.
    ///
    /// The critical premise is added negated; every literal collected so
    /// far must be forced false. Yields false when `c` is already
    /// forced true (the propagation would be redundant).
    pub(crate) fn propagate(
        &mut self,
        s: &SolverState,
        core: &mut Conflict,
        crit: &Inequality,
        c: SignedConstraint,
    ) -> bool {
        if is_forced_true(s, &c) {
            return false;
        }
        self.lemma.insert(!crit.as_signed_constraint());
        debug!(rule = self.rule, conseq = %c, "propagate");
        debug_assert!(
            self.lemma.iter().all(|l| is_forced_false(s, &l.cnstr)),
            "propagation premises must be forced false"
        );
        self.lemma.insert(c);
        core.add_lemma(self.rule, self.lemma.build());
        self.stats.propagations += 1;
        true
    }

    /// Finalise the accumulated lemma as a conflict with one critical
    /// premise.
    pub(crate) fn add_conflict(
        &mut self,
        s: &SolverState,
        core: &mut Conflict,
        crit: &Inequality,
        c: SignedConstraint,
    ) -> bool {
        self.add_conflict2(s, core, crit, crit, c)
    }

    /// Finalise the accumulated lemma as a conflict with two critical
    /// premises.
    ///
    /// The consequent must be forced false and must not already be
    /// assigned true on the trail (the lemma would derive nothing new).
    pub(crate) fn add_conflict2(
        &mut self,
        s: &SolverState,
        core: &mut Conflict,
        crit1: &Inequality,
        crit2: &Inequality,
        c: SignedConstraint,
    ) -> bool {
        let crit1 = crit1.as_signed_constraint();
        let crit2 = crit2.as_signed_constraint();
        self.lemma.insert(!crit1);
        if crit1 != crit2 {
            self.lemma.insert(!crit2);
        }
        debug!(rule = self.rule, critical = %crit1, conseq = %c, "conflict");
        debug_assert!(
            self.lemma.iter().all(|l| is_forced_false(s, &l.cnstr)),
            "conflict premises must be forced false"
        );
        if !is_forced_false(s, &c) {
            return false;
        }
        if c.bvalue(s) == LBool::True {
            return false;
        }
        self.lemma.insert_eval(c);
        core.add_lemma(self.rule, self.lemma.build());
        self.stats.conflicts += 1;
        true
    }
}
