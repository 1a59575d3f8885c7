//! Core state for the polsat saturation engine.
//!
//! This crate provides everything the saturation rules borrow from the
//! surrounding SAT solver:
//!
//! - [`Lit`]/[`LBool`]: boolean literals and three-valued assignment
//! - [`SignedConstraint`]: atomic theory propositions with polarity
//! - [`SolverState`]: variable registry, partial model, boolean trail,
//!   and the constraint factory
//! - [`Conflict`]: the carrier of premises and derived lemmas during
//!   conflict analysis
//! - [`SliceGraph`]: congruence closure over bit-vector slices, used to
//!   relate polynomial variables to sub-ranges of other variables

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod constraint;
mod conflict;
mod egraph;
mod error;
mod literal;
mod state;

pub use conflict::{Clause, ClauseLit, Conflict, Lemma};
pub use constraint::{Constraint, SignedConstraint};
pub use egraph::{NodeId, SliceGraph};
pub use error::{CoreError, CoreResult};
pub use literal::{BVar, LBool, Lit};
pub use state::{SearchItem, SolverState};

pub use polsat_math::{Assignment, Pdd, PddManager, PVar};
