//! Saturation inference for modular polynomial inequalities.
//!
//! Given a conflict (a set of constraints false under the current
//! assignment) and a target variable, the [`Saturation`] engine tries a
//! fixed sequence of arithmetic inference rules over inequalities
//! between polynomials mod 2^K. Each rule pattern-matches a polynomial
//! shape in the distinguished variable, validates its side conditions
//! (non-overflow, parity, divisibility, non-zero) against the current
//! model and boolean trail, and emits a lemma clause whose antecedents
//! are recorded explicitly, so the surrounding SAT solver can use the
//! clause for unit propagation or conflict-driven learning.
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use polsat_core::{Conflict, SolverState};
//! use polsat_saturate::Saturation;
//!
//! let mut s = SolverState::new();
//! let x = s.add_var(4);
//! let y = s.add_var(4);
//! let z = s.add_var(4);
//! s.assign_value(x, BigUint::from(3u32)).unwrap();
//! s.assign_value(y, BigUint::from(2u32)).unwrap();
//! s.assign_value(z, BigUint::from(1u32)).unwrap();
//!
//! // y*x <= z*x is false under the model (6 <= 3 fails).
//! let c = s.ule(&(s.var(y) * s.var(x)), &(s.var(z) * s.var(x)));
//! s.assign_constraint(&c, false);
//!
//! let mut core = Conflict::new();
//! core.insert(c);
//!
//! let mut sat = Saturation::new();
//! assert!(sat.perform(&s, x, &mut core));
//! assert_eq!(core.lemmas().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod inequality;
mod lemma;
pub mod matching;
pub mod premise;
mod rules;
pub mod slices;

pub use engine::{Saturation, SaturationConfig, SaturationStats};
pub use inequality::Inequality;
pub use lemma::LemmaBuilder;
pub use slices::{FixedSlice, OffsetSlice};
