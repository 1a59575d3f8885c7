//! Modular polynomial arithmetic for the polsat solver.
//!
//! This crate provides the polynomial representation the saturation core
//! reasons over: multivariate polynomials with coefficients in Z/2^K
//! (fixed-width, wrap-around semantics), together with the structural
//! queries conflict inference needs:
//!
//! - degree of a variable, linear factorisation `p = a*v + b`
//! - exact division by an integer constant
//! - partial evaluation under a variable assignment
//! - shape predicates (`is_val`, `is_var`, `is_unary`, `is_one`, `is_max`)
//!
//! # Examples
//!
//! ```
//! use polsat_math::{Pdd, PddManager};
//!
//! let m = PddManager::new(4); // arithmetic mod 2^4
//! let x = m.var(0);
//! let p = m.from_signed(3) * x.clone() + m.from_signed(-1);
//!
//! let (a, b) = p.factor(0, 1);
//! assert_eq!(a, m.from_signed(3));
//! assert_eq!(b, m.from_signed(-1));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod monomial;
mod pdd;

pub use monomial::{Monomial, VarPower};
pub use pdd::{Assignment, Pdd, PddManager};

/// Identifier of a polynomial variable (a symbolic bit-vector).
pub type PVar = u32;

/// Sentinel for "no variable".
pub const NULL_PVAR: PVar = u32::MAX;
