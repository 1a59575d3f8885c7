//! Canonical polynomials with coefficients in Z/2^K.
//!
//! A [`Pdd`] is kept in normal form: terms sorted in decreasing lex
//! order, coefficients reduced mod 2^K, zero terms removed. Equality and
//! hashing are therefore structural, which the constraint interner in
//! the core crate relies on.
//!
//! A [`PddManager`] is a cheap per-width factory; the width travels with
//! every polynomial so binary operations can check agreement.

use crate::monomial::Monomial;
use crate::PVar;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Partial assignment of concrete values to polynomial variables.
pub type Assignment = FxHashMap<PVar, BigUint>;

/// Factory for polynomials of a fixed bit width K.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PddManager {
    width: u32,
}

impl PddManager {
    /// Create a manager for arithmetic mod 2^`width`.
    #[must_use]
    pub fn new(width: u32) -> Self {
        debug_assert!(width >= 1);
        Self { width }
    }

    /// The bit width K.
    #[inline]
    #[must_use]
    pub fn power_of_2(&self) -> u32 {
        self.width
    }

    /// The modulus 2^K.
    #[must_use]
    pub fn two_to_n(&self) -> BigUint {
        BigUint::one() << self.width
    }

    /// The largest representable value, 2^K - 1.
    #[must_use]
    pub fn max_value(&self) -> BigUint {
        self.two_to_n() - BigUint::one()
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero(&self) -> Pdd {
        Pdd {
            width: self.width,
            terms: Vec::new(),
        }
    }

    /// The constant one.
    #[must_use]
    pub fn one(&self) -> Pdd {
        self.constant(BigUint::one())
    }

    /// A constant polynomial, reduced mod 2^K.
    #[must_use]
    pub fn constant(&self, value: BigUint) -> Pdd {
        let value = value % self.two_to_n();
        if value.is_zero() {
            return self.zero();
        }
        Pdd {
            width: self.width,
            terms: vec![PddTerm {
                coeff: value,
                mono: Monomial::unit(),
            }],
        }
    }

    /// A constant from a signed integer; negative values wrap.
    #[must_use]
    pub fn from_signed(&self, value: i64) -> Pdd {
        if value >= 0 {
            self.constant(BigUint::from(value as u64))
        } else {
            let m = self.two_to_n();
            let abs = BigUint::from(value.unsigned_abs()) % &m;
            self.constant(m - abs)
        }
    }

    /// The polynomial consisting of a single variable.
    #[must_use]
    pub fn var(&self, var: PVar) -> Pdd {
        Pdd {
            width: self.width,
            terms: vec![PddTerm {
                coeff: BigUint::one(),
                mono: Monomial::from_var(var),
            }],
        }
    }
}

/// A term: coefficient times monomial.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PddTerm {
    coeff: BigUint,
    mono: Monomial,
}

/// A multivariate polynomial mod 2^K, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pdd {
    width: u32,
    terms: Vec<PddTerm>,
}

impl Pdd {
    /// The bit width K of this polynomial.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The manager for this polynomial's width.
    #[inline]
    #[must_use]
    pub fn manager(&self) -> PddManager {
        PddManager::new(self.width)
    }

    /// True for the zero polynomial.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if this polynomial is a constant (including zero).
    #[must_use]
    pub fn is_val(&self) -> bool {
        self.terms.is_empty() || (self.terms.len() == 1 && self.terms[0].mono.is_unit())
    }

    /// The constant value, if this polynomial is a constant.
    #[must_use]
    pub fn as_val(&self) -> Option<BigUint> {
        if self.terms.is_empty() {
            return Some(BigUint::zero());
        }
        if self.terms.len() == 1 && self.terms[0].mono.is_unit() {
            return Some(self.terms[0].coeff.clone());
        }
        None
    }

    /// True for the constant one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_val().is_some_and(|v| v.is_one())
    }

    /// True for the constant 2^K - 1.
    #[must_use]
    pub fn is_max(&self) -> bool {
        self.as_val().is_some_and(|v| v == self.manager().max_value())
    }

    /// True if this polynomial is a single variable with coefficient 1.
    #[must_use]
    pub fn is_var(&self) -> bool {
        self.as_var().is_some()
    }

    /// The variable, if this polynomial is a single variable.
    #[must_use]
    pub fn as_var(&self) -> Option<PVar> {
        match self.as_unary() {
            Some((c, v)) if c.is_one() => Some(v),
            _ => None,
        }
    }

    /// True if this polynomial is `c * v` for a nonzero constant c.
    #[must_use]
    pub fn is_unary(&self) -> bool {
        self.as_unary().is_some()
    }

    /// The coefficient and variable, if this polynomial is `c * v`.
    #[must_use]
    pub fn as_unary(&self) -> Option<(BigUint, PVar)> {
        if self.terms.len() != 1 {
            return None;
        }
        let t = &self.terms[0];
        match t.mono.vars() {
            [vp] if vp.power == 1 => Some((t.coeff.clone(), vp.var)),
            _ => None,
        }
    }

    /// Degree of `var` in this polynomial.
    #[must_use]
    pub fn degree(&self, var: PVar) -> u32 {
        self.terms
            .iter()
            .map(|t| t.mono.degree(var))
            .max()
            .unwrap_or(0)
    }

    /// True if `var` occurs in this polynomial.
    #[must_use]
    pub fn contains_var(&self, var: PVar) -> bool {
        self.degree(var) > 0
    }

    /// Split into `a * var^k + b` where `a` collects the terms divisible
    /// by `var^k` (with that power divided out) and `b` the rest.
    #[must_use]
    pub fn factor(&self, var: PVar, k: u32) -> (Pdd, Pdd) {
        let vk = Monomial::from_var_power(var, k);
        let mut a = Vec::new();
        let mut b = Vec::new();
        for t in &self.terms {
            match t.mono.div(&vk) {
                Some(q) => a.push(PddTerm {
                    coeff: t.coeff.clone(),
                    mono: q,
                }),
                None => b.push(t.clone()),
            }
        }
        (
            Pdd::from_terms(self.width, a),
            Pdd::from_terms(self.width, b),
        )
    }

    /// Like [`factor`](Self::factor), but only when the remainder is zero.
    #[must_use]
    pub fn factor_exact(&self, var: PVar, k: u32) -> Option<Pdd> {
        let (a, b) = self.factor(var, k);
        b.is_zero().then_some(a)
    }

    /// Divide every coefficient by `c` exactly, if possible.
    #[must_use]
    pub fn try_div(&self, c: &BigUint) -> Option<Pdd> {
        if c.is_zero() {
            return None;
        }
        let mut terms = Vec::with_capacity(self.terms.len());
        for t in &self.terms {
            if (&t.coeff % c).is_zero() {
                terms.push(PddTerm {
                    coeff: &t.coeff / c,
                    mono: t.mono.clone(),
                });
            } else {
                return None;
            }
        }
        Some(Pdd::from_terms(self.width, terms))
    }

    /// Evaluate under `assignment`; fails when some variable is unassigned.
    #[must_use]
    pub fn try_eval(&self, assignment: &Assignment) -> Option<BigUint> {
        let modulus = self.manager().two_to_n();
        let mut sum = BigUint::zero();
        for t in &self.terms {
            let mut v = t.coeff.clone();
            for vp in t.mono.vars() {
                let value = assignment.get(&vp.var)?;
                for _ in 0..vp.power {
                    v = (v * value) % &modulus;
                }
            }
            sum = (sum + v) % &modulus;
        }
        Some(sum)
    }

    /// All variables occurring in this polynomial, in term order.
    pub fn vars(&self) -> impl Iterator<Item = PVar> + '_ {
        self.terms
            .iter()
            .flat_map(|t| t.mono.vars().iter().map(|vp| vp.var))
    }

    fn from_terms(width: u32, terms: Vec<PddTerm>) -> Pdd {
        let mut p = Pdd { width, terms };
        p.normalize();
        p
    }

    /// Sort terms, combine like monomials, reduce mod 2^K, drop zeros.
    fn normalize(&mut self) {
        let modulus = self.manager().two_to_n();
        self.terms
            .sort_by(|a, b| b.mono.lex_cmp(&a.mono));
        let mut i = 0;
        while i < self.terms.len() {
            let mut j = i + 1;
            while j < self.terms.len() && self.terms[j].mono == self.terms[i].mono {
                let coeff = self.terms[j].coeff.clone();
                self.terms[i].coeff += coeff;
                j += 1;
            }
            if j > i + 1 {
                self.terms.drain((i + 1)..j);
            }
            self.terms[i].coeff %= &modulus;
            i += 1;
        }
        self.terms.retain(|t| !t.coeff.is_zero());
    }

    fn add_impl(&self, other: &Pdd) -> Pdd {
        debug_assert_eq!(self.width, other.width);
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Pdd::from_terms(self.width, terms)
    }

    fn mul_impl(&self, other: &Pdd) -> Pdd {
        debug_assert_eq!(self.width, other.width);
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for t in &self.terms {
            for u in &other.terms {
                terms.push(PddTerm {
                    coeff: &t.coeff * &u.coeff,
                    mono: t.mono.mul(&u.mono),
                });
            }
        }
        Pdd::from_terms(self.width, terms)
    }

    fn neg_impl(&self) -> Pdd {
        let modulus = self.manager().two_to_n();
        let terms = self
            .terms
            .iter()
            .map(|t| PddTerm {
                coeff: &modulus - &t.coeff,
                mono: t.mono.clone(),
            })
            .collect();
        Pdd::from_terms(self.width, terms)
    }
}

impl Add for Pdd {
    type Output = Pdd;

    fn add(self, rhs: Self) -> Pdd {
        self.add_impl(&rhs)
    }
}

impl Add<&Pdd> for &Pdd {
    type Output = Pdd;

    fn add(self, rhs: &Pdd) -> Pdd {
        self.add_impl(rhs)
    }
}

impl Sub for Pdd {
    type Output = Pdd;

    fn sub(self, rhs: Self) -> Pdd {
        self.add_impl(&rhs.neg_impl())
    }
}

impl Sub<&Pdd> for &Pdd {
    type Output = Pdd;

    fn sub(self, rhs: &Pdd) -> Pdd {
        self.add_impl(&rhs.neg_impl())
    }
}

impl Mul for Pdd {
    type Output = Pdd;

    fn mul(self, rhs: Self) -> Pdd {
        self.mul_impl(&rhs)
    }
}

impl Mul<&Pdd> for &Pdd {
    type Output = Pdd;

    fn mul(self, rhs: &Pdd) -> Pdd {
        self.mul_impl(rhs)
    }
}

impl Neg for Pdd {
    type Output = Pdd;

    fn neg(self) -> Pdd {
        self.neg_impl()
    }
}

impl Neg for &Pdd {
    type Output = Pdd;

    fn neg(self) -> Pdd {
        self.neg_impl()
    }
}

impl fmt::Display for Pdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if t.mono.is_unit() {
                write!(f, "{}", t.coeff)?;
            } else if t.coeff.is_one() {
                write!(f, "{}", t.mono)?;
            } else {
                write!(f, "{}*{}", t.coeff, t.mono)?;
            }
        }
        Ok(())
    }
}
