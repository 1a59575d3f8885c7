//! Power products over polynomial variables.
//!
//! A monomial is a sorted list of (variable, power) pairs; the unit
//! monomial is the empty list. Multiplication and division are merge
//! operations over the sorted lists.

use crate::PVar;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Power of a single variable inside a monomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarPower {
    /// The variable identifier.
    pub var: PVar,
    /// The exponent of the variable; always positive.
    pub power: u32,
}

impl VarPower {
    /// Create a new variable power.
    #[inline]
    #[must_use]
    pub fn new(var: PVar, power: u32) -> Self {
        Self { var, power }
    }
}

/// A product of variables with exponents, sorted by variable index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Monomial {
    vars: SmallVec<[VarPower; 4]>,
}

impl Monomial {
    /// The unit monomial (the constant 1).
    #[inline]
    #[must_use]
    pub fn unit() -> Self {
        Self {
            vars: SmallVec::new(),
        }
    }

    /// Monomial consisting of a single variable to the first power.
    #[must_use]
    pub fn from_var(var: PVar) -> Self {
        Self::from_var_power(var, 1)
    }

    /// Monomial `var^power`.
    #[must_use]
    pub fn from_var_power(var: PVar, power: u32) -> Self {
        if power == 0 {
            return Self::unit();
        }
        let mut vars = SmallVec::new();
        vars.push(VarPower::new(var, power));
        Self { vars }
    }

    /// True for the unit monomial.
    #[inline]
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.vars.is_empty()
    }

    /// Total degree (sum of all exponents).
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.vars.iter().map(|vp| vp.power).sum()
    }

    /// The variable-power pairs, sorted by variable.
    #[inline]
    #[must_use]
    pub fn vars(&self) -> &[VarPower] {
        &self.vars
    }

    /// Degree of a specific variable in this monomial.
    #[must_use]
    pub fn degree(&self, var: PVar) -> u32 {
        self.vars
            .iter()
            .find(|vp| vp.var == var)
            .map_or(0, |vp| vp.power)
    }

    /// Multiply two monomials by merging their sorted power lists.
    #[must_use]
    pub fn mul(&self, other: &Monomial) -> Monomial {
        if self.is_unit() {
            return other.clone();
        }
        if other.is_unit() {
            return self.clone();
        }
        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::new();
        let mut i = 0;
        let mut j = 0;
        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => {
                    vars.push(self.vars[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    vars.push(other.vars[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    vars.push(VarPower::new(
                        self.vars[i].var,
                        self.vars[i].power + other.vars[j].power,
                    ));
                    i += 1;
                    j += 1;
                }
            }
        }
        vars.extend_from_slice(&self.vars[i..]);
        vars.extend_from_slice(&other.vars[j..]);
        Monomial { vars }
    }

    /// Divide by `other`, returning the quotient if it divides exactly.
    #[must_use]
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        if other.is_unit() {
            return Some(self.clone());
        }
        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::new();
        let mut j = 0;
        for vp in &self.vars {
            if j < other.vars.len() && other.vars[j].var == vp.var {
                if vp.power < other.vars[j].power {
                    return None;
                }
                let rest = vp.power - other.vars[j].power;
                if rest > 0 {
                    vars.push(VarPower::new(vp.var, rest));
                }
                j += 1;
            } else if j < other.vars.len() && other.vars[j].var < vp.var {
                return None;
            } else {
                vars.push(*vp);
            }
        }
        if j < other.vars.len() {
            return None;
        }
        Some(Monomial { vars })
    }

    /// Lexicographic comparison by variable, then power.
    #[must_use]
    pub fn lex_cmp(&self, other: &Monomial) -> Ordering {
        let mut i = 0;
        let mut j = 0;
        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => match self.vars[i].power.cmp(&other.vars[j].power) {
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                    }
                    ord => return ord,
                },
            }
        }
        if i < self.vars.len() {
            Ordering::Greater
        } else if j < other.vars.len() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit() {
            return write!(f, "1");
        }
        for (i, vp) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if vp.power == 1 {
                write!(f, "v{}", vp.var)?;
            } else {
                write!(f, "v{}^{}", vp.var, vp.power)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit() {
        let m = Monomial::unit();
        assert!(m.is_unit());
        assert_eq!(m.total_degree(), 0);
        assert_eq!(m.degree(0), 0);
    }

    #[test]
    fn test_mul_merges_sorted() {
        let xy = Monomial::from_var(0).mul(&Monomial::from_var(1));
        let xyx = xy.mul(&Monomial::from_var(0));
        assert_eq!(xyx.degree(0), 2);
        assert_eq!(xyx.degree(1), 1);
        assert_eq!(xyx.total_degree(), 3);
    }

    #[test]
    fn test_div_exact() {
        let x2y = Monomial::from_var_power(0, 2).mul(&Monomial::from_var(1));
        let q = x2y.div(&Monomial::from_var(0)).unwrap();
        assert_eq!(q, Monomial::from_var(0).mul(&Monomial::from_var(1)));
        assert!(x2y.div(&Monomial::from_var(2)).is_none());
        assert!(Monomial::from_var(0)
            .div(&Monomial::from_var_power(0, 2))
            .is_none());
    }

    #[test]
    fn test_lex_order() {
        let x = Monomial::from_var(0);
        let y = Monomial::from_var(1);
        let x2 = Monomial::from_var_power(0, 2);
        assert_eq!(x.lex_cmp(&y), Ordering::Greater);
        assert_eq!(x2.lex_cmp(&x), Ordering::Greater);
        assert_eq!(x.lex_cmp(&Monomial::unit()), Ordering::Greater);
        assert_eq!(x.lex_cmp(&x), Ordering::Equal);
    }
}
