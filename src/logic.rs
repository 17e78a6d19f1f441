//! The 5-valued logic algebra used throughout the engine.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A net logic level under the 5-valued D-calculus.
///
/// `Logic` is not a boolean: it has five cases, and there is no implicit
/// truth test. `D` carries a fault-free value of 1 and a faulty value of 0
/// (stuck-at-0); `Dbar` carries a fault-free value of 0 and a faulty value
/// of 1 (stuck-at-1). `X` means unknown/unassigned, never "don't care".
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Logic {
    /// Logical 0
    Low,
    /// Logical 1
    High,
    /// Fault-free 1, faulty 0 (stuck-at-0)
    D,
    /// Fault-free 0, faulty 1 (stuck-at-1)
    Dbar,
    /// Unknown or unassigned
    X,
}

impl Logic {
    /// Build the stuck-at value opposite to a fault-free `{Low, High}` value.
    ///
    /// Panics if `self` is not `Low` or `High`: the stuck-at value of a
    /// fault itself is always one of those two.
    pub fn complement_bit(self) -> Logic {
        match self {
            Logic::Low => Logic::High,
            Logic::High => Logic::Low,
            _ => panic!("complement_bit is only defined for Low/High, got {self:?}"),
        }
    }

    /// Returns true for `Low` or `High`, the only values a primary input or
    /// output may settle to in fault-free simulation.
    pub fn is_binary(self) -> bool {
        matches!(self, Logic::Low | Logic::High)
    }
}

impl Not for Logic {
    type Output = Logic;

    /// Inversion: swaps 0/1, D/D̄; X is its own inverse.
    fn not(self) -> Logic {
        match self {
            Logic::Low => Logic::High,
            Logic::High => Logic::Low,
            Logic::D => Logic::Dbar,
            Logic::Dbar => Logic::D,
            Logic::X => Logic::X,
        }
    }
}

impl BitOr for Logic {
    type Output = Logic;

    /// OR: absorbing element is `High`; `X` dominates unless absorbed.
    fn bitor(self, rhs: Logic) -> Logic {
        use Logic::*;
        match (self, rhs) {
            (High, _) | (_, High) => High,
            (X, _) | (_, X) => X,
            (Low, other) | (other, Low) => other,
            (a, b) if a == b => a,
            // one D, one Dbar
            _ => High,
        }
    }
}

impl BitAnd for Logic {
    type Output = Logic;

    /// AND: absorbing element is `Low`; `X` dominates unless absorbed.
    fn bitand(self, rhs: Logic) -> Logic {
        use Logic::*;
        match (self, rhs) {
            (Low, _) | (_, Low) => Low,
            (X, _) | (_, X) => X,
            (High, other) | (other, High) => other,
            (a, b) if a == b => a,
            // one D, one Dbar
            _ => Low,
        }
    }
}

impl BitXor for Logic {
    type Output = Logic;

    /// XOR is defined only on `{Low, High}`; any other operand is a
    /// programmer bug, not a recoverable error.
    fn bitxor(self, rhs: Logic) -> Logic {
        assert!(
            self.is_binary() && rhs.is_binary(),
            "XOR is undefined outside {{Low, High}}: {self:?} ^ {rhs:?}"
        );
        if self == rhs {
            Logic::Low
        } else {
            Logic::High
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Logic::Low => '0',
            Logic::High => '1',
            Logic::D => 'D',
            Logic::Dbar => 'd',
            Logic::X => 'X',
        };
        write!(f, "{c}")
    }
}

impl TryFrom<char> for Logic {
    type Error = char;

    /// Parse a single character of an input-vector or output-vector string.
    ///
    /// Accepts `'0'`, `'1'`, `'X'`/`'x'`. `D`/`d` are internal simulation
    /// states, never user input, so they are rejected here.
    fn try_from(c: char) -> Result<Logic, char> {
        match c {
            '0' => Ok(Logic::Low),
            '1' => Ok(Logic::High),
            'X' | 'x' => Ok(Logic::X),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Logic::*;

    #[test]
    fn test_inversion() {
        assert_eq!(!Low, High);
        assert_eq!(!High, Low);
        assert_eq!(!D, Dbar);
        assert_eq!(!Dbar, D);
        assert_eq!(!X, X);
        assert_eq!(!!Low, Low);
        assert_eq!(!!D, D);
    }

    #[test]
    fn test_or() {
        assert_eq!(Low | Low, Low);
        assert_eq!(Low | High, High);
        assert_eq!(X | Low, X);
        assert_eq!(X | High, High);
        assert_eq!(D | D, D);
        assert_eq!(Dbar | Dbar, Dbar);
        assert_eq!(D | Dbar, High);
    }

    #[test]
    fn test_and() {
        assert_eq!(High & High, High);
        assert_eq!(High & Low, Low);
        assert_eq!(X & High, X);
        assert_eq!(X & Low, Low);
        assert_eq!(D & D, D);
        assert_eq!(Dbar & Dbar, Dbar);
        assert_eq!(D & Dbar, Low);
    }

    #[test]
    fn test_xor() {
        assert_eq!(Low ^ Low, Low);
        assert_eq!(Low ^ High, High);
        assert_eq!(High ^ High, Low);
    }

    #[test]
    #[should_panic]
    fn test_xor_panics_on_x() {
        let _ = X ^ Low;
    }

    #[test]
    #[should_panic]
    fn test_xor_panics_on_d() {
        let _ = D ^ High;
    }

    #[test]
    fn test_idempotence() {
        for v in [Low, High, D, Dbar, X] {
            assert_eq!(v | v, v);
            assert_eq!(v & v, v);
        }
    }

    #[test]
    fn test_complement_laws() {
        assert_eq!(Low | High, High);
        assert_eq!(Low & High, Low);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Low.to_string(), "0");
        assert_eq!(High.to_string(), "1");
        assert_eq!(D.to_string(), "D");
        assert_eq!(Dbar.to_string(), "d");
        assert_eq!(X.to_string(), "X");
        assert_eq!(super::Logic::try_from('0').unwrap(), Low);
        assert_eq!(super::Logic::try_from('1').unwrap(), High);
        assert_eq!(super::Logic::try_from('X').unwrap(), X);
        assert!(super::Logic::try_from('D').is_err());
    }
}
