use super::ArithError;
use crate::common::*;
use std::fmt;

#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Int(Int),
    Float(Float),
}

macro_rules! checked_bin_op {
    ($fn_name:ident, $checked:ident, $op:tt) => {
        pub fn $fn_name(self, rhs: Self) -> Result<Self, ArithError> {
            match (self, rhs) {
                (Self::Int(x), Self::Int(y)) => {
                    x.$checked(y).map(Self::Int).ok_or(ArithError::Overflow)
                }
                (x, y) => Ok(Self::Float(x.as_float() $op y.as_float())),
            }
        }
    };
}

impl Number {
    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        self.as_float() == 0.0
    }

    checked_bin_op!(add, checked_add, +);
    checked_bin_op!(sub, checked_sub, -);
    checked_bin_op!(mul, checked_mul, *);

    /// Division stays integral when it is exact.
    pub fn div(self, rhs: Self) -> Result<Self, ArithError> {
        if rhs.is_zero() {
            return Err(ArithError::ZeroDivision);
        }
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) => match x.checked_rem(y) {
                Some(0) => x.checked_div(y).map(Self::Int).ok_or(ArithError::Overflow),
                Some(_) => Ok(Self::Float(x as Float / y as Float)),
                None => Err(ArithError::Overflow),
            },
            (x, y) => Ok(Self::Float(x.as_float() / y.as_float())),
        }
    }

    pub fn pow(self, rhs: Self) -> Result<Self, ArithError> {
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) if y >= 0 => {
                let exp = u32::try_from(y).map_err(|_| ArithError::Overflow)?;
                x.checked_pow(exp).map(Self::Int).ok_or(ArithError::Overflow)
            }
            (x, y) => {
                if x.is_zero() && y.as_float() < 0.0 {
                    return Err(ArithError::ZeroDivision);
                }
                Ok(Self::Float(x.as_float().powf(y.as_float())))
            }
        }
    }

    pub fn neg(self) -> Result<Self, ArithError> {
        match self {
            Self::Int(x) => x.checked_neg().map(Self::Int).ok_or(ArithError::Overflow),
            Self::Float(x) => Ok(Self::Float(-x)),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.as_float().eq(&other.as_float())
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_float().partial_cmp(&other.as_float())
    }
}

impl From<Int> for Number {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<Float> for Number {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

// Integral floats print without a fractional part so results can be read back as dice code.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => {
                fmt::Display::fmt(&(*x as Int), f)
            }
            Self::Float(x) => fmt::Display::fmt(x, f),
        }
    }
}
