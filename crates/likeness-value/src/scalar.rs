//! Scalar values and cross-type numeric coercion.
//!
//! Scalar equality is strict: two scalars are equal only when they carry the
//! same representation and the same value, so `I32(5)` and `I64(5)` differ.
//! The equivalence engine bridges that gap with [`Scalar::coerce`].

use std::any::TypeId;

/// A unit variant of a fieldless enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub name: &'static str,
    pub discriminant: i64,
}

impl Variant {
    pub fn new<E: 'static>(name: &'static str, discriminant: i64) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            name,
            discriminant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Char(char),
    Str(&'a str),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    F32(f32),
    F64(f64),
    Variant(Variant),
}

/// Target representation for a numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
}

/// Intermediate form every numeric scalar passes through.
#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

/// Whole number obtained from a [`Number`], before narrowing.
#[derive(Debug, Clone, Copy)]
enum Integral {
    Signed(i128),
    Unsigned(u128),
}

// 2^127 and 2^128 are exact in f64.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const U128_BOUND: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

impl Number {
    /// Floats round half to even before the range check.
    fn integral(self) -> Option<Integral> {
        match self {
            Number::Signed(value) => Some(Integral::Signed(value)),
            Number::Unsigned(value) => Some(Integral::Unsigned(value)),
            Number::Float(value) => {
                let rounded = value.round_ties_even();
                if !rounded.is_finite() {
                    None
                } else if rounded < 0.0 {
                    (rounded >= -I128_BOUND).then(|| Integral::Signed(rounded as i128))
                } else {
                    (rounded < U128_BOUND).then(|| Integral::Unsigned(rounded as u128))
                }
            }
        }
    }

    fn float(self) -> f64 {
        match self {
            Number::Signed(value) => value as f64,
            Number::Unsigned(value) => value as f64,
            Number::Float(value) => value,
        }
    }
}

macro_rules! narrow {
    ($number:expr, $ty:ty, $variant:ident) => {
        match $number.integral()? {
            Integral::Signed(value) => <$ty>::try_from(value).ok().map(Scalar::$variant),
            Integral::Unsigned(value) => <$ty>::try_from(value).ok().map(Scalar::$variant),
        }
    };
}

impl<'a> Scalar<'a> {
    /// Numeric representation of this scalar, if it has one.
    ///
    /// Enum variants report no numeric type of their own; they can still be
    /// coerced into one through their discriminant.
    pub fn numeric_type(&self) -> Option<NumericType> {
        Some(match self {
            Scalar::I8(_) => NumericType::I8,
            Scalar::I16(_) => NumericType::I16,
            Scalar::I32(_) => NumericType::I32,
            Scalar::I64(_) => NumericType::I64,
            Scalar::I128(_) => NumericType::I128,
            Scalar::U8(_) => NumericType::U8,
            Scalar::U16(_) => NumericType::U16,
            Scalar::U32(_) => NumericType::U32,
            Scalar::U64(_) => NumericType::U64,
            Scalar::U128(_) => NumericType::U128,
            Scalar::F32(_) => NumericType::F32,
            Scalar::F64(_) => NumericType::F64,
            Scalar::Bool(_) | Scalar::Char(_) | Scalar::Str(_) | Scalar::Variant(_) => {
                return None
            }
        })
    }

    fn number(&self) -> Option<Number> {
        Some(match *self {
            Scalar::I8(value) => Number::Signed(value.into()),
            Scalar::I16(value) => Number::Signed(value.into()),
            Scalar::I32(value) => Number::Signed(value.into()),
            Scalar::I64(value) => Number::Signed(value.into()),
            Scalar::I128(value) => Number::Signed(value),
            Scalar::U8(value) => Number::Unsigned(value.into()),
            Scalar::U16(value) => Number::Unsigned(value.into()),
            Scalar::U32(value) => Number::Unsigned(value.into()),
            Scalar::U64(value) => Number::Unsigned(value.into()),
            Scalar::U128(value) => Number::Unsigned(value),
            Scalar::F32(value) => Number::Float(value.into()),
            Scalar::F64(value) => Number::Float(value),
            Scalar::Variant(variant) => Number::Signed(variant.discriminant.into()),
            Scalar::Bool(_) | Scalar::Char(_) | Scalar::Str(_) => return None,
        })
    }

    /// Converts this scalar into `target`.
    ///
    /// Integer narrowing is checked and yields `None` on overflow. Floats
    /// round half to even when converted to integers. Conversions into
    /// floating point may lose precision.
    pub fn coerce(&self, target: NumericType) -> Option<Scalar<'static>> {
        let number = self.number()?;
        match target {
            NumericType::I8 => narrow!(number, i8, I8),
            NumericType::I16 => narrow!(number, i16, I16),
            NumericType::I32 => narrow!(number, i32, I32),
            NumericType::I64 => narrow!(number, i64, I64),
            NumericType::I128 => narrow!(number, i128, I128),
            NumericType::U8 => narrow!(number, u8, U8),
            NumericType::U16 => narrow!(number, u16, U16),
            NumericType::U32 => narrow!(number, u32, U32),
            NumericType::U64 => narrow!(number, u64, U64),
            NumericType::U128 => narrow!(number, u128, U128),
            NumericType::F32 => Some(Scalar::F32(number.float() as f32)),
            NumericType::F64 => Some(Scalar::F64(number.float())),
        }
    }
}
