// Path: crates/crypto/src/field.rs
//! Prime-field arithmetic for the Pallas base field `Fp` and scalar field `Fq`.
//!
//! Elements are canonical `BigUint` values strictly below the modulus. Byte
//! encodings are 32-byte little-endian; JSON and configuration use decimal
//! strings.

use crate::error::CryptoError;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// The Pallas base-field modulus, big-endian.
const FP_MODULUS_BE: [u8; 32] = [
    0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x22, 0x46, 0x98, 0xfc, 0x09, 0x4c, 0xf9, 0x1b, 0x99, 0x2d, 0x30, 0xed, 0x00, 0x00, 0x00, 0x01,
];

/// The Pallas scalar-field modulus (the curve's group order), big-endian.
const FQ_MODULUS_BE: [u8; 32] = [
    0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x22, 0x46, 0x98, 0xfc, 0x09, 0x94, 0xa8, 0xdd, 0x8c, 0x46, 0xeb, 0x21, 0x00, 0x00, 0x00, 0x01,
];

/// Per-field constants derived once from the modulus.
struct FieldParams {
    modulus: BigUint,
    /// `(p - 1) / 2`, the Euler-criterion exponent.
    half_order: BigUint,
    /// `s` such that `p - 1 = 2^s * t` with `t` odd.
    two_adicity: u64,
    /// `t`.
    odd_part: BigUint,
    /// The smallest quadratic non-residue.
    non_residue: BigUint,
}

impl FieldParams {
    fn new(modulus_be: &[u8; 32]) -> Self {
        let modulus = BigUint::from_bytes_be(modulus_be);
        let p_minus_one = &modulus - BigUint::one();
        let half_order = &p_minus_one >> 1u32;
        let two_adicity = p_minus_one.trailing_zeros().unwrap_or(0);
        let odd_part = &p_minus_one >> two_adicity;
        let mut candidate = BigUint::from(2u32);
        while candidate.modpow(&half_order, &modulus) != p_minus_one {
            candidate += 1u32;
        }
        Self {
            modulus,
            half_order,
            two_adicity,
            odd_part,
            non_residue: candidate,
        }
    }
}

static FP_PARAMS: Lazy<FieldParams> = Lazy::new(|| FieldParams::new(&FP_MODULUS_BE));
static FQ_PARAMS: Lazy<FieldParams> = Lazy::new(|| FieldParams::new(&FQ_MODULUS_BE));

/// Tonelli-Shanks over a prime field. Returns `None` for non-residues.
fn tonelli_shanks(value: &BigUint, params: &FieldParams) -> Option<BigUint> {
    let m = &params.modulus;
    if value.is_zero() {
        return Some(BigUint::zero());
    }
    if !value.modpow(&params.half_order, m).is_one() {
        return None;
    }
    let mut r = params.two_adicity;
    let mut c = params.non_residue.modpow(&params.odd_part, m);
    let mut x = value.modpow(&((&params.odd_part + 1u32) >> 1u32), m);
    let mut b = value.modpow(&params.odd_part, m);

    while !b.is_one() {
        let mut i = 0u64;
        let mut b2i = b.clone();
        while !b2i.is_one() {
            b2i = (&b2i * &b2i) % m;
            i += 1;
            if i == r {
                return None;
            }
        }
        let exp = BigUint::one() << (r - i - 1);
        let g = c.modpow(&exp, m);
        x = (x * &g) % m;
        c = (&g * &g) % m;
        b = (b * &c) % m;
        r = i;
    }
    Some(x)
}

macro_rules! prime_field {
    ($(#[$meta:meta])* $name:ident, $params:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(BigUint);

        impl $name {
            /// The field modulus.
            pub fn modulus() -> &'static BigUint {
                &$params.modulus
            }

            /// The additive identity.
            pub fn zero() -> Self {
                Self(BigUint::zero())
            }

            /// The multiplicative identity.
            pub fn one() -> Self {
                Self(BigUint::one())
            }

            /// Reduces an arbitrary integer into the field.
            pub fn from_biguint(value: BigUint) -> Self {
                Self(value % Self::modulus())
            }

            /// Wraps an integer that must already be canonical.
            pub fn from_canonical(value: BigUint) -> Result<Self, CryptoError> {
                if &value >= Self::modulus() {
                    return Err(CryptoError::InvalidFieldElement(format!(
                        "value exceeds the {} modulus",
                        $label
                    )));
                }
                Ok(Self(value))
            }

            /// Embeds a `u64`.
            pub fn from_u64(value: u64) -> Self {
                Self(BigUint::from(value))
            }

            /// Embeds a `u128`.
            pub fn from_u128(value: u128) -> Self {
                Self::from_biguint(BigUint::from(value))
            }

            /// Embeds an `i64`; negative values map to `p - |v|`.
            pub fn from_i64(value: i64) -> Self {
                let magnitude = Self::from_u64(value.unsigned_abs());
                if value < 0 {
                    -magnitude
                } else {
                    magnitude
                }
            }

            /// Interprets bytes as a big-endian integer and reduces it.
            pub fn from_bytes_be_reduce(bytes: &[u8]) -> Self {
                Self::from_biguint(BigUint::from_bytes_be(bytes))
            }

            /// Interprets bytes as a little-endian integer and reduces it.
            pub fn from_bytes_le_reduce(bytes: &[u8]) -> Self {
                Self::from_biguint(BigUint::from_bytes_le(bytes))
            }

            /// Decodes a canonical 32-byte little-endian encoding.
            pub fn from_bytes_le(bytes: &[u8]) -> Result<Self, CryptoError> {
                if bytes.len() != 32 {
                    return Err(CryptoError::InvalidFieldElement(format!(
                        "expected 32 bytes, got {}",
                        bytes.len()
                    )));
                }
                Self::from_canonical(BigUint::from_bytes_le(bytes))
            }

            /// The canonical 32-byte little-endian encoding.
            pub fn to_bytes_le(&self) -> [u8; 32] {
                let mut out = [0u8; 32];
                for (slot, byte) in out.iter_mut().zip(self.0.to_bytes_le()) {
                    *slot = byte;
                }
                out
            }

            /// The underlying integer.
            pub fn as_biguint(&self) -> &BigUint {
                &self.0
            }

            /// Whether this is the zero element.
            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Whether the canonical integer is odd.
            pub fn is_odd(&self) -> bool {
                self.0.is_odd()
            }

            /// `self^2`.
            pub fn square(&self) -> Self {
                self * self
            }

            /// `self^exp`.
            pub fn pow(&self, exp: &BigUint) -> Self {
                Self(self.0.modpow(exp, Self::modulus()))
            }

            /// `self^exp` for a small exponent.
            pub fn pow_u64(&self, exp: u64) -> Self {
                self.pow(&BigUint::from(exp))
            }

            /// The multiplicative inverse, or `None` for zero.
            pub fn inverse(&self) -> Option<Self> {
                if self.is_zero() {
                    return None;
                }
                // Fermat: a^(p-2).
                let exp = Self::modulus() - BigUint::from(2u32);
                Some(self.pow(&exp))
            }

            /// A square root, or `None` when `self` is a non-residue.
            pub fn sqrt(&self) -> Option<Self> {
                tonelli_shanks(&self.0, &$params).map(Self)
            }

            /// Parses a decimal string into a canonical element.
            pub fn from_decimal(s: &str) -> Result<Self, CryptoError> {
                let value = BigUint::parse_bytes(s.trim().as_bytes(), 10).ok_or_else(|| {
                    CryptoError::InvalidFieldElement(format!("'{}' is not a decimal integer", s))
                })?;
                Self::from_canonical(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CryptoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_decimal(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_str_radix(10))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_decimal(&s).map_err(de::Error::custom)
            }
        }

        impl<'a, 'b> Add<&'b $name> for &'a $name {
            type Output = $name;
            fn add(self, rhs: &'b $name) -> $name {
                let sum = &self.0 + &rhs.0;
                if &sum >= $name::modulus() {
                    $name(sum - $name::modulus())
                } else {
                    $name(sum)
                }
            }
        }

        impl<'a, 'b> Sub<&'b $name> for &'a $name {
            type Output = $name;
            fn sub(self, rhs: &'b $name) -> $name {
                if self.0 >= rhs.0 {
                    $name(&self.0 - &rhs.0)
                } else {
                    $name($name::modulus() - (&rhs.0 - &self.0))
                }
            }
        }

        impl<'a, 'b> Mul<&'b $name> for &'a $name {
            type Output = $name;
            fn mul(self, rhs: &'b $name) -> $name {
                $name((&self.0 * &rhs.0) % $name::modulus())
            }
        }

        impl<'a> Neg for &'a $name {
            type Output = $name;
            fn neg(self) -> $name {
                if self.0.is_zero() {
                    $name::zero()
                } else {
                    $name($name::modulus() - &self.0)
                }
            }
        }

        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                -&self
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                &self + &rhs
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                &self - &rhs
            }
        }

        impl Mul for $name {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                &self * &rhs
            }
        }
    };
}

prime_field!(
    /// An element of the Pallas base field. Poseidon, curve coordinates and
    /// every hash output live here.
    Fp,
    FP_PARAMS,
    "Fp"
);

prime_field!(
    /// An element of the Pallas scalar field (secret keys, nonces, `s`).
    Fq,
    FQ_PARAMS,
    "Fq"
);

impl Fp {
    /// Lifts a base-field element into the scalar field. `p < q`, so the
    /// canonical integer is already a canonical scalar.
    pub fn to_scalar(&self) -> Fq {
        Fq::from_biguint(self.0.clone())
    }
}
