// Path: crates/crypto/src/curve.rs
//! The Pallas curve `y^2 = x^3 + 5` over `Fp`.

use crate::error::CryptoError;
use crate::field::{Fp, Fq};
use once_cell::sync::Lazy;

/// The curve's `b` coefficient (`a` is zero).
pub const CURVE_B: u64 = 5;

const GENERATOR_Y: &str =
    "12418654782883325593414442427049395787963493412651469444558597405572177144507";

static GENERATOR: Lazy<AffinePoint> = Lazy::new(|| AffinePoint {
    x: Fp::one(),
    y: Fp::from_decimal(GENERATOR_Y).unwrap_or_else(|_| Fp::zero()),
});

/// A finite point in affine coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AffinePoint {
    /// The x-coordinate.
    pub x: Fp,
    /// The y-coordinate.
    pub y: Fp,
}

impl AffinePoint {
    /// The standard generator: `x = 1` with the odd square root for `y`.
    pub fn generator() -> Self {
        GENERATOR.clone()
    }

    /// Builds a point, checking the curve equation.
    pub fn new(x: Fp, y: Fp) -> Result<Self, CryptoError> {
        let point = Self { x, y };
        if !point.is_on_curve() {
            return Err(CryptoError::NotOnCurve);
        }
        Ok(point)
    }

    /// Recovers `y` from `x` and the parity of `y`.
    pub fn decompress(x: &Fp, is_odd: bool) -> Result<Self, CryptoError> {
        let rhs = curve_rhs(x);
        let root = rhs.sqrt().ok_or(CryptoError::NotOnCurve)?;
        let y = if root.is_odd() == is_odd { root } else { -root };
        Ok(Self { x: x.clone(), y })
    }

    /// Whether `y^2 = x^3 + 5` holds.
    pub fn is_on_curve(&self) -> bool {
        self.y.square() == curve_rhs(&self.x)
    }

    /// Lifts into Jacobian coordinates.
    pub fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.x.clone(),
            y: self.y.clone(),
            z: Fp::one(),
        }
    }
}

fn curve_rhs(x: &Fp) -> Fp {
    &(&x.square() * x) + &Fp::from_u64(CURVE_B)
}

/// A point in Jacobian coordinates `(X / Z^2, Y / Z^3)`. `Z = 0` is the point
/// at infinity.
#[derive(Clone, Debug)]
pub struct ProjectivePoint {
    x: Fp,
    y: Fp,
    z: Fp,
}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.to_affine() == other.to_affine()
    }
}

impl Eq for ProjectivePoint {}

impl ProjectivePoint {
    /// The point at infinity.
    pub fn identity() -> Self {
        Self {
            x: Fp::one(),
            y: Fp::one(),
            z: Fp::zero(),
        }
    }

    /// The generator.
    pub fn generator() -> Self {
        AffinePoint::generator().to_projective()
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Normalizes to affine coordinates; `None` at infinity.
    pub fn to_affine(&self) -> Option<AffinePoint> {
        let z_inv = self.z.inverse()?;
        let z_inv2 = z_inv.square();
        let z_inv3 = &z_inv2 * &z_inv;
        Some(AffinePoint {
            x: &self.x * &z_inv2,
            y: &self.y * &z_inv3,
        })
    }

    /// `-P`.
    pub fn negate(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: -&self.y,
            z: self.z.clone(),
        }
    }

    /// `2P` (dbl-2009-l, `a = 0`).
    pub fn double(&self) -> Self {
        if self.is_identity() || self.y.is_zero() {
            return Self::identity();
        }
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let x_plus_b = &self.x + &b;
        let d = double(&(&(&x_plus_b.square() - &a) - &c));
        let e = &double(&a) + &a;
        let f = e.square();
        let x3 = &f - &double(&d);
        let eight_c = double(&double(&double(&c)));
        let y3 = &(&e * &(&d - &x3)) - &eight_c;
        let z3 = double(&(&self.y * &self.z));
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// `P + Q` (add-2007-bl).
    pub fn add(&self, other: &Self) -> Self {
        if self.is_identity() {
            return other.clone();
        }
        if other.is_identity() {
            return self.clone();
        }
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = &self.x * &z2z2;
        let u2 = &other.x * &z1z1;
        let s1 = &(&self.y * &other.z) * &z2z2;
        let s2 = &(&other.y * &self.z) * &z1z1;
        let h = &u2 - &u1;
        let r = double(&(&s2 - &s1));
        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Self::identity()
            };
        }
        let i = double(&h).square();
        let j = &h * &i;
        let v = &u1 * &i;
        let x3 = &(&(&r.square() - &j) - &v) - &v;
        let y3 = &(&r * &(&v - &x3)) - &double(&(&s1 * &j));
        let z_sum = &self.z + &other.z;
        let z3 = &(&(&z_sum.square() - &z1z1) - &z2z2) * &h;
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// `kP` by left-to-right double-and-add.
    pub fn mul(&self, scalar: &Fq) -> Self {
        let mut acc = Self::identity();
        for byte in scalar.as_biguint().to_bytes_be() {
            for bit in (0..8).rev() {
                acc = acc.double();
                if (byte >> bit) & 1 == 1 {
                    acc = acc.add(self);
                }
            }
        }
        acc
    }
}

fn double(x: &Fp) -> Fp {
    x + x
}

/// `kG`.
pub fn mul_generator(scalar: &Fq) -> ProjectivePoint {
    ProjectivePoint::generator().mul(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::One;

    #[test]
    fn generator_is_on_curve_with_odd_y() {
        let g = AffinePoint::generator();
        assert_eq!(g.x, Fp::one());
        assert!(g.y.is_odd());
        assert!(g.is_on_curve());
        assert_eq!(AffinePoint::decompress(&Fp::one(), true).unwrap(), g);
        let even = AffinePoint::decompress(&Fp::one(), false).unwrap();
        assert_eq!(even.y, -&g.y);
    }

    #[test]
    fn group_laws_hold_for_small_multiples() {
        let g = ProjectivePoint::generator();
        let two_g = g.double();
        assert_eq!(g.add(&g), two_g);
        let three_g = two_g.add(&g);
        assert_eq!(g.mul(&Fq::from_u64(3)), three_g);
        assert_eq!(g.add(&two_g), two_g.add(&g));
        assert!(three_g.to_affine().unwrap().is_on_curve());
        assert!(g.add(&g.negate()).is_identity());
        assert_eq!(g.add(&ProjectivePoint::identity()), g);
    }

    #[test]
    fn scalar_multiplication_distributes() {
        let g = ProjectivePoint::generator();
        let a = Fq::from_u64(123_456_789);
        let b = Fq::from_u64(987_654_321);
        let lhs = g.mul(&(&a + &b));
        let rhs = g.mul(&a).add(&g.mul(&b));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn group_order_annihilates_generator() {
        let q_minus_one = Fq::from_biguint(Fq::modulus() - BigUint::one());
        let p = mul_generator(&q_minus_one);
        assert_eq!(p, ProjectivePoint::generator().negate());
        assert!(p.add(&ProjectivePoint::generator()).is_identity());
    }

    #[test]
    fn decompress_rejects_points_off_the_curve() {
        // x = 0 gives y^2 = 5, a non-residue in Fp.
        let rhs = curve_rhs(&Fp::zero());
        assert!(rhs.sqrt().is_none());
        assert!(matches!(
            AffinePoint::decompress(&Fp::zero(), false),
            Err(CryptoError::NotOnCurve)
        ));
        assert!(AffinePoint::new(Fp::one(), Fp::one()).is_err());
    }
}
