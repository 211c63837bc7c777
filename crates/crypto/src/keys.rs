// Path: crates/crypto/src/keys.rs
//! Foreign-chain key material and its base58check encodings.

use crate::curve::{mul_generator, AffinePoint};
use crate::error::CryptoError;
use crate::field::{Fp, Fq};
use rand::{CryptoRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Version byte of an encoded public-key address.
pub const ADDRESS_VERSION: u8 = 0xcb;
/// Version byte of an encoded secret key.
pub const SECRET_KEY_VERSION: u8 = 0x5a;

const ADDRESS_HEADER: [u8; 2] = [0x01, 0x01];
const SECRET_KEY_HEADER: [u8; 1] = [0x01];
const ADDRESS_PAYLOAD_LEN: usize = 1 + ADDRESS_HEADER.len() + 32 + 1;
const SECRET_KEY_PAYLOAD_LEN: usize = 1 + SECRET_KEY_HEADER.len() + 32;

/// A compressed public key: the x-coordinate and the parity of y.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey {
    /// The x-coordinate.
    pub x: Fp,
    /// Whether y is odd.
    pub is_odd: bool,
}

impl PublicKey {
    /// Compresses a curve point.
    pub fn from_point(point: &AffinePoint) -> Self {
        Self {
            x: point.x.clone(),
            is_odd: point.y.is_odd(),
        }
    }

    /// Decompresses to the curve point.
    pub fn to_point(&self) -> Result<AffinePoint, CryptoError> {
        AffinePoint::decompress(&self.x, self.is_odd)
    }

    /// Parses a base58check address and checks it is on the curve.
    pub fn from_address(address: &str) -> Result<Self, CryptoError> {
        let payload = bs58::decode(address.trim())
            .with_check(None)
            .into_vec()
            .map_err(|e| CryptoError::InvalidAddress(format!("{}: {}", address, e)))?;
        if payload.len() != ADDRESS_PAYLOAD_LEN {
            return Err(CryptoError::InvalidAddress(format!(
                "{}: expected {} payload bytes, got {}",
                address,
                ADDRESS_PAYLOAD_LEN,
                payload.len()
            )));
        }
        let (version, rest) = payload.split_at(1);
        let (header, rest) = rest.split_at(ADDRESS_HEADER.len());
        let (x_bytes, parity) = rest.split_at(32);
        if version != [ADDRESS_VERSION] || header != ADDRESS_HEADER {
            return Err(CryptoError::InvalidAddress(format!(
                "{}: unexpected version bytes",
                address
            )));
        }
        let is_odd = match parity {
            [0] => false,
            [1] => true,
            _ => {
                return Err(CryptoError::InvalidAddress(format!(
                    "{}: bad parity byte",
                    address
                )))
            }
        };
        let x = Fp::from_bytes_le(x_bytes)
            .map_err(|e| CryptoError::InvalidAddress(format!("{}: {}", address, e)))?;
        let key = Self { x, is_odd };
        key.to_point()?;
        Ok(key)
    }

    /// The base58check address.
    pub fn to_address(&self) -> String {
        let mut payload = Vec::with_capacity(ADDRESS_PAYLOAD_LEN);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&ADDRESS_HEADER);
        payload.extend_from_slice(&self.x.to_bytes_le());
        payload.push(u8::from(self.is_odd));
        bs58::encode(payload).with_check().into_string()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_address())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_address(&s).map_err(de::Error::custom)
    }
}

/// A secret scalar. The little-endian bytes are wiped on drop.
pub struct SecretKey {
    bytes: Zeroizing<[u8; 32]>,
    scalar: Fq,
}

impl SecretKey {
    /// Wraps a non-zero scalar.
    pub fn from_scalar(scalar: Fq) -> Result<Self, CryptoError> {
        if scalar.is_zero() {
            return Err(CryptoError::InvalidKey("secret scalar is zero".into()));
        }
        Ok(Self {
            bytes: Zeroizing::new(scalar.to_bytes_le()),
            scalar,
        })
    }

    /// Parses a base58check secret key.
    pub fn from_base58(encoded: &str) -> Result<Self, CryptoError> {
        let payload = Zeroizing::new(
            bs58::decode(encoded.trim())
                .with_check(None)
                .into_vec()
                .map_err(|e| CryptoError::InvalidKey(format!("bad base58check: {}", e)))?,
        );
        if payload.len() != SECRET_KEY_PAYLOAD_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "expected {} payload bytes, got {}",
                SECRET_KEY_PAYLOAD_LEN,
                payload.len()
            )));
        }
        let (version, rest) = payload.split_at(1);
        let (header, scalar) = rest.split_at(SECRET_KEY_HEADER.len());
        if version != [SECRET_KEY_VERSION] || header != SECRET_KEY_HEADER {
            return Err(CryptoError::InvalidKey("unexpected version bytes".into()));
        }
        let scalar =
            Fq::from_bytes_le(scalar).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::from_scalar(scalar)
    }

    /// The base58check encoding.
    pub fn to_base58(&self) -> Zeroizing<String> {
        let mut payload = Zeroizing::new(Vec::with_capacity(SECRET_KEY_PAYLOAD_LEN));
        payload.push(SECRET_KEY_VERSION);
        payload.extend_from_slice(&SECRET_KEY_HEADER);
        payload.extend_from_slice(self.bytes.as_ref());
        Zeroizing::new(bs58::encode(payload.as_slice()).with_check().into_string())
    }

    /// The secret scalar.
    pub fn scalar(&self) -> &Fq {
        &self.scalar
    }

    /// `sk * G`.
    pub fn public_point(&self) -> Result<AffinePoint, CryptoError> {
        mul_generator(&self.scalar)
            .to_affine()
            .ok_or(CryptoError::PointAtInfinity)
    }

    /// The compressed public key.
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        Ok(PublicKey::from_point(&self.public_point()?))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// A secret key with its derived public key.
#[derive(Debug)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    /// Derives the public half of `secret`.
    pub fn from_secret(secret: SecretKey) -> Result<Self, CryptoError> {
        let public = secret.public_key()?;
        Ok(Self { secret, public })
    }

    /// Parses a base58check secret key.
    pub fn from_base58(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_secret(SecretKey::from_base58(encoded)?)
    }

    /// Draws a fresh key from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        loop {
            let mut wide = Zeroizing::new([0u8; 64]);
            rng.fill_bytes(wide.as_mut());
            let scalar = Fq::from_bytes_le_reduce(wide.as_ref());
            if !scalar.is_zero() {
                return Self::from_secret(SecretKey::from_scalar(scalar)?);
            }
        }
    }

    /// The secret key.
    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// The public key.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// The public key's address.
    pub fn address(&self) -> String {
        self.public.to_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn address_round_trips() {
        let kp = Keypair::generate(&mut StdRng::seed_from_u64(7)).unwrap();
        let address = kp.address();
        assert!(address.starts_with("B62"));
        assert_eq!(address.len(), 55);
        let parsed = PublicKey::from_address(&address).unwrap();
        assert_eq!(&parsed, kp.public());
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), parsed);
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let kp = Keypair::generate(&mut StdRng::seed_from_u64(8)).unwrap();
        let mut address = kp.address();
        let last = address.pop().unwrap();
        address.push(if last == 'a' { 'b' } else { 'a' });
        assert!(matches!(
            PublicKey::from_address(&address),
            Err(CryptoError::InvalidAddress(_))
        ));
        assert!(PublicKey::from_address("not-an-address").is_err());
    }

    #[test]
    fn secret_key_round_trips() {
        let kp = Keypair::generate(&mut StdRng::seed_from_u64(9)).unwrap();
        let encoded = kp.secret().to_base58();
        assert!(encoded.starts_with("EK"));
        let restored = Keypair::from_base58(&encoded).unwrap();
        assert_eq!(restored.public(), kp.public());
        // A public address is not a secret key.
        assert!(SecretKey::from_base58(&kp.address()).is_err());
        assert!(SecretKey::from_scalar(Fq::zero()).is_err());
    }

    #[test]
    fn known_scalar_maps_to_generator() {
        let one = SecretKey::from_scalar(Fq::one()).unwrap();
        let pk = one.public_key().unwrap();
        assert_eq!(pk.x, Fp::one());
        assert!(pk.is_odd);
    }
}
