// Path: crates/crypto/src/schnorr.rs
//! Schnorr signatures over Pallas with a Poseidon challenge.

use crate::curve::{mul_generator, AffinePoint};
use crate::error::CryptoError;
use crate::field::{Fp, Fq};
use crate::keys::{PublicKey, SecretKey};
use crate::poseidon::hash_with_prefix;
use blake2::{Blake2s256, Digest};
use pulsar_types::config::NetworkId;

/// Challenge prefix for non-mainnet networks.
pub const DEVNET_SIGNATURE_PREFIX: &str = "CodaSignature*******";
/// Challenge prefix for mainnet.
pub const MAINNET_SIGNATURE_PREFIX: &str = "MinaSignatureMainnet";

/// Encoded signature length: `rx` then `s`, both 32 bytes little-endian.
pub const SIGNATURE_LEN: usize = 64;

/// The challenge prefix for `network`.
pub fn signature_prefix(network: NetworkId) -> &'static str {
    match network {
        NetworkId::Mainnet => MAINNET_SIGNATURE_PREFIX,
        NetworkId::Devnet => DEVNET_SIGNATURE_PREFIX,
    }
}

/// A Schnorr signature `(rx, s)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The x-coordinate of the nonce commitment.
    pub rx: Fp,
    /// The response scalar.
    pub s: Fq,
}

impl Signature {
    /// `rx_le || s_le`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        let (rx, s) = out.split_at_mut(32);
        rx.copy_from_slice(&self.rx.to_bytes_le());
        s.copy_from_slice(&self.s.to_bytes_le());
        out
    }

    /// Strict decode; both halves must be canonical.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(CryptoError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            )));
        }
        let (rx, s) = bytes.split_at(32);
        let rx = Fp::from_bytes_le(rx)
            .map_err(|e| CryptoError::InvalidSignature(format!("rx: {}", e)))?;
        let s = Fq::from_bytes_le(s)
            .map_err(|e| CryptoError::InvalidSignature(format!("s: {}", e)))?;
        Ok(Self { rx, s })
    }

    /// Lowercase hex of [`Signature::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

fn derive_nonce(
    secret: &SecretKey,
    public: &AffinePoint,
    message: &[Fp],
    network: NetworkId,
) -> Result<Fq, CryptoError> {
    let mut hasher = Blake2s256::new();
    hasher.update(secret.scalar().to_bytes_le());
    hasher.update(public.x.to_bytes_le());
    hasher.update(public.y.to_bytes_le());
    for element in message {
        hasher.update(element.to_bytes_le());
    }
    hasher.update([network.as_byte()]);
    let k = Fq::from_bytes_le_reduce(&hasher.finalize());
    if k.is_zero() {
        return Err(CryptoError::InvalidParams("derived a zero nonce".into()));
    }
    Ok(k)
}

fn challenge(
    public: &AffinePoint,
    rx: &Fp,
    message: &[Fp],
    network: NetworkId,
) -> Result<Fq, CryptoError> {
    let mut input = Vec::with_capacity(message.len() + 3);
    input.extend_from_slice(message);
    input.push(public.x.clone());
    input.push(public.y.clone());
    input.push(rx.clone());
    Ok(hash_with_prefix(signature_prefix(network), &input)?.to_scalar())
}

/// Signs a field-element message.
pub fn sign(secret: &SecretKey, message: &[Fp], network: NetworkId) -> Result<Signature, CryptoError> {
    let public = secret.public_point()?;
    let mut k = derive_nonce(secret, &public, message, network)?;
    let r = mul_generator(&k)
        .to_affine()
        .ok_or(CryptoError::PointAtInfinity)?;
    if r.y.is_odd() {
        k = -k;
    }
    let e = challenge(&public, &r.x, message, network)?;
    let s = &k + &(&e * secret.scalar());
    Ok(Signature { rx: r.x, s })
}

/// Verifies `signature` over `message` under `public_key`.
pub fn verify(
    public_key: &PublicKey,
    message: &[Fp],
    signature: &Signature,
    network: NetworkId,
) -> bool {
    let Ok(point) = public_key.to_point() else {
        return false;
    };
    let Ok(e) = challenge(&point, &signature.rx, message, network) else {
        return false;
    };
    let s_g = mul_generator(&signature.s);
    let e_p = point.to_projective().mul(&e);
    match s_g.add(&e_p.negate()).to_affine() {
        Some(r) => !r.y.is_odd() && r.x == signature.rx,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keypair(seed: u64) -> Keypair {
        Keypair::generate(&mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn message() -> Vec<Fp> {
        vec![Fp::from_u64(1), Fp::from_u64(2), Fp::from_u64(3)]
    }

    #[test]
    fn sign_then_verify() {
        let kp = keypair(1);
        let sig = sign(kp.secret(), &message(), NetworkId::Devnet).unwrap();
        assert!(verify(kp.public(), &message(), &sig, NetworkId::Devnet));
        // Deterministic nonce.
        assert_eq!(sig, sign(kp.secret(), &message(), NetworkId::Devnet).unwrap());
    }

    #[test]
    fn tampering_is_detected() {
        let kp = keypair(2);
        let sig = sign(kp.secret(), &message(), NetworkId::Devnet).unwrap();

        let mut other = message();
        other[1] = Fp::from_u64(99);
        assert!(!verify(kp.public(), &other, &sig, NetworkId::Devnet));

        let forged = Signature {
            rx: sig.rx.clone(),
            s: &sig.s + &Fq::one(),
        };
        assert!(!verify(kp.public(), &message(), &forged, NetworkId::Devnet));

        let stranger = keypair(3);
        assert!(!verify(stranger.public(), &message(), &sig, NetworkId::Devnet));
        assert!(!verify(kp.public(), &message(), &sig, NetworkId::Mainnet));
    }

    #[test]
    fn byte_encoding_is_strict() {
        let kp = keypair(4);
        let sig = sign(kp.secret(), &message(), NetworkId::Mainnet).unwrap();
        let bytes = sig.to_bytes();
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), sig);
        assert_eq!(sig.to_hex().len(), 128);
        assert!(Signature::from_bytes(&bytes[..63]).is_err());
        let mut bad = bytes;
        bad[..32].copy_from_slice(&[0xff; 32]);
        assert!(Signature::from_bytes(&bad).is_err());
    }
}
