//! Ethereum keypair generation and address derivation.

use secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};

use super::{Address, GenerationError};

/// An Ethereum keypair: a secp256k1 private key and its derived address.
#[derive(Debug, Clone)]
pub struct Keypair {
    secret_key: [u8; 32],
    address: Address,
}

impl Keypair {
    /// Generates a new random keypair using the given secp256k1 context.
    ///
    /// Uses the OS cryptographically secure random number generator.
    #[inline]
    pub fn generate(secp: &Secp256k1<All>) -> Self {
        let (secret_key, public_key) = secp.generate_keypair(&mut rand::thread_rng());

        Self {
            secret_key: secret_key.secret_bytes(),
            address: Self::derive_address(&public_key),
        }
    }

    /// Builds a keypair from an existing secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self, GenerationError> {
        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(&secret_bytes)
            .map_err(|e| GenerationError::Provider(e.to_string()))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        Ok(Self {
            secret_key: secret_bytes,
            address: Self::derive_address(&public_key),
        })
    }

    /// Derives an Ethereum address from a secp256k1 public key.
    ///
    /// Keccak-256 over the 64-byte uncompressed public key (0x04 marker
    /// stripped), keeping the last 20 bytes of the digest.
    #[inline]
    fn derive_address(public_key: &PublicKey) -> Address {
        let public_key_bytes = public_key.serialize_uncompressed();

        let mut hasher = Keccak::v256();
        hasher.update(&public_key_bytes[1..]);
        let mut hash = [0u8; 32];
        hasher.finalize(&mut hash);

        let mut address_bytes = [0u8; 20];
        address_bytes.copy_from_slice(&hash[12..]);
        Address::from_bytes(address_bytes)
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    /// Returns the derived address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let secp = Secp256k1::new();
        let keypair = Keypair::generate(&secp);
        assert_eq!(keypair.private_key_hex().len(), 64);
        assert_eq!(keypair.address().as_bytes().len(), 20);
    }

    #[test]
    fn test_deterministic_address() {
        // Address for private key = 1 is well-known
        let mut secret_bytes = [0u8; 32];
        secret_bytes[31] = 0x01;
        let keypair = Keypair::from_secret_key(secret_bytes).unwrap();

        assert_eq!(
            keypair.address().to_hex(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_invalid_secret_key_rejected() {
        // All-zero secret key is outside the curve order
        assert!(Keypair::from_secret_key([0u8; 32]).is_err());
    }
}
