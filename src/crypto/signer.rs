/// Gateway response signing
///
/// Implements secp256k1 signing of CCIP-Read responses. The on-chain
/// verifier recomputes
///
/// ```text
/// digest = keccak256(result || expires (u64, big-endian) || request)
/// ```
///
/// wraps it as an EIP-191 personal message and recovers the signer from the
/// 65-byte `r || s || v` signature.
use crate::{
    error::{GatewayError, GatewayResult},
    metrics,
};
use alloy::primitives::{eip191_hash_message, keccak256, Address, B256};
use k256::{
    ecdsa::{SigningKey, VerifyingKey},
    SecretKey,
};

/// Validity window of a signed response, in seconds
pub const RESPONSE_TTL_SECS: u64 = 300;

/// A signed gateway answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedResponse {
    pub result: Vec<u8>,
    pub expires: u64,
    /// `r (32) || s (32) || v (1)`, `v` in {27, 28}
    pub signature: [u8; 65],
}

/// Response signer
///
/// Holds the process-wide key handed in through configuration.
#[derive(Clone)]
pub struct ResponseSigner {
    signing_key: SigningKey,
    address: Address,
}

impl ResponseSigner {
    /// Create a new signer from a private key (32 bytes)
    pub fn new(private_key: &[u8]) -> GatewayResult<Self> {
        if private_key.len() != 32 {
            return Err(GatewayError::Configuration(
                "Signing key must be exactly 32 bytes".to_string(),
            ));
        }

        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| GatewayError::Configuration(format!("Invalid signing key: {}", e)))?;

        let signing_key = SigningKey::from(secret_key);
        let address = address_of(signing_key.verifying_key());

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Create a signer from a hex-encoded private key (`0x` prefix optional)
    pub fn from_hex(hex_key: &str) -> GatewayResult<Self> {
        let trimmed = hex_key.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let key_bytes = hex::decode(trimmed)
            .map_err(|e| GatewayError::Configuration(format!("Invalid hex signing key: {}", e)))?;

        Self::new(&key_bytes)
    }

    /// Address the on-chain verifier must trust
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `result` with an expiry of now + [`RESPONSE_TTL_SECS`]
    pub fn sign_now(&self, result: Vec<u8>, request: &[u8]) -> GatewayResult<SignedResponse> {
        let expires = chrono::Utc::now().timestamp() as u64 + RESPONSE_TTL_SECS;
        self.sign(result, expires, request)
    }

    /// Sign `result` with an explicit expiry
    pub fn sign(
        &self,
        result: Vec<u8>,
        expires: u64,
        request: &[u8],
    ) -> GatewayResult<SignedResponse> {
        let digest = personal_digest(&result, expires, request);

        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| GatewayError::Internal(format!("Signing failed: {}", e)))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + recovery_id.to_byte();

        metrics::RESPONSES_SIGNED_TOTAL.inc();

        Ok(SignedResponse {
            result,
            expires,
            signature: out,
        })
    }
}

/// keccak256 over the canonical signing input
pub fn message_hash(result: &[u8], expires: u64, request: &[u8]) -> B256 {
    let mut buf = Vec::with_capacity(result.len() + 8 + request.len());
    buf.extend_from_slice(result);
    buf.extend_from_slice(&expires.to_be_bytes());
    buf.extend_from_slice(request);
    keccak256(&buf)
}

/// EIP-191 personal-sign digest of [`message_hash`]
pub fn personal_digest(result: &[u8], expires: u64, request: &[u8]) -> B256 {
    eip191_hash_message(message_hash(result, expires, request))
}

/// Recover the signer of a response, as the on-chain verifier does
#[cfg(test)]
pub(crate) fn recover(
    result: &[u8],
    expires: u64,
    request: &[u8],
    signature: &[u8; 65],
) -> GatewayResult<Address> {
    use k256::ecdsa::{RecoveryId, Signature};

    let digest = personal_digest(result, expires, request);

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| GatewayError::MalformedRequest(format!("Invalid signature: {}", e)))?;
    let v = signature[64].checked_sub(27).unwrap_or(signature[64]);
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| GatewayError::MalformedRequest("Invalid recovery id".to_string()))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|e| GatewayError::MalformedRequest(format!("Recovery failed: {}", e)))?;

    Ok(address_of(&key))
}

/// Ethereum address of a secp256k1 public key
fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
