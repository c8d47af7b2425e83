/// CCIP-Read (EIP-3668) request and response wire handling
///
/// An off-chain lookup hands the gateway the original
/// `resolve(bytes name, bytes data)` call (ENSIP-10). The name is in DNS
/// wire format and `data` is the resolver call being answered.

pub mod call;
pub mod name;

pub use call::{DecodedCall, RecordQuery};

use crate::error::{GatewayError, GatewayResult};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};

mod abi {
    alloy::sol! {
        function resolve(bytes name, bytes data) external view returns (bytes);
    }
}

/// `resolve(bytes,bytes)`
pub const RESOLVE_SELECTOR: [u8; 4] = abi::resolveCall::SELECTOR;

/// A fully decoded gateway request
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Dotted name, e.g. `nova.arena.eth`
    pub name: String,
    pub call: DecodedCall,
}

/// Decode the outer `resolve(bytes,bytes)` call data
pub fn decode_request(calldata: &[u8]) -> GatewayResult<ResolveRequest> {
    if !calldata.starts_with(&RESOLVE_SELECTOR) {
        return Err(GatewayError::MalformedRequest(format!(
            "call data does not start with the resolve(bytes,bytes) selector 0x{}",
            hex::encode(RESOLVE_SELECTOR)
        )));
    }

    let outer = abi::resolveCall::abi_decode(calldata).map_err(|e| {
        GatewayError::MalformedRequest(format!("invalid resolve call data: {}", e))
    })?;

    let name = name::decode(&outer.name)?;
    let call = call::decode(&outer.data)?;

    Ok(ResolveRequest { name, call })
}

/// Typed answer to a record query, prior to ABI encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    Address(Address),
    AddressByCoin(Address, U256),
    Text(String),
    Bytes(Bytes),
}

impl RecordValue {
    /// ABI-encode as a function return value
    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            RecordValue::Address(addr) => (*addr,).abi_encode_params(),
            RecordValue::AddressByCoin(addr, coin_type) => {
                (*addr, *coin_type).abi_encode_params()
            }
            RecordValue::Text(text) => (text.clone(),).abi_encode_params(),
            RecordValue::Bytes(bytes) => (bytes.clone(),).abi_encode_params(),
        }
    }
}

/// ABI-encode the signed `(bytes result, uint64 expires, bytes sig)` tuple
pub fn encode_response(result: &[u8], expires: u64, signature: &[u8]) -> Vec<u8> {
    (
        Bytes::copy_from_slice(result),
        expires,
        Bytes::copy_from_slice(signature),
    )
        .abi_encode_params()
}

/// Build `resolve(bytes,bytes)` call data for a name and inner call
#[cfg(test)]
pub(crate) fn encode_request(dotted_name: &str, inner: Vec<u8>) -> GatewayResult<Vec<u8>> {
    let name = name::encode(dotted_name)?;
    Ok(abi::resolveCall {
        name: name.into(),
        data: inner.into(),
    }
    .abi_encode())
}
