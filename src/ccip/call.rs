/// Resolver call decoding
///
/// The inner call of a wildcard `resolve(name, data)` request is a regular
/// resolver profile call. Only the record kinds below are answered; any
/// other selector decodes to [`RecordQuery::Unsupported`] so the caller can
/// reply "not found" instead of rejecting the request.
use crate::error::GatewayError;
use alloy::primitives::{B256, U256};
use alloy::sol_types::SolCall;
use thiserror::Error;

/// ABI fragments for the supported resolver profiles.
///
/// The two `addr` overloads live in separate modules so each keeps its
/// canonical name.
pub(crate) mod abi {
    pub mod addr {
        alloy::sol! {
            function addr(bytes32 node) external view returns (address);
        }
    }

    pub mod addr_by_coin {
        alloy::sol! {
            function addr(bytes32 node, uint256 coinType) external view returns (bytes);
        }
    }

    pub mod text {
        alloy::sol! {
            function text(bytes32 node, string key) external view returns (string);
        }
    }

    pub mod contenthash {
        alloy::sol! {
            function contenthash(bytes32 node) external view returns (bytes);
        }
    }
}

/// `addr(bytes32)`
pub const ADDR_SELECTOR: [u8; 4] = abi::addr::addrCall::SELECTOR;
/// `addr(bytes32,uint256)`
pub const ADDR_BY_COIN_SELECTOR: [u8; 4] = abi::addr_by_coin::addrCall::SELECTOR;
/// `text(bytes32,string)`
pub const TEXT_SELECTOR: [u8; 4] = abi::text::textCall::SELECTOR;
/// `contenthash(bytes32)`
pub const CONTENTHASH_SELECTOR: [u8; 4] = abi::contenthash::contenthashCall::SELECTOR;

#[derive(Error, Debug)]
pub enum CallError {
    #[error("call data is {0} byte(s), shorter than a selector")]
    TooShort(usize),

    #[error("invalid arguments for selector 0x{selector}: {source}")]
    InvalidArguments {
        selector: String,
        #[source]
        source: alloy::sol_types::Error,
    },
}

impl From<CallError> for GatewayError {
    fn from(e: CallError) -> Self {
        GatewayError::MalformedRequest(e.to_string())
    }
}

/// A record request, decoded once and matched thereafter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordQuery {
    Addr { node: B256 },
    AddrByCoin { node: B256, coin_type: U256 },
    Text { node: B256, key: String },
    Contenthash { node: B256 },
    Unsupported,
}

impl RecordQuery {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RecordQuery::Addr { .. } => "addr",
            RecordQuery::AddrByCoin { .. } => "addr_coin",
            RecordQuery::Text { .. } => "text",
            RecordQuery::Contenthash { .. } => "contenthash",
            RecordQuery::Unsupported => "unsupported",
        }
    }

    /// Namehash carried by the call, if the selector is known
    pub fn node(&self) -> Option<B256> {
        match self {
            RecordQuery::Addr { node }
            | RecordQuery::AddrByCoin { node, .. }
            | RecordQuery::Text { node, .. }
            | RecordQuery::Contenthash { node } => Some(*node),
            RecordQuery::Unsupported => None,
        }
    }
}

/// Selector plus typed parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub selector: [u8; 4],
    pub query: RecordQuery,
}

/// Decode an inner resolver call
pub fn decode(data: &[u8]) -> Result<DecodedCall, CallError> {
    if data.len() < 4 {
        return Err(CallError::TooShort(data.len()));
    }

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);

    let invalid = |source| CallError::InvalidArguments {
        selector: hex::encode(selector),
        source,
    };

    let query = match selector {
        ADDR_SELECTOR => {
            let call = abi::addr::addrCall::abi_decode(data).map_err(invalid)?;
            RecordQuery::Addr { node: call.node }
        }
        ADDR_BY_COIN_SELECTOR => {
            let call = abi::addr_by_coin::addrCall::abi_decode(data).map_err(invalid)?;
            RecordQuery::AddrByCoin {
                node: call.node,
                coin_type: call.coinType,
            }
        }
        TEXT_SELECTOR => {
            let call = abi::text::textCall::abi_decode(data).map_err(invalid)?;
            RecordQuery::Text {
                node: call.node,
                key: call.key,
            }
        }
        CONTENTHASH_SELECTOR => {
            let call = abi::contenthash::contenthashCall::abi_decode(data).map_err(invalid)?;
            RecordQuery::Contenthash { node: call.node }
        }
        _ => RecordQuery::Unsupported,
    };

    Ok(DecodedCall { selector, query })
}
