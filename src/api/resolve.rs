/// CCIP-Read gateway endpoint
///
/// `GET /resolve/{sender}/{calldata}` and the equivalent
/// `POST /resolve` with a `{ "sender", "data" }` body.
use crate::{
    ccip::{self, RecordQuery},
    context::AppContext,
    error::{GatewayError, GatewayResult},
    metrics,
    resolver::records,
};
use alloy::primitives::Address;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Build resolve routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/resolve/:sender/:calldata", get(resolve_get))
        .route("/resolve", post(resolve_post))
}

/// Body of a POST lookup
#[derive(Debug, Deserialize)]
pub struct ResolvePostRequest {
    pub sender: String,
    pub data: String,
}

/// Signed gateway answer
///
/// `data` is the hex ABI encoding of `(bytes result, uint64 expires, bytes sig)`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub data: String,
}

pub async fn resolve_get(
    State(ctx): State<AppContext>,
    Path((sender, calldata)): Path<(String, String)>,
) -> GatewayResult<Json<ResolveResponse>> {
    resolve(&ctx, &sender, &calldata).await.map(Json)
}

pub async fn resolve_post(
    State(ctx): State<AppContext>,
    Json(req): Json<ResolvePostRequest>,
) -> GatewayResult<Json<ResolveResponse>> {
    resolve(&ctx, &req.sender, &req.data).await.map(Json)
}

/// Parse a 20-byte hex sender address
pub fn parse_sender(sender: &str) -> GatewayResult<Address> {
    let bytes = decode_hex(sender)
        .map_err(|e| GatewayError::MalformedRequest(format!("invalid sender: {}", e)))?;
    if bytes.len() != 20 {
        return Err(GatewayError::MalformedRequest(format!(
            "sender must be 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

/// Parse hex call data, tolerating the `.json` suffix of URL templates
pub fn parse_calldata(calldata: &str) -> GatewayResult<Vec<u8>> {
    let calldata = calldata.strip_suffix(".json").unwrap_or(calldata);
    decode_hex(calldata)
        .map_err(|e| GatewayError::MalformedRequest(format!("invalid call data: {}", e)))
}

fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value)
}

async fn resolve(ctx: &AppContext, sender: &str, calldata: &str) -> GatewayResult<ResolveResponse> {
    let outcome = answer(ctx, sender, calldata).await;

    let (record, label) = match &outcome {
        Ok((record, _)) => (*record, "ok"),
        Err(GatewayError::MalformedRequest(msg)) => {
            warn!("Rejected malformed lookup from {}: {}", sender, msg);
            ("unknown", "malformed")
        }
        Err(GatewayError::NotFound(msg)) => {
            debug!("Lookup not found: {}", msg);
            ("unknown", "not_found")
        }
        Err(_) => ("unknown", "error"),
    };
    metrics::record_resolution(record, label);

    outcome.map(|(_, response)| response)
}

async fn answer(
    ctx: &AppContext,
    sender: &str,
    calldata: &str,
) -> GatewayResult<(&'static str, ResolveResponse)> {
    let sender = parse_sender(sender)?;
    let request_bytes = parse_calldata(calldata)?;
    let request = ccip::decode_request(&request_bytes)?;
    let kind = request.call.query.kind();

    debug!(
        node = ?request.call.query.node(),
        "Lookup {} record for {} from {} (selector 0x{})",
        kind,
        request.name,
        sender,
        hex::encode(request.call.selector)
    );

    if request.call.query == RecordQuery::Unsupported {
        return Err(GatewayError::NotFound(format!(
            "Unsupported record selector 0x{}",
            hex::encode(request.call.selector)
        )));
    }

    let entity = ctx
        .resolver
        .resolve(&request.name)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("No entity named {}", request.name)))?;

    let value = records::answer(&entity, &request.call.query)?;
    let signed = ctx.signer.sign_now(value.abi_encode(), &request_bytes)?;

    info!(
        "Answered {} record for {} ({}), expires {}",
        kind,
        request.name,
        entity.kind.as_str(),
        signed.expires
    );

    let payload = ccip::encode_response(&signed.result, signed.expires, &signed.signature);
    Ok((
        kind,
        ResolveResponse {
            data: format!("0x{}", hex::encode(payload)),
        },
    ))
}
