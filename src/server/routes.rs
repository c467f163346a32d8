//! HTTP routes: client configuration and holder selection

use crate::chain::address::{is_valid_address, parse_address};
use crate::error::{HolderError, HolderResult};
use crate::selection::SelectionResult;
use crate::server::state::AppState;
use crate::utils::transaction::{TransferBuilder, TransferDescriptor};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info, warn};

/// Settings the browser client needs before it can submit a request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub default_min_balance: u64,
    pub transaction_confirmation: bool,
    pub network: String,
    pub receiver_public_key: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sol_amount: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHolderRequest {
    #[serde(default)]
    pub mint_address: Option<String>,
    /// Number or numeric string; the browser form posts strings
    #[serde(default)]
    pub min_tokens: Option<Value>,
    #[serde(default)]
    pub wallet_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HolderReply {
    Selected(SelectionResult),
    Transfer(TransferDescriptor),
}

/// Error body `{ "error": message }` with the status the error maps to.
pub struct ApiError(pub HolderError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("getHolder failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let client_bundle =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let router = Router::new()
        .route("/config", get(get_config))
        .route("/getHolder", post(get_holder));

    #[cfg(feature = "metrics")]
    let router = router.route("/metrics", get(get_metrics));

    router.fallback_service(client_bundle).with_state(state)
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        default_min_balance: config.raffle.default_min_balance,
        transaction_confirmation: config.transfer.required,
        network: config.rpc.url.clone(),
        receiver_public_key: config.transfer.recipient.to_string(),
        sol_amount: config.transfer.amount,
    })
}

async fn get_holder(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GetHolderRequest>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(request)) => handle_get_holder(&state, request).await,
        Err(rejection) => {
            warn!("Rejected getHolder body: {}", rejection.body_text());
            Err(HolderError::InvalidAddress)
        }
    };

    #[cfg(feature = "metrics")]
    match &result {
        Ok(HolderReply::Selected(_)) => state.metrics.record("selected"),
        Ok(HolderReply::Transfer(_)) => state.metrics.record("transfer_descriptor"),
        Err(e) => state.metrics.record_error(e),
    }

    match result {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

#[cfg(feature = "metrics")]
async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => text.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Validate the request, then either hand back a transfer to sign or draw a holder.
pub async fn handle_get_holder(state: &AppState, request: GetHolderRequest) -> HolderResult<HolderReply> {
    let min_tokens = resolve_min_tokens(
        request.min_tokens.as_ref(),
        state.config.raffle.default_min_balance,
    );
    let mint_address = request.mint_address.unwrap_or_default();
    if !is_valid_address(&mint_address) {
        return Err(HolderError::InvalidAddress);
    }

    let transfer = &state.config.transfer;
    let wallet = request
        .wallet_key
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty());

    if let (true, Some(wallet)) = (transfer.required, wallet) {
        let payer = parse_address(wallet).ok_or(HolderError::InvalidWalletAddress)?;
        let descriptor = TransferBuilder::new(payer, transfer)
            .build_descriptor(state.client())
            .await?;
        info!("Issued transfer descriptor for wallet {} (mint {})", payer, mint_address);
        return Ok(HolderReply::Transfer(descriptor));
    }

    let result = state.picker.pick(&mint_address, min_tokens).await?;
    Ok(HolderReply::Selected(result))
}

/// Interpret `minTokens` like an integer prefix parse.
///
/// Missing, zero or unparsable values fall back to `default`; negatives clamp to 0.
pub fn resolve_min_tokens(raw: Option<&Value>, default: u64) -> u64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i128)),
        Some(Value::String(s)) => parse_integer_prefix(s),
        _ => None,
    };

    match parsed {
        None | Some(0) => default,
        Some(n) if n < 0 => 0,
        Some(n) => u64::try_from(n).unwrap_or(u64::MAX),
    }
}

fn parse_integer_prefix(input: &str) -> Option<i128> {
    let input = input.trim_start();
    let (negative, rest) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    // too many digits for i128 still means "huge", not "absent"
    let value = digits.parse::<i128>().unwrap_or(i128::MAX);
    Some(if negative { -value } else { value })
}
