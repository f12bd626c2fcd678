//! Manual order endpoint: formats a chat message instead of placing an order.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use checkout::ManualCustomer;
use common::LineItem;
use serde::{Deserialize, Serialize};

use super::orders::{AddressRequest, AppState, LineItemRequest};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualOrderRequest {
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub address: Option<AddressRequest>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ManualOrderResponse {
    pub success: bool,
    pub message: String,
    pub destination: String,
}

/// Joins the non-blank address parts, e.g. `"14B, Temple Road, Thrissur"`.
fn address_line(address: &AddressRequest) -> Option<String> {
    let parts: Vec<&str> = [
        &address.door,
        &address.street,
        &address.district,
        &address.state,
        &address.postal_code,
    ]
    .into_iter()
    .map(|p| p.trim())
    .filter(|p| !p.is_empty())
    .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// POST /orders/manual: nothing is stored.
#[tracing::instrument(skip(state, payload))]
pub async fn format(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ManualOrderRequest>, JsonRejection>,
) -> Result<Json<ManualOrderResponse>, ApiError> {
    let Json(req) = payload?;

    let items: Vec<LineItem> = req.items.into_iter().map(LineItem::from).collect();
    let customer = ManualCustomer {
        name: req.customer_name,
        phone: req.customer_phone,
        address: req.address.as_ref().and_then(address_line),
        notes: req.notes,
    };

    let formatted = state.manual_channel.format(&items, &customer)?;
    metrics::counter!("manual_orders_formatted_total").increment(1);

    Ok(Json(ManualOrderResponse {
        success: true,
        message: formatted.text,
        destination: formatted.destination,
    }))
}
