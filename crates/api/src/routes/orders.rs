//! Order submission endpoint and the shared request types.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use checkout::{CustomerDetails, ManualChannel, NotificationRelay, OrderPipeline, OrderRequest};
use common::{IdentityKey, LineItem, Money, ProductId};
use order_store::{DeliveryAddress, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Pipeline wired to whichever store and relay the server was started with.
pub type SharedPipeline = OrderPipeline<Arc<dyn OrderStore>, Arc<dyn NotificationRelay>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub pipeline: SharedPipeline,
    pub manual_channel: ManualChannel,
}

// -- Request types --

/// A cart line as sent by the storefront. Prices are in minor units.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub product_id: String,
    pub brand_label: String,
    pub variant_label: String,
    pub unit_price: i64,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub promotional_tag: Option<String>,
    pub quantity: u32,
}

impl From<LineItemRequest> for LineItem {
    fn from(req: LineItemRequest) -> Self {
        let product_id = ProductId::new(req.product_id);
        LineItem {
            id: IdentityKey::for_variant(&product_id, &req.variant_label),
            product_id,
            brand_label: req.brand_label,
            variant_label: req.variant_label,
            unit_price: Money::from_cents(req.unit_price),
            image_ref: req.image_ref,
            promotional_tag: req.promotional_tag,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressRequest {
    pub door: String,
    pub street: String,
    pub district: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub address: AddressRequest,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<SubmitOrderRequest> for OrderRequest {
    fn from(req: SubmitOrderRequest) -> Self {
        let address = req.address;
        OrderRequest::new(
            req.items.into_iter().map(LineItem::from).collect(),
            CustomerDetails {
                name: req.customer_name,
                phone: req.customer_phone,
                address: DeliveryAddress {
                    door: address.door,
                    street: address.street,
                    district: address.district,
                    state: address.state,
                    postal_code: address.postal_code,
                },
                notes: req.notes,
            },
        )
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub success: bool,
    pub order_id: String,
    pub notified: bool,
}

// -- Handlers --

/// POST /orders: validate, persist and notify.
#[tracing::instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderPlacedResponse>), ApiError> {
    let Json(req) = payload?;

    let receipt = state.pipeline.submit(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderPlacedResponse {
            success: true,
            order_id: receipt.order_id.to_string(),
            notified: receipt.notified,
        }),
    ))
}
