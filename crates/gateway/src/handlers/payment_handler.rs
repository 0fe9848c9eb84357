//! Payment handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, ErrorBody};
use domain::{Money, Payment};

use crate::extractors::{ApiPath, ValidatedJson};
use crate::middleware::StaffMember;
use crate::state::AppState;

/// Request to record the payment that closes an order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    #[validate(range(min = 1, message = "service_order_id must be a positive id"))]
    #[schema(example = 12)]
    pub service_order_id: i32,
    /// Must equal the order estimate exactly. A decimal string, or a whole
    /// JSON number; fractional JSON numbers are refused.
    #[schema(value_type = String, example = "200.00")]
    pub amount: Money,
}

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record_payment))
        .route("/:id", get(get_payment))
}

/// Record the payment of a FINALIZED order, which becomes DELIVERED
#[utoipa::path(
    post,
    path = "/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Invalid amount", body = ErrorBody),
        (status = 404, description = "Service order not found", body = ErrorBody),
        (status = 409, description = "Already paid, not payable or amount mismatch", body = ErrorBody)
    )
)]
pub async fn record_payment(
    Extension(staff): Extension<StaffMember>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    tracing::debug!(
        staff = %staff.subject,
        order_id = req.service_order_id,
        amount = %req.amount,
        "payment requested"
    );

    let payment = state
        .services
        .payments()
        .record(req.service_order_id, req.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Get a payment
#[utoipa::path(
    get,
    path = "/v1/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found", body = ErrorBody)
    )
)]
pub async fn get_payment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Payment>> {
    Ok(Json(state.services.payments().get(id).await?))
}
