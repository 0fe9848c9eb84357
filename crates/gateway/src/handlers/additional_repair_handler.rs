//! Additional repair handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, ErrorBody};
use domain::{AdditionalRepair, RepairDecision, RepairItems};
use order_service_lib::service::NewAdditionalRepair;

use super::items::{positive_ids, ItemsRequest, PartItem};
use crate::extractors::{ApiPath, ValidatedJson};
use crate::state::AppState;

/// Request to create an additional repair
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdditionalRepairRequest {
    #[validate(range(min = 1, message = "service_order_id must be a positive id"))]
    #[schema(example = 12)]
    pub service_order_id: i32,
    #[schema(example = "Gearbox leaking oil")]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "positive_ids"))]
    pub service_ids: Vec<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub parts: Vec<PartItem>,
}

/// Customer decision on a submitted repair
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RepairDecisionRequest {
    pub decision: RepairDecision,
}

/// Create additional repair routes
pub fn additional_repair_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_additional_repair))
        .route("/:id", get(get_additional_repair))
        .route("/:id/add", patch(add_items))
        .route("/:id/remove", patch(remove_items))
        .route("/:id/submit", patch(submit_additional_repair))
        .route("/:id/decision", patch(decide_additional_repair))
}

/// Create an additional repair in IN_ANALYSIS, reserving its parts
#[utoipa::path(
    post,
    path = "/v1/additional-repairs",
    tag = "Additional repairs",
    security(("bearer_auth" = [])),
    request_body = CreateAdditionalRepairRequest,
    responses(
        (status = 201, description = "Additional repair created", body = AdditionalRepair),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Unknown order or catalog item", body = ErrorBody),
        (status = 409, description = "Order state or stock conflict", body = ErrorBody)
    )
)]
pub async fn create_additional_repair(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAdditionalRepairRequest>,
) -> AppResult<(StatusCode, Json<AdditionalRepair>)> {
    let repair = state
        .services
        .repairs()
        .create(NewAdditionalRepair {
            service_order_id: req.service_order_id,
            description: req.description,
            service_ids: req.service_ids,
            parts: req.parts.into_iter().map(Into::into).collect(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(repair)))
}

/// Get an additional repair with its lines
#[utoipa::path(
    get,
    path = "/v1/additional-repairs/{id}",
    tag = "Additional repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Additional repair ID")),
    responses(
        (status = 200, description = "Additional repair", body = AdditionalRepair),
        (status = 404, description = "Additional repair not found", body = ErrorBody)
    )
)]
pub async fn get_additional_repair(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<AdditionalRepair>> {
    Ok(Json(state.services.repairs().get(id).await?))
}

/// Add services and parts while the repair is IN_ANALYSIS
#[utoipa::path(
    patch,
    path = "/v1/additional-repairs/{id}/add",
    tag = "Additional repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Additional repair ID")),
    request_body = ItemsRequest,
    responses(
        (status = 200, description = "Items added", body = AdditionalRepair),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 409, description = "Repair no longer in analysis or insufficient stock", body = ErrorBody)
    )
)]
pub async fn add_items(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(items): ValidatedJson<ItemsRequest>,
) -> AppResult<Json<AdditionalRepair>> {
    let repair = state
        .services
        .repairs()
        .modify_items(id, items.into(), RepairItems::default())
        .await?;
    Ok(Json(repair))
}

/// Remove services and part quantities while the repair is IN_ANALYSIS
#[utoipa::path(
    patch,
    path = "/v1/additional-repairs/{id}/remove",
    tag = "Additional repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Additional repair ID")),
    request_body = ItemsRequest,
    responses(
        (status = 200, description = "Items removed", body = AdditionalRepair),
        (status = 400, description = "Items not held by the repair", body = ErrorBody),
        (status = 409, description = "Repair no longer in analysis", body = ErrorBody)
    )
)]
pub async fn remove_items(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(items): ValidatedJson<ItemsRequest>,
) -> AppResult<Json<AdditionalRepair>> {
    let repair = state
        .services
        .repairs()
        .modify_items(id, RepairItems::default(), items.into())
        .await?;
    Ok(Json(repair))
}

/// IN_ANALYSIS → AWAITING_APPROVAL
#[utoipa::path(
    patch,
    path = "/v1/additional-repairs/{id}/submit",
    tag = "Additional repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Additional repair ID")),
    responses(
        (status = 200, description = "Submitted for approval", body = AdditionalRepair),
        (status = 404, description = "Additional repair not found", body = ErrorBody),
        (status = 409, description = "Invalid transition", body = ErrorBody)
    )
)]
pub async fn submit_additional_repair(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<AdditionalRepair>> {
    Ok(Json(state.services.repairs().submit(id).await?))
}

/// Record the customer's decision
#[utoipa::path(
    patch,
    path = "/v1/additional-repairs/{id}/decision",
    tag = "Additional repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Additional repair ID")),
    request_body = RepairDecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = AdditionalRepair),
        (status = 400, description = "Unknown decision", body = ErrorBody),
        (status = 404, description = "Additional repair not found", body = ErrorBody),
        (status = 409, description = "Invalid transition", body = ErrorBody)
    )
)]
pub async fn decide_additional_repair(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<RepairDecisionRequest>,
) -> AppResult<Json<AdditionalRepair>> {
    Ok(Json(state.services.repairs().decide(id, req.decision).await?))
}
