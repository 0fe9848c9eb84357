//! Service order handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppResult, ErrorBody, Paginated, PaginationMeta, PaginationParams};
use domain::{
    ServiceOrder, ServiceOrderDetails, ServiceOrderStatus, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE,
};

use super::items::{ItemsRequest, PartItem};
use crate::extractors::{ApiPath, ApiQuery, OptionalJson, ValidatedJson};
use crate::state::AppState;

/// Request to open a service order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenServiceOrderRequest {
    #[validate(range(min = 1, message = "customer_id must be a positive id"))]
    #[schema(example = 1)]
    pub customer_id: i32,
    #[validate(range(min = 1, message = "vehicle_id must be a positive id"))]
    #[schema(example = 1)]
    pub vehicle_id: i32,
}

/// Request to attach a catalog service
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttachServiceRequest {
    #[validate(range(min = 1, message = "service_id must be a positive id"))]
    #[schema(example = 3)]
    pub service_id: i32,
}

/// Filters for listing service orders
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListServiceOrdersQuery {
    /// Canonical status, e.g. `IN_EXECUTION`
    pub status: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size, capped at 100
    pub per_page: Option<u64>,
}

/// Page of service order headers
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceOrderPage {
    pub data: Vec<ServiceOrder>,
    pub meta: PaginationMeta,
}

impl From<Paginated<ServiceOrder>> for ServiceOrderPage {
    fn from(page: Paginated<ServiceOrder>) -> Self {
        Self {
            data: page.data,
            meta: page.meta,
        }
    }
}

/// Create service order routes
pub fn service_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(open_service_order).get(list_service_orders))
        .route("/:id", get(get_service_order))
        .route("/:id/services", post(attach_service))
        .route("/:id/services/:line_id", delete(detach_service))
        .route("/:id/parts", post(attach_part))
        .route("/:id/parts/:line_id", delete(detach_part))
        .route("/:id/diagnosis", patch(start_diagnosis))
        .route("/:id/estimate", patch(submit_estimate))
        .route("/:id/execution", patch(start_execution))
        .route("/:id/finalize", patch(finalize_service_order))
        .route("/:id/cancel", patch(cancel_service_order))
}

/// Open a service order in RECEIVED
#[utoipa::path(
    post,
    path = "/v1/service-orders",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    request_body = OpenServiceOrderRequest,
    responses(
        (status = 201, description = "Order opened", body = ServiceOrderDetails),
        (status = 400, description = "Invalid input or soft-deleted reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Unknown customer or vehicle", body = ErrorBody)
    )
)]
pub async fn open_service_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<OpenServiceOrderRequest>,
) -> AppResult<(StatusCode, Json<ServiceOrderDetails>)> {
    let details = state
        .services
        .orders()
        .open(req.customer_id, req.vehicle_id)
        .await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// List service order headers, newest first
#[utoipa::path(
    get,
    path = "/v1/service-orders",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(ListServiceOrdersQuery),
    responses(
        (status = 200, description = "Page of service orders", body = ServiceOrderPage),
        (status = 400, description = "Unknown status", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_service_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListServiceOrdersQuery>,
) -> AppResult<Json<ServiceOrderPage>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ServiceOrderStatus>)
        .transpose()?;
    let params = PaginationParams::new(
        query.page.unwrap_or(DEFAULT_PAGE_NUMBER),
        query.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    );

    let page = state.services.orders().list(status, params).await?;
    Ok(Json(page.into()))
}

/// Get a service order with its lines and additional repairs
#[utoipa::path(
    get,
    path = "/v1/service-orders/{id}",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Service order", body = ServiceOrderDetails),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn get_service_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ServiceOrderDetails>> {
    let details = state.services.orders().get(id).await?;
    Ok(Json(details))
}

/// Attach a catalog service at its current price
#[utoipa::path(
    post,
    path = "/v1/service-orders/{id}/services",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    request_body = AttachServiceRequest,
    responses(
        (status = 201, description = "Service attached", body = ServiceOrderDetails),
        (status = 400, description = "Soft-deleted service", body = ErrorBody),
        (status = 404, description = "Unknown order or service", body = ErrorBody),
        (status = 409, description = "Order composition is locked", body = ErrorBody)
    )
)]
pub async fn attach_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<AttachServiceRequest>,
) -> AppResult<(StatusCode, Json<ServiceOrderDetails>)> {
    let details = state
        .services
        .orders()
        .attach_service(id, req.service_id)
        .await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Detach a service line
#[utoipa::path(
    delete,
    path = "/v1/service-orders/{id}/services/{line_id}",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Service order ID"),
        ("line_id" = i32, Path, description = "Service line ID")
    ),
    responses(
        (status = 204, description = "Service line removed"),
        (status = 404, description = "Unknown order or line", body = ErrorBody),
        (status = 409, description = "Order composition is locked", body = ErrorBody)
    )
)]
pub async fn detach_service(
    State(state): State<AppState>,
    ApiPath((id, line_id)): ApiPath<(i32, i32)>,
) -> AppResult<StatusCode> {
    state.services.orders().detach_service(id, line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reserve and attach a quantity of a catalog part
#[utoipa::path(
    post,
    path = "/v1/service-orders/{id}/parts",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    request_body = PartItem,
    responses(
        (status = 201, description = "Part reserved and attached", body = ServiceOrderDetails),
        (status = 400, description = "Invalid quantity or soft-deleted part", body = ErrorBody),
        (status = 404, description = "Unknown order or part", body = ErrorBody),
        (status = 409, description = "Insufficient stock or locked composition", body = ErrorBody)
    )
)]
pub async fn attach_part(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(item): ValidatedJson<PartItem>,
) -> AppResult<(StatusCode, Json<ServiceOrderDetails>)> {
    let details = state.services.orders().attach_part(id, item.into()).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Detach a part line, releasing its reservation
#[utoipa::path(
    delete,
    path = "/v1/service-orders/{id}/parts/{line_id}",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Service order ID"),
        ("line_id" = i32, Path, description = "Part line ID")
    ),
    responses(
        (status = 204, description = "Part line removed"),
        (status = 404, description = "Unknown order or line", body = ErrorBody),
        (status = 409, description = "Order composition is locked", body = ErrorBody)
    )
)]
pub async fn detach_part(
    State(state): State<AppState>,
    ApiPath((id, line_id)): ApiPath<(i32, i32)>,
) -> AppResult<StatusCode> {
    state.services.orders().detach_part(id, line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// RECEIVED → IN_DIAGNOSIS, optionally attaching services and parts
#[utoipa::path(
    patch,
    path = "/v1/service-orders/{id}/diagnosis",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    request_body(content = ItemsRequest, description = "Items to attach; the body may be omitted"),
    responses(
        (status = 200, description = "Diagnosis started", body = ServiceOrderDetails),
        (status = 404, description = "Unknown order or catalog item", body = ErrorBody),
        (status = 409, description = "Invalid transition or insufficient stock", body = ErrorBody)
    )
)]
pub async fn start_diagnosis(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    OptionalJson(items): OptionalJson<ItemsRequest>,
) -> AppResult<Json<ServiceOrderDetails>> {
    let parts = items.part_requests();
    let details = state
        .services
        .orders()
        .start_diagnosis(id, items.service_ids, parts)
        .await?;
    Ok(Json(details))
}

/// IN_DIAGNOSIS → AWAITING_APPROVAL
#[utoipa::path(
    patch,
    path = "/v1/service-orders/{id}/estimate",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Estimate submitted for approval", body = ServiceOrderDetails),
        (status = 404, description = "Service order not found", body = ErrorBody),
        (status = 409, description = "Invalid transition", body = ErrorBody)
    )
)]
pub async fn submit_estimate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ServiceOrderDetails>> {
    Ok(Json(state.services.orders().submit_estimate(id).await?))
}

/// AWAITING_APPROVAL → IN_EXECUTION
#[utoipa::path(
    patch,
    path = "/v1/service-orders/{id}/execution",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Execution started", body = ServiceOrderDetails),
        (status = 404, description = "Service order not found", body = ErrorBody),
        (status = 409, description = "Invalid transition", body = ErrorBody)
    )
)]
pub async fn start_execution(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ServiceOrderDetails>> {
    Ok(Json(state.services.orders().start_execution(id).await?))
}

/// IN_EXECUTION → FINALIZED
#[utoipa::path(
    patch,
    path = "/v1/service-orders/{id}/finalize",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Service order finalized", body = ServiceOrderDetails),
        (status = 404, description = "Service order not found", body = ErrorBody),
        (status = 409, description = "Invalid transition or undecided additional repairs", body = ErrorBody)
    )
)]
pub async fn finalize_service_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ServiceOrderDetails>> {
    Ok(Json(state.services.orders().finalize(id).await?))
}

/// Cancel a service order before execution, releasing its reservations
#[utoipa::path(
    patch,
    path = "/v1/service-orders/{id}/cancel",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Service order cancelled", body = ServiceOrderDetails),
        (status = 404, description = "Service order not found", body = ErrorBody),
        (status = 409, description = "Invalid transition", body = ErrorBody)
    )
)]
pub async fn cancel_service_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ServiceOrderDetails>> {
    Ok(Json(state.services.orders().cancel(id).await?))
}
