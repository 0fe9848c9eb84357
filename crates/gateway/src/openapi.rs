//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use common::{ErrorBody, PaginationMeta};
use domain::{
    AdditionalRepair, PartLine, Payment, RepairDecision, RepairStatus, ServiceLine, ServiceOrder,
    ServiceOrderDetails, ServiceOrderStatus,
};

use crate::handlers::additional_repair_handler::{
    CreateAdditionalRepairRequest, RepairDecisionRequest,
};
use crate::handlers::items::{ItemsRequest, PartItem};
use crate::handlers::payment_handler::RecordPaymentRequest;
use crate::handlers::service_order_handler::{
    AttachServiceRequest, OpenServiceOrderRequest, ServiceOrderPage,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::service_order_handler::open_service_order,
        crate::handlers::service_order_handler::list_service_orders,
        crate::handlers::service_order_handler::get_service_order,
        crate::handlers::service_order_handler::attach_service,
        crate::handlers::service_order_handler::detach_service,
        crate::handlers::service_order_handler::attach_part,
        crate::handlers::service_order_handler::detach_part,
        crate::handlers::service_order_handler::start_diagnosis,
        crate::handlers::service_order_handler::submit_estimate,
        crate::handlers::service_order_handler::start_execution,
        crate::handlers::service_order_handler::finalize_service_order,
        crate::handlers::service_order_handler::cancel_service_order,
        crate::handlers::additional_repair_handler::create_additional_repair,
        crate::handlers::additional_repair_handler::get_additional_repair,
        crate::handlers::additional_repair_handler::add_items,
        crate::handlers::additional_repair_handler::remove_items,
        crate::handlers::additional_repair_handler::submit_additional_repair,
        crate::handlers::additional_repair_handler::decide_additional_repair,
        crate::handlers::payment_handler::record_payment,
        crate::handlers::payment_handler::get_payment,
    ),
    components(
        schemas(
            ErrorBody,
            PaginationMeta,
            ServiceOrder,
            ServiceOrderDetails,
            ServiceOrderStatus,
            ServiceOrderPage,
            ServiceLine,
            PartLine,
            AdditionalRepair,
            RepairStatus,
            RepairDecision,
            Payment,
            OpenServiceOrderRequest,
            AttachServiceRequest,
            PartItem,
            ItemsRequest,
            CreateAdditionalRepairRequest,
            RepairDecisionRequest,
            RecordPaymentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Service orders", description = "Intake, composition and lifecycle of service orders"),
        (name = "Additional repairs", description = "Extra work discovered during execution"),
        (name = "Payments", description = "Payment that closes a finalized order"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_v1_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/v1/service-orders",
            "/v1/service-orders/{id}",
            "/v1/service-orders/{id}/services/{line_id}",
            "/v1/service-orders/{id}/diagnosis",
            "/v1/service-orders/{id}/cancel",
            "/v1/additional-repairs/{id}/decision",
            "/v1/payments/{id}",
        ] {
            assert!(paths.contains(&expected), "{expected} missing from the document");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
