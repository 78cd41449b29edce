use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notification Service API",
        version = "1.0.0",
        description = "Transactional email dispatch over the users collection. \n\n**Endpoints:**\n- Bulk greeting dispatch to every valid user record\n- Single signup email carrying the tree access ID\n- Health monitoring",
        contact(
            name = "Arboria Team",
            email = "support@arboria.app"
        )
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Notifications
        crate::api::notifications::get_data,
        crate::api::notifications::send_email,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::notifications::SendEmailRequest,
            crate::api::notifications::BulkSendResponse,
            crate::services::notification_service::DispatchOutcome,
            crate::services::notification_service::DispatchStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Notifications", description = "Email dispatch endpoints. Bulk greeting over the users collection and single signup email."),
    )
)]
pub struct ApiDoc;
