use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::database::UserStore;
use crate::services::notification_service::{self, BulkDispatch, DispatchOutcome};
use crate::services::sendgrid_service::EmailSender;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendEmailRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "treeId")]
    pub tree_id: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BulkSendResponse {
    pub message: String,
    pub results: Vec<DispatchOutcome>,
}

#[utoipa::path(
    get,
    path = "/get-data",
    tag = "Notifications",
    responses(
        (status = 200, description = "Email sending completed", body = BulkSendResponse),
        (status = 404, description = "No documents found, or no valid emails found"),
        (status = 500, description = "Failed to fetch data or send emails")
    )
)]
pub async fn get_data(
    users: web::Data<dyn UserStore>,
    mailer: web::Data<dyn EmailSender>,
) -> HttpResponse {
    log::info!("📬 GET /get-data - Sending greeting to all valid users");

    match notification_service::dispatch_bulk(users.get_ref(), mailer.get_ref()).await {
        Ok(BulkDispatch::NoDocuments) => {
            log::warn!("⚠️ No documents found in users collection");
            HttpResponse::NotFound().json(serde_json::json!({
                "message": "No documents found"
            }))
        }
        Ok(BulkDispatch::NoValidEmails) => {
            log::warn!("⚠️ No valid emails found in users collection");
            HttpResponse::NotFound().json(serde_json::json!({
                "message": "No valid emails found"
            }))
        }
        Ok(BulkDispatch::Completed(results)) => {
            log::info!("✅ Email sending completed: {} outcomes", results.len());
            HttpResponse::Ok().json(BulkSendResponse {
                message: "Email sending completed.".to_string(),
                results,
            })
        }
        Err(e) => {
            log::error!("❌ Error fetching data: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch data or send emails"
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/send-email",
    tag = "Notifications",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent successfully"),
        (status = 400, description = "Email and name are required"),
        (status = 500, description = "Failed to send email")
    )
)]
pub async fn send_email(
    mailer: web::Data<dyn EmailSender>,
    request: web::Json<SendEmailRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("");
    let name = request.name.as_deref().unwrap_or("");
    let tree_id = request.tree_id.as_deref();

    log::info!(
        "📨 POST /send-email - email: {}, name: {}, treeId: {:?}",
        email, name, tree_id
    );

    // Validate input
    if email.is_empty() || name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Email and name are required."
        }));
    }

    match notification_service::send_signup_email(mailer.get_ref(), email, name, tree_id).await {
        Ok(()) => {
            log::info!("✅ Email sent to {}", email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Email sent successfully!"
            }))
        }
        Err(e) => {
            log::error!("❌ Error sending email to {}: {}", email, e);

            if let Some(body) = &e.response_body {
                log::error!("SendGrid response error: {}", body);
            }

            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to send email."
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserDocument;
    use crate::services::sendgrid_service::{OutboundEmail, SendError};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubStore {
        documents: Vec<UserDocument>,
    }

    #[async_trait]
    impl UserStore for StubStore {
        async fn fetch_all(&self) -> Result<Vec<UserDocument>, String> {
            Ok(self.documents.clone())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl UserStore for FailingStore {
        async fn fetch_all(&self) -> Result<Vec<UserDocument>, String> {
            Err("Database error: connection refused".to_string())
        }
    }

    struct StubMailer {
        fail_for: Vec<String>,
    }

    #[async_trait]
    impl EmailSender for StubMailer {
        async fn send(&self, message: &OutboundEmail) -> Result<(), SendError> {
            if self.fail_for.contains(&message.to) {
                return Err(SendError {
                    message: "stub delivery failure".to_string(),
                    response_body: Some("{\"errors\":[{\"message\":\"bad request\"}]}".to_string()),
                });
            }
            Ok(())
        }
    }

    fn stub_data(
        documents: Vec<UserDocument>,
        fail_for: &[&str],
    ) -> (web::Data<dyn UserStore>, web::Data<dyn EmailSender>) {
        let store: Arc<dyn UserStore> = Arc::new(StubStore { documents });
        let mailer: Arc<dyn EmailSender> = Arc::new(StubMailer {
            fail_for: fail_for.iter().map(|a| a.to_string()).collect(),
        });
        (web::Data::from(store), web::Data::from(mailer))
    }

    fn user(email: &str, name: &str) -> UserDocument {
        UserDocument {
            email: Some(email.to_string()),
            name: Some(name.to_string()),
        }
    }

    #[actix_web::test]
    async fn get_data_with_empty_collection_returns_no_documents() {
        let (users, mailer) = stub_data(vec![], &[]);
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/get-data", web::get().to(get_data)),
        )
        .await;

        let request = test::TestRequest::get().uri("/get-data").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "No documents found");
    }

    #[actix_web::test]
    async fn get_data_with_only_invalid_records_returns_no_valid_emails() {
        let (users, mailer) = stub_data(
            vec![user("not-an-email", "Ana"), user("", "Bia")],
            &[],
        );
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/get-data", web::get().to(get_data)),
        )
        .await;

        let request = test::TestRequest::get().uri("/get-data").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "No valid emails found");
    }

    #[actix_web::test]
    async fn get_data_reports_one_success_outcome() {
        let (users, mailer) = stub_data(vec![user("a@b.com", "Ana")], &[]);
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/get-data", web::get().to(get_data)),
        )
        .await;

        let request = test::TestRequest::get().uri("/get-data").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Email sending completed.");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["email"], "a@b.com");
        assert_eq!(body["results"][0]["status"], "success");
    }

    #[actix_web::test]
    async fn get_data_keeps_going_when_one_send_fails() {
        let (users, mailer) = stub_data(
            vec![user("a@b.com", "Ana"), user("c@d.com", "Caio")],
            &["c@d.com"],
        );
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/get-data", web::get().to(get_data)),
        )
        .await;

        let request = test::TestRequest::get().uri("/get-data").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["email"], "a@b.com");
        assert_eq!(results[0]["status"], "success");
        assert_eq!(results[1]["email"], "c@d.com");
        assert_eq!(results[1]["status"], "failed");
        assert_eq!(results[1]["error"], "stub delivery failure");
    }

    #[actix_web::test]
    async fn get_data_with_failing_store_returns_generic_error() {
        let store: Arc<dyn UserStore> = Arc::new(FailingStore);
        let mailer: Arc<dyn EmailSender> = Arc::new(StubMailer { fail_for: vec![] });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .app_data(web::Data::from(mailer))
                .route("/get-data", web::get().to(get_data)),
        )
        .await;

        let request = test::TestRequest::get().uri("/get-data").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Failed to fetch data or send emails");
    }

    #[actix_web::test]
    async fn send_email_without_email_field_is_a_bad_request() {
        let (users, mailer) = stub_data(vec![], &[]);
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/send-email", web::post().to(send_email)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/send-email")
            .set_json(serde_json::json!({ "name": "Xena" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Email and name are required.");
    }

    #[actix_web::test]
    async fn send_email_with_empty_name_is_a_bad_request() {
        let (users, mailer) = stub_data(vec![], &[]);
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/send-email", web::post().to(send_email)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/send-email")
            .set_json(serde_json::json!({ "email": "a@b.com", "name": "" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn send_email_with_valid_body_succeeds() {
        let (users, mailer) = stub_data(vec![], &[]);
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/send-email", web::post().to(send_email)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/send-email")
            .set_json(serde_json::json!({
                "email": "a@b.com",
                "name": "Ana",
                "treeId": "tree-42"
            }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Email sent successfully!");
    }

    #[actix_web::test]
    async fn send_email_delivery_failure_returns_generic_error() {
        let (users, mailer) = stub_data(vec![], &["a@b.com"]);
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(mailer)
                .route("/send-email", web::post().to(send_email)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/send-email")
            .set_json(serde_json::json!({ "email": "a@b.com", "name": "Ana" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Failed to send email.");
    }
}
