mod api;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::database::{MongoUserStore, UserStore};
use crate::services::sendgrid_service::{EmailSender, SendGridClient};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    let sendgrid_api_key = env::var("SENDGRID_API_KEY")
        .expect("SENDGRID_API_KEY must be set");

    log::info!("🚀 Starting Notification Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    // Initialize external clients
    let users: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(db));
    let mailer: Arc<dyn EmailSender> = Arc::new(SendGridClient::new(sendgrid_api_key));

    let users_data: web::Data<dyn UserStore> = web::Data::from(users);
    let mailer_data: web::Data<dyn EmailSender> = web::Data::from(mailer);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::permissive();

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(users_data.clone())
            .app_data(mailer_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Notifications
            .route("/get-data", web::get().to(api::notifications::get_data))
            .route("/send-email", web::post().to(api::notifications::send_email))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
