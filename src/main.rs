use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use freelance_backend::auth::middleware::JwtSecret;
use freelance_backend::cache::RedisCache;
use freelance_backend::chat::server::ChatServer;
use freelance_backend::create_pool;
use freelance_backend::engine::settlement;
use freelance_backend::handlers;
use freelance_backend::payments::stripe::StripeCheckout;
use freelance_backend::payments::{PaymentConfig, PaymentProvider};
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let db = create_pool().await;
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    let db_data = web::Data::new(db.clone());

    // Initialize Redis cache
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let redis_cache = RedisCache::new(&redis_url)
        .await
        .expect("Failed to connect to Redis");
    let redis_data = web::Data::new(Arc::new(redis_cache));
    tracing::info!("Connected to Redis");

    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let jwt_data = web::Data::new(JwtSecret(jwt_secret));

    // Payment provider + settlement configuration.
    let payment_config = PaymentConfig::from_env();
    let provider: Arc<dyn PaymentProvider> = Arc::new(StripeCheckout::from_env());
    let provider_data = web::Data::new(provider.clone());
    let payment_config_data = web::Data::new(payment_config.clone());

    // Background sweep resolving abandoned pending payments.
    tokio::spawn(settlement::run_reconciliation_sweep(
        db.clone(),
        provider,
        payment_config,
    ));

    // Create the shared chat server (room manager for WebSocket connections).
    let chat_server = web::Data::new(Arc::new(ChatServer::new()));

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{port}");
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(jwt_data.clone())
            .app_data(provider_data.clone())
            .app_data(payment_config_data.clone())
            .app_data(chat_server.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
