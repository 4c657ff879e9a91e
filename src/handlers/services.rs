use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, RedisCache, keys};
use crate::chat::server::ChatServer;
use crate::db::orders as order_db;
use crate::db::services as service_db;
use crate::engine::{EngineError, matching};
use crate::models::services::{CreateService, ServiceListQuery, UpdateService};
use crate::models::users::Roles;

/// GET /api/services — list services with search/status/price filters.
/// Read-through cached: the serialized filter set is the cache key.
pub async fn list_services(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    query: web::Query<ServiceListQuery>,
) -> impl Responder {
    let filters = serde_json::to_string(&query.0).unwrap_or_default();
    let cache_key = keys::service_list(&filters);

    if let Ok(Some(cached)) = cache.get::<serde_json::Value>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match service_db::list_services(db.get_ref(), &query).await {
        Ok(services) => {
            let ttl = CacheConfig::from_env().service_list_ttl.as_secs();
            let _ = cache.set(&cache_key, &services, Some(ttl)).await;
            HttpResponse::Ok().json(services)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/services/{id} — get a single service.
pub async fn get_service(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match service_db::get_service_by_id(db.get_ref(), id).await {
        Ok(Some(service)) => HttpResponse::Ok().json(service),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Service {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/services/{id}/orders — the orders placed on a service, owner only.
pub async fn get_service_orders(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let service_id = path.into_inner();

    let service = service_db::get_service_by_id(db.get_ref(), service_id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != user.0.id {
        return Err(EngineError::forbidden(
            "only the service owner can view its orders",
        ));
    }

    let orders = order_db::get_orders_by_service(db.get_ref(), service_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// POST /api/services — a freelancer lists a new service.
pub async fn create_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateService>,
) -> Result<HttpResponse, EngineError> {
    require_role(&user.0, Roles::Freelancer)?;

    let service = service_db::insert_service(db.get_ref(), body.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::service_list_pattern()).await;
    Ok(HttpResponse::Created().json(service))
}

/// PUT /api/services/{id} — the owning freelancer edits the listing.
pub async fn update_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateService>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();

    let service = service_db::get_service_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != user.0.id {
        return Err(EngineError::forbidden("you can only edit your own services"));
    }

    let updated = service_db::update_service(db.get_ref(), service, body.into_inner()).await?;
    let _ = cache.delete_pattern(keys::service_list_pattern()).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/services/{id} — the owning freelancer removes the listing.
pub async fn delete_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();

    let service = service_db::get_service_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| EngineError::not_found("service not found"))?;

    if service.freelancer_id != user.0.id {
        return Err(EngineError::forbidden(
            "you can only delete your own services",
        ));
    }

    service_db::delete_service(db.get_ref(), id).await?;
    let _ = cache.delete_pattern(keys::service_list_pattern()).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Service {id} deleted"),
    })))
}

/// GET /api/services/my — the authenticated freelancer's own services.
pub async fn my_services(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match service_db::get_services_by_freelancer(db.get_ref(), user.0.id).await {
        Ok(services) => HttpResponse::Ok().json(services),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/services/{service_id}/orders/{order_id}/accept — the owner picks
/// an order; the matching engine does the cascade and chat creation.
pub async fn accept_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    chat_server: web::Data<Arc<ChatServer>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, EngineError> {
    let (service_id, order_id) = path.into_inner();

    let outcome = matching::accept_order(db.get_ref(), service_id, order_id, user.0.id).await?;
    let _ = cache.delete_pattern(keys::service_list_pattern()).await;

    if outcome.chat_created {
        chat_server
            .notify_chat_created(
                outcome.chat.id,
                outcome.chat.client_id,
                outcome.chat.freelancer_id,
            )
            .await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": outcome.service,
        "order": outcome.order,
        "chat_id": outcome.chat.id,
    })))
}

/// POST /api/services/{id}/cancel — take the service off the market and
/// reject its pending orders.
pub async fn cancel_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let service = matching::cancel_service(db.get_ref(), path.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::service_list_pattern()).await;
    Ok(HttpResponse::Ok().json(service))
}

/// POST /api/services/{id}/resume — put a cancelled service back on the market.
pub async fn resume_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let service = matching::resume_service(db.get_ref(), path.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::service_list_pattern()).await;
    Ok(HttpResponse::Ok().json(service))
}
