use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, RedisCache, keys};
use crate::chat::server::ChatServer;
use crate::db::bids as bid_db;
use crate::db::projects as project_db;
use crate::engine::{EngineError, matching};
use crate::models::projects::{CreateProject, ProjectListQuery, UpdateProject};
use crate::models::users::Roles;

/// GET /api/projects — list projects with search/status/budget filters.
/// Read-through cached: the serialized filter set is the cache key.
pub async fn list_projects(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    query: web::Query<ProjectListQuery>,
) -> impl Responder {
    let filters = serde_json::to_string(&query.0).unwrap_or_default();
    let cache_key = keys::project_list(&filters);

    if let Ok(Some(cached)) = cache.get::<serde_json::Value>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match project_db::list_projects(db.get_ref(), &query).await {
        Ok(projects) => {
            let ttl = CacheConfig::from_env().project_list_ttl.as_secs();
            let _ = cache.set(&cache_key, &projects, Some(ttl)).await;
            HttpResponse::Ok().json(projects)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/projects/{id} — get a single project.
pub async fn get_project(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match project_db::get_project_by_id(db.get_ref(), id).await {
        Ok(Some(project)) => HttpResponse::Ok().json(project),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Project {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/projects/{id}/bids — list the bids on a project.
pub async fn get_project_bids(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let project_id = path.into_inner();
    match bid_db::get_bids_by_project(db.get_ref(), project_id).await {
        Ok(bids) => HttpResponse::Ok().json(bids),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/projects — a client posts a new project.
pub async fn create_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateProject>,
) -> Result<HttpResponse, EngineError> {
    require_role(&user.0, Roles::Client)?;

    let project = project_db::insert_project(db.get_ref(), body.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;
    Ok(HttpResponse::Created().json(project))
}

/// PUT /api/projects/{id} — the owning client edits title/description/budget.
pub async fn update_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProject>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();

    let project = project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.client_id != user.0.id {
        return Err(EngineError::forbidden("you can only edit your own projects"));
    }

    let updated = project_db::update_project(db.get_ref(), project, body.into_inner()).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/projects/{id} — the owning client removes the project.
pub async fn delete_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let id = path.into_inner();

    let project = project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| EngineError::not_found("project not found"))?;

    if project.client_id != user.0.id {
        return Err(EngineError::forbidden(
            "you can only delete your own projects",
        ));
    }

    project_db::delete_project(db.get_ref(), id).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Project {id} deleted"),
    })))
}

/// GET /api/projects/my — the authenticated client's own projects.
pub async fn my_projects(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match project_db::get_projects_by_client(db.get_ref(), user.0.id).await {
        Ok(projects) => HttpResponse::Ok().json(projects),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/projects/{project_id}/bids/{bid_id}/accept — the owner picks a
/// winning bid; the matching engine does the cascade and chat creation.
pub async fn accept_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    chat_server: web::Data<Arc<ChatServer>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, EngineError> {
    let (project_id, bid_id) = path.into_inner();

    let outcome = matching::accept_bid(db.get_ref(), project_id, bid_id, user.0.id).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;

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
        "project": outcome.project,
        "bid": outcome.bid,
        "chat_id": outcome.chat.id,
    })))
}

/// POST /api/projects/{id}/cancel — only valid while the project is open.
pub async fn cancel_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let project = matching::cancel_project(db.get_ref(), path.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects/{id}/resume — re-open a cancelled project.
pub async fn resume_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let project = matching::resume_project(db.get_ref(), path.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects/{id}/complete — the selected freelancer marks it done.
pub async fn complete_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let project = matching::complete_project(db.get_ref(), path.into_inner(), user.0.id).await?;
    let _ = cache.delete_pattern(keys::project_list_pattern()).await;
    Ok(HttpResponse::Ok().json(project))
}
