use sea_orm::*;
use uuid::Uuid;

use crate::models::services::{self, CreateService, ServiceListQuery, ServiceStatus, UpdateService};

/// Insert a new service (starts Available).
pub async fn insert_service<C: ConnectionTrait>(
    db: &C,
    input: CreateService,
    freelancer_id: Uuid,
) -> Result<services::Model, DbErr> {
    let new_service = services::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        price: Set(input.price),
        freelancer_id: Set(freelancer_id),
        status: Set(ServiceStatus::Available),
        selected_client_id: Set(None),
        created_at: Set(chrono::Utc::now()),
    };

    new_service.insert(db).await
}

/// Fetch a single service by ID.
pub async fn get_service_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<services::Model>, DbErr> {
    services::Entity::find_by_id(id).one(db).await
}

/// List services with the search/status/price filters and sort order.
pub async fn list_services<C: ConnectionTrait>(
    db: &C,
    q: &ServiceListQuery,
) -> Result<Vec<services::Model>, DbErr> {
    let mut query = services::Entity::find();

    if let Some(search) = q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search);
        query = query.filter(
            Condition::any()
                .add(services::Column::Title.like(pattern.clone()))
                .add(services::Column::Description.like(pattern)),
        );
    }
    if let Some(status) = q.status {
        query = query.filter(services::Column::Status.eq(status));
    }
    if let Some(min) = q.min_price {
        query = query.filter(services::Column::Price.gte(min));
    }
    if let Some(max) = q.max_price {
        query = query.filter(services::Column::Price.lte(max));
    }

    query = match q.sort.as_deref() {
        Some("price_desc") => query.order_by_desc(services::Column::Price),
        Some("price_asc") => query.order_by_asc(services::Column::Price),
        _ => query.order_by_desc(services::Column::CreatedAt),
    };

    query.all(db).await
}

/// Fetch all services owned by a freelancer, newest first.
pub async fn get_services_by_freelancer<C: ConnectionTrait>(
    db: &C,
    freelancer_id: Uuid,
) -> Result<Vec<services::Model>, DbErr> {
    services::Entity::find()
        .filter(services::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(services::Column::CreatedAt)
        .all(db)
        .await
}

/// Update a service's editable fields (title/description/price).
pub async fn update_service<C: ConnectionTrait>(
    db: &C,
    service: services::Model,
    input: UpdateService,
) -> Result<services::Model, DbErr> {
    let mut active: services::ActiveModel = service.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }

    active.update(db).await
}

/// Delete a service by ID.
pub async fn delete_service<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    services::Entity::delete_by_id(id).exec(db).await
}
