use sea_orm::*;
use uuid::Uuid;

use crate::models::projects::{self, CreateProject, ProjectListQuery, ProjectStatus, UpdateProject};

/// Insert a new project (starts in Open status).
pub async fn insert_project<C: ConnectionTrait>(
    db: &C,
    input: CreateProject,
    client_id: Uuid,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        client_id: Set(client_id),
        status: Set(ProjectStatus::Open),
        selected_freelancer_id: Set(None),
        created_at: Set(chrono::Utc::now()),
    };

    new_project.insert(db).await
}

/// Fetch a single project by ID.
pub async fn get_project_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// List projects with the search/status/budget filters and sort order.
pub async fn list_projects<C: ConnectionTrait>(
    db: &C,
    q: &ProjectListQuery,
) -> Result<Vec<projects::Model>, DbErr> {
    let mut query = projects::Entity::find();

    if let Some(search) = q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search);
        query = query.filter(
            Condition::any()
                .add(projects::Column::Title.like(pattern.clone()))
                .add(projects::Column::Description.like(pattern)),
        );
    }
    if let Some(status) = q.status {
        query = query.filter(projects::Column::Status.eq(status));
    }
    if let Some(min) = q.min_budget {
        query = query.filter(projects::Column::Budget.gte(min));
    }
    if let Some(max) = q.max_budget {
        query = query.filter(projects::Column::Budget.lte(max));
    }

    query = match q.sort.as_deref() {
        Some("budget_desc") => query.order_by_desc(projects::Column::Budget),
        Some("budget_asc") => query.order_by_asc(projects::Column::Budget),
        _ => query.order_by_desc(projects::Column::CreatedAt),
    };

    query.all(db).await
}

/// Fetch all projects owned by a client, newest first.
pub async fn get_projects_by_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::ClientId.eq(client_id))
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Update a project's editable fields (title/description/budget).
pub async fn update_project<C: ConnectionTrait>(
    db: &C,
    project: projects::Model,
    input: UpdateProject,
) -> Result<projects::Model, DbErr> {
    let mut active: projects::ActiveModel = project.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(budget) = input.budget {
        active.budget = Set(budget);
    }

    active.update(db).await
}

/// Delete a project by ID.
pub async fn delete_project<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    projects::Entity::delete_by_id(id).exec(db).await
}
