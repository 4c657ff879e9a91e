use sea_orm::*;
use uuid::Uuid;

use crate::models::chats;

/// Find the chat for a (client, freelancer) pair, if one exists.
pub async fn get_chat_by_pair<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    freelancer_id: Uuid,
) -> Result<Option<chats::Model>, DbErr> {
    chats::Entity::find()
        .filter(chats::Column::ClientId.eq(client_id))
        .filter(chats::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await
}

/// Insert a chat row for the pair. Callers should treat a unique-constraint
/// violation as "someone else created it first" and re-read.
pub async fn insert_chat<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    freelancer_id: Uuid,
) -> Result<chats::Model, DbErr> {
    let new_chat = chats::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        freelancer_id: Set(freelancer_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_chat.insert(db).await
}

/// Fetch a single chat by ID.
pub async fn get_chat_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<chats::Model>, DbErr> {
    chats::Entity::find_by_id(id).one(db).await
}

/// All chats the user participates in, either side.
pub async fn get_chats_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<chats::Model>, DbErr> {
    chats::Entity::find()
        .filter(
            Condition::any()
                .add(chats::Column::ClientId.eq(user_id))
                .add(chats::Column::FreelancerId.eq(user_id)),
        )
        .all(db)
        .await
}
