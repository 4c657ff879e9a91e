use sea_orm::prelude::Expr;
use sea_orm::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::messages::{self, CreateMessage};

/// Insert a new message.
pub async fn insert_message<C: ConnectionTrait>(
    db: &C,
    input: CreateMessage,
) -> Result<messages::Model, DbErr> {
    let new_message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        chat_id: Set(input.chat_id),
        sender_id: Set(input.sender_id),
        content: Set(input.content),
        is_read: Set(false),
        attachment_url: Set(input.attachment_url),
        attachment_name: Set(input.attachment_name),
        attachment_type: Set(input.attachment_type),
        created_at: Set(chrono::Utc::now()),
    };

    new_message.insert(db).await
}

/// Fetch messages for a chat, newest first, with page/limit pagination.
pub async fn get_messages_by_chat<C: ConnectionTrait>(
    db: &C,
    chat_id: Uuid,
    page: u64,
    limit: u64,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::ChatId.eq(chat_id))
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .offset((page.saturating_sub(1)) * limit)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single message by ID.
pub async fn get_message_by_id<C: ConnectionTrait>(
    db: &C,
    message_id: Uuid,
) -> Result<Option<messages::Model>, DbErr> {
    messages::Entity::find_by_id(message_id).one(db).await
}

/// Mark a single message as read.
pub async fn mark_message_as_read<C: ConnectionTrait>(
    db: &C,
    message_id: Uuid,
) -> Result<messages::Model, DbErr> {
    let message = messages::Entity::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Message not found".to_string()))?;

    let mut active: messages::ActiveModel = message.into();
    active.is_read = Set(true);

    active.update(db).await
}

/// Mark all messages in a chat as read for a specific reader (i.e., messages
/// NOT sent by them).
pub async fn mark_all_read_for_chat<C: ConnectionTrait>(
    db: &C,
    chat_id: Uuid,
    reader_id: Uuid,
) -> Result<u64, DbErr> {
    let result = messages::Entity::update_many()
        .col_expr(messages::Column::IsRead, Expr::value(true))
        .filter(messages::Column::ChatId.eq(chat_id))
        .filter(messages::Column::SenderId.ne(reader_id))
        .filter(messages::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Count unread messages in a chat for a specific user (messages sent by the
/// other party).
pub async fn count_unread_for_chat<C: ConnectionTrait>(
    db: &C,
    chat_id: Uuid,
    user_id: Uuid,
) -> Result<u64, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::ChatId.eq(chat_id))
        .filter(messages::Column::SenderId.ne(user_id))
        .filter(messages::Column::IsRead.eq(false))
        .count(db)
        .await
}

/// Count unread messages for many chats in one query and return a
/// chat_id -> unread_count map.
pub async fn count_unread_for_chats<C: ConnectionTrait>(
    db: &C,
    chat_ids: Vec<Uuid>,
    user_id: Uuid,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    if chat_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let unread_messages = messages::Entity::find()
        .filter(messages::Column::ChatId.is_in(chat_ids))
        .filter(messages::Column::SenderId.ne(user_id))
        .filter(messages::Column::IsRead.eq(false))
        .all(db)
        .await?;

    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for message in unread_messages {
        *counts.entry(message.chat_id).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Get latest messages for many chats in one query and return a
/// chat_id -> message map.
pub async fn get_latest_messages_for_chats<C: ConnectionTrait>(
    db: &C,
    chat_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, messages::Model>, DbErr> {
    if chat_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = messages::Entity::find()
        .filter(messages::Column::ChatId.is_in(chat_ids))
        .order_by_asc(messages::Column::ChatId)
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .all(db)
        .await?;

    let mut latest: HashMap<Uuid, messages::Model> = HashMap::new();
    let mut seen: HashSet<Uuid> = HashSet::new();

    for row in rows {
        if seen.insert(row.chat_id) {
            latest.insert(row.chat_id, row);
        }
    }

    Ok(latest)
}
