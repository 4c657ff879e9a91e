use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::verify_chat_party;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::chats as chat_db;
use crate::db::messages as message_db;
use crate::db::users as user_db;
use crate::engine::EngineError;
use crate::models::messages::{ConversationSummary, MessageQuery, MessageResponse};

/// GET /api/chat/{chat_id}/messages?page=1&limit=50
///
/// Fetch paginated message history for a chat.
/// Only the two parties of the chat can access this.
pub async fn get_messages(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<MessageQuery>,
) -> Result<HttpResponse, EngineError> {
    let chat_id = path.into_inner();
    verify_chat_party(db.get_ref(), chat_id, user.0.id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).min(100);

    let messages = message_db::get_messages_by_chat(db.get_ref(), chat_id, page, limit).await?;
    let response: Vec<MessageResponse> = messages.into_iter().map(|m| m.into()).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/chat/messages/{id}/read
///
/// Mark a specific message as read. Only a party of the message's chat may
/// do this, and marking your own message read is pointless but harmless.
pub async fn mark_message_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let message_id = path.into_inner();

    let message = message_db::get_message_by_id(db.get_ref(), message_id)
        .await?
        .ok_or_else(|| EngineError::not_found("message not found"))?;

    verify_chat_party(db.get_ref(), message.chat_id, user.0.id).await?;

    let updated = message_db::mark_message_as_read(db.get_ref(), message_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::from(updated)))
}

/// PUT /api/chat/{chat_id}/read — mark everything the other party sent as read.
pub async fn mark_chat_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let chat_id = path.into_inner();
    verify_chat_party(db.get_ref(), chat_id, user.0.id).await?;

    let updated = message_db::mark_all_read_for_chat(db.get_ref(), chat_id, user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "marked_read": updated })))
}

/// GET /api/chat/conversations
///
/// List all chats for the authenticated user with the last message, unread
/// count, and the other party's name.
pub async fn get_conversations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    let user_id = user.0.id;

    let chats = match chat_db::get_chats_for_user(db.get_ref(), user_id).await {
        Ok(chats) => chats,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let chat_ids: Vec<Uuid> = chats.iter().map(|c| c.id).collect();

    let latest = match message_db::get_latest_messages_for_chats(db.get_ref(), chat_ids.clone())
        .await
    {
        Ok(latest) => latest,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let unread = match message_db::count_unread_for_chats(db.get_ref(), chat_ids, user_id).await {
        Ok(unread) => unread,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let mut summaries: Vec<ConversationSummary> = Vec::new();
    for chat in chats {
        let other_user_id = chat.other_party(user_id);

        let other_user_name = match user_db::get_user_by_id(db.get_ref(), other_user_id).await {
            Ok(Some(u)) => u.display_name.or(u.username),
            _ => None,
        };

        let (last_message, last_message_at) = match latest.get(&chat.id) {
            Some(msg) => (Some(msg.content.clone()), Some(msg.created_at)),
            None => (None, None),
        };

        summaries.push(ConversationSummary {
            chat_id: chat.id,
            other_user_id,
            other_user_name,
            last_message,
            last_message_at,
            unread_count: unread.get(&chat.id).copied().unwrap_or(0),
        });
    }

    // Most recently active conversations first; chats with no messages last.
    summaries.sort_by(|a, b| {
        let a_time = a.last_message_at.unwrap_or(chrono::DateTime::UNIX_EPOCH);
        let b_time = b.last_message_at.unwrap_or(chrono::DateTime::UNIX_EPOCH);
        b_time.cmp(&a_time)
    });

    HttpResponse::Ok().json(summaries)
}
