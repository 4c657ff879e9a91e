use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::chats as chat_db;
use crate::engine::EngineError;
use crate::models::chats;
use crate::models::users::{self, Roles};

/// Require a specific platform role. Admins pass every role gate.
pub fn require_role(user: &users::Model, role: Roles) -> Result<(), EngineError> {
    if user.role == role || user.role == Roles::Admin {
        Ok(())
    } else {
        Err(EngineError::forbidden(format!(
            "this action requires the {:?} role",
            role
        )))
    }
}

/// Verify the user is one of the two parties of a chat and return it.
pub async fn verify_chat_party(
    db: &DatabaseConnection,
    chat_id: Uuid,
    user_id: Uuid,
) -> Result<chats::Model, EngineError> {
    let chat = chat_db::get_chat_by_id(db, chat_id)
        .await?
        .ok_or_else(|| EngineError::not_found("chat not found"))?;

    if !chat.has_party(user_id) {
        return Err(EngineError::forbidden(
            "you are not a party to this chat",
        ));
    }

    Ok(chat)
}
