use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::middleware::JwtSecret;
use crate::chat::protocol::{ClientMessage, ServerMessage};
use crate::chat::server::ChatServer;
use crate::db::chats as chat_db;
use crate::db::messages as message_db;
use crate::models::messages::CreateMessage;

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/chat/ws/{chat_id}?token=<jwt>
///
/// Upgrades the HTTP connection to a WebSocket.
/// Authenticates via query param token (browsers can't send Authorization
/// headers during the WebSocket handshake).
/// Validates that:
/// 1. The JWT is valid.
/// 2. The chat exists.
/// 3. The user is one of its two parties.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<Uuid>,
    query: web::Query<WsQuery>,
    db: web::Data<DatabaseConnection>,
    secret: web::Data<JwtSecret>,
    chat_server: web::Data<Arc<ChatServer>>,
) -> Result<HttpResponse, actix_web::Error> {
    let chat_id = path.into_inner();
    let token = &query.token;

    // 1. Validate the JWT.
    let claims = jwt::validate_token(token, &secret.0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    let user_id = claims
        .user_id()
        .map_err(actix_web::error::ErrorUnauthorized)?;

    // 2. Fetch the chat and verify the user is a party to it.
    let chat = chat_db::get_chat_by_id(db.get_ref(), chat_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Database error: {e}")))?
        .ok_or_else(|| actix_web::error::ErrorNotFound(format!("Chat {chat_id} not found")))?;

    if !chat.has_party(user_id) {
        return Err(actix_web::error::ErrorForbidden(
            "You are not a party to this chat",
        ));
    }

    // 3. Upgrade to WebSocket.
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    // 4. Join the chat room and get a receiver for outgoing messages.
    let rx = chat_server.join(chat_id, user_id).await;

    // 5. Spawn the WebSocket session task.
    let db_clone = db.get_ref().clone();
    let chat_server_clone = chat_server.get_ref().clone();

    actix_web::rt::spawn(handle_ws_session(
        session,
        msg_stream,
        rx,
        chat_id,
        user_id,
        db_clone,
        chat_server_clone,
    ));

    Ok(response)
}

/// Drives the WebSocket session: reads incoming messages from the client,
/// sends outgoing messages from the chat server, and handles cleanup on
/// disconnect.
async fn handle_ws_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    chat_id: Uuid,
    user_id: Uuid,
    db: DatabaseConnection,
    chat_server: Arc<ChatServer>,
) {
    loop {
        tokio::select! {
            // Incoming message from the WebSocket client.
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        handle_client_message(
                            &text,
                            &mut session,
                            chat_id,
                            user_id,
                            &db,
                            &chat_server,
                        )
                        .await;
                    }
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Err(_) => {
                        break;
                    }
                    _ => {}
                }
            }
            // Outgoing message from the chat server to this client.
            Some(server_msg) = rx.recv() => {
                let json = match serde_json::to_string(&server_msg) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            // Both channels closed — exit.
            else => break,
        }
    }

    // Clean up: leave the chat room.
    chat_server.leave(chat_id, user_id).await;
    let _ = session.close(None).await;
}

/// Parse and handle an incoming client message.
async fn handle_client_message(
    text: &str,
    session: &mut actix_ws::Session,
    chat_id: Uuid,
    user_id: Uuid,
    db: &DatabaseConnection,
    chat_server: &ChatServer,
) {
    let client_msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            let err = ServerMessage::Error {
                message: format!("Invalid message format: {e}"),
            };
            let _ = session
                .text(serde_json::to_string(&err).unwrap_or_default())
                .await;
            return;
        }
    };

    match client_msg {
        ClientMessage::SendMessage {
            content,
            attachment_url,
            attachment_name,
            attachment_type,
        } => {
            if content.trim().is_empty() && attachment_url.is_none() {
                let err = ServerMessage::Error {
                    message: "Message content cannot be empty".to_string(),
                };
                let _ = session
                    .text(serde_json::to_string(&err).unwrap_or_default())
                    .await;
                return;
            }

            // Persist the message to the database.
            let input = CreateMessage {
                chat_id,
                sender_id: user_id,
                content,
                attachment_url,
                attachment_name,
                attachment_type,
            };

            match message_db::insert_message(db, input).await {
                Ok(saved) => {
                    let msg = ServerMessage::NewMessage {
                        id: saved.id,
                        sender_id: saved.sender_id,
                        content: saved.content,
                        attachment_url: saved.attachment_url,
                        created_at: saved.created_at.to_rfc3339(),
                    };

                    // Broadcast to all participants (including sender, so
                    // they get the server-assigned id and timestamp).
                    chat_server.broadcast(chat_id, msg, None).await;
                }
                Err(e) => {
                    let err = ServerMessage::Error {
                        message: format!("Failed to save message: {e}"),
                    };
                    let _ = session
                        .text(serde_json::to_string(&err).unwrap_or_default())
                        .await;
                }
            }
        }

        ClientMessage::MarkRead { message_id } => {
            match message_db::mark_message_as_read(db, message_id).await {
                Ok(_) => {
                    // Notify all participants that this message was read.
                    let msg = ServerMessage::MessageRead { message_id };
                    chat_server.broadcast(chat_id, msg, None).await;
                }
                Err(e) => {
                    let err = ServerMessage::Error {
                        message: format!("Failed to mark message as read: {e}"),
                    };
                    let _ = session
                        .text(serde_json::to_string(&err).unwrap_or_default())
                        .await;
                }
            }
        }

        ClientMessage::Typing => {
            let msg = ServerMessage::UserTyping { user_id };
            // Only send to others — the sender already knows they're typing.
            chat_server.broadcast(chat_id, msg, Some(user_id)).await;
        }

        ClientMessage::StopTyping => {
            let msg = ServerMessage::UserStopTyping { user_id };
            chat_server.broadcast(chat_id, msg, Some(user_id)).await;
        }
    }
}
