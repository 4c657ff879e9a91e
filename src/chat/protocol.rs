use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Client -> Server messages ──

/// Messages the client sends to the server over WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Send a chat message, optionally referencing an uploaded attachment.
    SendMessage {
        content: String,
        attachment_url: Option<String>,
        attachment_name: Option<String>,
        attachment_type: Option<String>,
    },
    /// Mark a specific message as read.
    MarkRead { message_id: Uuid },
    /// Notify the other party that the user is typing.
    Typing,
    /// Notify the other party that the user stopped typing.
    StopTyping,
}

// ── Server -> Client messages ──

/// Messages the server sends to the client over WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A new message was received (or echo of the sender's own message).
    NewMessage {
        id: Uuid,
        sender_id: Uuid,
        content: String,
        attachment_url: Option<String>,
        created_at: String,
    },
    /// A message was marked as read.
    MessageRead { message_id: Uuid },
    /// The other user is typing.
    UserTyping { user_id: Uuid },
    /// The other user stopped typing.
    UserStopTyping { user_id: Uuid },
    /// Presence update: a user came online or went offline in this chat.
    Presence { user_id: Uuid, online: bool },
    /// A chat between the two parties now exists (published when a bid or
    /// order acceptance matched them for the first time).
    ChatCreated {
        chat_id: Uuid,
        client_id: Uuid,
        freelancer_id: Uuid,
    },
    /// An error occurred.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_deserialize() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"send_message","content":"hi","attachment_url":null,"attachment_name":null,"attachment_type":null}"#)
                .unwrap();
        assert!(matches!(msg, ClientMessage::SendMessage { ref content, .. } if content == "hi"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"typing"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Typing));
    }

    #[test]
    fn server_messages_tag_correctly() {
        let msg = ServerMessage::ChatCreated {
            chat_id: Uuid::nil(),
            client_id: Uuid::nil(),
            freelancer_id: Uuid::nil(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"chat_created""#));

        let msg = ServerMessage::Presence {
            user_id: Uuid::nil(),
            online: true,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"presence""#));
        assert!(json.contains(r#""online":true"#));
    }
}
