use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::chat::protocol::ServerMessage;

/// A handle to send messages to a connected WebSocket client.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub user_id: Uuid,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

/// Manages all active WebSocket connections, organized by chat_id (room).
///
/// Each chat maps to a list of connected client handles. This allows
/// broadcasting messages, typing indicators, presence updates, and
/// channel-created notifications to the two participants of a chat.
pub struct ChatServer {
    /// chat_id -> list of connected client handles
    rooms: RwLock<HashMap<Uuid, Vec<ClientHandle>>>,
}

impl ChatServer {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new WebSocket connection for a chat.
    /// Returns a receiver that the WebSocket session should listen on.
    pub async fn join(&self, chat_id: Uuid, user_id: Uuid) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = ClientHandle { user_id, sender: tx };

        // Notify existing participants that this user came online.
        let presence_msg = ServerMessage::Presence {
            user_id,
            online: true,
        };

        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(chat_id).or_insert_with(Vec::new);

        // Send presence to existing members before adding the new one.
        for client in room.iter() {
            if client.user_id != user_id {
                let _ = client.sender.send(presence_msg.clone());
            }
        }

        room.push(handle);

        rx
    }

    /// Remove a WebSocket connection for a chat.
    pub async fn leave(&self, chat_id: Uuid, user_id: Uuid) {
        let mut rooms = self.rooms.write().await;

        if let Some(room) = rooms.get_mut(&chat_id) {
            // Remove the first matching handle for this user.
            // (A user could have multiple connections, so only remove one.)
            if let Some(pos) = room.iter().position(|c| c.user_id == user_id) {
                room.remove(pos);
            }

            // Check if this user still has other connections in this room.
            let still_connected = room.iter().any(|c| c.user_id == user_id);

            if !still_connected {
                // Notify remaining participants that this user went offline.
                let presence_msg = ServerMessage::Presence {
                    user_id,
                    online: false,
                };
                for client in room.iter() {
                    let _ = client.sender.send(presence_msg.clone());
                }
            }

            // Clean up empty rooms.
            if room.is_empty() {
                rooms.remove(&chat_id);
            }
        }
    }

    /// Broadcast a message to all participants in a chat, optionally
    /// excluding the sender.
    pub async fn broadcast(&self, chat_id: Uuid, message: ServerMessage, exclude_user: Option<Uuid>) {
        let rooms = self.rooms.read().await;
        if let Some(room) = rooms.get(&chat_id) {
            for client in room {
                if Some(client.user_id) == exclude_user {
                    continue;
                }
                // If the send fails, the receiver has been dropped
                // (disconnected). The leave() method will clean it up.
                let _ = client.sender.send(message.clone());
            }
        }
    }

    /// Publish the "this chat now exists" notification to anyone already
    /// listening on the room. Called after a bid/order acceptance creates
    /// the chat row.
    pub async fn notify_chat_created(&self, chat_id: Uuid, client_id: Uuid, freelancer_id: Uuid) {
        self.broadcast(
            chat_id,
            ServerMessage::ChatCreated {
                chat_id,
                client_id,
                freelancer_id,
            },
            None,
        )
        .await;
    }

    /// Check if a specific user is currently online in a chat.
    pub async fn is_user_online(&self, chat_id: Uuid, user_id: Uuid) -> bool {
        let rooms = self.rooms.read().await;
        rooms
            .get(&chat_id)
            .map(|room| room.iter().any(|c| c.user_id == user_id))
            .unwrap_or(false)
    }
}

impl Default for ChatServer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_and_leave_track_presence() {
        let server = ChatServer::new();
        let chat_id = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let _alice_rx = server.join(chat_id, alice).await;
        assert!(server.is_user_online(chat_id, alice).await);
        assert!(!server.is_user_online(chat_id, bob).await);

        let mut bob_rx = server.join(chat_id, bob).await;
        server.leave(chat_id, alice).await;
        assert!(!server.is_user_online(chat_id, alice).await);

        // Bob got the offline presence notification.
        let msg = bob_rx.recv().await.unwrap();
        assert!(matches!(
            msg,
            ServerMessage::Presence { user_id, online: false } if user_id == alice
        ));
    }

    #[tokio::test]
    async fn broadcast_excludes_the_sender() {
        let server = ChatServer::new();
        let chat_id = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut alice_rx = server.join(chat_id, alice).await;
        let mut bob_rx = server.join(chat_id, bob).await;

        // Drain the presence message Alice received when Bob joined.
        let _ = alice_rx.recv().await;

        server
            .broadcast(
                chat_id,
                ServerMessage::UserTyping { user_id: alice },
                Some(alice),
            )
            .await;

        let msg = bob_rx.recv().await.unwrap();
        assert!(matches!(msg, ServerMessage::UserTyping { user_id } if user_id == alice));
        assert!(alice_rx.try_recv().is_err());
    }
}
