//! Fire-and-forget delivery to room members.
//!
//! Transports are unbounded channels drained by each connection's writer
//! task, so a send never waits on a slow peer. A closed channel means the
//! peer is already gone; that is logged and otherwise ignored.

use tokio::sync::mpsc;

use crate::util::id::SessionId;
use crate::ws::protocol::ServerMessage;

use super::{Role, manager::RoomState};

/// What a connection's writer task is asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Message(ServerMessage),
    /// Send a close frame and stop.
    Close,
}

pub type MemberSender = mpsc::UnboundedSender<Outbound>;

/// Queue `message` for one member.
pub fn send(to: SessionId, tx: &MemberSender, message: ServerMessage) {
    if tx.send(Outbound::Message(message)).is_err() {
        tracing::debug!(session = %to, "dropping message for disconnected member");
    }
}

/// Deliver `message` to every member of the room, skipping `from` unless
/// `include_sender` is set.
pub fn broadcast(room: &RoomState, from: SessionId, message: &ServerMessage, include_sender: bool) {
    for (id, member) in room.members() {
        if include_sender || id != from {
            send(id, &member.sender, message.clone());
        }
    }
}

/// Deliver a per-role rendering of a message to every member.
pub fn broadcast_by_role(room: &RoomState, render: impl Fn(Role) -> ServerMessage) {
    for (id, member) in room.members() {
        send(id, &member.sender, render(member.role));
    }
}

/// Ask a member's writer to close its socket.
pub fn close(to: SessionId, tx: &MemberSender) {
    if tx.send(Outbound::Close).is_err() {
        tracing::debug!(session = %to, "member already disconnected");
    }
}
