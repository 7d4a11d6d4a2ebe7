//! Registry of live rooms.

use std::{collections::HashMap, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use parking_lot::{Mutex, MutexGuard};

use crate::round::{Difficulty, Round};
use crate::util::id::{CodeStyle, SessionId, new_room_code};

use super::{Role, relay::MemberSender};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("room not found")]
    NotFound,
    #[error("room is closed")]
    Closed,
}

#[derive(Debug)]
pub struct Member {
    pub role: Role,
    pub sender: MemberSender,
}

/// Everything about a room that changes after creation. Always accessed
/// through [`Room::lock`], so each mutation is atomic with respect to the
/// other members' sessions.
#[derive(Debug, Default)]
pub struct RoomState {
    /// The game in progress, if the host has started one.
    pub round: Option<Round>,
    members: HashMap<SessionId, Member>,
    closed: bool,
}

impl RoomState {
    pub fn members(&self) -> impl Iterator<Item = (SessionId, &Member)> + '_ {
        self.members.iter().map(|(id, m)| (*id, m))
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn add_member(&mut self, id: SessionId, role: Role, sender: MemberSender) -> Result<(), RoomError> {
        if self.closed {
            return Err(RoomError::Closed);
        }
        self.members.insert(id, Member { role, sender });
        Ok(())
    }

    pub fn remove_member(&mut self, id: SessionId) -> Option<Member> {
        self.members.remove(&id)
    }

    /// Tear the room down: no further joins succeed, and the remaining
    /// members are handed back so their transports can be closed.
    pub fn close(&mut self) -> Vec<(SessionId, Member)> {
        self.closed = true;
        self.round = None;
        self.members.drain().collect()
    }
}

#[derive(Debug)]
pub struct Room {
    code: String,
    difficulty: Difficulty,
    state: Mutex<RoomState>,
}

impl Room {
    fn new(code: String, difficulty: Difficulty, host: SessionId, sender: MemberSender) -> Self {
        let mut state = RoomState::default();
        state.members.insert(host, Member { role: Role::Host, sender });
        Self {
            code,
            difficulty,
            state: Mutex::new(state),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Difficulty chosen by the host; every game in the room uses it.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn lock(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock()
    }
}

/// Whether a departure leaves the room without a reason to exist. The host
/// leaving always ends the room; otherwise it survives while anyone is left.
pub fn should_delete_room(role: Role, remaining: usize) -> bool {
    role == Role::Host || remaining == 0
}

pub struct RoomManager {
    rooms: DashMap<String, Arc<Room>>,
    code_style: CodeStyle,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManager {
    pub fn new() -> Self {
        Self::with_code_style(CodeStyle::default())
    }

    pub fn with_code_style(code_style: CodeStyle) -> Self {
        Self { rooms: DashMap::new(), code_style }
    }

    /// Register a room under a fresh code with `host` as its only member.
    /// The room is never visible to joiners without its host.
    pub fn create(&self, difficulty: Difficulty, host: SessionId, sender: MemberSender) -> Arc<Room> {
        let mut rng = rand::thread_rng();
        self.create_with(difficulty, host, sender, || new_room_code(self.code_style, &mut rng))
    }

    /// Like [`RoomManager::create`], drawing candidate codes from
    /// `next_code` until one is not taken by a live room.
    pub fn create_with(
        &self,
        difficulty: Difficulty,
        host: SessionId,
        sender: MemberSender,
        mut next_code: impl FnMut() -> String,
    ) -> Arc<Room> {
        loop {
            match self.rooms.entry(next_code()) {
                Entry::Occupied(taken) => {
                    tracing::debug!(room = %taken.key(), "room code collision, drawing again");
                }
                Entry::Vacant(slot) => {
                    let room = Arc::new(Room::new(slot.key().clone(), difficulty, host, sender));
                    slot.insert(room.clone());
                    tracing::info!(room = %room.code(), %difficulty, "room created");
                    return room;
                }
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<Arc<Room>> {
        self.rooms.get(code).map(|r| r.value().clone())
    }

    pub fn delete(&self, code: &str) -> Option<Arc<Room>> {
        let removed = self.rooms.remove(code).map(|(_, room)| room);
        if removed.is_some() {
            tracing::info!(room = %code, "room deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
