//! Per-connection state machine.
//!
//! A session starts `Unbound`, becomes `Bound` to exactly one room as host
//! or guesser, and ends `Closed` once its membership has been cleaned up.
//! The connection task only feeds raw frames and the close event in; every
//! decision about rooms and rounds is made here.

use std::sync::Arc;

use crate::color::Rgb;
use crate::room::{
    Role,
    manager::{Room, RoomManager, RoomState, should_delete_room},
    relay::{self, MemberSender},
};
use crate::round::{Difficulty, GuessOutcome, InvalidGuess, Round};
use crate::util::id::SessionId;

use super::protocol::{ClientMessage, ServerMessage};

pub const HOST_LEFT: &str = "The host left the game.";
pub const ALL_GUESTS_LEFT: &str = "All guests left the game.";

/// A request that is well formed but not allowed right now. Reported to the
/// sender only; nothing is mutated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("You are already in a game.")]
    AlreadyInGame,
    /// Sent as its own `notfound` frame, never as error text.
    #[error("room not found")]
    NotFound,
    #[error("You are not the host.")]
    NotHost,
    #[error("Game already started.")]
    AlreadyStarted,
    #[error("Game not started.")]
    NotStarted,
    #[error("Invalid guess.")]
    InvalidGuess(#[source] InvalidGuess),
}

impl SessionError {
    fn into_message(self) -> ServerMessage {
        match self {
            SessionError::NotFound => ServerMessage::NotFound,
            other => ServerMessage::error(other),
        }
    }
}

#[derive(Debug)]
pub enum SessionState {
    Unbound,
    Bound { room: Arc<Room>, role: Role },
    Closed,
}

pub struct Session {
    id: SessionId,
    rooms: Arc<RoomManager>,
    background: Option<Rgb>,
    tx: MemberSender,
    state: SessionState,
}

impl Session {
    pub fn new(rooms: Arc<RoomManager>, tx: MemberSender, background: Option<Rgb>) -> Self {
        Self {
            id: SessionId::new(),
            rooms,
            background,
            tx,
            state: SessionState::Unbound,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn role(&self) -> Option<Role> {
        match &self.state {
            SessionState::Bound { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn room_code(&self) -> Option<&str> {
        match &self.state {
            SessionState::Bound { room, .. } => Some(room.code()),
            _ => None,
        }
    }

    fn reply(&self, message: ServerMessage) {
        relay::send(self.id, &self.tx, message);
    }

    /// Handle one inbound text frame.
    pub fn handle_text(&mut self, text: &str) {
        if matches!(self.state, SessionState::Closed) {
            return;
        }
        match ClientMessage::parse(text) {
            Ok(Some(message)) => {
                if let Err(err) = self.dispatch(message) {
                    tracing::debug!(session = %self.id, error = %err, "request refused");
                    self.reply(err.into_message());
                }
            }
            Ok(None) => {
                tracing::debug!(session = %self.id, "ignoring frame without a message type");
            }
            Err(err) => self.reply(ServerMessage::error(err)),
        }
    }

    pub fn dispatch(&mut self, message: ClientMessage) -> Result<(), SessionError> {
        match message {
            ClientMessage::Create { difficulty } => self.create(difficulty),
            ClientMessage::Join { room_code } => self.join(&room_code),
            ClientMessage::Start => self.start(),
            ClientMessage::Guess { index } => self.guess(index),
        }
    }

    fn create(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Unbound) {
            return Err(SessionError::AlreadyInGame);
        }
        let room = self.rooms.create(difficulty, self.id, self.tx.clone());
        self.reply(ServerMessage::Connect { code: room.code().to_string() });
        self.bind(room, Role::Host);
        Ok(())
    }

    fn join(&mut self, code: &str) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Unbound) {
            return Err(SessionError::AlreadyInGame);
        }
        let room = self.rooms.get(code).ok_or(SessionError::NotFound)?;
        {
            let mut state = room.lock();
            // Lost a race with the host tearing the room down.
            state
                .add_member(self.id, Role::Guesser, self.tx.clone())
                .map_err(|_| SessionError::NotFound)?;

            self.reply(ServerMessage::Connect { code: room.code().to_string() });
            relay::broadcast(&state, self.id, &ServerMessage::Join, false);
            if let Some(round) = &state.round {
                self.reply(ServerMessage::state(round, Role::Guesser));
            }
        }
        self.bind(room, Role::Guesser);
        Ok(())
    }

    fn bind(&mut self, room: Arc<Room>, role: Role) {
        tracing::info!(session = %self.id, room = %room.code(), %role, "joined room");
        self.state = SessionState::Bound { room, role };
    }

    fn host_room(&self) -> Result<&Arc<Room>, SessionError> {
        match &self.state {
            SessionState::Bound { room, role: Role::Host } => Ok(room),
            _ => Err(SessionError::NotHost),
        }
    }

    fn start(&mut self) -> Result<(), SessionError> {
        let room = self.host_room()?;
        let mut state = room.lock();
        if state.round.is_some() {
            return Err(SessionError::AlreadyStarted);
        }
        let round = Round::new(room.difficulty(), self.background, &mut rand::thread_rng());
        relay::broadcast_by_role(&state, |role| ServerMessage::state(&round, role));
        state.round = Some(round);
        Ok(())
    }

    fn guess(&mut self, index: usize) -> Result<(), SessionError> {
        let room = self.host_room()?;
        let mut state = room.lock();
        let round = state.round.as_mut().ok_or(SessionError::NotStarted)?;

        let outcome = round
            .guess(index, &mut rand::thread_rng())
            .map_err(SessionError::InvalidGuess)?;
        let (color, answer) = match outcome {
            GuessOutcome::Correct { color } => (color, None),
            GuessOutcome::Incorrect { color, answer } => (color, Some(answer)),
        };
        let correct = outcome.is_correct();
        let score = round.score();
        let over = round.is_over();
        let result = ServerMessage::Guess {
            correct,
            index,
            color,
            answer,
            score,
            lives: round.lives(),
        };

        relay::broadcast(&state, self.id, &result, true);
        if let (true, Some(round)) = (correct, &state.round) {
            relay::broadcast_by_role(&state, |role| ServerMessage::state(round, role));
        }
        if over {
            relay::broadcast(&state, self.id, &ServerMessage::GameOver { score }, true);
            state.round = None;
            tracing::info!(room = %room.code(), score, "game over");
        }
        Ok(())
    }

    /// Leave the room, applying the teardown rules. Idempotent; also run on
    /// drop so a panicking or aborted connection still cleans up.
    pub fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        let SessionState::Bound { room, role } = previous else {
            return;
        };

        let delete = {
            let mut state = room.lock();
            if state.remove_member(self.id).is_none() {
                // Already closed out by the host leaving.
                tracing::debug!(session = %self.id, room = %room.code(), "room already torn down");
                return;
            }
            self.announce_departure(&mut state, role)
        };
        if delete {
            self.rooms.delete(room.code());
        }
        tracing::debug!(session = %self.id, room = %room.code(), %role, "session closed");
    }

    /// Returns whether the room should be removed from the registry.
    fn announce_departure(&self, state: &mut RoomState, role: Role) -> bool {
        let remaining = state.member_count();
        if should_delete_room(role, remaining) {
            if role == Role::Host {
                relay::broadcast(state, self.id, &ServerMessage::error(HOST_LEFT), false);
            }
            for (id, member) in state.close() {
                relay::close(id, &member.sender);
            }
            true
        } else {
            if remaining == 1 {
                relay::broadcast(state, self.id, &ServerMessage::error(ALL_GUESTS_LEFT), false);
            } else {
                relay::broadcast(state, self.id, &ServerMessage::Leave, false);
            }
            false
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
