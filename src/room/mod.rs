//! Rooms: the registry of live rooms and fan-out to their members.

pub mod manager;
pub mod relay;

use std::fmt;

/// A member's part in a room, fixed when the member joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Host,
    Guesser,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Host => "host",
            Role::Guesser => "guesser",
        })
    }
}
