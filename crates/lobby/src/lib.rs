//! Rooms that host squad-combat challenges for remote participants.
//!
//! A [`Lobby`] seats participants around a [`combat_core::Challenge`]. A
//! [`Room`] moves that lobby onto a background worker so every action is
//! applied in order, and [`RoomHandle`] is the cloneable way in. Changes fan
//! out to subscribers as [`RoomEvent`]s, which serialise to JSON for relaying
//! over any transport.
pub mod config;
pub mod error;
pub mod events;
pub mod handle;
pub mod lobby;
pub mod room;

mod worker;

pub use config::RoomConfig;
pub use error::{LobbyError, Result, RoomError};
pub use events::{EventBus, RoomEvent};
pub use handle::RoomHandle;
pub use lobby::{Lobby, PlayerAction};
pub use room::Room;
