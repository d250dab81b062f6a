use std::time::Duration;

/// Room worker configuration.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Time a player has to finish their turn before it is passed for them.
    /// `None` disables the turn clock.
    pub turn_timeout: Option<Duration>,
}

impl RoomConfig {
    #[must_use]
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            event_buffer_size: 100,
            turn_timeout: None,
        }
    }
}
