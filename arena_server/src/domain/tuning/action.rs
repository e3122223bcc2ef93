/// Rate limits applied per (action kind, entity) throttle key.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ActionTuning {
    /// Minimum spacing between two accepted moves of the same entity.
    pub move_interval: Duration,

    /// Minimum spacing between two shots from the same player.
    pub fire_interval: Duration,

    /// Guards against a session replaying its join handshake.
    pub connect_interval: Duration,

    pub disconnect_interval: Duration,

    /// Cells a laser travels before it burns out.
    pub laser_range: u32,
}

impl Default for ActionTuning {
    fn default() -> Self {
        Self {
            move_interval: Duration::from_millis(50),
            fire_interval: Duration::from_millis(250),
            connect_interval: Duration::from_millis(1000),
            disconnect_interval: Duration::ZERO,
            laser_range: 24,
        }
    }
}
