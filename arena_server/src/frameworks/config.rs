use crate::domain::tuning::ActionTuning;
use crate::use_cases::GameSettings;
use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);
pub const DEFAULT_OBSERVER_CAPACITY: usize = 128;
pub const DEFAULT_SCOREBOARD_PERIOD: Duration = Duration::from_millis(500);

/// True on the single server process; clients run as replicas.
pub fn authoritative() -> bool {
    env::var("ARENA_AUTHORITATIVE")
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(true)
}

pub fn tick_interval() -> Duration {
    env::var("ARENA_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_TICK_INTERVAL)
}

pub fn laser_range() -> u32 {
    env::var("ARENA_LASER_RANGE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(ActionTuning::default().laser_range)
}

/// Buffered messages per observer before slow observers start lagging.
pub fn observer_capacity() -> usize {
    env::var("ARENA_OBSERVER_CAPACITY")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|capacity| *capacity > 0)
        .unwrap_or(DEFAULT_OBSERVER_CAPACITY)
}

/// How often observers are sent the scoreboard (only when it changed).
pub fn scoreboard_period() -> Duration {
    env::var("ARENA_SCOREBOARD_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_SCOREBOARD_PERIOD)
}

pub fn game_settings() -> GameSettings {
    GameSettings {
        authoritative: authoritative(),
        tick_interval: tick_interval(),
        tuning: ActionTuning {
            laser_range: laser_range(),
            ..ActionTuning::default()
        },
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools_accept_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
