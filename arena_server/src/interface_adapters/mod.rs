// Interface adapters: wire DTOs, per-client sessions and the change relay.

pub mod protocol;
pub mod relay;
pub mod session;
