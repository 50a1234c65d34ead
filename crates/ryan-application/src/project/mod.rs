mod turn_guard;
mod updater;

pub use turn_guard::{TurnGuard, TurnPermit};
pub use updater::ProjectUpdater;
