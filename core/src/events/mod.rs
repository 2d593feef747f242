//! Host-reported events and their per-player expansion.

mod event;
mod notice;

pub use event::GameEvent;
pub use notice::{PlayerNotice, expand};
