mod engine;
mod error;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{
    Change, ItemEntry, Meter, ReadySlotEntry, SkillEntry, Snapshot, SpellEntry, StatEntry,
    StatusEntry,
};
