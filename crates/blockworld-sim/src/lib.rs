pub mod agents;
pub mod day_night;
pub mod economy;
pub mod input;
pub mod path_field;
pub mod player;
pub mod session;
pub mod snapshot;
pub mod spawn;

#[cfg(test)]
mod test_harness;

pub use agents::{Agent, AgentController};
pub use day_night::{DayNightScheduler, PhaseTransition};
pub use economy::{DroppedItem, Economy, Inventory, Tool};
pub use input::{Action, TickInput};
pub use path_field::PathField;
pub use player::PlayerState;
pub use session::{Session, TickReport};
pub use snapshot::{GridSnapshot, RestoreReport, SessionSnapshot};
pub use spawn::SpawnController;
