//! The tile world: storage, procedural generation, structure detection and
//! camera visibility.

pub mod generator;
pub mod grid;
pub mod structures;
pub mod visibility;

pub use generator::{GeneratedWorld, WorldGenerator};
pub use grid::WorldGrid;
pub use structures::{Altar, DirtPatch, House, StructureRecord, Structures};
pub use visibility::VisibilityTracker;
