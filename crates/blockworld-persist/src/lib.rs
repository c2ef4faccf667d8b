pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;

pub use compat::world_hash;
pub use error::PersistError;
pub use format::SaveHeader;
pub use load::{load, load_into, SaveData};
pub use save::{save, save_session};
