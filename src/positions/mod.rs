/// Open positions and their on-disk store
mod store;
mod types;

pub use store::PositionStore;
pub use types::Position;
