pub mod fixtures;
pub mod molds;
pub mod pool;

pub use fixtures::FixtureId;
pub use fixtures::FixtureLedger;
pub use fixtures::Holder;
pub use molds::Borrow;
pub use molds::MoldBank;
pub use molds::MoldName;
pub use pool::Reason;
pub use pool::Reservation;
pub use pool::ResourcePool;
