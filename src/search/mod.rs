pub mod driver;
pub mod method;
pub mod variant;

pub use driver::Scheduler;
pub use driver::Trial;
pub use driver::Warning;
pub use method::Method;
pub use variant::Variant;
