pub mod request;
pub mod response;

pub use request::ConstantsFile;
pub use request::JobRecord;
pub use response::Response;
