pub mod service;
pub mod session;

pub use service::StudioService;
pub use session::{StudioMode, StudioSession};
