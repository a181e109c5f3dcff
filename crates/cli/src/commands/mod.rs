//! Command implementations.

mod info;
mod record;
mod validate;

pub use info::run_info;
pub use record::run_recording;
pub use validate::run_validate;
