pub mod api;
pub mod config;
pub mod errors;
pub mod preview;
pub mod replicate;
pub mod skeleton;
pub mod utils;

pub use api::{dry_run, empty_copy, load_settings, EmptyCopyError};
pub use replicate::{replicate, ReplicationError};
