mod build;
mod deps;
mod info;
mod status;

pub use build::{BuildArgs, cmd_build};
pub use deps::cmd_deps;
pub use info::cmd_info;
pub use status::cmd_status;
