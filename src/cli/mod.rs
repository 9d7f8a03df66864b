pub mod commands;
pub mod dispatch;
pub mod input;

pub use commands::{Cli, Commands};
pub use dispatch::{dispatch, init_config};
