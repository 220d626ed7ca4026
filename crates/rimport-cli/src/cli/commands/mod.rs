//! CLI command handlers, one per file.

mod info;
mod run;
mod vendor;

pub use info::run_info;
pub use run::run_script_command;
pub use vendor::run_vendor;
