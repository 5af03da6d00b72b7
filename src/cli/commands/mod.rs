//! One file per subcommand; each handler reports its own errors and
//! returns the process exit code.

mod accounts;
mod clean;
mod daemon;
mod options;
mod tasks;

pub use accounts::{cmd_accounts, cmd_stats};
pub use clean::cmd_clean;
pub use daemon::cmd_daemon;
pub use options::cmd_options;
pub use tasks::cmd_tasks;
