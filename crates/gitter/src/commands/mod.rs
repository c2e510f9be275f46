//! Command handlers, one module per subcommand.

pub mod clone;
pub mod completion;
pub mod env_cmd;
pub mod exec;
pub mod find;
pub mod init;
pub mod list;
pub mod version;
