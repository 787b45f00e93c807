//! cohort-tools: tool gateway and the security tooling it dispatches to
//! (nmap, gobuster, sqlmap, metasploit, browser, raw command).

pub mod builtin;
mod error;
pub mod executor;
pub mod gateway;
mod kind;
pub mod registry;
pub mod traits;

pub use builtin::register_all;
pub use error::ToolError;
pub use executor::CommandExecutor;
pub use gateway::{Gateway, ToolGateway};
pub use kind::ToolKind;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolContext, ToolOutput, ToolSettings};
