//! Built-in tool implementations.

pub mod browser;
pub mod command;
pub mod gobuster;
pub mod metasploit;
pub mod nmap;
pub mod sqlmap;

use crate::ToolRegistry;
use std::sync::Arc;

/// Register all built-in tools into a registry.
pub fn register_all(registry: &mut ToolRegistry) {
    registry.register(Arc::new(nmap::NmapTool));
    registry.register(Arc::new(gobuster::GobusterTool));
    registry.register(Arc::new(sqlmap::SqlmapTool));
    registry.register(Arc::new(metasploit::MetasploitTool));
    registry.register(Arc::new(browser::BrowserTool));
    registry.register(Arc::new(command::CommandTool));
}

/// Split a free-form flag string on whitespace.
pub(crate) fn split_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}

/// Reject values that would be parsed as an option by the target program.
pub(crate) fn require_operand(field: &str, value: &str) -> Result<(), crate::ToolError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(crate::ToolError::InvalidParameters(format!(
            "{field} must not be empty"
        )));
    }
    if value.starts_with('-') {
        return Err(crate::ToolError::InvalidParameters(format!(
            "{field} must not start with '-'"
        )));
    }
    Ok(())
}
