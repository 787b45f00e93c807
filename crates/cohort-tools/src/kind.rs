use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of tools an agent can be allow-listed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Network scan.
    Nmap,
    /// Directory brute force.
    Gobuster,
    /// SQL-injection probe.
    Sqlmap,
    /// Exploitation framework console.
    Metasploit,
    /// Browser session.
    Browser,
    /// Arbitrary shell command.
    Command,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Nmap,
        ToolKind::Gobuster,
        ToolKind::Sqlmap,
        ToolKind::Metasploit,
        ToolKind::Browser,
        ToolKind::Command,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Nmap => "nmap",
            ToolKind::Gobuster => "gobuster",
            ToolKind::Sqlmap => "sqlmap",
            ToolKind::Metasploit => "metasploit",
            ToolKind::Browser => "browser",
            ToolKind::Command => "command",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = crate::ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::ToolError::UnknownTool(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.as_str().parse::<ToolKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "hydra".parse::<ToolKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: hydra");
    }
}
