//! Agent roles: named bundles of system prompt and tool permissions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Human-readable label.
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// System prompt given to agents of this role.
    pub system_prompt: String,
    /// Tools agents of this role may invoke.
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    /// Catalog models suited to this role, best first.
    #[serde(default)]
    pub recommended_models: Vec<String>,
}

fn role(
    display_name: &str,
    description: &str,
    system_prompt: &str,
    allowed_tools: &[&str],
    recommended_models: &[&str],
) -> RoleConfig {
    RoleConfig {
        display_name: display_name.to_string(),
        description: description.to_string(),
        system_prompt: system_prompt.to_string(),
        allowed_tools: allowed_tools.iter().map(|s| s.to_string()).collect(),
        recommended_models: recommended_models.iter().map(|s| s.to_string()).collect(),
    }
}

/// Roles shipped with the default configuration.
pub fn default_roles() -> BTreeMap<String, RoleConfig> {
    BTreeMap::from([
        (
            "recon".to_string(),
            role(
                "Reconnaissance",
                "Maps hosts, services and web content of a target.",
                "You are a reconnaissance specialist in an authorized penetration test. \
Enumerate hosts, open ports, services and web content. Report findings precisely \
and suggest what to investigate next.",
                &["nmap", "gobuster", "browser", "command"],
                &["qwen2.5:7b", "llama3.2:3b"],
            ),
        ),
        (
            "exploit".to_string(),
            role(
                "Exploitation",
                "Validates vulnerabilities found during reconnaissance.",
                "You are an exploitation specialist in an authorized penetration test. \
Validate vulnerabilities carefully, explain each step, and never act outside the \
agreed scope.",
                &["metasploit", "sqlmap", "nmap", "command"],
                &["qwen2.5-coder:7b", "qwen2.5:7b"],
            ),
        ),
        (
            "web".to_string(),
            role(
                "Web Application",
                "Tests web applications for common vulnerabilities.",
                "You are a web application security tester. Inspect pages, forms and \
endpoints for injection, authentication and access-control flaws.",
                &["browser", "gobuster", "sqlmap", "command"],
                &["qwen2.5-coder:7b", "llama3.2:3b"],
            ),
        ),
        (
            "analysis".to_string(),
            role(
                "Analysis",
                "Interprets tool output and writes findings.",
                "You are a security analyst. Interpret scan results and tool output, \
rank findings by severity, and recommend concrete next steps.",
                &[],
                &["deepseek-r1:14b", "qwen2.5:7b"],
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roles() {
        let roles = default_roles();
        assert_eq!(
            roles.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["analysis", "exploit", "recon", "web"]
        );
        assert!(roles["recon"].allowed_tools.contains(&"nmap".to_string()));
        assert!(roles["analysis"].allowed_tools.is_empty());
    }

    #[test]
    fn test_role_optional_fields_default() {
        let parsed: RoleConfig = serde_json::from_str(
            r#"{"display_name": "Custom", "system_prompt": "Be brief."}"#,
        )
        .unwrap();
        assert!(parsed.allowed_tools.is_empty());
        assert!(parsed.recommended_models.is_empty());
    }
}
