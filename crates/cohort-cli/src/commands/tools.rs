use cohort_core::Config;
use cohort_tools::{Gateway, ToolRegistry};

pub fn run(config: &Config, name: Option<&str>) -> anyhow::Result<()> {
    let gateway = Gateway::with_builtins(config.tools.clone());
    match name {
        Some(name) => print_tool_detail(gateway.registry(), name)?,
        None => {
            let lines = tool_lines(gateway.registry());
            println!("Available tools ({}):", lines.len());
            for line in lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn tool_lines(tools: &ToolRegistry) -> Vec<String> {
    tools
        .names()
        .into_iter()
        .filter_map(|name| tools.get(&name))
        .map(|tool| format!("{} - {}", tool.name(), tool.description()))
        .collect()
}

fn print_tool_detail(tools: &ToolRegistry, name: &str) -> anyhow::Result<()> {
    let tool = tools
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown tool: {name}"))?;
    println!("name: {}", tool.name());
    println!("description: {}", tool.description());
    println!("parameters:");
    println!("{}", serde_json::to_string_pretty(&tool.parameters_schema())?);
    Ok(())
}
