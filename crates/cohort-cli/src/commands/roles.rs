use cohort_core::Config;

pub fn run(config: &Config) {
    println!("Configured roles ({}):", config.roles.len());
    for (name, role) in &config.roles {
        let tools = if role.allowed_tools.is_empty() {
            "none".to_string()
        } else {
            role.allowed_tools.join(", ")
        };
        println!("{name} ({}) - {}", role.display_name, role.description);
        println!("  tools: {tools}");
        if !role.recommended_models.is_empty() {
            println!("  recommended: {}", role.recommended_models.join(", "));
        }
    }
}
