//! File logging example
//!
//! Applies a configuration that sends one subtree to a shared file while the
//! rest of the tree writes to stdout.
//!
//! Run with: cargo run --example file_logging

use rust_logger_hierarchy::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Logger Hierarchy - File Logging Example ===\n");

    let manager = LoggerManager::new();
    let config = HierarchyConfig::new(vec![
        LoggerConfig::root("info").output(OutputConfig::stdout()),
        LoggerConfig::new("app.audit", "debug").output(OutputConfig::file("application.log")),
        LoggerConfig::new("app.billing", "debug")
            .output(OutputConfig::file("application.log").local(true)),
    ]);
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("config error: {}", error);
        }
        std::process::exit(1);
    }
    manager.apply_config(&config)?;

    println!("1. Logging to stdout and 'application.log':");
    let audit = manager.get_logger("app.audit.login");
    audit.info("User alice logged in");
    audit.debug("Session token issued");

    let billing = manager.get_logger("app.billing");
    billing.info("Invoice 42 created");
    manager.get_logger("app.billing.retry").info("Retry queue empty (stdout only)");

    println!("\n2. Loggers writing to the file:");
    for logger in manager.find_loggers("app.**")? {
        let outputs: Vec<String> = logger
            .effective_outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        println!("   {:<20} {:?}", logger.name(), outputs);
    }

    audit.flush()?;
    billing.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
