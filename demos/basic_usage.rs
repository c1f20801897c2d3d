//! Basic hierarchy usage example
//!
//! Demonstrates level inheritance and local overrides on a small logger tree.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_hierarchy::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Logger Hierarchy - Basic Usage Example ===\n");

    let hierarchy = Hierarchy::builder()
        .output(OutputHandle::new(ConsoleAppender::stdout()))
        .build();

    let app = hierarchy.get_logger("app");
    let db = app.get_child("db");
    let pool = db.get_child("pool");

    println!("1. Everything inherits the root level (INFO):");
    app.info("app is visible");
    pool.debug("pool debug (hidden)");

    println!("\n2. DEBUG on 'app.db' flows down to 'app.db.pool':");
    db.set_level(LogLevel::Debug, true)?;
    pool.debug("pool debug (visible)");
    app.debug("app debug (hidden)");

    println!("\n3. A local ERROR on 'app.db' applies to it alone:");
    db.set_level(LogLevel::Error, false)?;
    db.warn("db warning (hidden)");
    pool.info("pool info (visible, inherits from 'app')");

    println!("\n4. Unsetting restores inheritance:");
    db.set_level(None, false)?;
    println!("   app.db level is now {}", db.effective_level());

    println!("\n5. Tree report:");
    for entry in hierarchy.report() {
        println!(
            "   {:<12} explicit={:<6} effective={:<5} local={}",
            if entry.name.is_empty() { "<root>" } else { entry.name.as_str() },
            entry.explicit_level.map_or("-", |level| level.to_str()),
            entry.effective_level,
            entry.local
        );
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
