use crate::ProjectContext;
use crate::commands::print_info;
use crate::state::ProjectState;
use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use colored::Colorize;

pub fn execute(ctx: &ProjectContext) -> Result<()> {
    let state = ProjectState::load(&ctx.state_path)?
        .with_context(|| format!("State file vanished from {}", ctx.state_path.display()))?;

    if state.discovered_mods.is_empty() {
        print_info("No mods discovered yet (run 'bmt find-mods' to scan)");
        return Ok(());
    }

    println!("Project: {}", state.root_path.display().to_string().bold());
    if state.last_scan_milliseconds > 0
        && let Some(when) = Local
            .timestamp_millis_opt(state.last_scan_milliseconds)
            .single()
    {
        println!("Last scan: {}", when.format("%Y-%m-%d %H:%M:%S"));
    }
    println!();

    for record in &state.discovered_mods {
        let marker = if record.included {
            "+".green().bold().to_string()
        } else {
            "-".dimmed().to_string()
        };
        println!("{} {}", marker, record.name);
    }

    Ok(())
}
