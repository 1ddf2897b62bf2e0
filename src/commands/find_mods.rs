use crate::ProjectContext;
use crate::commands::{print_info, print_success, print_warning};
use crate::manifest::discovery::{DiscoveryOptions, discover_manifests};
use crate::state::ProjectState;
use crate::utils::epoch_millis;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn execute(ctx: &ProjectContext, no_gitignore: bool, extra_ignores: &[String]) -> Result<()> {
    let mut state = ProjectState::load(&ctx.state_path)?
        .with_context(|| format!("State file vanished from {}", ctx.state_path.display()))?;

    let options = DiscoveryOptions {
        respect_gitignore: !no_gitignore,
        additional_ignores: extra_ignores.to_vec(),
        strict: true,
    };
    let found = discover_manifests(&ctx.fs, &ctx.root, &options)?;

    let dropped = state.apply_scan(
        found
            .iter()
            .map(|discovered| (discovered.manifest.name.clone(), discovered.path.clone()))
            .collect(),
        epoch_millis(),
    );
    for name in &dropped {
        print_warning(&format!("Mod '{name}' is gone; its manifest no longer exists"));
    }
    state.save(&ctx.state_path)?;

    if state.discovered_mods.is_empty() {
        print_info("No mod manifests found");
        return Ok(());
    }

    print_success(&format!("Found {} mod(s)", state.discovered_mods.len()));
    for record in &state.discovered_mods {
        let marker = if record.included {
            "included".green()
        } else {
            "excluded".dimmed()
        };
        let shown = record
            .manifest_path
            .strip_prefix(&ctx.root)
            .unwrap_or(&record.manifest_path);
        println!("  {} {} ({})", marker, record.name.bold(), shown.display());
    }

    Ok(())
}
