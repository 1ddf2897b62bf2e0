use crate::commands::print_success;
use crate::fsys::{Filesystem, OsFilesystem};
use crate::manifest::discovery::{DiscoveryOptions, discover_manifests};
use crate::state::ProjectState;
use crate::utils::epoch_millis;
use crate::ProjectContext;
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

pub fn execute(no_gitignore: bool, extra_ignores: &[String]) -> Result<()> {
    let fs: Arc<dyn Filesystem> = Arc::new(OsFilesystem);
    let cwd = fs.working_directory();
    let root = fs.canonicalize(&cwd);

    // Walk upward too: initializing below an existing project would
    // create a second, nested state file.
    if let Ok(existing) = ProjectContext::discover_from(&root, Arc::clone(&fs)) {
        anyhow::bail!(
            "Project already initialized at {}",
            existing.root.display()
        );
    }

    let ctx = ProjectContext::at_root(root, fs);
    let options = DiscoveryOptions {
        respect_gitignore: !no_gitignore,
        additional_ignores: extra_ignores.to_vec(),
        strict: true,
    };
    let found = discover_manifests(&ctx.fs, &ctx.root, &options)?;

    let mut state = ProjectState::new(ctx.root.clone());
    state.apply_scan(
        found
            .iter()
            .map(|discovered| (discovered.manifest.name.clone(), discovered.path.clone()))
            .collect(),
        epoch_millis(),
    );
    state.save(&ctx.state_path)?;

    print_success(&format!(
        "Initialized bmt project at {} ({} mod(s) discovered)",
        ctx.root.display(),
        found.len()
    ));
    println!("\n{}", "Quick start:".bold());
    println!("  bmt list                 # Show discovered mods");
    println!("  bmt exclude <name>       # Drop a mod from the included set");
    println!("  bmt find-mods            # Rescan after changes");

    Ok(())
}
