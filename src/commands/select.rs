use crate::ProjectContext;
use crate::commands::print_success;
use crate::state::ProjectState;
use anyhow::{Context, Result};

/// Flip the persisted inclusion flag for one mod.
pub fn execute(ctx: &ProjectContext, name: &str, included: bool) -> Result<()> {
    let mut state = ProjectState::load(&ctx.state_path)?
        .with_context(|| format!("State file vanished from {}", ctx.state_path.display()))?;

    state.set_included(name, included)?;
    state.save(&ctx.state_path)?;

    let verb = if included { "Included" } else { "Excluded" };
    print_success(&format!("{verb} mod '{name}'"));
    Ok(())
}
