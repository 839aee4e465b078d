use crate::core::context::StoreContext;
use crate::core::error::StoreResult;
use crate::release::MaintenanceBranch;

/// Validate a `branch:` label and print the maintenance branch it names
///
/// Only the branch name goes to stdout so scripts can consume it directly.
pub fn run_branch(ctx: &StoreContext, label: String) -> StoreResult<()> {
  let branch = MaintenanceBranch::from_label(&label, &ctx.config.label_prefix, &ctx.config.legacy_branch_prefix)?;

  let ledger = ctx.load_ledger()?;
  branch.ensure_maintainable(&ledger)?;

  tracing::info!(branch = %branch.name, "Maintenance branch allowed");
  println!("{}", branch.name);
  Ok(())
}
