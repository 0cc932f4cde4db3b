//! One-shot modes: print the summary or write a report, then exit.

use reporting::{ExportFormat, ReportKind};

use crate::{
    error::{AppError, Result},
    view_model::{AccountsViewModel, LoadOutcome},
};

pub async fn summary(vm: &mut AccountsViewModel) -> Result<()> {
    load(vm).await?;
    let stats = vm.view().stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub async fn export(
    vm: &mut AccountsViewModel,
    kind: ReportKind,
    format: ExportFormat,
    query: &str,
) -> Result<()> {
    load(vm).await?;
    let path = vm.export(kind, query, format)?;
    println!("{}", path.display());
    Ok(())
}

async fn load(vm: &mut AccountsViewModel) -> Result<()> {
    match vm.load_accounts().await {
        LoadOutcome::Applied => Ok(()),
        LoadOutcome::Failed | LoadOutcome::Ignored => Err(AppError::Load(
            vm.view()
                .error
                .clone()
                .unwrap_or_else(|| "accounts could not be loaded".to_string()),
        )),
    }
}
