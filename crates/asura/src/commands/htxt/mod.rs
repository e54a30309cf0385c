pub mod check;
pub mod diff;
pub mod export;
pub mod import;

#[derive(clap::Subcommand)]
pub enum HtxtCommands {
    /// Convert a HTXT file into an editable workbook
    Export(export::ExportArgs),
    /// Convert a workbook back into a HTXT file
    Import(import::ImportArgs),
    /// Verify a HTXT file survives a decode and encode unchanged
    Check(check::CheckArgs),
    /// Compare two HTXT files
    Diff(diff::DiffArgs),
}

impl HtxtCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            HtxtCommands::Export(export) => export.handle(),
            HtxtCommands::Import(import) => import.handle(),
            HtxtCommands::Check(check) => check.handle(),
            HtxtCommands::Diff(diff) => diff.handle(),
        }
    }
}
