use asura_htxt::{encode, HtxtReader};
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct CheckArgs {
    /// An input HTXT file
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

/// Offset of the first byte that differs, or of the end of the shorter buffer
fn first_difference(left: &[u8], right: &[u8]) -> Option<usize> {
    left.iter()
        .zip(right)
        .position(|(l, r)| l != r)
        .or_else(|| (left.len() != right.len()).then(|| left.len().min(right.len())))
}

impl CheckArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.input)
            .into_diagnostic()
            .context(format!("path: {}", &self.input.display()))?;

        let htxt = HtxtReader::from_bytes(&data)
            .context(format!("decoding {}", &self.input.display()))?;
        let rebuilt = encode(&htxt).context("encoding htxt file")?;

        if let Some(offset) = first_difference(&data, &rebuilt) {
            return Err(miette!(
                help = "the file uses a layout that the encoder does not reproduce",
                "{} differs after re-encoding at offset {:#x} ({} vs {} bytes)",
                self.input.display(),
                offset,
                data.len(),
                rebuilt.len()
            ));
        }

        info!(
            "{}: {} records, language {:08x}, round trip ok",
            self.input.display(),
            htxt.len(),
            htxt.language_id
        );

        Ok(())
    }
}
