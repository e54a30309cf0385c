use asura_htxt::{table::Workbook, HtxtReader};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

use crate::commands::{ensure_distinct, write_output};

#[derive(Args)]
pub struct ExportArgs {
    /// The workbook to create
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// An input HTXT file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExportArgs {
    pub fn handle(&self) -> Result<()> {
        ensure_distinct(&self.output, &self.input)?;

        let data = std::fs::read(&self.input)
            .into_diagnostic()
            .context(format!("path: {}", &self.input.display()))?;
        let htxt = HtxtReader::from_bytes(&data)
            .context(format!("decoding {}", &self.input.display()))?;

        let mut document = Vec::new();
        Workbook::from(&htxt).to_writer(&mut document)?;

        write_output(&self.output, &document, self.overwrite)?;
        info!("exported {} records to {}", htxt.len(), &self.output.display());

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::ExportArgs;

    fn sample() -> PathBuf {
        PathBuf::from(format!(
            "{}/../asura_htxt/resources/sample.asr_en",
            env!("CARGO_MANIFEST_DIR")
        ))
    }

    #[test]
    fn export_rejects_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            output: dir.path().join("TEXT.ASR_EN"),
            input: dir.path().join("text.asr_en"),
            overwrite: true,
        };

        let error = args.handle().unwrap_err();
        assert!(error.to_string().contains("must be different"));
        assert!(!args.output.exists());
    }

    #[test]
    fn export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            output: dir.path().join("sample.json"),
            input: sample(),
            overwrite: false,
        };

        args.handle().unwrap();

        let document = std::fs::read_to_string(&args.output).unwrap();
        assert!(document.contains("\"file_name\": \"hud_text\""));
        assert!(document.contains("\"magic_number\": \"deadbeef\""));

        // refuses to replace the file without --overwrite
        assert!(args.handle().is_err());
    }
}
