use asura_htxt::{encode, table::Workbook, Container};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};
use tracing::info;

use crate::commands::{ensure_distinct, write_output};

#[derive(Args)]
pub struct ImportArgs {
    /// The HTXT file to create
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// An input workbook
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        ensure_distinct(&self.output, &self.input)?;

        let f = File::open(&self.input)
            .into_diagnostic()
            .context(format!("path: {}", &self.input.display()))?;
        let workbook = Workbook::from_reader(BufReader::new(f))
            .context(format!("reading {}", &self.input.display()))?;

        let htxt = Container::try_from(workbook)
            .context(format!("importing {}", &self.input.display()))?;
        let data = encode(&htxt).context("encoding htxt file")?;

        write_output(&self.output, &data, self.overwrite)?;
        info!("imported {} records into {}", htxt.len(), &self.output.display());

        Ok(())
    }
}
