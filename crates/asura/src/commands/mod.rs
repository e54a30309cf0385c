use std::{io::Write, path::Path};

use miette::{miette, Context, IntoDiagnostic, Result};
use tempfile::NamedTempFile;

pub mod htxt;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle HTXT text resources
    Htxt {
        #[command(subcommand)]
        command: htxt::HtxtCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Htxt { command } => command.handle(),
        }
    }
}

/// Fails when both paths name the same file, ignoring case
pub(crate) fn ensure_distinct(output: &Path, input: &Path) -> Result<()> {
    if output.to_string_lossy().to_uppercase() == input.to_string_lossy().to_uppercase() {
        return Err(miette!(
            help = "pick a different name for the output file",
            "input file name and output file name must be different"
        ));
    }

    Ok(())
}

/// Write a fully rendered output file
///
/// The data goes to a temporary file next to the target, which is moved into place once complete.
pub(crate) fn write_output(path: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut out = NamedTempFile::new_in(dir)
        .into_diagnostic()
        .context(format!("creating {}", path.display()))?;
    out.write_all(data)
        .into_diagnostic()
        .context(format!("writing {}", path.display()))?;

    let persisted = if overwrite {
        out.persist(path)
    } else {
        out.persist_noclobber(path)
    };
    persisted
        .map_err(|e| e.error)
        .into_diagnostic()
        .context(format!("creating {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::{ensure_distinct, write_output};

    #[test]
    fn distinct_names_pass() {
        assert!(ensure_distinct(Path::new("menu.json"), Path::new("menu.asr_en")).is_ok());
    }

    #[test]
    fn identical_names_fail() {
        assert!(ensure_distinct(Path::new("menu.asr_en"), Path::new("menu.asr_en")).is_err());
    }

    #[test]
    fn names_are_compared_without_case() {
        assert!(ensure_distinct(Path::new("MENU.Asr_En"), Path::new("menu.asr_en")).is_err());
    }

    #[test]
    fn write_output_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.asr_en");
        std::fs::write(&path, b"original").unwrap();

        assert!(write_output(&path, b"replacement", false).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        write_output(&path, b"replacement", true).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"replacement");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_output_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("menu.asr_en");

        assert!(write_output(&path, b"data", false).is_err());
        assert!(!path.exists());
    }
}
