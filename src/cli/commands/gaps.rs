use crate::analysis::GapFinder;
use crate::errors::AppResult;
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct GapsCommand {
    /// Accession listing expected to be complete (e.g. from a storage walk)
    #[arg(long)]
    expected: PathBuf,

    /// Accession listing to check, usually an `accessions` report
    #[arg(long)]
    observed: PathBuf,

    /// Storage root prepended to each missing accession path
    #[arg(long, default_value = "")]
    root: String,

    /// CSV output path (if not specified, outputs to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl GapsCommand {
    pub fn run(&self) -> AppResult<()> {
        let expected = GapFinder::load_listing(&self.expected)?;
        let observed = GapFinder::load_listing(&self.observed)?;

        let finder = GapFinder::new(self.root.as_str());
        let gaps = finder.find_gaps(&expected, &observed);

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                GapFinder::write_csv(&gaps, BufWriter::new(File::create(path)?))?;
                info!("{} gaps written to {}", gaps.len(), path.display());
                eprintln!("Gap list written to: {}", path.display());
            }
            None => GapFinder::write_csv(&gaps, std::io::stdout().lock())?,
        }
        Ok(())
    }
}
