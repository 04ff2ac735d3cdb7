use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use console::style;
use gtfkit::prelude::*;
use log::info;

use crate::utils::{
    validate_input,
    validate_output,
    ColumnArgs,
    UtilsArgs,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReformatArgs {
    #[arg(help = "Path of the input GTF/GFF file.")]
    input: PathBuf,

    #[arg(
        short = 'o',
        long,
        required = true,
        help = "Path for the generated GTF file."
    )]
    output: PathBuf,

    #[arg(
        short = 'm',
        long,
        help = "Also write the column metadata as JSON to this path."
    )]
    meta: Option<PathBuf>,

    #[clap(flatten)]
    columns: ColumnArgs,
}

impl ReformatArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        validate_input(&self.input)?;
        validate_output(&self.output)?;

        let reader = self.columns.builder()?.build(&self.input)?;
        let meta = GtfMeta::from_schema(reader.schema());
        let mut writer = GtfWriter::new(BufWriter::new(File::create(&self.output)?));
        info!(
            "Rewriting {} into {}",
            self.input.display(),
            self.output.display()
        );

        let pbar = utils.progress_bar()?;
        for row in reader {
            writer.write_row(&row?)?;
            pbar.inc(1);
        }
        pbar.finish_and_clear();
        let n_rows = writer.rows_written();
        writer.finish()?;

        if let Some(meta_path) = &self.meta {
            validate_output(meta_path)?;
            std::fs::write(meta_path, meta.to_json()?)?;
            info!("Metadata written to {}", meta_path.display());
        }

        eprintln!(
            "[{}] Written {} rows to {}",
            style("V").green(),
            style(n_rows).green(),
            self.output.display()
        );
        Ok(())
    }
}
