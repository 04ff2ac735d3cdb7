use std::io::{
    stdout,
    BufWriter,
    Write,
};
use std::path::PathBuf;

use clap::{
    Args,
    ValueEnum,
};
use gtfkit::prelude::*;
use itertools::Itertools;
use log::info;

use crate::utils::{
    validate_input,
    ColumnArgs,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum, Eq, PartialEq)]
pub enum ViewFormat {
    Tsv,
    Json,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ViewArgs {
    #[arg(help = "Path of the GTF/GFF file.")]
    input: PathBuf,

    #[clap(flatten)]
    columns: ColumnArgs,

    #[clap(short = 'F', long = "format", value_enum, default_value_t = ViewFormat::Tsv)]
    format: ViewFormat,

    #[arg(short = 'n', long, help = "Print at most this many rows.")]
    limit: Option<usize>,
}

impl ViewArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        validate_input(&self.input)?;
        let reader = self.columns.builder()?.build(&self.input)?;
        info!("Viewing {}", self.input.display());

        let schema = reader.schema().clone();
        let mut out = BufWriter::new(stdout().lock());
        if self.format == ViewFormat::Tsv {
            writeln!(out, "{}", schema.col_names().join("\t"))?;
        }

        let pbar = utils.progress_bar()?;
        for row in reader.take(self.limit.unwrap_or(usize::MAX)) {
            let row = row?;
            match self.format {
                ViewFormat::Tsv => {
                    let line = row
                        .values()
                        .iter()
                        .map(|value| value.as_deref().unwrap_or("."))
                        .join("\t");
                    writeln!(out, "{}", line)?;
                },
                ViewFormat::Json => writeln!(out, "{}", serde_json::to_string(&row)?)?,
            }
            pbar.inc(1);
        }
        pbar.finish_and_clear();
        out.flush()?;
        Ok(())
    }
}
