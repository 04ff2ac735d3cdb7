use std::io::IsTerminal;
use std::path::Path;

use anyhow::bail;
use clap::Args;
use console::style;
use gtfkit::prelude::*;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short,
        long,
        default_value_t = false,
        help = "Print debug messages.",
        help_heading = "UTILS"
    )]
    pub verbose:  bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Display a progress spinner.",
        help_heading = "UTILS"
    )]
    pub progress: bool,
}

impl UtilsArgs {
    /// Initializes logging. `RUST_LOG` overrides the level chosen by
    /// `--verbose`.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = if self.verbose {
            LevelFilter::Debug
        }
        else {
            LevelFilter::Warn
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .parse_default_env()
            .try_init()?;
        Ok(())
    }

    pub fn progress_bar(&self) -> anyhow::Result<ProgressBar> {
        if self.progress && std::io::stderr().is_terminal() {
            init_spinner()
        }
        else {
            Ok(ProgressBar::hidden())
        }
    }
}

/// Column selection shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub(crate) struct ColumnArgs {
    #[arg(
        short = 'f',
        long = "field",
        value_parser = parse_field,
        help = "GTF field to read. All fields are read if none is given.",
        help_heading = "COLUMNS"
    )]
    pub fields:     Vec<GtfField>,
    #[arg(
        short = 'a',
        long = "attribute",
        help = "Attribute to read, optionally typed as NAME:TYPE (e.g. test_value:double).",
        help_heading = "COLUMNS"
    )]
    pub attributes: Vec<String>,
    #[arg(
        long,
        help = "Only keep records of this feature type.",
        help_heading = "COLUMNS"
    )]
    pub feature:    Option<String>,
}

fn parse_field(name: &str) -> Result<GtfField, String> {
    GtfField::from_name(name).ok_or_else(|| format!("'{}' is not a GTF field", name))
}

impl ColumnArgs {
    pub fn builder(&self) -> anyhow::Result<GtfReaderBuilder> {
        let mut builder = self
            .fields
            .iter()
            .fold(GtfReaderBuilder::create(), |builder, field| {
                builder.with_gtf_field(*field)
            });

        for attribute in self.attributes.iter() {
            builder = match attribute.split_once(':') {
                Some((name, type_name)) => builder.with_attribute_type_name(name, type_name)?,
                None => builder.with_attribute(attribute.as_str()),
            };
        }

        if let Some(feature) = self.feature.clone() {
            let with_feature =
                self.fields.is_empty() || self.fields.contains(&GtfField::Feature);
            if !with_feature {
                bail!(
                    "--feature requires the {} field to be selected",
                    style("feature").red()
                );
            }
            builder = builder
                .with_pre_filter(move |row| row.get_by_name("feature") == Some(feature.as_str()));
        }
        Ok(builder)
    }
}

pub fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("Path {} does not exist.", style(path.display()).red());
    }
    if !path.is_file() {
        bail!("Path {} is not a file.", style(path.display()).red());
    }
    Ok(())
}

pub fn validate_output(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        bail!("Output path {} is a directory.", style(path.display()).red());
    }
    Ok(())
}

pub fn init_spinner() -> anyhow::Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.green} [{elapsed_precise}] {pos:>8.green} rows {msg}")?,
    );
    spinner.set_message("Processing...");
    Ok(spinner)
}
