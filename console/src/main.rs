mod reformat;
mod utils;
mod view;

use clap::{
    Parser,
    Subcommand,
};
use reformat::ReformatArgs;
use utils::UtilsArgs;
use view::ViewArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Print selected columns of an annotation file.
    View {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ViewArgs,
    },

    /// Rewrite an annotation file keeping only selected columns.
    Reformat {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ReformatArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::View { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Reformat { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
