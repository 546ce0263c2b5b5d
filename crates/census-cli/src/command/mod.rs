use std::path::PathBuf;

use anyhow::Context;
use census_engine::CensusConfig;
use census_sim::{CityConfig, SyntheticCity};
use clap::{Args, Parser, Subcommand};

use crate::util;

use self::{report::ReportArg, watch::WatchArg};

mod report;
mod watch;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run census passes over a synthetic city and print the histogram
    Report(#[clap(flatten)] ReportArg),
    /// Watch the census of a running synthetic city
    Watch(#[clap(flatten)] WatchArg),
}

/// Options shared by every command that simulates a city.
#[derive(Debug, Clone, Args)]
pub(crate) struct CityArg {
    /// Census engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Synthetic city configuration file (JSON)
    #[arg(long)]
    city: Option<PathBuf>,

    /// Overrides the seed of the city configuration
    #[arg(long)]
    seed: Option<u64>,
}

impl CityArg {
    fn load(&self) -> anyhow::Result<(CensusConfig, SyntheticCity)> {
        let census_config: CensusConfig =
            util::read_json_or_default("census config", self.config.as_deref())?;
        let mut city_config: CityConfig =
            util::read_json_or_default("city config", self.city.as_deref())?;
        if let Some(seed) = self.seed {
            city_config.seed = seed;
        }
        let city = SyntheticCity::generate(city_config).context("Failed to generate city")?;
        Ok((census_config, city))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Watch(arg) => watch::run(&arg)?,
    }
    Ok(())
}
