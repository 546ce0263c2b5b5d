//! Live census panel over a city simulated on a background thread.

use std::{
    path::PathBuf,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use census_engine::{CensusWriter, TickOutcome, census};
use census_sim::SyntheticCity;
use clap::Args;
use tracing::{debug, info, warn};

use crate::{command::CityArg, logging, prefs::PanelPreferences, tui::Tui};

use self::app::WatchApp;

mod app;
mod ui;

#[derive(Debug, Clone, Args)]
pub(crate) struct WatchArg {
    #[clap(flatten)]
    city: CityArg,

    /// Simulation steps per second
    #[arg(long, default_value_t = 60.0)]
    rate: f64,

    /// Log file path
    #[arg(long, default_value = "census.log")]
    log_file: PathBuf,

    /// Panel preferences file, read at startup and written on exit
    #[arg(long, default_value = "census-panel.json")]
    prefs: PathBuf,
}

pub(crate) fn run(arg: &WatchArg) -> anyhow::Result<()> {
    let WatchArg {
        city,
        rate,
        log_file,
        prefs,
    } = arg;
    let interval = step_interval(*rate)?;

    logging::init_file(log_file)?;
    let preferences = PanelPreferences::load(prefs)?;
    let (census_config, city) = city.load()?;
    let districts = city.config().districts;
    let city = Arc::new(RwLock::new(city));
    let (writer, reader) = census::channel(census_config);

    let stop = Arc::new(AtomicBool::new(false));
    let sim = {
        let city = Arc::clone(&city);
        let stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("simulation".to_owned())
            .spawn(move || simulate(&city, writer, &stop, interval))
            .context("Failed to spawn simulation thread")?
    };

    let mut app = WatchApp::new(reader, Arc::clone(&city), preferences, districts);
    let result = Tui::new().run(&mut app);

    stop.store(true, Ordering::Release);
    if sim.join().is_err() {
        warn!("simulation thread panicked");
    }
    result?;

    app.preferences()
        .save(prefs)
        .context("Failed to save panel preferences")?;
    info!(path = %prefs.display(), "panel preferences saved");
    Ok(())
}

/// Converts steps per second into the time between steps.
fn step_interval(rate: f64) -> anyhow::Result<Duration> {
    anyhow::ensure!(rate > 0.0, "simulation rate must be positive, got {rate}");
    Duration::try_from_secs_f64(1.0 / rate)
        .with_context(|| format!("simulation rate {rate} is too small"))
}

pub(crate) fn read_city(city: &RwLock<SyntheticCity>) -> RwLockReadGuard<'_, SyntheticCity> {
    city.read().unwrap_or_else(PoisonError::into_inner)
}

/// Advances the census and then the city once per interval until `stop` is set.
fn simulate(
    city: &RwLock<SyntheticCity>,
    mut writer: CensusWriter,
    stop: &AtomicBool,
    interval: Duration,
) {
    while !stop.load(Ordering::Acquire) {
        let started = Instant::now();
        let outcome = writer.tick(&*read_city(city));
        let mut city = city.write().unwrap_or_else(PoisonError::into_inner);
        if let TickOutcome::Published { pass, .. } = outcome {
            debug!(pass, steps = city.steps(), "panel data updated");
        }
        city.step();
        drop(city);
        thread::sleep(interval.saturating_sub(started.elapsed()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_interval() {
        assert_eq!(step_interval(4.0).unwrap(), Duration::from_millis(250));
        assert_eq!(step_interval(f64::INFINITY).unwrap(), Duration::ZERO);
        assert!(step_interval(0.0).is_err());
        assert!(step_interval(-1.0).is_err());
        assert!(step_interval(f64::NAN).is_err());
        let err = step_interval(1e-20).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }
}
