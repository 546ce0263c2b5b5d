use std::{
    io,
    path::PathBuf,
};

use anyhow::Context;
use census_engine::{
    Axis, CensusReader, CensusWriter, DisplayMode, DistrictFilter, DistrictId, Metric,
    TickOutcome, census,
};
use census_sim::SyntheticCity;
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    command::CityArg,
    logging,
    table::{self, HistogramTable},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    #[clap(flatten)]
    city: CityArg,

    /// Number of full census passes to run
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    passes: u32,

    /// Axis of the histogram rows
    #[arg(long, default_value = "age-group")]
    row: Axis,

    /// Axis of the histogram columns
    #[arg(long, default_value = "education")]
    column: Axis,

    /// Restrict the histogram and metric bounds to one district
    #[arg(long)]
    district: Option<DistrictId>,

    /// Show percentages instead of counts
    #[arg(long)]
    percent: bool,

    /// Write the report as JSON (to stdout unless --output is given)
    #[arg(long)]
    json: bool,

    /// JSON output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    pass: u64,
    steps: u64,
    district: DistrictFilter,
    buildings: usize,
    histogram: HistogramTable,
    bounds: Vec<MetricBoundsEntry>,
}

#[derive(Debug, Serialize)]
struct MetricBoundsEntry {
    metric: Metric,
    name: &'static str,
    /// `None` when no building qualifies for the metric.
    min: Option<f32>,
    max: Option<f32>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let ReportArg {
        city,
        passes,
        row,
        column,
        district,
        percent,
        json,
        output,
    } = arg;

    logging::init_stderr()?;
    anyhow::ensure!(
        column.is_column_axis(),
        "axis '{}' cannot be used for columns",
        column.key()
    );

    let (census_config, mut city) = city.load()?;
    info!(
        citizens = city.population(),
        slice_size = census_config.slice_size,
        "city generated"
    );

    let filter = district.map_or(DistrictFilter::EntireCity, DistrictFilter::District);
    let (mut writer, reader) = census::channel(census_config);
    reader.set_district_filter(filter);

    for _ in 0..*passes {
        run_pass(&mut writer, &mut city)?;
    }

    let display = if *percent {
        DisplayMode::Percent
    } else {
        DisplayMode::Count
    };
    let report = build_report(&reader, &city, *row, *column, display);

    if *json || output.is_some() {
        util::write_json(&report, output.as_deref())?;
        if let Some(path) = output {
            eprintln!("Report written to {}", path.display());
        }
    } else {
        let mut stdout = io::stdout().lock();
        write_text(&mut stdout, &report).context("Failed to write report")?;
    }
    Ok(())
}

/// Ticks the census, stepping the city after every slice, until a pass is published.
fn run_pass(writer: &mut CensusWriter, city: &mut SyntheticCity) -> anyhow::Result<()> {
    loop {
        let outcome = writer.tick(&*city);
        city.step();
        match outcome {
            TickOutcome::Published { pass, citizens } => {
                info!(pass, citizens, steps = city.steps(), "pass complete");
                return Ok(());
            }
            TickOutcome::Scanned { processed } => {
                debug!(processed, steps = city.steps(), "slice scanned");
            }
            TickOutcome::NotReady => {}
            TickOutcome::Failed => {
                anyhow::bail!("census pass {} failed, see the log", writer.pass());
            }
        }
    }
}

fn build_report(
    reader: &CensusReader,
    city: &SyntheticCity,
    row: Axis,
    column: Axis,
    display: DisplayMode,
) -> Report {
    let snapshot = reader.snapshot();
    let filter = reader.district_filter();
    let data = snapshot.data_rows(row, column, filter);
    let bounds = reader.all_bounds();
    Report {
        pass: snapshot.pass(),
        steps: city.steps(),
        district: filter,
        buildings: snapshot.building_count(),
        histogram: HistogramTable::new(&data, display),
        bounds: Metric::ALL
            .into_iter()
            .map(|metric| {
                let range = bounds.get(metric);
                let (min, max) = if range.is_empty() {
                    (None, None)
                } else {
                    (Some(range.min), Some(range.max))
                };
                MetricBoundsEntry {
                    metric,
                    name: metric.name(),
                    min,
                    max,
                }
            })
            .collect(),
    }
}

fn write_text<W>(writer: &mut W, report: &Report) -> io::Result<()>
where
    W: io::Write,
{
    writeln!(
        writer,
        "Census pass {} after {} steps ({}, {} buildings)",
        report.pass,
        report.steps,
        table::district_label(report.district),
        report.buildings,
    )?;
    writeln!(writer)?;
    report.histogram.write_text(writer)?;
    writeln!(writer)?;
    writeln!(writer, "Building metric bounds:")?;
    for entry in &report.bounds {
        match (entry.min, entry.max) {
            (Some(min), Some(max)) => {
                writeln!(writer, "  {:<20} {min:>10.2} {max:>10.2}", entry.name)?;
            }
            _ => writeln!(writer, "  {:<20} {:>10} {:>10}", entry.name, "-", "-")?,
        }
    }
    writer.flush()
}
