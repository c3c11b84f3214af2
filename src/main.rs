use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use thermoplan::N_CELLS;
use thermoplan::dto::ConstantsFile;
use thermoplan::dto::JobRecord;
use thermoplan::dto::Response;
use thermoplan::report::Report;
use thermoplan::search::Scheduler;
use thermoplan::search::Variant;
use thermoplan::search::driver::RunInputs;
use thermoplan::shop::Color;

/// single-day schedule for the six-cell thermoforming floor
#[derive(Parser)]
#[command(name = "thermoplan", version, about)]
struct Args {
    /// job list json
    #[arg(long)]
    jobs: std::path::PathBuf,
    /// constants json; built-in defaults when omitted
    #[arg(long)]
    constants: Option<std::path::PathBuf>,
    /// schedule date, yyyy-mm-dd
    #[arg(long)]
    date: chrono::NaiveDate,
    /// 500-minute shift instead of 440
    #[arg(long)]
    overtime: bool,
    /// summer cure factor
    #[arg(long)]
    summer: bool,
    /// run the orange cell
    #[arg(long)]
    orange: bool,
    /// cells idled today, e.g. --idle RED,BLACK
    #[arg(long, value_delimiter = ',')]
    idle: Vec<String>,
    /// restrict table selection: all, job, table or fixture
    #[arg(long, default_value = "all")]
    variants: String,
    /// let orange draw double2cc molds
    #[arg(long)]
    orange_double2cc: bool,
    /// let orange draw 3inurethane molds
    #[arg(long)]
    orange_3inurethane: bool,
    /// let orange draw deep double2cc molds
    #[arg(long)]
    orange_deep_double2cc: bool,
    /// write the schedule json here instead of stdout
    #[arg(long)]
    out: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    thermoplan::init();
    let args = Args::parse();
    let mut active = [true; N_CELLS];
    active[Color::Orange.index()] = args.orange;
    for name in &args.idle {
        let color = Color::try_from(name.as_str())?;
        active[color.index()] = false;
    }
    let variants = match args.variants.as_str() {
        "all" => Variant::all().to_vec(),
        one => vec![Variant::try_from(one)?],
    };
    let records: Vec<JobRecord> = serde_json::from_str(
        &std::fs::read_to_string(&args.jobs)
            .with_context(|| format!("reading {}", args.jobs.display()))?,
    )?;
    let jobs = records
        .iter()
        .enumerate()
        .map(|(row, r)| r.validate(row))
        .collect::<Result<Vec<_>, _>>()?;
    let constants: ConstantsFile = match &args.constants {
        Some(path) => serde_json::from_str(
            &std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        )?,
        None => ConstantsFile::default(),
    };
    let (cycles, pool, calendar) = constants.build();
    let inputs = RunInputs {
        date: args.date,
        active,
        overtime: args.overtime,
        summer: args.summer,
        orange_double2cc: args.orange_double2cc,
        orange_3inurethane: args.orange_3inurethane,
        orange_deep_double2cc: args.orange_deep_double2cc,
        variants,
    };
    log::info!("scheduling {} jobs for {}", jobs.len(), args.date);
    let scheduler = Scheduler::new(jobs, cycles, &calendar, inputs, pool)?;
    let trials = scheduler.explore();
    let report = Report::compile(trials, scheduler.jobs(), scheduler.plans(), scheduler.rehome())?;
    let response = Response::of(&report, scheduler.jobs(), scheduler.warnings());
    for warning in &response.warnings {
        log::warn!("{}", warning);
    }
    for summary in &response.summaries {
        log::info!(
            "{:<24}{:<16}{:>4} panels {:>3} missed",
            summary.method.to_string(),
            summary.variant.to_string(),
            summary.total_panels,
            summary.missed_dates(),
        );
    }
    let best = &response.recommended;
    println!(
        "{} {} / {} ({} panels, {} unscheduled)",
        "recommended:".green().bold(),
        best.method,
        best.variant,
        response
            .summaries
            .iter()
            .find(|s| s.method == best.method && s.variant == best.variant)
            .map(|s| s.total_panels)
            .unwrap_or(0),
        best.unscheduled.len(),
    );
    let json = serde_json::to_string_pretty(&response)?;
    match &args.out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
