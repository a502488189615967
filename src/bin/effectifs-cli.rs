#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use effectifs::{
    availability::{AvailabilitySupplier, HourWindow, WeeklySlotsSupplier},
    backend::GoodLpSolver,
    io,
    model::{ScheduleRequest, ScheduleResult},
    report::{Summary, SummaryRenderer, TextSummary},
    scheduler::{Scheduler, SolveOptions, SolveOutcome},
};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification horaire du personnel (PLNE)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    /// Nombre minimal de personnes par créneau
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    required: i64,
    /// Poids du total d'heures dans l'objectif
    #[arg(long, default_value_t = 0.01)]
    epsilon: f64,
    /// Ne pas produire de planning relâché si le modèle est infaisable
    #[arg(long)]
    no_relax: bool,
    /// Fichier JSON de sortie
    #[arg(long)]
    out: PathBuf,
    /// Export CSV des affectations (optionnel)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Écrit le modèle au format texte LP (diagnostic)
    #[arg(long)]
    dump_model: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Résoudre à partir d'un fichier JSON de disponibilités
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        args: SolveArgs,
    },

    /// Résoudre à partir des exports CSV (personnel + créneaux occupés hebdomadaires)
    FromSlots {
        #[arg(long)]
        staff: PathBuf,
        #[arg(long)]
        slots: PathBuf,
        /// Début de semaine (YYYY-MM-DD)
        #[arg(long)]
        week_start: String,
        #[arg(long, default_value_t = 9)]
        start_hour: u8,
        #[arg(long, default_value_t = 18)]
        end_hour: u8,
        #[command(flatten)]
        args: SolveArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Solve { input, args } => {
            let input = io::load_input_json(&input)?;
            if input.staff.is_empty() {
                bail!("no staff in input");
            }
            run(input.into_request(args.required), &args)?
        }
        Commands::FromSlots {
            staff,
            slots,
            week_start,
            start_hour,
            end_hour,
            args,
        } => {
            let week_start = NaiveDate::parse_from_str(&week_start, "%Y-%m-%d")
                .with_context(|| format!("invalid week-start date: {week_start}"))?;
            let window = HourWindow::new(start_hour, end_hour)?;
            let supplier = WeeklySlotsSupplier {
                staff_csv: staff,
                slots_csv: slots,
                week_start,
                window,
            };
            let people = supplier.fetch()?;
            if people.is_empty() {
                bail!("no staff found for the given week");
            }
            let request = ScheduleRequest::new(
                people,
                (0..7).collect(),
                window.hours(),
                args.required,
            );
            run(request, &args)?
        }
    };

    std::process::exit(code);
}

/// Résout, écrit les sorties ; renvoie le code de sortie (2 = planning incomplet).
fn run(request: ScheduleRequest, args: &SolveArgs) -> Result<i32> {
    let scheduler = Scheduler::new(GoodLpSolver).with_options(SolveOptions {
        epsilon: args.epsilon,
        relax_on_infeasible: !args.no_relax,
    });

    if let Some(path) = &args.dump_model {
        let model = scheduler.build_model(&request)?;
        std::fs::write(path, model.lp.to_lp_string())
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let outcome = scheduler.solve(&request)?;
    let relaxed = outcome.is_infeasible();
    let result: ScheduleResult = match outcome {
        SolveOutcome::Scheduled { result, .. } => result,
        SolveOutcome::Infeasible {
            relaxed: Some(result),
        } => result,
        SolveOutcome::Infeasible { relaxed: None } => {
            bail!("no schedule satisfies a coverage of {} per slot", request.required_per_slot)
        }
    };

    io::export_schedule_json(&args.out, &result)?;
    if let Some(path) = &args.csv {
        io::export_assignments_csv(path, &result)?;
    }

    let output = args.out.display().to_string();
    let summary = Summary {
        output: &output,
        result: &result,
        relaxed,
    };
    print!("{}", TextSummary.render(&summary));

    // Code 2 = WARNING/INCOMPLETE
    Ok(if relaxed || !result.is_fully_covered() { 2 } else { 0 })
}
