//! Calendar Puzzle Solver
//!
//! Finds a tiling of ten pieces over a 7x8 board that leaves exactly one
//! cell uncovered for a given month, day and weekday, and catalogues
//! solved configurations to disk so repeated runs do not redo work.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::SeedableRng;

use blocker::{board::Configuration, date, dispatch, persistence, pieces::PlacementTable};

#[derive(Parser)]
#[command(name = "calpuzzle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging verbosity: error, warn, info, debug or trace.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Folder for run artefacts (default: a fresh timestamped folder).
    #[arg(long, global = true)]
    output_folder: Option<PathBuf>,

    /// Seed for the placement-order random generator (default: fresh entropy).
    #[arg(long, global = true)]
    random_seed: Option<u64>,

    /// Directory holding solved-puzzle catalogue entries.
    #[arg(long, global = true, default_value = "./catalog")]
    catalog_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a single (year, month, day) and write it to the catalogue.
    Solve {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u8,
        #[arg(long)]
        day: u8,
    },
    /// Sweep every configuration across a span of years, skipping any
    /// already present in the catalogue.
    Sweep {
        #[arg(long, default_value_t = dispatch::FIRST_SWEEP_YEAR)]
        first_year: i32,
        #[arg(long, default_value_t = dispatch::LAST_SWEEP_YEAR)]
        last_year: i32,
    },
    /// Search for any solvable configuration without naming one up front,
    /// and catalogue it.
    Discover,
    /// Count how many configurations are already catalogued.
    Count,
    /// Print a catalogued solution's board.
    Show {
        /// Slug naming the configuration, e.g. `02-29-Sun`.
        slug: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let output_folder = cli.output_folder.unwrap_or_else(default_output_folder);
    if let Err(e) = std::fs::create_dir_all(&output_folder) {
        eprintln!("failed to create output folder {}: {e}", output_folder.display());
        return ExitCode::FAILURE;
    }
    log::info!("output goes to {}", output_folder.display());

    let mut rng = match cli.random_seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let result = match cli.command {
        Command::Solve { year, month, day } => run_solve(&cli.catalog_dir, year, month, day, &mut rng),
        Command::Sweep { first_year, last_year } => run_sweep(&cli.catalog_dir, first_year, last_year, &mut rng),
        Command::Discover => run_discover(&cli.catalog_dir, &mut rng),
        Command::Count => run_count(&cli.catalog_dir),
        Command::Show { slug } => run_show(&cli.catalog_dir, &slug),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn default_output_folder() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    PathBuf::from(format!("{stamp}"))
}

fn run_solve(
    catalog_dir: &std::path::Path,
    year: i32,
    month: u8,
    day: u8,
    rng: &mut impl rand::Rng,
) -> blocker::Result<()> {
    if !date::is_valid_date(year, month, day) {
        return Err(blocker::Error::InvalidConfiguration { month, day, weekday: 0 });
    }
    let weekday = date::weekday_of(year, month, day);
    let config = Configuration::new(month, day, weekday)?;

    let table = PlacementTable::build();
    match dispatch::dispatch_one(catalog_dir, &config, &table, rng)? {
        dispatch::Outcome::Solved => println!("solved {}", config.slug()),
        dispatch::Outcome::AlreadySolved => println!("already solved {}", config.slug()),
        dispatch::Outcome::ClaimedElsewhere => println!("{} is being solved by another process", config.slug()),
    }
    Ok(())
}

fn run_sweep(
    catalog_dir: &std::path::Path,
    first_year: i32,
    last_year: i32,
    rng: &mut impl rand::Rng,
) -> blocker::Result<()> {
    let (solved, skipped) = dispatch::sweep(catalog_dir, first_year, last_year, rng)?;
    println!("solved {solved} new configurations, skipped {skipped} already done");
    Ok(())
}

fn run_discover(catalog_dir: &std::path::Path, rng: &mut impl rand::Rng) -> blocker::Result<()> {
    let table = PlacementTable::build();
    let (config, solution) = blocker::solver::discover(&table, rng).ok_or(blocker::Error::UnsolvableInstance {
        month: 0,
        day: 0,
        weekday: 0,
    })?;
    persistence::write(catalog_dir, &config, &solution)?;
    println!("discovered {}", config.slug());
    Ok(())
}

fn run_count(catalog_dir: &std::path::Path) -> blocker::Result<()> {
    let count = std::fs::read_dir(catalog_dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
                .count()
        })
        .unwrap_or(0);
    println!("{count} solutions catalogued");
    Ok(())
}

fn run_show(catalog_dir: &std::path::Path, slug: &str) -> blocker::Result<()> {
    let (month, day, weekday_label) = parse_slug(slug)?;
    let weekday = blocker::board::WEEKDAY_LABELS
        .iter()
        .position(|&l| l == weekday_label)
        .ok_or(blocker::Error::InvalidConfiguration { month, day, weekday: 0 })? as u8;
    let config = Configuration::new(month, day, weekday)?;

    let entry = persistence::read(catalog_dir, &config)?;
    println!("{}", entry.board_text());
    for part in entry.parts() {
        println!("{} at ({}, {}) rotation {} mirrored {}", part.name, part.x, part.y, part.rotation, part.mirrored);
    }
    Ok(())
}

fn parse_slug(slug: &str) -> blocker::Result<(u8, u8, &str)> {
    let mut fields = slug.split('-');
    let err = || blocker::Error::InvalidConfiguration { month: 0, day: 0, weekday: 0 };
    let month: u8 = fields.next().ok_or_else(err)?.parse().map_err(|_| err())?;
    let day: u8 = fields.next().ok_or_else(err)?.parse().map_err(|_| err())?;
    let weekday_label = fields.next().ok_or_else(err)?;
    Ok((month, day, weekday_label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_slug() {
        let (month, day, weekday) = parse_slug("02-29-Sun").unwrap();
        assert_eq!((month, day, weekday), (2, 29, "Sun"));
    }

    #[test]
    fn rejects_a_malformed_slug() {
        assert!(parse_slug("not-a-slug").is_err());
    }
}
