//! Work dispatcher for sweeping every (month, day, weekday) configuration
//! that occurs across a span of real years.
//!
//! Several processes can run this sweep against the same catalogue
//! directory at once: each configuration is claimed with an advisory
//! sentinel file before solving, so two workers never duplicate work, and
//! a worker that dies mid-solve leaves behind a stale sentinel that the
//! next sweep cleans up rather than honors forever.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, info, warn};
use rand::Rng;

use crate::board::Configuration;
use crate::date::{dates_in_year, weekday_of};
use crate::error::Error;
use crate::pieces::PlacementTable;
use crate::{persistence, solver};

/// Sentinel files older than this are assumed to belong to a dead worker
/// and are removed before the next claim attempt.
const STALE_LOCK_AGE: Duration = Duration::from_secs(60 * 60);

/// First and last year of the range known to exercise every configuration
/// at least once; see the puzzle's worked statistics for the derivation.
pub const FIRST_SWEEP_YEAR: i32 = 2022;
pub const LAST_SWEEP_YEAR: i32 = 2048;

struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    /// Attempt to claim `path` by creating it exclusively. Returns `None`
    /// if another worker already holds it.
    fn try_acquire(path: PathBuf) -> std::io::Result<Option<Self>> {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Some(LockGuard { path })),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("failed to release lock {}: {e}", self.path.display());
        }
    }
}

fn sweep_stale_locks(catalog_dir: &Path) {
    let Ok(entries) = fs::read_dir(catalog_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("lock") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let Ok(age) = SystemTime::now().duration_since(modified) else {
            continue;
        };
        if age > STALE_LOCK_AGE {
            if fs::remove_file(&path).is_ok() {
                info!("removed stale lock {}", path.display());
            }
        }
    }
}

fn lock_path(catalog_dir: &Path, config: &Configuration) -> PathBuf {
    catalog_dir.join(format!("{}.lock", config.slug()))
}

/// Outcome of attempting one configuration during a sweep.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    AlreadySolved,
    Solved,
    ClaimedElsewhere,
}

/// Solve and catalogue a single configuration, honoring the sentinel lock
/// and skipping work that is already done.
pub fn dispatch_one(
    catalog_dir: &Path,
    config: &Configuration,
    table: &PlacementTable,
    rng: &mut impl Rng,
) -> Result<Outcome, Error> {
    if persistence::exists(catalog_dir, config) {
        return Ok(Outcome::AlreadySolved);
    }

    fs::create_dir_all(catalog_dir).map_err(|e| Error::StoreIo {
        path: catalog_dir.to_path_buf(),
        source: e,
    })?;

    let guard = LockGuard::try_acquire(lock_path(catalog_dir, config)).map_err(|e| Error::StoreIo {
        path: lock_path(catalog_dir, config),
        source: e,
    })?;

    let Some(_guard) = guard else {
        return Ok(Outcome::ClaimedElsewhere);
    };

    debug!("solving {}", config.slug());
    let solution = solver::solve(config.target(), table, rng).ok_or(Error::UnsolvableInstance {
        month: config.month,
        day: config.day,
        weekday: config.weekday,
    })?;

    persistence::write(catalog_dir, config, &solution)?;
    info!("solved {}", config.slug());

    Ok(Outcome::Solved)
}

/// Sweep every (month, day, weekday) configuration that occurs across
/// `first_year..=last_year`, inclusive, solving and cataloguing whichever
/// ones are not already present.
pub fn sweep(
    catalog_dir: &Path,
    first_year: i32,
    last_year: i32,
    rng: &mut impl Rng,
) -> Result<(usize, usize), Error> {
    let table = PlacementTable::build();
    let mut solved = 0;
    let mut skipped = 0;

    for year in first_year..=last_year {
        sweep_stale_locks(catalog_dir);

        for (month, day) in dates_in_year(year) {
            let weekday = weekday_of(year, month, day);
            let config = Configuration::new(month, day, weekday)?;

            match dispatch_one(catalog_dir, &config, &table, rng)? {
                Outcome::Solved => solved += 1,
                Outcome::AlreadySolved | Outcome::ClaimedElsewhere => skipped += 1,
            }
        }
    }

    Ok((solved, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn tempdir() -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!("calpuzzle-dispatch-test-{nanos:x}"));
        dir
    }

    #[test]
    fn second_dispatch_skips_already_solved() {
        let dir = tempdir();
        let config = Configuration::new(5, 17, 3).unwrap();
        let table = PlacementTable::build();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        let first = dispatch_one(&dir, &config, &table, &mut rng).unwrap();
        assert_eq!(first, Outcome::Solved);

        let second = dispatch_one(&dir, &config, &table, &mut rng).unwrap();
        assert_eq!(second, Outcome::AlreadySolved);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn lock_guard_releases_on_drop() {
        let dir = tempdir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("x.lock");
        {
            let _guard = LockGuard::try_acquire(path.clone()).unwrap().unwrap();
            assert!(path.is_file());
        }
        assert!(!path.is_file());
        fs::remove_dir_all(&dir).ok();
    }
}
