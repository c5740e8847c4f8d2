//! Content-addressed catalogue store for solved puzzles.
//!
//! Each configuration is saved as `<slug>.json` under the catalogue
//! directory, where `<slug>` is e.g. `02-29-Sun`. Writes go through a
//! `.tmp` file and an atomic rename so a reader never observes a
//! partially-written payload, and a crashed writer leaves only an orphan
//! `.tmp` file rather than a corrupt catalogue entry.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{self, Configuration};
use crate::error::Error;
use crate::pieces::PIECES;
use crate::solver::Placed;

#[derive(Debug, Serialize, Deserialize)]
struct ConfigurationRecord {
    month: u8,
    monthlabel: String,
    day: u8,
    weekday: u8,
    weekdaylabel: String,
}

impl From<&Configuration> for ConfigurationRecord {
    fn from(config: &Configuration) -> Self {
        ConfigurationRecord {
            month: config.month,
            monthlabel: config.month_label().to_string(),
            day: config.day,
            weekday: config.weekday,
            weekdaylabel: config.weekday_label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartRecord {
    pub name: char,
    #[serde(rename = "xoffset")]
    pub x: u8,
    #[serde(rename = "yoffset")]
    pub y: u8,
    pub rotation: u8,
    #[serde(rename = "ismirrored")]
    pub mirrored: bool,
}

impl PartRecord {
    fn from_placed(placed: &Placed) -> Self {
        let piece = &PIECES[placed.piece_index];
        PartRecord {
            name: piece.name.label(),
            x: placed.placement.offset.0,
            y: placed.placement.offset.1,
            rotation: placed.placement.pose.rotation * 90,
            mirrored: placed.placement.pose.mirrored,
        }
    }
}

/// The JSON shape written by the current version of this crate.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    configuration: ConfigurationRecord,
    board: Vec<String>,
    parts: Vec<PartRecord>,
}

impl CatalogEntry {
    pub fn parts(&self) -> &[PartRecord] {
        &self.parts
    }

    pub fn board_text(&self) -> String {
        self.board.join("\n")
    }
}

fn catalog_path(catalog_dir: &Path, config: &Configuration) -> PathBuf {
    catalog_dir.join(format!("{}.json", config.slug()))
}

fn io_err(path: &Path, source: std::io::Error) -> Error {
    Error::StoreIo {
        path: path.to_path_buf(),
        source,
    }
}

fn decode_err(path: &Path, source: serde_json::Error) -> Error {
    Error::StoreDecode {
        path: path.to_path_buf(),
        source,
    }
}

/// Whether a catalogue entry already exists for this configuration.
pub fn exists(catalog_dir: &Path, config: &Configuration) -> bool {
    catalog_path(catalog_dir, config).is_file()
}

/// Write a solved puzzle to the catalogue, replacing any existing entry.
pub fn write(
    catalog_dir: &Path,
    config: &Configuration,
    solution: &[Placed],
) -> Result<(), Error> {
    fs::create_dir_all(catalog_dir).map_err(|e| io_err(catalog_dir, e))?;

    let mut covered = 0u64;
    for placed in solution {
        covered |= placed.placement.mask;
    }
    let labels = |x: u8, y: u8| -> Option<char> {
        if (x, y) == board::month_cell(config.month) {
            Some('m')
        } else if (x, y) == board::day_cell(config.day) {
            Some('d')
        } else if (x, y) == board::weekday_cell(config.weekday) {
            Some('w')
        } else {
            None
        }
    };
    let board_rows: Vec<String> = board::render(covered, labels)
        .lines()
        .map(str::to_string)
        .collect();

    let entry = CatalogEntry {
        configuration: ConfigurationRecord::from(config),
        board: board_rows,
        parts: solution.iter().map(PartRecord::from_placed).collect(),
    };

    let final_path = catalog_path(catalog_dir, config);
    let tmp_path = final_path.with_extension("json.tmp");

    let payload = serde_json::to_string_pretty(&entry).map_err(|e| decode_err(&final_path, e))?;
    fs::write(&tmp_path, payload).map_err(|e| io_err(&tmp_path, e))?;
    fs::rename(&tmp_path, &final_path).map_err(|e| io_err(&final_path, e))?;

    Ok(())
}

/// Read a catalogue entry back, migrating the legacy bare-array shape
/// (just the `parts` list, with no configuration or board block) on the
/// fly. The legacy shape carries no configuration of its own, so the
/// caller's `config` is trusted to match the filename it was read from.
pub fn read(catalog_dir: &Path, config: &Configuration) -> Result<CatalogEntry, Error> {
    let path = catalog_path(catalog_dir, config);
    let raw = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;

    match serde_json::from_str::<CatalogEntry>(&raw) {
        Ok(entry) => Ok(entry),
        Err(object_err) => match serde_json::from_str::<Vec<PartRecord>>(&raw) {
            Ok(parts) => {
                warn!("migrating legacy catalogue entry at {}", path.display());
                Ok(CatalogEntry {
                    configuration: ConfigurationRecord::from(config),
                    board: Vec::new(),
                    parts,
                })
            }
            Err(_) => Err(decode_err(&path, object_err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PlacementTable;
    use crate::solver::solve;
    use rand::SeedableRng;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir();
        let config = Configuration::new(7, 4, 0).unwrap();
        let table = PlacementTable::build();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let solution = solve(config.target(), &table, &mut rng).unwrap();

        write(&dir, &config, &solution).unwrap();
        assert!(exists(&dir, &config));

        let entry = read(&dir, &config).unwrap();
        assert_eq!(entry.parts().len(), PIECES.len());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn legacy_bare_array_is_migrated_on_read() {
        let dir = tempdir();
        fs::create_dir_all(&dir).unwrap();
        let config = Configuration::new(3, 15, 2).unwrap();
        let legacy = serde_json::json!([
            {"name": "A", "xoffset": 0, "yoffset": 0, "rotation": 0, "ismirrored": false},
        ]);
        fs::write(catalog_path(&dir, &config), legacy.to_string()).unwrap();

        let entry = read(&dir, &config).unwrap();
        assert_eq!(entry.parts().len(), 1);
        assert_eq!(entry.parts()[0].name, 'A');

        fs::remove_dir_all(&dir).ok();
    }

    fn tempdir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("calpuzzle-test-{}", std::process::id()));
        dir.push(uuid_like());
        dir
    }

    fn uuid_like() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{nanos:x}")
    }
}
