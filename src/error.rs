//! Error kinds for the calendar puzzle engine.
//!
//! The geometry kernel and the backtracking solver never fail at runtime
//! (invalid arguments there are a programming error, caught by
//! `debug_assert!`). Everything fallible sits at the boundaries: the board
//! configurator, the catalogue store, and the work dispatcher.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the configurator, catalogue store and dispatcher.
#[derive(Debug, Error)]
pub enum Error {
    /// The (month, day, weekday) triple does not name a real date, or names
    /// a label not present on the board outline.
    #[error("invalid configuration: month={month}, day={day}, weekday={weekday}")]
    InvalidConfiguration { month: u8, day: u8, weekday: u8 },

    /// The search exhausted every branch without finding a tiling. Not
    /// expected to occur for any real calendar date.
    #[error("no tiling found for month={month}, day={day}, weekday={weekday}")]
    UnsolvableInstance { month: u8, day: u8, weekday: u8 },

    /// Reading or writing a catalogue payload failed at the filesystem level.
    #[error("catalogue I/O error on {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalogue payload exists but is not valid JSON in either the
    /// current or legacy shape.
    #[error("catalogue payload at {path} could not be decoded: {source}")]
    StoreDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
