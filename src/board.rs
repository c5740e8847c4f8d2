//! The fixed 7x8 outline and the bitmask target geometry for one
//! (month, day, weekday) configuration.
//!
//! The board is not a rectangle: it is the union of a block of month cells,
//! a block of day cells and a block of weekday cells, laid out so that
//! every real calendar date has exactly one month cell, one day cell and
//! one weekday cell to leave uncovered. Everything else is covered by
//! pieces.

use crate::error::Error;

pub const WIDTH: u8 = 7;
pub const HEIGHT: u8 = 8;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Linear index of a board cell, row-major with 7 columns per row.
#[inline]
pub const fn idx(x: u8, y: u8) -> u32 {
    y as u32 * WIDTH as u32 + x as u32
}

#[inline]
const fn bit(x: u8, y: u8) -> u64 {
    1u64 << idx(x, y)
}

/// Position of the cell labelled with the given month (1..=12).
pub fn month_cell(month: u8) -> (u8, u8) {
    debug_assert!((1..=12).contains(&month));
    let m = month - 1;
    (m % 6, 7 - m / 6)
}

/// Position of the cell labelled with the given day of month (1..=31).
pub fn day_cell(day: u8) -> (u8, u8) {
    debug_assert!((1..=31).contains(&day));
    let d = day - 1;
    (d % 7, 5 - d / 7)
}

/// Position of the cell labelled with the given weekday, `0 == Monday`
/// through `6 == Sunday`, matching the ISO weekday ordering used
/// throughout this crate.
///
/// The mapping is not the uniform `(3+wd, 1)` / `(wd, 0)` formula used to
/// lay out the seven weekday cells in the first place: Sunday wraps around
/// to the position that formula would assign index zero, and every other
/// day shifts up by one.
pub fn weekday_cell(weekday: u8) -> (u8, u8) {
    debug_assert!(weekday <= 6);
    match weekday {
        0 => (4, 1), // Mon
        1 => (5, 1), // Tue
        2 => (6, 1), // Wed
        3 => (4, 0), // Thu
        4 => (5, 0), // Fri
        5 => (6, 0), // Sat
        6 => (3, 1), // Sun
        _ => unreachable!(),
    }
}

/// The full set of cells that make up the board, independent of any
/// particular configuration: every month, day and weekday label cell.
pub fn outline_mask() -> u64 {
    let mut mask = 0u64;
    for month in 1..=12u8 {
        let (x, y) = month_cell(month);
        mask |= bit(x, y);
    }
    for day in 1..=31u8 {
        let (x, y) = day_cell(day);
        mask |= bit(x, y);
    }
    for weekday in 0..=6u8 {
        let (x, y) = weekday_cell(weekday);
        mask |= bit(x, y);
    }
    mask
}

/// Number of cells in the board outline.
pub fn outline_len() -> u32 {
    outline_mask().count_ones()
}

/// A single (month, day, weekday) puzzle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl Configuration {
    pub fn new(month: u8, day: u8, weekday: u8) -> Result<Self, Error> {
        let config = Configuration { month, day, weekday };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        let valid = (1..=12).contains(&self.month)
            && self.weekday <= 6
            && (1..=Self::days_in_month(self.month)).contains(&self.day);
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidConfiguration {
                month: self.month,
                day: self.day,
                weekday: self.weekday,
            })
        }
    }

    /// Days in `month` (1..=12), allowing February 29 since a configuration
    /// names no year and so cannot rule out a leap year.
    fn days_in_month(month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => 29,
            _ => 0,
        }
    }

    pub fn month_label(&self) -> &'static str {
        MONTH_LABELS[(self.month - 1) as usize]
    }

    pub fn weekday_label(&self) -> &'static str {
        WEEKDAY_LABELS[self.weekday as usize]
    }

    /// The bitmask of cells pieces must cover: the outline with the three
    /// cells naming this month, day and weekday removed.
    pub fn target(&self) -> u64 {
        let (mx, my) = month_cell(self.month);
        let (dx, dy) = day_cell(self.day);
        let (wx, wy) = weekday_cell(self.weekday);
        outline_mask() & !(bit(mx, my) | bit(dx, dy) | bit(wx, wy))
    }

    /// Catalogue basename, e.g. `022906-Feb-29-Sun`: the sortable
    /// `MMDDWW` prefix followed by the human-scannable `Mon-DD-Wdy` form.
    pub fn slug(&self) -> String {
        format!(
            "{:02}{:02}{:02}-{}-{:02}-{}",
            self.month,
            self.day,
            self.weekday,
            self.month_label(),
            self.day,
            self.weekday_label()
        )
    }
}

/// Render a covered-cells bitmask as the board's ASCII shape, top row
/// first. Cells outside the outline are blank, uncovered outline cells
/// are `_`, and covered ones are `X` unless a label override is supplied.
pub fn render(covered: u64, labels: impl Fn(u8, u8) -> Option<char>) -> String {
    let outline = outline_mask();
    let mut out = String::new();
    for y in (0..HEIGHT).rev() {
        for x in 0..WIDTH {
            let i = idx(x, y);
            let on_outline = outline & (1 << i) != 0;
            let ch = if !on_outline {
                ' '
            } else if let Some(c) = labels(x, y) {
                c
            } else if covered & (1 << i) != 0 {
                'X'
            } else {
                '_'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
