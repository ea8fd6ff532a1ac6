//! New sketch naming.
//!
//! New sketches are called `sketch_<mon><day><suffix>`, for example `sketch_jul8a`.
//! When `sketch_jul8a` is taken the next candidate is `sketch_jul8b`; after
//! `sketch_jul8z` comes `sketch_jul8aa`, like spreadsheet column names.

use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Upper bound of candidates tried by a single naming run
pub const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// `sketch_<mon><day>` for the given date
pub fn sketch_base_name(date: NaiveDate) -> String {
    format!("sketch_{}{}", MONTH_NAMES[date.month0() as usize], date.day())
}

/// Bijective base-26 encoding: 1 → `a`, 26 → `z`, 27 → `aa`, 28 → `ab`.
///
/// Index 0 has no letters and encodes to an empty string.
pub fn index_to_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        index -= 1;
        letters.push(char::from(b'a' + (index % 26) as u8));
        index /= 26;
    }
    letters.iter().rev().collect()
}

/// Inverse of [`index_to_letters`]. `None` for anything but lowercase ASCII letters.
pub fn letters_to_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0u32, |acc, byte| {
        if !byte.is_ascii_lowercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(u32::from(byte - b'a') + 1)
    })
}

/// Per-process naming state.
///
/// The suffix counter restarts at `a` when the day changes and advances on every
/// candidate handed out, taken or not, so a name is never proposed twice on the same
/// day within one process.
#[derive(Debug, Clone)]
pub struct SketchNamer {
    suffix_index: u32,
    last_base_name: Option<String>,
}

impl Default for SketchNamer {
    fn default() -> Self {
        Self {
            suffix_index: 1,
            last_base_name: None,
        }
    }
}

impl SketchNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first candidate for `date` that `is_taken` rejects.
    ///
    /// Returns `None` after [`MAX_NAME_ATTEMPTS`] taken candidates.
    pub fn next_name<F>(&mut self, date: NaiveDate, mut is_taken: F) -> Option<String>
    where
        F: FnMut(&str) -> bool,
    {
        let base_name = sketch_base_name(date);
        if self.last_base_name.as_deref() != Some(base_name.as_str()) {
            self.suffix_index = 1;
        }

        for _ in 0..MAX_NAME_ATTEMPTS {
            let candidate = format!("{base_name}{}", index_to_letters(self.suffix_index));
            self.suffix_index += 1;
            if !is_taken(&candidate) {
                self.last_base_name = Some(base_name);
                return Some(candidate);
            }
            log::debug!("Sketch name {candidate} is taken, trying the next one");
        }

        None
    }
}
