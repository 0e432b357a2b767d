use sim_types::{ResourceMap, CAPACITY};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ResourceMapError {
    #[error("resource map is empty")]
    Empty,
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} column {column}: `{token}` is not a number")]
    NotANumber {
        row: usize,
        column: usize,
        token: String,
    },
    #[error("row {row} column {column}: level {value} is negative")]
    Negative { row: usize, column: usize, value: f64 },
    #[error("row {row} column {column}: level {value} is not a whole number")]
    Fractional { row: usize, column: usize, value: f64 },
    #[error("row {row} column {column}: level {value} exceeds capacity {}", CAPACITY)]
    AboveCapacity { row: usize, column: usize, value: f64 },
}

/// Parses whitespace-delimited rows of resource levels. Blank lines are
/// skipped; every remaining row must have the same number of columns.
/// Values such as `3.0` are accepted as long as they are whole.
///
/// Text rows are grid rows: the value at line `y`, column `x` lands on cell
/// `(x, y)`, so a file with `h` lines of `w` values describes a `w`-wide,
/// `h`-tall world. Rasters stored column-major must be transposed first.
pub fn parse_resource_map(raw: &str) -> Result<ResourceMap, ResourceMapError> {
    let mut levels = Vec::new();
    let mut width = None;
    let mut height = 0_usize;

    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        let row = height;
        let mut columns = 0_usize;
        for (column, token) in line.split_whitespace().enumerate() {
            let value = token
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ResourceMapError::NotANumber {
                    row,
                    column,
                    token: token.to_owned(),
                })?;
            if value < 0.0 {
                return Err(ResourceMapError::Negative { row, column, value });
            }
            if value.fract() != 0.0 {
                return Err(ResourceMapError::Fractional { row, column, value });
            }
            if value > f64::from(CAPACITY) {
                return Err(ResourceMapError::AboveCapacity { row, column, value });
            }
            levels.push(value as u8);
            columns += 1;
        }

        match width {
            None => width = Some(columns),
            Some(expected) if expected != columns => {
                return Err(ResourceMapError::RaggedRow {
                    row,
                    expected,
                    actual: columns,
                });
            }
            Some(_) => {}
        }
        height += 1;
    }

    let width = width.ok_or(ResourceMapError::Empty)?;
    Ok(ResourceMap {
        width: width as u32,
        height: height as u32,
        levels,
    })
}
