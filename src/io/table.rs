// src/io/table.rs

//! Plain-text table formats used by the packaged datasets.
//!
//! - line tables: one value per line, line `i` belongs to atomic number `i + 1`
//! - delimited tables: a header row plus whitespace-separated rows
//! - lower-triangular matrices for symmetric pairwise data

use crate::error::{DataError, DataResult};

/// Cell text that marks an absent measurement.
const MISSING_MARKERS: [&str; 4] = ["-", "NaN", "nan", "Missing"];

/// Parses a numeric cell. Missing markers become `NaN`, anything else that is
/// not a number is an error.
pub fn parse_cell(file: &str, cell: &str) -> DataResult<f64> {
  let cell = cell.trim();
  if MISSING_MARKERS.contains(&cell) {
    return Ok(f64::NAN);
  }
  cell
    .parse::<f64>()
    .map_err(|_| DataError::parse(file, format!("'{}' is not a number", cell)))
}

/// One scalar per line, indexed by Z - 1. Unparseable lines (e.g. `Missing`)
/// are `NaN`: the line table format has no other way to mark absence.
pub fn parse_line_table(text: &str) -> Vec<f64> {
  text
    .lines()
    .map(|line| line.trim().parse::<f64>().unwrap_or(f64::NAN))
    .collect()
}

/// One whitespace-separated list of integers per line, indexed by Z - 1. An
/// empty line is an empty list.
pub fn parse_list_table(file: &str, text: &str) -> DataResult<Vec<Vec<i32>>> {
  text
    .lines()
    .enumerate()
    .map(|(line_no, line)| {
      line
        .split_whitespace()
        .map(|tok| {
          // some tables write states as floats ("2.0")
          tok
            .parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i32)
            .ok_or_else(|| {
              DataError::parse(file, format!("line {}: '{}' is not an oxidation state", line_no + 1, tok))
            })
        })
        .collect::<DataResult<Vec<i32>>>()
    })
    .collect()
}

#[derive(Debug, Clone)]
pub struct DelimitedTable {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
  pub fn column(&self, header: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == header)
  }
}

/// Header row plus data rows. Blank lines and `#` comments are skipped; every
/// row must have as many cells as the header.
pub fn parse_delimited(file: &str, text: &str) -> DataResult<DelimitedTable> {
  let mut lines = text
    .lines()
    .enumerate()
    .map(|(i, l)| (i + 1, l.trim()))
    .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

  let headers: Vec<String> = match lines.next() {
    Some((_, header)) => header.split_whitespace().map(str::to_string).collect(),
    None => return Err(DataError::parse(file, "missing header row")),
  };

  let mut rows = Vec::new();
  for (line_no, line) in lines {
    let cells: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if cells.len() != headers.len() {
      return Err(DataError::parse(
        file,
        format!("line {}: expected {} cells, found {}", line_no, headers.len(), cells.len()),
      ));
    }
    rows.push(cells);
  }

  Ok(DelimitedTable { headers, rows })
}

/// Symmetric pairwise data stored as a lower-triangular matrix.
#[derive(Debug, Clone)]
pub struct TriangularMatrix {
  pub labels: Vec<String>,
  /// `(row, column, value)` for every recorded cell, `row > column`.
  pub entries: Vec<(usize, usize, f64)>,
}

/// Header: a corner cell followed by the labels. Row `i` starts with label `i`
/// and holds the values for columns `0..i`; the diagonal is not stored and a
/// missing marker means "no value".
pub fn parse_lower_triangle(file: &str, text: &str) -> DataResult<TriangularMatrix> {
  let mut lines = text
    .lines()
    .enumerate()
    .map(|(i, l)| (i + 1, l.trim()))
    .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

  let labels: Vec<String> = match lines.next() {
    Some((_, header)) => header.split_whitespace().skip(1).map(str::to_string).collect(),
    None => return Err(DataError::parse(file, "missing header row")),
  };

  let mut entries = Vec::new();
  let mut row_count = 0;
  for (line_no, line) in lines {
    let mut cells = line.split_whitespace();
    let label = cells.next().unwrap_or_default();
    let row = row_count;
    if labels.get(row).map(String::as_str) != Some(label) {
      return Err(DataError::parse(
        file,
        format!("line {}: row label '{}' does not match header position {}", line_no, label, row),
      ));
    }

    let values: Vec<&str> = cells.collect();
    if values.len() != row {
      return Err(DataError::parse(
        file,
        format!("line {}: row '{}' needs {} cells, found {}", line_no, label, row, values.len()),
      ));
    }
    for (col, cell) in values.into_iter().enumerate() {
      let v = parse_cell(file, cell)?;
      if !v.is_nan() {
        entries.push((row, col, v));
      }
    }
    row_count += 1;
  }

  if row_count != labels.len() {
    return Err(DataError::parse(
      file,
      format!("{} labels but {} rows", labels.len(), row_count),
    ));
  }

  Ok(TriangularMatrix { labels, entries })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_line_table_missing_is_nan() {
    let values = parse_line_table("1.00794\nMissing\n6.941\n");
    assert_eq!(values.len(), 3);
    assert!((values[0] - 1.00794).abs() < 1e-12);
    assert!(values[1].is_nan());
  }

  #[test]
  fn test_list_table() {
    let lists = parse_list_table("t", "-1 1\n\n-4 2.0 4\n").unwrap();
    assert_eq!(lists, vec![vec![-1, 1], vec![], vec![-4, 2, 4]]);
    assert!(parse_list_table("t", "2.5\n").is_err());
  }

  #[test]
  fn test_delimited_rejects_ragged_rows() {
    let ok = parse_delimited("t", "# comment\na b\n1 2\n\n3 4\n").unwrap();
    assert_eq!(ok.rows.len(), 2);
    assert_eq!(ok.column("b"), Some(1));

    let err = parse_delimited("t", "a b\n1 2 3\n").unwrap_err();
    assert!(err.to_string().contains("line 2"), "{}", err);
  }

  #[test]
  fn test_lower_triangle() {
    let text = "*\tA\tB\tC\nA\nB\t-5\nC\t-\t7\n";
    let m = parse_lower_triangle("t", text).unwrap();
    assert_eq!(m.labels, vec!["A", "B", "C"]);
    assert_eq!(m.entries, vec![(1, 0, -5.0), (2, 1, 7.0)]);
  }

  #[test]
  fn test_lower_triangle_shape_errors() {
    assert!(parse_lower_triangle("t", "*\tA\tB\nA\nB\n").is_err());
    assert!(parse_lower_triangle("t", "*\tA\tB\nA\nC\t1\n").is_err());
    assert!(parse_lower_triangle("t", "*\tA\tB\nA\n").is_err());
    assert!(parse_lower_triangle("t", "*\tA\tB\nA\nB\tx\n").is_err());
  }
}
