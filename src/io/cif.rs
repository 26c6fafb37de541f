// src/io/cif.rs

//! Minimal CIF reader: collects every `loop_` block as a table of strings.
//!
//! Enough of CIF 1.1 for parameter files: comments, quoted values, and
//! semicolon text fields (skipped). Single data items outside loops are not
//! returned.

use crate::error::{DataError, DataResult};

#[derive(Debug, Clone, Default)]
pub struct CifLoop {
  pub tags: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl CifLoop {
  pub fn column(&self, tag: &str) -> Option<usize> {
    self.tags.iter().position(|t| t.eq_ignore_ascii_case(tag))
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    self.column(tag).is_some()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
  Outside,
  Tags,
  Values,
}

pub fn parse_loops(file: &str, text: &str) -> DataResult<Vec<CifLoop>> {
  let mut loops = Vec::new();
  let mut current = CifLoop::default();
  let mut values: Vec<String> = Vec::new();
  let mut state = State::Outside;
  let mut in_text_field = false;

  for (line_no, line) in text.lines().enumerate() {
    // 1. Semicolon text fields span lines; their content is never a loop value
    if line.starts_with(';') {
      in_text_field = !in_text_field;
      continue;
    }
    if in_text_field {
      continue;
    }

    let tokens = tokenize(line).map_err(|reason| DataError::parse(file, format!("line {}: {}", line_no + 1, reason)))?;
    let Some(first) = tokens.first() else {
      continue;
    };

    // 2. Loop Detection
    if first.eq_ignore_ascii_case("loop_") {
      finish_loop(file, &mut loops, &mut current, &mut values)?;
      state = State::Tags;
      continue;
    }

    // 3. Tag Parsing
    if first.starts_with('_') {
      match state {
        State::Tags => {
          current.tags.push(first.clone());
          continue;
        }
        State::Values => {
          finish_loop(file, &mut loops, &mut current, &mut values)?;
          state = State::Outside;
        }
        State::Outside => {}
      }
      continue;
    }

    if first.starts_with("data_") {
      finish_loop(file, &mut loops, &mut current, &mut values)?;
      state = State::Outside;
      continue;
    }

    // 4. Data Parsing
    if matches!(state, State::Tags | State::Values) {
      state = State::Values;
      values.extend(tokens);
    }
  }

  finish_loop(file, &mut loops, &mut current, &mut values)?;
  Ok(loops)
}

fn finish_loop(file: &str, loops: &mut Vec<CifLoop>, current: &mut CifLoop, values: &mut Vec<String>) -> DataResult<()> {
  let width = current.tags.len();
  if width == 0 {
    values.clear();
    return Ok(());
  }
  if values.len() % width != 0 {
    return Err(DataError::parse(
      file,
      format!(
        "loop starting with {} has {} values, not a multiple of {} tags",
        current.tags[0],
        values.len(),
        width
      ),
    ));
  }

  let mut finished = std::mem::take(current);
  finished.rows = values.chunks(width).map(|c| c.to_vec()).collect();
  values.clear();
  loops.push(finished);
  Ok(())
}

/// Splits one line into CIF tokens. A quoted value ends at a matching quote
/// that is followed by whitespace or the end of the line, so `'O'Keeffe'`
/// style apostrophes survive.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
  let chars: Vec<char> = line.chars().collect();
  let mut tokens = Vec::new();
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    if c.is_whitespace() {
      i += 1;
      continue;
    }
    if c == '#' {
      break;
    }

    if c == '\'' || c == '"' {
      let start = i + 1;
      let mut j = start;
      loop {
        if j >= chars.len() {
          return Err(format!("unterminated {} quote", c));
        }
        let closes = chars[j] == c && chars.get(j + 1).map_or(true, |n| n.is_whitespace());
        if closes {
          break;
        }
        j += 1;
      }
      tokens.push(chars[start..j].iter().collect());
      i = j + 1;
    } else {
      let start = i;
      while i < chars.len() && !chars[i].is_whitespace() {
        i += 1;
      }
      tokens.push(chars[start..i].iter().collect());
    }
  }

  Ok(tokens)
}
