// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delimited-text persistence for [`PointTable`].
//!
//! A table is stored as two coordinated files:
//!
//! - a point file with one row per point in logical-id order and one column per
//!   dimension, separated by [`TextFormat::delimiter`];
//! - an optional weight file with one weight per line in the same order.
//!
//! Numbers are written with Rust's shortest round-trip `f64` formatting, so
//! saving and reloading reproduces every coordinate and weight bit for bit.
//! Blank lines are ignored on load.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::table::PointTable;

/// Column layout of a point file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextFormat {
    /// Column separator. Whitespace delimiters split on any run of whitespace
    /// when reading.
    pub delimiter: char,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::CSV
    }
}

impl TextFormat {
    /// Comma-separated columns.
    pub const CSV: Self = Self { delimiter: ',' };
    /// Tab-separated columns.
    pub const TSV: Self = Self { delimiter: '\t' };

    fn split<'a>(&self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        if self.delimiter.is_whitespace() {
            Box::new(line.split_whitespace())
        } else {
            Box::new(line.split(self.delimiter).map(str::trim))
        }
    }
}

impl PointTable {
    /// Persist points (and weights, if `weights` is given) as comma-separated
    /// text in logical-id order.
    pub fn save(&self, points: impl AsRef<Path>, weights: Option<&Path>) -> Result<()> {
        self.save_with(points, weights, TextFormat::default())
    }

    /// [`PointTable::save`] with an explicit [`TextFormat`].
    ///
    /// An empty table has no textual form that [`PointTable::load`] accepts,
    /// so saving one fails with [`Error::DegenerateInput`] and writes nothing.
    pub fn save_with(
        &self,
        points: impl AsRef<Path>,
        weights: Option<&Path>,
        format: TextFormat,
    ) -> Result<()> {
        if self.is_empty() {
            return Err(Error::DegenerateInput("cannot save an empty table".into()));
        }
        let points = points.as_ref();
        write_file(points, |out| self.write_points(out, format))?;
        if let Some(weights) = weights {
            write_file(weights, |out| self.write_weights(out))?;
        }
        log::debug!(
            "saved {} points of dimension {} to {}",
            self.entry_count(),
            self.attribute_count(),
            points.display()
        );
        Ok(())
    }

    /// Load a table saved by [`PointTable::save`].
    ///
    /// Without a weight file every weight is [`PointTable::DEFAULT_WEIGHT`].
    /// Logical ids follow row order.
    pub fn load(points: impl AsRef<Path>, weights: Option<&Path>) -> Result<Self> {
        Self::load_with(points, weights, TextFormat::default())
    }

    /// [`PointTable::load`] with an explicit [`TextFormat`].
    pub fn load_with(
        points: impl AsRef<Path>,
        weights: Option<&Path>,
        format: TextFormat,
    ) -> Result<Self> {
        let points = points.as_ref();
        let mut table = read_points(open(points)?, points, format)?;
        if let Some(weights) = weights {
            let values = read_weights(open(weights)?, weights)?;
            if values.len() != table.entry_count() {
                return Err(Error::format(
                    weights,
                    0,
                    format!(
                        "expected {} weights, found {}",
                        table.entry_count(),
                        values.len()
                    ),
                ));
            }
            for (row, w) in values.into_iter().enumerate() {
                table.set_row_weight(row, w);
            }
        }
        log::debug!(
            "loaded {} points of dimension {} from {}",
            table.entry_count(),
            table.attribute_count(),
            points.display()
        );
        Ok(table)
    }

    fn write_points<W: Write>(&self, mut out: W, format: TextFormat) -> io::Result<()> {
        for (_, point, _) in self.iter() {
            for (i, x) in point.iter().enumerate() {
                if i > 0 {
                    write!(out, "{}", format.delimiter)?;
                }
                write!(out, "{x}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_weights<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (_, _, w) in self.iter() {
            writeln!(out, "{w}")?;
        }
        Ok(())
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(path, e))
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| Error::io(path, e))
}

fn parse_number(field: &str, origin: &Path, line: usize) -> Result<f64> {
    let x: f64 = field
        .parse()
        .map_err(|_| Error::format(origin, line, format!("invalid number `{field}`")))?;
    if !x.is_finite() {
        return Err(Error::format(origin, line, format!("non-finite value `{field}`")));
    }
    Ok(x)
}

/// Numbered, non-blank lines of `input`.
fn content_lines<R: BufRead>(
    input: R,
    origin: &Path,
) -> impl Iterator<Item = Result<(usize, String)>> {
    input
        .lines()
        .enumerate()
        .map(move |(i, line)| {
            line.map(|l| (i + 1, l))
                .map_err(|e| Error::io(origin, e))
        })
        .filter(|r| !matches!(r, Ok((_, l)) if l.trim().is_empty()))
}

fn read_points<R: BufRead>(input: R, origin: &Path, format: TextFormat) -> Result<PointTable> {
    let mut table: Option<PointTable> = None;
    let mut row = Vec::new();
    for entry in content_lines(input, origin) {
        let (line, text) = entry?;
        row.clear();
        for field in format.split(&text) {
            row.push(parse_number(field, origin, line)?);
        }
        // The first row fixes the dimensionality.
        if table.is_none() {
            table = Some(PointTable::new(row.len(), 0)?);
        }
        if let Some(table) = table.as_mut() {
            if row.len() != table.attribute_count() {
                return Err(Error::format(
                    origin,
                    line,
                    format!(
                        "expected {} columns, found {}",
                        table.attribute_count(),
                        row.len()
                    ),
                ));
            }
            table.push(&row, PointTable::DEFAULT_WEIGHT)?;
        }
    }
    let mut table = table.ok_or_else(|| Error::format(origin, 0, "no points"))?;
    table.reset_order();
    Ok(table)
}

fn read_weights<R: BufRead>(input: R, origin: &Path) -> Result<Vec<f64>> {
    let mut weights = Vec::new();
    for entry in content_lines(input, origin) {
        let (line, text) = entry?;
        let field = text.trim();
        if field.contains([',', '\t', ' ']) {
            return Err(Error::format(origin, line, "expected one weight per line"));
        }
        weights.push(parse_number(field, origin, line)?);
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table() -> PointTable {
        PointTable::from_weighted_points(
            3,
            [
                ([0.1, -2.5, 1e-300], 1.0),
                ([0.30000000000000004, 7.0, -0.0], 4.75),
                ([f64::MAX, f64::MIN_POSITIVE, 2.0 / 3.0], 0.5),
            ],
        )
        .unwrap()
    }

    fn write_pair(dir: &Path, t: &PointTable) -> (std::path::PathBuf, std::path::PathBuf) {
        let p = dir.join("points.csv");
        let w = dir.join("weights.csv");
        t.save(&p, Some(w.as_path())).unwrap();
        (p, w)
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let (p, w) = write_pair(dir.path(), &t);
        let back = PointTable::load(&p, Some(w.as_path())).unwrap();
        assert_eq!(back, t);
        for id in 0..t.entry_count() {
            let (a, wa) = t.get(id).unwrap();
            let (b, wb) = back.get(id).unwrap();
            for (x, y) in a.iter().zip(b) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
            assert_eq!(wa.to_bits(), wb.to_bits());
        }
    }

    #[test]
    fn round_trip_after_reorder_uses_logical_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = table();
        t.swap_rows(0, 2);
        let (p, w) = write_pair(dir.path(), &t);
        let back = PointTable::load(&p, Some(w.as_path())).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.row(0), t.point(0).unwrap());
    }

    #[test]
    fn empty_tables_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("points.csv");
        let w = dir.path().join("weights.csv");
        let empty = PointTable::new(3, 0).unwrap();
        assert!(matches!(
            empty.save(&p, Some(w.as_path())),
            Err(Error::DegenerateInput(_))
        ));
        assert!(!p.exists());
        assert!(!w.exists());
    }

    #[test]
    fn missing_weights_default() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("points.csv");
        table().save(&p, None).unwrap();
        let back = PointTable::load(&p, None).unwrap();
        assert!(back.iter().all(|(_, _, w)| w == PointTable::DEFAULT_WEIGHT));
    }

    #[test]
    fn tab_separated_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("points.tsv");
        let t = table();
        t.save_with(&p, None, TextFormat::TSV).unwrap();
        let text = std::fs::read_to_string(&p).unwrap();
        assert!(text.lines().all(|l| l.split('\t').count() == 3));
        let back = PointTable::load_with(&p, None, TextFormat::TSV).unwrap();
        assert_eq!(back.point(1).unwrap(), t.point(1).unwrap());
    }

    #[test]
    fn ragged_rows_are_format_errors() {
        let input = Cursor::new("1,2\n\n3,4\n5\n");
        let err = read_points(input, Path::new("p.csv"), TextFormat::CSV).unwrap_err();
        assert!(matches!(err, Error::Format { line: 4, .. }), "{err}");
    }

    #[test]
    fn junk_and_non_finite_values_are_format_errors() {
        for text in ["1,x\n", "1,inf\n", "NaN,1\n", "1,,2\n"] {
            let err = read_points(Cursor::new(text), Path::new("p.csv"), TextFormat::CSV)
                .unwrap_err();
            assert!(matches!(err, Error::Format { line: 1, .. }), "{text:?}: {err}");
        }
    }

    #[test]
    fn empty_source_is_a_format_error() {
        let err = read_points(Cursor::new("\n \n"), Path::new("p.csv"), TextFormat::CSV)
            .unwrap_err();
        assert!(matches!(err, Error::Format { line: 0, .. }));
    }

    #[test]
    fn weight_count_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let (p, w) = write_pair(dir.path(), &table());
        std::fs::write(&w, "1\n2\n").unwrap();
        let err = PointTable::load(&p, Some(w.as_path())).unwrap_err();
        assert!(matches!(err, Error::Format { line: 0, .. }), "{err}");
        std::fs::write(&w, "1\n2,3\n4\n").unwrap();
        let err = PointTable::load(&p, Some(w.as_path())).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }), "{err}");
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = PointTable::load(dir.path().join("nope.csv"), None).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
