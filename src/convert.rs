//! Plain-text ("nbody") particle files → TIPSY.
//!
//! Line 1 is a whitespace-separated header in one of two shapes:
//! the five-field Aarseth form `(nStars, eta, dt, tmax, eps2)` or the
//! reduced two-field form `(nStars, tmax)`. Every following line is one
//! particle: `mass x y z vx vy vz`. The imported collection starts at
//! time 0.0 with ids assigned as 0-based row indices.
//!
//! A header whose declared star count disagrees with the number of rows is
//! corrected, not rejected: the actual row count wins and a warning is
//! logged.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;

use crate::error::FormatError;
use crate::stars::Stars;

/// The recognized text-header shapes, tagged by field count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderShape {
    /// `(nStars, eta, dt, tmax, eps2)` — eta is the accuracy parameter,
    /// eps2 the squared softening radius.
    Aarseth { eta: f64, dt: f64, tmax: f64, eps2: f64 },
    /// `(nStars, tmax)`.
    Simple { tmax: f64 },
}

/// What an import produced: the header as declared, and the count actually
/// written (post-correction).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub declared_stars: usize,
    pub n_stars: usize,
    pub shape: HeaderShape,
}

/// Parse the first line of a text file into `(declared count, shape)`.
pub fn parse_header(line: &str) -> Result<(usize, HeaderShape), FormatError> {
    let fields: Vec<f64> = line
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| FormatError::BadTextHeader(line.split_whitespace().count()))?;

    match fields.as_slice() {
        [n, eta, dt, tmax, eps2] => Ok((
            *n as usize,
            HeaderShape::Aarseth { eta: *eta, dt: *dt, tmax: *tmax, eps2: *eps2 },
        )),
        [n, tmax] => Ok((*n as usize, HeaderShape::Simple { tmax: *tmax })),
        other => Err(FormatError::BadTextHeader(other.len())),
    }
}

fn parse_row(line: &str, row: usize) -> Result<(f32, Vec3, Vec3), FormatError> {
    let fields: Vec<f32> = line
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|e| FormatError::BadTextRow { row, reason: format!("{e}") })?;

    match fields.as_slice() {
        [m, x, y, z, vx, vy, vz] => Ok((
            *m,
            Vec3::new(*x, *y, *z),
            Vec3::new(*vx, *vy, *vz),
        )),
        other => Err(FormatError::BadTextRow {
            row,
            reason: format!("expected 7 fields, got {}", other.len()),
        }),
    }
}

/// Parse a text file into a [`Stars`] collection (time 0.0, row-index ids).
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<(Stars, ImportSummary), FormatError> {
    let file = File::open(path.as_ref())?;
    let mut lines = BufReader::new(file).lines();

    let first = lines.next().transpose()?.unwrap_or_default();
    let (declared, shape) = parse_header(&first)?;

    let mut stars = Stars::new();
    stars.time = 0.0;
    for (row, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (mass, pos, vel) = parse_row(&line, row)?;
        stars.add_star(mass, pos, vel);
        // row-index id, overriding add_star's zero fill
        let n = stars.len();
        stars.id[n - 1] = (n - 1) as f32;
    }

    if stars.len() != declared {
        log::warn!(
            "Header declares {} stars but the file holds {}; using the actual count",
            declared,
            stars.len()
        );
    }

    let summary = ImportSummary {
        declared_stars: declared,
        n_stars: stars.len(),
        shape,
    };
    Ok((stars, summary))
}

/// Import a text file and immediately serialize it as a TIPSY snapshot.
pub fn text_to_tipsy<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<ImportSummary, FormatError> {
    let (stars, summary) = read_text(input)?;
    stars.save(output)?;
    Ok(summary)
}
