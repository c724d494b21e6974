//! The [`Stars`] particle collection — the in-memory form of one snapshot.
//!
//! # Layout
//! Four parallel arrays (mass, position, velocity, id) plus the simulation
//! timestamp. The arrays are always the same length; every mutator grows or
//! rewrites all four as one logical operation.
//!
//! # Ids
//! On load, ids come verbatim from the file. [`Stars::append`] re-bases each
//! incoming id by the receiving collection's pre-append count, so a merge of
//! independently generated snapshots (each 0-based and contiguous) yields
//! globally unique, strictly increasing ids. Ids are kept as `f32` to mirror
//! the legacy on-disk slot they ride in; the wire encoding stays integer
//! (see `record.rs`).
//!
//! # Failure
//! Any short read or bad header is a [`FormatError`] and aborts the
//! operation; a collection is never observable in a half-decoded state.
//! `append` decodes the incoming file completely before touching `self`.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use glam::{Mat3, Vec3};

use crate::error::FormatError;
use crate::header::Header;
use crate::record::StarRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stars {
    pub time: f64,
    pub mass: Vec<f32>,
    pub pos: Vec<Vec3>,
    pub vel: Vec<Vec3>,
    pub id: Vec<f32>,
}

impl Stars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of particles held.
    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    // ── Decode ───────────────────────────────────────────────────────────────

    /// Decode one snapshot from a reader: header, then exactly `n_star`
    /// records. The stream is assumed star-only (the simulator never emits
    /// gas or dark-matter records in the snapshots we consume).
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let header = Header::read(&mut reader)?;
        let n = header.n_star.max(0) as usize;

        let mut stars = Stars {
            time: header.time,
            mass: Vec::with_capacity(n),
            pos: Vec::with_capacity(n),
            vel: Vec::with_capacity(n),
            id: Vec::with_capacity(n),
        };
        for _ in 0..n {
            let rec = StarRecord::read(&mut reader)?;
            stars.push_record(&rec);
        }
        Ok(stars)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let stars = Self::read(BufReader::new(file))?;
        log::info!(
            "Loaded {} ({} stars, time {})",
            path.display(),
            stars.len(),
            stars.time
        );
        Ok(stars)
    }

    // ── Encode ───────────────────────────────────────────────────────────────

    /// Encode as a star-only snapshot. Gas and dark-matter counts are always
    /// written as zero; particles of either kind present in a source file are
    /// never re-emitted.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        Header::new(self.time, self.len() as i32).write(&mut writer)?;
        for i in 0..self.len() {
            StarRecord {
                mass: self.mass[i],
                pos: self.pos[i].to_array(),
                vel: self.vel[i].to_array(),
                id: self.id[i] as i32,
            }
            .write(&mut writer)?;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()
    }

    // ── Growth ───────────────────────────────────────────────────────────────

    /// Append one particle. The id slot is zero-filled, not auto-assigned;
    /// callers that need a real id must set `id[len-1]` themselves.
    pub fn add_star(&mut self, mass: f32, pos: Vec3, vel: Vec3) {
        self.mass.push(mass);
        self.pos.push(pos);
        self.vel.push(vel);
        self.id.push(0.0);
    }

    /// Merge another collection onto this one. All four arrays grow by
    /// `other.len()`; each incoming id is re-based by the pre-merge count.
    pub fn merge(&mut self, other: &Stars) {
        let base = self.len() as f32;
        let extra = other.len();
        self.mass.reserve(extra);
        self.pos.reserve(extra);
        self.vel.reserve(extra);
        self.id.reserve(extra);

        self.mass.extend_from_slice(&other.mass);
        self.pos.extend_from_slice(&other.pos);
        self.vel.extend_from_slice(&other.vel);
        self.id.extend(other.id.iter().map(|id| base + id));
    }

    /// Load a second snapshot file and [`merge`](Stars::merge) it in. The
    /// incoming file is decoded in full before `self` is touched, so a
    /// format error leaves this collection unchanged.
    pub fn append<P: AsRef<Path>>(&mut self, path: P) -> Result<(), FormatError> {
        let incoming = Stars::load(path)?;
        self.merge(&incoming);
        Ok(())
    }

    fn push_record(&mut self, rec: &StarRecord) {
        self.mass.push(rec.mass);
        self.pos.push(Vec3::from_array(rec.pos));
        self.vel.push(Vec3::from_array(rec.vel));
        self.id.push(rec.id as f32);
    }

    // ── Transforms ───────────────────────────────────────────────────────────

    /// Add a constant velocity to every particle.
    pub fn boost(&mut self, dv: Vec3) {
        for v in &mut self.vel {
            *v += dv;
        }
    }

    /// Shift every particle by a constant offset.
    pub fn translate(&mut self, dx: Vec3) {
        for p in &mut self.pos {
            *p += dx;
        }
    }

    /// Rigidly rotate the particle set by Z-X-Z Euler angles (radians),
    /// applied identically to positions and velocities.
    ///
    /// The matrix is built from the negated angles: the standard Z-X-Z
    /// matrix rotates the frame, and negating first turns that into an
    /// active rotation of the particles.
    pub fn rotate_euler(&mut self, phi: f32, theta: f32, psi: f32) {
        let m = euler_zxz(-phi, -theta, -psi);
        for p in &mut self.pos {
            *p = m * *p;
        }
        for v in &mut self.vel {
            *v = m * *v;
        }
    }

    /// Degree variant of [`rotate_euler`](Stars::rotate_euler).
    pub fn rotate_euler_degrees(&mut self, phi: f32, theta: f32, psi: f32) {
        self.rotate_euler(phi.to_radians(), theta.to_radians(), psi.to_radians());
    }
}

/// Standard Z-X-Z Euler rotation matrix for angles (phi, theta, psi).
fn euler_zxz(phi: f32, theta: f32, psi: f32) -> Mat3 {
    let (sp, cp) = phi.sin_cos();
    let (st, ct) = theta.sin_cos();
    let (ss, cs) = psi.sin_cos();

    // Row-major entries; glam matrices are column-major, so columns are
    // assembled from the rows' transpose.
    let a11 = cs * cp - ct * sp * ss;
    let a12 = cs * sp + ct * cp * ss;
    let a13 = ss * st;
    let a21 = -ss * cp - ct * sp * cs;
    let a22 = -ss * sp + ct * cp * cs;
    let a23 = cs * st;
    let a31 = st * sp;
    let a32 = -st * cp;
    let a33 = ct;

    Mat3::from_cols(
        Vec3::new(a11, a21, a31),
        Vec3::new(a12, a22, a32),
        Vec3::new(a13, a23, a33),
    )
}
