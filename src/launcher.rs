//! External simulator (Bonsai) launch wrapper.
//!
//! Builds the fixed argument grammar the GPU simulator expects and runs it
//! as a child process. When `mpi_n > 0` the invocation is wrapped in
//! `mpirun` with an aggregated per-rank output file instead of interleaved
//! stdout.
//!
//! A non-zero exit is a [`RunStatus::Error`] status value, not an error —
//! retry or abort is the caller's call. Only failure to spawn at all (bad
//! binary path) surfaces as `io::Error`.
//!
//! The default binary path is applied here, at the call site, when the
//! config leaves `binary` unset; there is no process-wide mutable default.

use std::path::PathBuf;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Relative location of the simulator binary when the two checkouts sit
/// next to each other.
pub const DEFAULT_BONSAI_BIN: &str = "../Bonsai/runtime/bonsai2_slowdust";

/// Initial-condition source for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum Model {
    /// Generate a Plummer sphere of `n` particles.
    Plummer { n: u64 },
    /// Generate a uniform sphere of `n` particles.
    Sphere { n: u64 },
    /// Start from an existing TIPSY snapshot.
    Infile { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub model: Model,
    /// Prefix for the numbered snapshot files the simulator writes.
    pub snap_prefix: String,
    #[serde(default = "default_t_max")]
    pub t_max: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Simulation-time spacing between snapshots.
    #[serde(default = "default_snap_iter")]
    pub snap_iter: f64,
    /// Softening length; omitted from the argv when unset.
    #[serde(default)]
    pub eps: Option<f64>,
    /// Simulator binary; [`DEFAULT_BONSAI_BIN`] when unset.
    #[serde(default)]
    pub binary: Option<PathBuf>,
    /// MPI rank count; 0 means single-GPU mode, no mpirun wrapper.
    #[serde(default)]
    pub mpi_n: u32,
    #[serde(default = "default_mpi_log")]
    pub mpi_log: String,
}

fn default_t_max() -> f64 {
    2.0
}
fn default_dt() -> f64 {
    0.0625
}
fn default_snap_iter() -> f64 {
    1.0
}
fn default_mpi_log() -> String {
    "mpiout.log".to_string()
}

/// Outcome of a collaborator process, derived from its exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Done,
    Error,
}

impl RunConfig {
    /// The full argv, program first. The MPI form wraps the simulator
    /// invocation: `mpirun -n N --output-filename LOG <bin> <args…>`.
    pub fn build_args(&self) -> Vec<String> {
        let binary = self
            .binary
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BONSAI_BIN));

        let mut args: Vec<String> = Vec::new();
        if self.mpi_n > 0 {
            args.extend([
                "mpirun".into(),
                "-n".into(),
                self.mpi_n.to_string(),
                "--output-filename".into(),
                self.mpi_log.clone(),
            ]);
        }
        args.push(binary.to_string_lossy().into_owned());

        match &self.model {
            Model::Plummer { n } => args.extend(["--plummer".into(), n.to_string()]),
            Model::Sphere { n } => args.extend(["--sphere".into(), n.to_string()]),
            Model::Infile { path } => {
                args.extend(["--infile".into(), path.to_string_lossy().into_owned()])
            }
        }

        args.extend([
            "--snapname".into(),
            self.snap_prefix.clone(),
            "--snapiter".into(),
            self.snap_iter.to_string(),
            "-T".into(),
            self.t_max.to_string(),
            "-dt".into(),
            self.dt.to_string(),
        ]);
        if let Some(eps) = self.eps {
            args.extend(["-e".into(), eps.to_string()]);
        }
        args
    }

    /// Launch the simulator and block until it exits.
    pub fn run(&self) -> std::io::Result<RunStatus> {
        let argv = self.build_args();
        log::info!("Launching: {}", argv.join(" "));
        let status = Command::new(&argv[0]).args(&argv[1..]).status()?;
        Ok(if status.success() {
            RunStatus::Done
        } else {
            RunStatus::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(model: Model) -> RunConfig {
        RunConfig {
            model,
            snap_prefix: "out/snap_".to_string(),
            t_max: 2.0,
            dt: 0.0625,
            snap_iter: 1.0,
            eps: None,
            binary: None,
            mpi_n: 0,
            mpi_log: "mpiout.log".to_string(),
        }
    }

    #[test]
    fn plummer_single_gpu_argv() {
        let cfg = base_config(Model::Plummer { n: 1024 });
        assert_eq!(
            cfg.build_args(),
            [
                DEFAULT_BONSAI_BIN,
                "--plummer",
                "1024",
                "--snapname",
                "out/snap_",
                "--snapiter",
                "1",
                "-T",
                "2",
                "-dt",
                "0.0625",
            ]
        );
    }

    #[test]
    fn mpi_wraps_the_invocation() {
        let mut cfg = base_config(Model::Sphere { n: 512 });
        cfg.mpi_n = 4;
        let argv = cfg.build_args();
        assert_eq!(
            &argv[..5],
            ["mpirun", "-n", "4", "--output-filename", "mpiout.log"]
        );
        assert_eq!(argv[5], DEFAULT_BONSAI_BIN);
        assert_eq!(&argv[6..8], ["--sphere", "512"]);
    }

    #[test]
    fn infile_eps_and_explicit_binary() {
        let mut cfg = base_config(Model::Infile { path: PathBuf::from("ic.tipsy") });
        cfg.binary = Some(PathBuf::from("/opt/bonsai2"));
        cfg.eps = Some(0.05);
        let argv = cfg.build_args();
        assert_eq!(argv[0], "/opt/bonsai2");
        assert_eq!(&argv[1..3], ["--infile", "ic.tipsy"]);
        assert_eq!(&argv[argv.len() - 2..], ["-e", "0.05"]);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: RunConfig = serde_json::from_str(
            r#"{ "model": "plummer", "n": 2048, "snap_prefix": "snap_" }"#,
        )
        .unwrap();
        assert_eq!(cfg.model, Model::Plummer { n: 2048 });
        assert_eq!(cfg.t_max, 2.0);
        assert_eq!(cfg.dt, 0.0625);
        assert_eq!(cfg.snap_iter, 1.0);
        assert_eq!(cfg.mpi_n, 0);
        assert_eq!(cfg.mpi_log, "mpiout.log");
        assert!(cfg.binary.is_none());
    }
}
