use clap::{Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;
use tipsy::convert::text_to_tipsy;
use tipsy::launcher::RunConfig;
use tipsy::render::{encode_video, VideoOptions};
use tipsy::snapshots::{ErrorPolicy, SnapshotSet};
use tipsy::{Header, RunStatus, Stars};

#[derive(Parser)]
#[command(name = "tipsy", about = "TIPSY N-body snapshot toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header of a snapshot file
    Info {
        input: PathBuf,
    },
    /// Convert a plain-text nbody file to a TIPSY snapshot
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// Merge snapshots into one collection, re-basing particle ids
    Merge {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
    /// Apply rigid transforms to a snapshot
    Transform {
        input: PathBuf,
        output: PathBuf,
        /// Velocity offset added to every particle
        #[arg(long, num_args = 3, value_names = ["VX", "VY", "VZ"], allow_negative_numbers = true)]
        boost: Option<Vec<f32>>,
        /// Position offset added to every particle
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        translate: Option<Vec<f32>>,
        /// Z-X-Z Euler angles in degrees
        #[arg(long, num_args = 3, value_names = ["PHI", "THETA", "PSI"], allow_negative_numbers = true)]
        rotate: Option<Vec<f32>>,
    },
    /// List a snapshot family in numeric-suffix order
    List {
        prefix: PathBuf,
        /// Keep going past unreadable files instead of stopping at the first
        #[arg(long)]
        skip_bad: bool,
    },
    /// Launch the external simulator from a JSON run config
    Run {
        config: PathBuf,
    },
    /// Encode a numbered PNG sequence into a video via ffmpeg
    Video {
        /// Prefix of the "{prefix}{N}.png" frames
        png_prefix: String,
        output: String,
        #[arg(long, default_value = "20")]
        frame_rate: u32,
        #[arg(long, default_value = "8000k")]
        bit_rate: String,
        #[arg(long, default_value = "libx264")]
        codec: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match Cli::parse().command {

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let file = std::fs::File::open(&input)?;
            let hdr = Header::read(std::io::BufReader::new(file))?;
            println!("── TIPSY snapshot ───────────────────────────────────────");
            println!("  Path    {}", input.display());
            println!("  Time    {}", hdr.time);
            println!("  Total   {}", hdr.n_total);
            println!("  Stars   {}", hdr.n_star);
            println!("  Gas     {}", hdr.n_gas);
            println!("  Dark    {}", hdr.n_dark);
        }

        // ── Convert ──────────────────────────────────────────────────────────
        Commands::Convert { input, output } => {
            let summary = text_to_tipsy(&input, &output)?;
            println!(
                "Converted {} star(s) ({:?} header) → {}",
                summary.n_stars,
                summary.shape,
                output.display()
            );
        }

        // ── Merge ────────────────────────────────────────────────────────────
        Commands::Merge { output, input } => {
            let (first, rest) = input.split_first().expect("clap enforces at least one input");
            let mut stars = Stars::load(first)?;
            for path in rest {
                stars.append(path)?;
            }
            stars.save(&output)?;
            println!(
                "Merged {} file(s), {} star(s) → {}",
                input.len(),
                stars.len(),
                output.display()
            );
        }

        // ── Transform ────────────────────────────────────────────────────────
        Commands::Transform { input, output, boost, translate, rotate } => {
            let mut stars = Stars::load(&input)?;
            if let Some(dv) = boost {
                stars.boost(Vec3::new(dv[0], dv[1], dv[2]));
            }
            if let Some(dx) = translate {
                stars.translate(Vec3::new(dx[0], dx[1], dx[2]));
            }
            if let Some(angles) = rotate {
                stars.rotate_euler_degrees(angles[0], angles[1], angles[2]);
            }
            stars.save(&output)?;
            println!("Transformed {} star(s) → {}", stars.len(), output.display());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { prefix, skip_bad } => {
            let set = SnapshotSet::discover(&prefix)?;
            println!("{} snapshot(s) for prefix {}", set.len(), prefix.display());
            let policy = if skip_bad {
                ErrorPolicy::SkipAndWarn
            } else {
                ErrorPolicy::FailFast
            };
            set.visit(policy, |index, stars| {
                println!("  [{index}] time {:<12} stars {}", stars.time, stars.len());
            })?;
        }

        // ── Run ──────────────────────────────────────────────────────────────
        Commands::Run { config } => {
            let cfg: RunConfig = serde_json::from_reader(std::fs::File::open(&config)?)?;
            match cfg.run()? {
                RunStatus::Done => println!("Done"),
                RunStatus::Error => {
                    eprintln!("Simulator exited with an error");
                    std::process::exit(1);
                }
            }
        }

        // ── Video ────────────────────────────────────────────────────────────
        Commands::Video { png_prefix, output, frame_rate, bit_rate, codec } => {
            let opts = VideoOptions { frame_rate, bit_rate, codec };
            match encode_video(&png_prefix, &output, &opts)? {
                RunStatus::Done => println!("Saved: {output}"),
                RunStatus::Error => {
                    eprintln!("ffmpeg exited with an error");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
