//! Video-encoding collaborator wrapper.
//!
//! Figure rendering itself lives outside this crate; what belongs here is
//! the fixed ffmpeg argument grammar that turns a numbered PNG sequence
//! (`prefix0.png`, `prefix1.png`, …) into one video file, mirroring the
//! launcher's status-value error model.

use std::process::Command;

use crate::launcher::RunStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoOptions {
    /// Frames per second.
    pub frame_rate: u32,
    /// Target bit rate, ffmpeg syntax ("8000k").
    pub bit_rate: String,
    /// Video codec name; may require extra system libraries.
    pub codec: String,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            frame_rate: 20,
            bit_rate: "8000k".to_string(),
            codec: "libx264".to_string(),
        }
    }
}

/// The full ffmpeg argv, program first.
pub fn ffmpeg_args(png_prefix: &str, output: &str, opts: &VideoOptions) -> Vec<String> {
    vec![
        "ffmpeg".into(),
        "-r".into(),
        opts.frame_rate.to_string(),
        "-i".into(),
        format!("{png_prefix}%d.png"),
        "-vcodec".into(),
        opts.codec.clone(),
        "-b".into(),
        opts.bit_rate.clone(),
        output.into(),
    ]
}

/// Encode `prefix{0,1,2,…}.png` into `output`, blocking until ffmpeg exits.
pub fn encode_video(
    png_prefix: &str,
    output: &str,
    opts: &VideoOptions,
) -> std::io::Result<RunStatus> {
    let argv = ffmpeg_args(png_prefix, output, opts);
    log::info!("Encoding: {}", argv.join(" "));
    let status = Command::new(&argv[0]).args(&argv[1..]).status()?;
    Ok(if status.success() {
        RunStatus::Done
    } else {
        RunStatus::Error
    })
}
