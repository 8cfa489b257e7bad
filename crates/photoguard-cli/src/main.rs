//! Photoguard CLI: runs one redaction invocation, or redacts local files.
//!
//! `redact` reads configuration from the environment (a `.env` file is honoured), takes the
//! job payload from flags, `--payload` or stdin, and prints the response JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use photoguard_cli::{
    blur_file, init_tracing, parse_payload, parse_region, read_payload, respond, DetectionReport,
};
use photoguard_core::constants::DEFAULT_FACE_MODEL_PATH;
use photoguard_core::{
    Config, DetectionSettings, RedactionRequest, RedactionResponse, RedactionSettings,
};
use photoguard_processing::{
    decode_image, to_grayscale, DetectionParams, FaceDetector, Region, RustfaceDetector,
};
use photoguard_worker::build_pipeline;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "photoguard", about = "Face redaction for stored photos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact one stored photo and update its processing record
    Redact {
        #[arg(long)]
        raw_file_id: Option<String>,
        #[arg(long)]
        photo_record_id: Option<String>,
        #[arg(long)]
        stall_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        /// Full JSON payload; stdin is read when neither this nor any id flag is given
        #[arg(long, conflicts_with_all = ["raw_file_id", "photo_record_id", "stall_id", "user_id"])]
        payload: Option<String>,
    },
    /// Print the faces found in a local image
    Detect {
        image: PathBuf,
        #[command(flatten)]
        detection: DetectionArgs,
    },
    /// Blur faces in a local image and write the result as JPEG
    Blur {
        input: PathBuf,
        output: PathBuf,
        /// Blur this region (x,y,width,height) instead of detecting; repeatable
        #[arg(long = "region", value_parser = parse_region)]
        regions: Vec<Region>,
        #[command(flatten)]
        detection: DetectionArgs,
        #[arg(long, default_value = "95")]
        quality: u8,
    },
}

#[derive(clap::Args)]
struct DetectionArgs {
    /// SeetaFace model file
    #[arg(long, default_value = DEFAULT_FACE_MODEL_PATH)]
    model: PathBuf,
    #[arg(long, default_value = "30")]
    min_face_size: u32,
    #[arg(long, default_value = "2.0")]
    score_threshold: f64,
}

impl DetectionArgs {
    fn detector(&self) -> anyhow::Result<RustfaceDetector> {
        let settings = DetectionSettings {
            model_path: self.model.to_string_lossy().into_owned(),
            min_face_size: self.min_face_size,
            score_threshold: self.score_threshold,
            ..DetectionSettings::default()
        };
        RustfaceDetector::from_path(&self.model, DetectionParams::from(&settings))
            .with_context(|| format!("Failed to load face model from {}", self.model.display()))
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn redact(request: RedactionRequest) -> anyhow::Result<RedactionResponse> {
    let config = Config::from_env().context("Invalid configuration")?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let pipeline = build_pipeline(Arc::new(config)).await?;
    Ok(pipeline.handle(request).await)
}

fn detect_regions(path: &Path, detector: &dyn FaceDetector) -> anyhow::Result<DetectionReport> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let image = decode_image(&data)?;
    let (width, height) = image.dimensions();
    let regions = detector.detect(&to_grayscale(&image));
    Ok(DetectionReport::new(width, height, &regions))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Redact {
            raw_file_id,
            photo_record_id,
            stall_id,
            user_id,
            payload,
        } => {
            let from_flags = raw_file_id.is_some()
                || photo_record_id.is_some()
                || stall_id.is_some()
                || user_id.is_some();

            let request = match payload {
                Some(payload) => parse_payload(&payload),
                None if from_flags => Ok(RedactionRequest {
                    raw_file_id,
                    stall_id,
                    user_id,
                    photo_record_id,
                }),
                None => read_payload(std::io::stdin().lock()),
            };

            let response = respond(request, redact).await;
            print_json(&response)?;
        }
        Commands::Detect { image, detection } => {
            let detector = detection.detector()?;
            let report = detect_regions(&image, &detector)?;
            print_json(&report)?;
        }
        Commands::Blur {
            input,
            output,
            regions,
            detection,
            quality,
        } => {
            let regions = if regions.is_empty() {
                let detector = detection.detector()?;
                let data = std::fs::read(&input)
                    .with_context(|| format!("Failed to read {}", input.display()))?;
                let image = decode_image(&data)?;
                detector.detect(&to_grayscale(&image))
            } else {
                regions
            };

            let settings = RedactionSettings {
                jpeg_quality: quality,
                ..RedactionSettings::default()
            };
            let report = blur_file(&input, &output, &regions, &settings)?;
            print_json(&report)?;
        }
    }

    Ok(())
}
