//! Shared pieces of the `photoguard` binary: tracing setup, request parsing
//! and the offline blur helper.

use std::future::Future;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context};
use photoguard_core::{
    ErrorMetadata, PipelineError, RedactionRequest, RedactionResponse, RedactionSettings,
};
use photoguard_processing::{decode_image, encode_jpeg, GaussianRedactor, Region};
use serde::Serialize;

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so stdout carries only the response JSON. `LOG_FORMAT=json`
/// switches to structured output; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("photoguard=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Parse an invocation payload (`{"rawFileId": ..., "photoRecordId": ...}`).
pub fn parse_payload(payload: &str) -> anyhow::Result<RedactionRequest> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(RedactionRequest::default());
    }
    serde_json::from_str(trimmed).context("Invalid request payload")
}

pub fn read_payload(mut reader: impl Read) -> anyhow::Result<RedactionRequest> {
    let mut payload = String::new();
    reader
        .read_to_string(&mut payload)
        .context("Failed to read request payload")?;
    parse_payload(&payload)
}

/// Response for a failure outside the pipeline (bad payload, setup error).
pub fn unexpected_response(err: &anyhow::Error) -> RedactionResponse {
    RedactionResponse::failure(&PipelineError::Unexpected(format!("{:#}", err)))
}

/// Answer one `redact` invocation.
///
/// The request is validated before `run` is called, so a payload without the
/// required ids never reaches configuration, storage or the model.
pub async fn respond<F, Fut>(
    request: anyhow::Result<RedactionRequest>,
    run: F,
) -> RedactionResponse
where
    F: FnOnce(RedactionRequest) -> Fut,
    Fut: Future<Output = anyhow::Result<RedactionResponse>>,
{
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Unreadable redaction payload");
            return unexpected_response(&e);
        }
    };

    if let Err(err) = request.clone().validate() {
        tracing::debug!(
            error = %err,
            error_code = err.error_code(),
            "Redaction request rejected"
        );
        return RedactionResponse::failure(&err);
    }

    match run(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Redaction invocation failed");
            unexpected_response(&e)
        }
    }
}

/// Parse `x,y,width,height`.
pub fn parse_region(value: &str) -> Result<Region, String> {
    let parts: Vec<u32> = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid region '{}': {}", value, e))?;

    match parts.as_slice() {
        [x, y, width, height] => Ok(Region::new(*x, *y, *width, *height)),
        _ => Err(format!(
            "invalid region '{}': expected x,y,width,height",
            value
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&Region> for RegionReport {
    fn from(region: &Region) -> Self {
        Self {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub width: u32,
    pub height: u32,
    pub faces_detected: usize,
    pub regions: Vec<RegionReport>,
}

impl DetectionReport {
    pub fn new(width: u32, height: u32, regions: &[Region]) -> Self {
        Self {
            width,
            height,
            faces_detected: regions.len(),
            regions: regions.iter().map(RegionReport::from).collect(),
        }
    }
}

/// Blur `regions` of the image at `input` and write JPEG to `output`.
///
/// Regions are clipped to the image; ones entirely outside are ignored.
pub fn blur_file(
    input: &Path,
    output: &Path,
    regions: &[Region],
    settings: &RedactionSettings,
) -> anyhow::Result<DetectionReport> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let mut image = decode_image(&data).map_err(|e| anyhow!("{}: {}", input.display(), e))?;
    let (width, height) = image.dimensions();

    let clipped: Vec<Region> = regions
        .iter()
        .filter_map(|r| {
            Region::clamped(r.x as i64, r.y as i64, r.width, r.height, width, height)
        })
        .collect();

    GaussianRedactor::from(settings).redact(&mut image, &clipped);
    let encoded = encode_jpeg(&image, settings.jpeg_quality)?;

    std::fs::write(output, encoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(DetectionReport::new(width, height, &clipped))
}
