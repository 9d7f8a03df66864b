use crate::error::Result;
use crate::evaluation::{EvaluationRequest, ImagePayload};
use anyhow::{Context, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Read an [`EvaluationRequest`] from a JSON file.
pub async fn load_request(path: &Path) -> Result<EvaluationRequest> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    let request = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse request file {}", path.display()))?;
    Ok(request)
}

/// Read an image file and encode it for vision scoring. The MIME type comes
/// from the file's magic bytes, not its extension.
pub async fn load_image(path: &Path) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(encode_image(&bytes).with_context(|| format!("Unsupported image {}", path.display()))?)
}

pub fn encode_image(bytes: &[u8]) -> anyhow::Result<ImagePayload> {
    let Some(kind) = infer::get(bytes) else {
        bail!("could not detect file type");
    };
    if kind.matcher_type() != infer::MatcherType::Image {
        bail!("expected an image, found {}", kind.mime_type());
    }
    Ok(ImagePayload {
        mime_type: kind.mime_type().to_string(),
        data: STANDARD.encode(bytes),
    })
}
