use crate::{
    app_lib::{AppError, Gateway, transport::{Transport, UploadPayload}},
    features::face::types::VerificationResponse,
};
use tracing::{debug, warn};

const VERIFY_PATH: &str = "/api/v1/face/verify";

/// Uploads a captured frame for server-side recognition. Failures are logged
/// and returned to the caller unchanged.
pub async fn verify_face<T: Transport>(
    gateway: &Gateway<T>,
    upload: UploadPayload,
) -> Result<VerificationResponse, AppError> {
    debug!(bytes = upload.bytes.len(), "submitting face verification");
    let response: VerificationResponse = gateway
        .post_multipart(VERIFY_PATH, upload)
        .await
        .inspect_err(|err| warn!("face verification failed: {err}"))?;
    debug!(recognized = response.recognized, "face verification finished");
    Ok(response)
}
