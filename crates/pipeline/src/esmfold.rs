//! ESMFold fast path: synchronous HTTP folding, no queue.

use reqwest::Client;

use crate::error::PipelineError;

/// Client for the ESM atlas fold endpoint.
///
/// The service takes the raw sequence as the request body and answers
/// with the PDB text of the folded structure.
#[derive(Debug, Clone)]
pub struct EsmFoldClient {
    http: Client,
    endpoint: String,
}

impl EsmFoldClient {
    pub fn new(endpoint: &str) -> Self {
        // The public atlas endpoint serves a certificate chain some
        // roots reject, so verification is skipped. Built once at
        // startup; a builder failure here must not degrade to a
        // verifying default client.
        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to build ESMFold HTTP client");
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }

    /// Fold a sequence and return the PDB model bytes.
    pub async fn predict(&self, sequence: &str) -> Result<Vec<u8>, PipelineError> {
        let response = self
            .http
            .post(&self.endpoint)
            .body(sequence.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PipelineError::UpstreamStatus(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
