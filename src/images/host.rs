use bytes::Bytes;
use reqwest::{Client, StatusCode, header::AUTHORIZATION, multipart};
use serde::Deserialize;
use tracing::instrument;

use crate::config::Config;
use crate::upstream::{UpstreamError, error_details};

const SERVICE: &str = "imgur";
const UPLOAD_FILE_NAME: &str = "dalle.jpg";
const UPLOAD_MIME: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    link: String,
}

/// Anonymous uploads to the image host, authenticated by the application's
/// client identifier only.
#[derive(Clone)]
pub struct ImageHost {
    http: Client,
    base_url: String,
    client_id: String,
}

impl ImageHost {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.endpoints().imgur.clone(),
            client_id: config.credentials().imgur_client_id.clone(),
        }
    }

    /// Download `url` and return its bytes. An empty body is an error.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> Result<Bytes, UpstreamError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error("image-source", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: "image-source",
                status,
                details: serde_json::Value::Null,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error("image-source", e))?;
        if bytes.is_empty() {
            return Err(UpstreamError::malformed("image-source", "empty image body"));
        }
        Ok(bytes)
    }

    /// Upload an image in one multipart request and return its public link.
    #[instrument(skip_all, fields(size = image.len()))]
    pub async fn upload(&self, image: Bytes) -> Result<String, UpstreamError> {
        let part = multipart::Part::bytes(image.to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME)
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(format!("{}/3/image", self.base_url))
            .header(AUTHORIZATION, format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error(SERVICE, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                details: error_details(&text),
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))?;
        Ok(body.data.link)
    }

    /// Lightweight existence check on a hosted image.
    pub async fn is_available(&self, url: &str) -> bool {
        match self.http.head(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }
}
