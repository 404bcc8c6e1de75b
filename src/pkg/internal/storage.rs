use std::sync::Arc;

use aws_sdk_s3::{config::Region, Client};
use standard_error::{Interpolate, StandardError};

use crate::{conf::settings, prelude::Result};

/// Builds the object-storage client once at startup; credentials come from
/// the standard AWS environment variables, the endpoint from settings (MinIO
/// in local deployments).
pub async fn s3_client() -> Client {
    let base = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(settings.s3_region.clone()))
        .endpoint_url(&settings.s3_endpoint)
        .load()
        .await;
    let conf = aws_sdk_s3::config::Builder::from(&base)
        .force_path_style(true)
        .build();
    Client::from_conf(conf)
}

#[async_trait::async_trait]
pub trait S3Ops {
    async fn retrieve_object(&self, bucket: &str, key: &str) -> Result<(Vec<u8>, String)>;
}

#[async_trait::async_trait]
impl S3Ops for Arc<Client> {
    async fn retrieve_object(&self, bucket: &str, key: &str) -> Result<(Vec<u8>, String)> {
        let output = self
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StandardError::new("ERR-S3-001").interpolate_err(e.to_string()))?;
        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StandardError::new("ERR-S3-001").interpolate_err(e.to_string()))?
            .into_bytes()
            .to_vec();
        Ok((data, content_type))
    }
}
