//! Object store client for S3-compatible storage.
//!
//! Thin wrapper over the AWS SDK configured for path-style addressing
//! against a MinIO/S3 endpoint. Uploads and downloads are plain
//! write-by-key and read-by-key behind the [`ObjectStorage`] trait; bucket
//! verification happens once at startup via [`ObjectStore::bootstrap`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info, warn};

use crate::config::ObjectStoreConfig;
use crate::error::StoreError;

/// Write-by-key and read-by-key against the backing store
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object under the given key, overwriting any existing object
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Read an object's full contents by key
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError>;
}

/// S3 client for the configured bucket
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

async fn build_client(config: &ObjectStoreConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        config.access_key.clone(),
        config.secret_key.clone(),
        None,
        None,
        "depot-static",
    );

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(&config.endpoint)
        .credentials_provider(credentials)
        .load()
        .await;

    // MinIO requires path-style addressing
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

impl ObjectStore {
    /// Create a client without verifying the bucket
    pub async fn connect(config: &ObjectStoreConfig) -> Self {
        Self {
            client: build_client(config).await,
            bucket: config.bucket.clone(),
        }
    }

    /// Startup bootstrap: verify the target bucket exists, creating it on a
    /// not-found response, retrying transient connection failures a bounded
    /// number of times with a fixed delay before giving up.
    pub async fn bootstrap(config: &ObjectStoreConfig) -> Result<Self, StoreError> {
        let client = build_client(config).await;
        let bucket = config.bucket.clone();
        let retries = config.bootstrap_retries.max(1);
        let delay = config.bootstrap_delay();

        info!(endpoint = %config.endpoint, bucket = %bucket, "Connecting to object store");

        let mut last_error = String::new();
        for attempt in 1..=retries {
            match client.head_bucket().bucket(&bucket).send().await {
                Ok(_) => {
                    info!(bucket = %bucket, "Object store connected, bucket found");
                    return Ok(Self { client, bucket });
                }
                Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => {
                    info!(bucket = %bucket, "Bucket not found, creating it");
                    match client.create_bucket().bucket(&bucket).send().await {
                        Ok(_) => {
                            info!(bucket = %bucket, "Bucket created, connection successful");
                            return Ok(Self { client, bucket });
                        }
                        Err(create_err) => {
                            last_error = DisplayErrorContext(&create_err).to_string();
                            warn!(
                                attempt,
                                retries,
                                error = %last_error,
                                "Bucket creation failed, retrying"
                            );
                        }
                    }
                }
                Err(e) => {
                    last_error = DisplayErrorContext(&e).to_string();
                    warn!(
                        attempt,
                        retries,
                        error = %last_error,
                        "Object store not reachable, retrying"
                    );
                }
            }

            if attempt < retries {
                tokio::time::sleep(delay).await;
            }
        }

        Err(StoreError::Bucket {
            bucket,
            message: last_error,
        })
    }
}

#[async_trait]
impl ObjectStorage for ObjectStore {
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        debug!(bucket = %self.bucket, key = %key, size = bytes.len(), "Uploading object");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StoreError::Put {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        debug!(bucket = %self.bucket, key = %key, "Downloading object");

        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Get {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let bytes = result
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Get {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .into_bytes();

        Ok(bytes.to_vec())
    }
}

/// In-memory store backing the tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[async_trait]
impl ObjectStorage for MemoryObjectStore {
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::Get {
                key: key.to_string(),
                message: "key does not exist".to_string(),
            })
    }
}
