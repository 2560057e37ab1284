use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::Arc;

/// StorageService
///
/// Defines the abstract contract for all interactions with the object storage
/// layer. This trait allows swapping the concrete implementation, from the real
/// S3 client (S3StorageClient) in production to the in-memory Mock
/// (MockStorageService) during testing, without affecting the calling handlers.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used primarily in the `Env::Local`
    /// setup to automatically provision the required bucket in MinIO. No-op in
    /// production.
    async fn ensure_bucket_exists(&self);

    /// Stores a blob under the given object key with the given content type and
    /// returns its publicly reachable URL.
    ///
    /// # Arguments
    /// * `key`: the final object key (folder + generated filename) in the bucket.
    /// * `bytes`: the decoded file contents.
    /// * `content_type`: the MIME type to serve the object with.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, String>;
}

/// S3StorageClient
///
/// The concrete implementation using the AWS SDK for S3. Due to S3 compatibility,
/// this client transparently handles connections to a Dockerized MinIO instance
/// locally and any S3-compatible gateway in production.
///
/// The `force_path_style(true)` is critical for MinIO compatibility.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    endpoint: String,
    bucket_name: String,
}

impl S3StorageClient {
    /// new
    ///
    /// Constructs the S3 client using credentials and configuration from AppConfig.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            // CRITICAL: path-style addressing (http://endpoint/bucket/key) is
            // required for MinIO and most S3-compatible gateways.
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// ensure_bucket_exists
    ///
    /// Calls the S3 CreateBucket API. S3 APIs are idempotent, so this only creates
    /// the bucket if it does not already exist. Safe to call at startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, String> {
        let key = sanitize_key(key);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            // Uploaded media is public site content by definition.
            .acl(s3::types::ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        Ok(format!("{}/{}/{}", self.endpoint, self.bucket_name, key))
    }
}

/// object_key
///
/// Builds a unique object key for an upload: the logical folder, a date prefix,
/// a random suffix, and the original file extension. The date prefix keeps the
/// bucket browsable; the random suffix prevents collisions and guessing.
pub fn object_key(folder: &str, filename: &str) -> String {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");

    let date = chrono::Utc::now().format("%Y%m%d");
    let suffix: String = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();

    sanitize_key(&format!("{}/{}_{}.{}", folder, date, suffix, extension))
}

/// sanitize_key
///
/// Utility function to prevent path traversal attacks by removing directory
/// navigation components (e.g., `..`, `.`) from a user-provided key segment.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MockStorageService
///
/// A mock implementation of `StorageService` used exclusively for unit and
/// integration testing. This allows testing the upload handler logic without a
/// network connection to S3, isolating the test boundary.
#[derive(Clone)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn put_object(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        let sanitized_key = sanitize_key(key);

        // Deterministic, local-style URL for mock assertions.
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}",
            sanitized_key
        ))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service access across the application state.
pub type StorageState = Arc<dyn StorageService>;
