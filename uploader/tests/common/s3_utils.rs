use aws_sdk_s3::Client as S3Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

/// Upload data using a presigned PUT URL
pub async fn upload_to_presigned_url(
    presigned_url: &str,
    data: &[u8],
) -> Result<reqwest::Response, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from(data.len()));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );

    reqwest::Client::new()
        .put(presigned_url)
        .headers(headers)
        .body(data.to_vec())
        .send()
        .await
}

/// Download data using a presigned GET URL
pub async fn download_from_presigned_url(
    presigned_url: &str,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let response = reqwest::get(presigned_url).await?;

    if response.status().is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        Err(format!(
            "Failed to download from {}: HTTP {}",
            presigned_url,
            response.status()
        )
        .into())
    }
}

/// Check if a bucket exists
pub async fn bucket_exists(s3_client: &S3Client, bucket: &str) -> bool {
    s3_client.head_bucket().bucket(bucket).send().await.is_ok()
}
