//! Binary object uploads (profile pictures).

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::remote::client::RemoteClient;

const AVATAR_BUCKET: &str = "avatars";

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

impl RemoteClient {
    /// Upload a profile picture and return its public URL.
    ///
    /// Re-uploading overwrites the previous object at the same path.
    pub async fn upload_avatar(
        &self,
        user_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let path = format!("{AVATAR_BUCKET}/{user_id}/avatar.{}", extension_for(content_type));
        debug!(%user_id, path, "upload avatar");
        let url = format!("{}/storage/v1/object/{path}", self.base_url());
        let req = self
            .authed(self.http().request(Method::POST, url))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes);
        let response = req.send().await?;
        Self::check_status(response).await?;
        Ok(format!(
            "{}/storage/v1/object/public/{path}",
            self.base_url()
        ))
    }
}
