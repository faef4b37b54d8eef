//! Binary and icon endpoints of a producer account.

use std::path::Path;

use reqwest::Method;
use tracing::debug;

use crate::client::ProducerEndpoint;
use crate::error::{Error, OpContext};
use crate::icon::load_icon;
use crate::types::{ExtensionBinary, ExtensionCreate, ExtensionUpdate};
use crate::upload::{file_form, read_upload};

impl ProducerEndpoint<'_> {
    /// Lists all binaries uploaded for an extension.
    pub async fn get_extension_binaries(
        &self,
        extension_id: i32,
    ) -> Result<Vec<ExtensionBinary>, Error> {
        self.client
            .get_json(&self.binaries_path(extension_id))
            .await
            .op("get_extension_binaries")
    }

    /// Replaces the metadata of the binary identified by `update.id`.
    pub async fn update_extension_binary_info(
        &self,
        extension_id: i32,
        update: &ExtensionUpdate,
    ) -> Result<(), Error> {
        let path = format!("{}/{}", self.binaries_path(extension_id), update.id);
        self.client
            .send_json(Method::PUT, &path, update)
            .await
            .op("update_extension_binary_info")?;
        Ok(())
    }

    /// Creates a new binary record and returns it with its server-side id.
    pub async fn create_extension_binary(
        &self,
        extension_id: i32,
        create: &ExtensionCreate,
    ) -> Result<ExtensionBinary, Error> {
        const OP: &str = "create_extension_binary";

        let body = self
            .client
            .send_json(Method::POST, &self.binaries_path(extension_id), create)
            .await
            .op(OP)?;
        serde_json::from_slice(&body).op(OP)
    }

    /// Uploads the build artifact for an existing binary.
    pub async fn update_extension_binary_file(
        &self,
        extension_id: i32,
        binary_id: i32,
        zip_path: &Path,
    ) -> Result<(), Error> {
        const OP: &str = "update_extension_binary_file";

        let (file_name, data) = read_upload(zip_path).await.op(OP)?;
        debug!(extension_id, binary_id, bytes = data.len(), %file_name, "uploading binary file");

        let form = file_form(file_name, data).op(OP)?;
        let path = format!("{}/{binary_id}/file", self.binaries_path(extension_id));
        let req = self.client.request(Method::POST, &path).multipart(form);
        self.client.send(req).await.op(OP)?;
        Ok(())
    }

    /// Uploads the extension's store icon, rescaled to 256x256 if needed.
    ///
    /// Nothing is sent if the icon cannot be read or decoded.
    pub async fn update_extension_icon(
        &self,
        extension_id: i32,
        icon_path: &Path,
    ) -> Result<(), Error> {
        const OP: &str = "update_extension_icon";

        let (file_name, icon) = load_icon(icon_path).await.op(OP)?;
        let form = file_form(file_name, icon.data).op(OP)?;
        let req = self
            .client
            .request(Method::POST, &format!("/plugins/{extension_id}/icon"))
            .multipart(form);
        self.client.send(req).await.op(OP)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::client::Client;
    use crate::error::ErrorKind;
    use crate::testutil::mock_server;
    use crate::types::ChangelogEntry;

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn list_binaries() {
        let (url, mut requests, handle) = mock_server(vec![(
            200,
            r#"[{"id":1,"version":"1.0.0"},{"id":2,"version":"1.1.0"}]"#.into(),
        )])
        .await;
        let client = Client::new("t").unwrap().with_base_url(url);

        let binaries = client.producer(5).get_extension_binaries(42).await.unwrap();
        assert_eq!(binaries.len(), 2);
        assert_eq!(binaries[1].version, "1.1.0");

        let req = requests.recv().await.unwrap();
        assert_eq!(req.path, "/producers/5/plugins/42/binaries");

        handle.abort();
    }

    #[tokio::test]
    async fn create_binary_posts_payload() {
        let (url, mut requests, handle) =
            mock_server(vec![(200, r#"{"id":99,"version":"2.0.0"}"#.into())]).await;
        let client = Client::new("t").unwrap().with_base_url(url);

        let create = ExtensionCreate {
            software_versions: vec!["6.5.0.0".into(), "6.5.1.0".into()],
            changelogs: vec![ChangelogEntry {
                locale: "en_GB".into(),
                text: "Initial".into(),
            }],
            version: "2.0.0".into(),
        };
        let binary = client
            .producer(5)
            .create_extension_binary(42, &create)
            .await
            .unwrap();
        assert_eq!(binary.id, 99);

        let req = requests.recv().await.unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/producers/5/plugins/42/binaries");
        let sent: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(sent["version"], "2.0.0");
        assert_eq!(sent["softwareVersions"][1], "6.5.1.0");

        handle.abort();
    }

    #[tokio::test]
    async fn update_binary_info_puts_to_binary_id() {
        let (url, mut requests, handle) = mock_server(vec![(200, String::new())]).await;
        let client = Client::new("t").unwrap().with_base_url(url);

        let update = ExtensionUpdate {
            id: 17,
            software_versions: vec!["6.5.0.0".into()],
            ..Default::default()
        };
        client
            .producer(5)
            .update_extension_binary_info(42, &update)
            .await
            .unwrap();

        let req = requests.recv().await.unwrap();
        assert_eq!(req.method, "PUT");
        assert_eq!(req.path, "/producers/5/plugins/42/binaries/17");

        handle.abort();
    }

    #[tokio::test]
    async fn binary_file_is_sent_as_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("FroshTools.zip");
        let payload = [b'P', b'K', 3, 4, 0, 255, 13, 10];
        std::fs::write(&zip, payload).unwrap();

        let (url, mut requests, handle) = mock_server(vec![(200, String::new())]).await;
        let client = Client::new("t").unwrap().with_base_url(url);
        client
            .producer(5)
            .update_extension_binary_file(42, 17, &zip)
            .await
            .unwrap();

        let req = requests.recv().await.unwrap();
        assert_eq!(req.path, "/producers/5/plugins/42/binaries/17/file");
        let content_type = req.header("content-type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(req.body_contains(b"name=\"file\"; filename=\"FroshTools.zip\""));
        assert!(req.body_contains(&payload));

        handle.abort();
    }

    #[tokio::test]
    async fn missing_artifact_fails_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new("t").unwrap().with_base_url("http://127.0.0.1:9");

        let err = client
            .producer(5)
            .update_extension_binary_file(42, 17, &dir.path().join("none.zip"))
            .await
            .unwrap_err();
        assert_eq!(err.op, "update_extension_binary_file");
        assert!(matches!(err.kind, ErrorKind::Io(_)));
    }

    #[tokio::test]
    async fn icon_is_resized_and_uploaded_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("plugin.png");
        std::fs::write(&icon, png(512, 256)).unwrap();

        let (url, mut requests, handle) = mock_server(vec![(200, String::new())]).await;
        let client = Client::new("t").unwrap().with_base_url(url);
        client
            .producer(5)
            .update_extension_icon(42, &icon)
            .await
            .unwrap();

        let req = requests.recv().await.unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/plugins/42/icon");
        assert!(req.body_contains(b"filename=\"plugin.png\""));
        assert!(req.body_contains(b"\x89PNG"));

        handle.abort();
    }

    #[tokio::test]
    async fn undecodable_icon_aborts_upload() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("plugin.png");
        std::fs::write(&icon, b"not a png").unwrap();

        let (url, mut requests, handle) = mock_server(vec![(200, String::new())]).await;
        let client = Client::new("t").unwrap().with_base_url(url);
        let err = client
            .producer(5)
            .update_extension_icon(42, &icon)
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Image(_)));

        handle.abort();
        assert!(requests.recv().await.is_none());
    }
}
