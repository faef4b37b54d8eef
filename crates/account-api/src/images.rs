//! Store gallery (screenshot) management.

use std::path::Path;

use reqwest::Method;

use crate::client::ProducerEndpoint;
use crate::error::{Error, ErrorKind, OpContext};
use crate::types::ExtensionImage;
use crate::upload::{file_form, read_upload};

fn pictures_path(extension_id: i32) -> String {
    format!("/plugins/{extension_id}/pictures")
}

impl ProducerEndpoint<'_> {
    /// Lists the gallery images of an extension.
    pub async fn get_extension_images(
        &self,
        extension_id: i32,
    ) -> Result<Vec<ExtensionImage>, Error> {
        self.client
            .get_json(&pictures_path(extension_id))
            .await
            .op("get_extension_images")
    }

    pub async fn delete_extension_image(
        &self,
        extension_id: i32,
        image_id: i32,
    ) -> Result<(), Error> {
        let req = self.client.request(
            Method::DELETE,
            &format!("{}/{image_id}", pictures_path(extension_id)),
        );
        self.client.send(req).await.op("delete_extension_image")?;
        Ok(())
    }

    /// Saves captions, flags and priority of an existing image.
    pub async fn update_extension_image(
        &self,
        extension_id: i32,
        image: &ExtensionImage,
    ) -> Result<(), Error> {
        let path = format!("{}/{}", pictures_path(extension_id), image.id);
        self.client
            .send_json(Method::PUT, &path, image)
            .await
            .op("update_extension_image")?;
        Ok(())
    }

    /// Uploads a new gallery image as-is and returns the created record.
    ///
    /// The backend answers with a list holding only the new image; any
    /// other length is reported as [`ErrorKind::UnexpectedResponse`].
    pub async fn add_extension_image(
        &self,
        extension_id: i32,
        file: &Path,
    ) -> Result<ExtensionImage, Error> {
        const OP: &str = "add_extension_image";

        let (file_name, data) = read_upload(file).await.op(OP)?;
        let form = file_form(file_name, data).op(OP)?;
        let req = self
            .client
            .request(Method::POST, &pictures_path(extension_id))
            .multipart(form);
        let body = self.client.send(req).await.op(OP)?;

        let mut created: Vec<ExtensionImage> = serde_json::from_slice(&body).op(OP)?;
        if created.len() != 1 {
            return Err(Error::new(
                OP,
                ErrorKind::UnexpectedResponse(format!(
                    "expected exactly one created image, got {}",
                    created.len()
                )),
            ));
        }
        Ok(created.remove(0))
    }
}
