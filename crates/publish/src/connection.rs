//! Store connection trait.
//!
//! The pipeline talks to the store through `StoreConnection` so release
//! logic stays testable with mocks. [`ProducerEndpoint`] is the real
//! implementation.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use extpub_account_api::{
    BinaryReviewResult, Error, ExtensionBinary, ExtensionCreate, ExtensionUpdate,
    ProducerEndpoint,
};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// The store calls a release is made of.
pub trait StoreConnection: Send + Sync {
    fn list_binaries(&self, extension_id: i32) -> StoreFuture<'_, Vec<ExtensionBinary>>;

    fn create_binary<'a>(
        &'a self,
        extension_id: i32,
        create: &'a ExtensionCreate,
    ) -> StoreFuture<'a, ExtensionBinary>;

    fn update_binary_info<'a>(
        &'a self,
        extension_id: i32,
        update: &'a ExtensionUpdate,
    ) -> StoreFuture<'a, ()>;

    fn upload_binary_file<'a>(
        &'a self,
        extension_id: i32,
        binary_id: i32,
        path: &'a Path,
    ) -> StoreFuture<'a, ()>;

    fn upload_icon<'a>(&'a self, extension_id: i32, path: &'a Path) -> StoreFuture<'a, ()>;

    fn trigger_code_review(&self, extension_id: i32) -> StoreFuture<'_, ()>;

    /// Single fetch of the review results, oldest first. Never waits.
    fn review_results(
        &self,
        extension_id: i32,
        binary_id: i32,
    ) -> StoreFuture<'_, Vec<BinaryReviewResult>>;
}

impl StoreConnection for ProducerEndpoint<'_> {
    fn list_binaries(&self, extension_id: i32) -> StoreFuture<'_, Vec<ExtensionBinary>> {
        Box::pin(self.get_extension_binaries(extension_id))
    }

    fn create_binary<'a>(
        &'a self,
        extension_id: i32,
        create: &'a ExtensionCreate,
    ) -> StoreFuture<'a, ExtensionBinary> {
        Box::pin(self.create_extension_binary(extension_id, create))
    }

    fn update_binary_info<'a>(
        &'a self,
        extension_id: i32,
        update: &'a ExtensionUpdate,
    ) -> StoreFuture<'a, ()> {
        Box::pin(self.update_extension_binary_info(extension_id, update))
    }

    fn upload_binary_file<'a>(
        &'a self,
        extension_id: i32,
        binary_id: i32,
        path: &'a Path,
    ) -> StoreFuture<'a, ()> {
        Box::pin(self.update_extension_binary_file(extension_id, binary_id, path))
    }

    fn upload_icon<'a>(&'a self, extension_id: i32, path: &'a Path) -> StoreFuture<'a, ()> {
        Box::pin(self.update_extension_icon(extension_id, path))
    }

    fn trigger_code_review(&self, extension_id: i32) -> StoreFuture<'_, ()> {
        Box::pin(ProducerEndpoint::trigger_code_review(self, extension_id))
    }

    fn review_results(
        &self,
        extension_id: i32,
        binary_id: i32,
    ) -> StoreFuture<'_, Vec<BinaryReviewResult>> {
        Box::pin(self.get_binary_review_results(extension_id, binary_id))
    }
}
