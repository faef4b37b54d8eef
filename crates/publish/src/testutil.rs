//! In-memory store connection for tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use extpub_account_api::{
    BinaryReviewResult, Error, ErrorKind, ExtensionBinary, ExtensionCreate, ExtensionUpdate,
    StatusInfo, SubCheckResult,
};

use crate::connection::{StoreConnection, StoreFuture};

pub fn review(type_id: i32, type_name: &str) -> BinaryReviewResult {
    BinaryReviewResult {
        id: 1,
        binary_id: 17,
        kind: StatusInfo {
            id: type_id,
            name: type_name.into(),
            description: String::new(),
        },
        ..Default::default()
    }
}

pub fn sub_check(name: &str, passed: bool, warnings: bool, message: &str) -> SubCheckResult {
    SubCheckResult {
        sub_check: name.into(),
        status: String::new(),
        passed,
        message: message.into(),
        has_warnings: warnings,
    }
}

/// Records every call and serves scripted review results.
#[derive(Default)]
pub struct MockStore {
    pub binaries: Mutex<Vec<ExtensionBinary>>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<ExtensionCreate>>,
    pub updated: Mutex<Vec<ExtensionUpdate>>,
    reviews: Mutex<VecDeque<Vec<BinaryReviewResult>>>,
    fetches: Mutex<u32>,
    fail_on: Mutex<Option<&'static str>>,
}

impl MockStore {
    pub fn push_reviews(&self, results: Vec<BinaryReviewResult>) {
        self.reviews.lock().unwrap().push_back(results);
    }

    pub fn fail_reviews(&self) {
        self.fail_at("review_results");
    }

    /// Makes the named call return an API error.
    pub fn fail_at(&self, call: &'static str) {
        *self.fail_on.lock().unwrap() = Some(call);
    }

    pub fn review_fetches(&self) -> u32 {
        *self.fetches.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), Error> {
        self.calls.lock().unwrap().push(call.to_string());
        if *self.fail_on.lock().unwrap() == Some(call) {
            return Err(Error::new(
                call,
                ErrorKind::Api {
                    status: 500,
                    body: "boom".into(),
                },
            ));
        }
        Ok(())
    }
}

impl StoreConnection for MockStore {
    fn list_binaries(&self, _extension_id: i32) -> StoreFuture<'_, Vec<ExtensionBinary>> {
        Box::pin(async move {
            self.record("list_binaries")?;
            Ok::<_, Error>(self.binaries.lock().unwrap().clone())
        })
    }

    fn create_binary<'a>(
        &'a self,
        _extension_id: i32,
        create: &'a ExtensionCreate,
    ) -> StoreFuture<'a, ExtensionBinary> {
        Box::pin(async move {
            self.record("create_binary")?;
            self.created.lock().unwrap().push(create.clone());
            let binary = ExtensionBinary {
                id: 17,
                version: create.version.clone(),
                ..Default::default()
            };
            self.binaries.lock().unwrap().push(binary.clone());
            Ok::<_, Error>(binary)
        })
    }

    fn update_binary_info<'a>(
        &'a self,
        _extension_id: i32,
        update: &'a ExtensionUpdate,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.record("update_binary_info")?;
            self.updated.lock().unwrap().push(update.clone());
            Ok::<_, Error>(())
        })
    }

    fn upload_binary_file<'a>(
        &'a self,
        _extension_id: i32,
        _binary_id: i32,
        _path: &'a Path,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.record("upload_binary_file") })
    }

    fn upload_icon<'a>(&'a self, _extension_id: i32, _path: &'a Path) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.record("upload_icon") })
    }

    fn trigger_code_review(&self, _extension_id: i32) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.record("trigger_code_review") })
    }

    fn review_results(
        &self,
        _extension_id: i32,
        _binary_id: i32,
    ) -> StoreFuture<'_, Vec<BinaryReviewResult>> {
        Box::pin(async move {
            *self.fetches.lock().unwrap() += 1;
            if *self.fail_on.lock().unwrap() == Some("review_results") {
                return Err(Error::new(
                    "get_binary_review_results",
                    ErrorKind::Api {
                        status: 500,
                        body: "boom".into(),
                    },
                ));
            }
            Ok(self.reviews.lock().unwrap().pop_front().unwrap_or_default())
        })
    }
}
