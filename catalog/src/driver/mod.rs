// CourseDesk
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Business logic for the course catalog.

use crate::model::PageRequest;
use coursedesk_core::clocks::Clock;
use coursedesk_core::db::{Db, DbError};
use coursedesk_core::driver::{DriverError, DriverResult};
use coursedesk_core::env::get_optional_var;
use std::sync::Arc;

mod courses;
mod lessons;
#[cfg(test)]
pub(crate) mod testutils;

/// Default value for the `DEFAULT_PAGE_SIZE` setting when not specified.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default value for the `MAX_PAGE_SIZE` setting when not specified.
const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Configuration options for the catalog driver.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct CatalogOptions {
    /// Number of items per page when a listing request does not specify one.
    pub default_page_size: u32,

    /// Largest number of items per page that a listing request may ask for.
    pub max_page_size: u32,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self { default_page_size: DEFAULT_PAGE_SIZE, max_page_size: DEFAULT_MAX_PAGE_SIZE }
    }
}

impl CatalogOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_DEFAULT_PAGE_SIZE` and `<prefix>_MAX_PAGE_SIZE`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let mut opts = Self::default();
        if let Some(size) = get_optional_var::<u32>(prefix, "DEFAULT_PAGE_SIZE")? {
            opts.default_page_size = size;
        }
        if let Some(size) = get_optional_var::<u32>(prefix, "MAX_PAGE_SIZE")? {
            opts.max_page_size = size;
        }
        if opts.max_page_size == 0 {
            return Err(format!("{}_MAX_PAGE_SIZE must be positive", prefix));
        }
        if opts.default_page_size == 0 || opts.default_page_size > opts.max_page_size {
            return Err(format!(
                "{}_DEFAULT_PAGE_SIZE must be between 1 and {}",
                prefix, opts.max_page_size
            ));
        }
        Ok(opts)
    }
}

/// Returns a converter from database errors to driver errors that describes a missing entity as a
/// missing `what`.
fn not_found_as(what: &'static str) -> impl Fn(DbError) -> DriverError {
    move |e| match e {
        DbError::NotFound => DriverError::NotFound(format!("{} not found", what)),
        e => e.into(),
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Options for the catalog.
    opts: CatalogOptions,
}

impl Driver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        opts: CatalogOptions,
    ) -> Self {
        Self { db, clock, opts }
    }

    /// Builds a validated page request from optional client-supplied values.
    pub(crate) fn page_request(
        &self,
        number: Option<u32>,
        size: Option<u32>,
    ) -> DriverResult<PageRequest> {
        Ok(PageRequest::new(
            number.unwrap_or(1),
            size.unwrap_or(self.opts.default_page_size),
            self.opts.max_page_size,
        )?)
    }
}
