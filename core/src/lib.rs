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

//! Shared plumbing for the CourseDesk services.
//!
//! Every service crate in this workspace is split in the same layers, and this crate provides the
//! pieces that are common to all of them:
//!
//! 1.  `model`: High-level data types that represent concepts in the domain of the application.
//!     No business logic lives here, only validation at construction time.
//!
//! 1.  `db`: The persistence layer.  Services write free functions that take an `Executor` and
//!     issue explicit SQL against each supported backend.
//!
//! 1.  `driver`: The business logic layer.  Every public driver operation opens one transaction,
//!     does its work, and commits.
//!
//! 1.  `rest`: The HTTP layer.  Handlers are thin wrappers that decode requests, call into the
//!     driver, and encode responses.
//!
//! Every layer has its own error type (`ModelError`, `DbError`, `DriverError` and `RestError`) and
//! each converts into the next one, so errors float up with `?` and become HTTP status codes once
//! they leave a handler.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod clocks;
pub mod db;
pub mod driver;
pub mod env;
pub mod model;
pub mod rest;
