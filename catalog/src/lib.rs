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

//! Course catalog service.
//!
//! Courses are made of ordered lessons and go through a draft/published lifecycle.  All
//! endpoints sit behind bearer-token authentication provided by `coursedesk-authn`.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

#[cfg(feature = "postgres")]
use {
    axum::http::HeaderValue,
    coursedesk_authn::driver::{AdminOptions, AuthnDriver, AuthnOptions},
    coursedesk_core::clocks::SystemClock,
    coursedesk_core::db::Db,
    coursedesk_core::db::postgres::{PostgresDb, PostgresOptions},
    driver::{CatalogOptions, Driver},
    log::info,
    std::error::Error,
    std::net::SocketAddr,
    std::sync::Arc,
};

mod db;
pub mod driver;
pub mod model;
mod rest;

/// Realm reported to clients that fail to authenticate.
#[cfg(feature = "postgres")]
const REALM: &str = "coursedesk";

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
#[cfg(feature = "postgres")]
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db_opts: PostgresOptions,
    authn_opts: AuthnOptions,
    admin_opts: Option<AdminOptions>,
    catalog_opts: CatalogOptions,
    cors_origin: Option<HeaderValue>,
) -> Result<(), Box<dyn Error>> {
    let db: Arc<dyn Db + Send + Sync> = Arc::from(PostgresDb::connect(db_opts)?);
    {
        let mut ex = db.ex().await?;
        coursedesk_authn::db::init_schema(&mut ex).await?;
        db::init_schema(&mut ex).await?;
    }

    let clock = Arc::from(SystemClock::default());
    let authn = AuthnDriver::new(db.clone(), clock.clone(), REALM, authn_opts);
    if let Some(admin) = admin_opts {
        let user = authn.clone().ensure_admin(admin.email, admin.password).await?;
        info!("Administrator account {} is ready", user.email().as_str());
    }
    let driver = Driver::new(db, clock, catalog_opts);
    let app = rest::app(driver, authn, cors_origin);

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
