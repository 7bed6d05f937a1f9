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

//! Entry point to the CourseDesk service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use axum::http::HeaderValue;
use coursedesk_authn::driver::{AdminOptions, AuthnOptions};
use coursedesk_catalog::driver::CatalogOptions;
use coursedesk_catalog::serve;
use coursedesk_core::db::postgres::PostgresOptions;
use coursedesk_core::env::get_optional_var;
use log::error;
use std::net::Ipv4Addr;
use std::process;

/// Default port to listen on when `COURSEDESK_PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Collection of settings read from the environment.
struct Config {
    /// Port to listen on.
    port: u16,

    /// Origin allowed to make cross-origin requests, if any.
    cors_origin: Option<HeaderValue>,

    /// Database connection settings.
    db_opts: PostgresOptions,

    /// Token signing settings.
    authn_opts: AuthnOptions,

    /// Administrator account to bootstrap, if any.
    admin_opts: Option<AdminOptions>,

    /// Catalog settings.
    catalog_opts: CatalogOptions,
}

impl Config {
    /// Reads the whole configuration from the environment.
    fn from_env() -> Result<Self, String> {
        let port = get_optional_var::<u16>("COURSEDESK", "PORT")?.unwrap_or(DEFAULT_PORT);
        let cors_origin = match get_optional_var::<String>("COURSEDESK", "CORS_ORIGIN")? {
            Some(origin) => Some(
                HeaderValue::from_str(&origin)
                    .map_err(|e| format!("Invalid COURSEDESK_CORS_ORIGIN: {}", e))?,
            ),
            None => None,
        };
        Ok(Self {
            port,
            cors_origin,
            db_opts: PostgresOptions::from_env("PGSQL_PROD")?,
            authn_opts: AuthnOptions::from_env("AUTHN")?,
            admin_opts: AdminOptions::from_env("AUTHN")?,
            catalog_opts: CatalogOptions::from_env("CATALOG")?,
        })
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let addr = (Ipv4Addr::UNSPECIFIED, config.port);
    if let Err(e) = serve(
        addr,
        config.db_opts,
        config.authn_opts,
        config.admin_opts,
        config.catalog_opts,
        config.cors_origin,
    )
    .await
    {
        error!("Server failed: {}", e);
        process::exit(1);
    }
}
