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

//! REST interface for the course catalog.
//!
//! Every catalog endpoint requires a bearer token issued by the authentication endpoints, which
//! are served from the same router under `/api/auth`.

use crate::driver::Driver;
use axum::Router;
use axum::http::{HeaderMap, HeaderValue};
use coursedesk_authn::driver::AuthnDriver;
use coursedesk_authn::model::Session;
use coursedesk_authn::rest::require_session;
use coursedesk_core::rest::RestResult;
use tower_http::cors::{Any, CorsLayer};

mod course_delete;
mod course_get;
mod course_publish_post;
mod course_put;
mod course_unpublish_post;
mod courses_get;
mod courses_metrics_get;
mod courses_post;
mod lesson_delete;
mod lesson_move_down_put;
mod lesson_move_up_put;
mod lesson_put;
mod lessons_post;
#[cfg(test)]
mod testutils;

/// State shared by all catalog handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Business logic for courses and lessons.
    driver: Driver,

    /// Validator for the access tokens presented by callers.
    authn: AuthnDriver,
}

impl AppState {
    /// Validates the bearer token in `headers` and returns the caller's session along with the
    /// catalog driver to serve the request.
    fn authorize(self, headers: &HeaderMap) -> RestResult<(Driver, Session)> {
        let session = require_session(&self.authn, headers)?;
        Ok((self.driver, session))
    }
}

/// Creates the router for the whole application.
///
/// If `cors_origin` is set, browsers loaded from that origin are allowed to call any endpoint.
pub(crate) fn app(driver: Driver, authn: AuthnDriver, cors_origin: Option<HeaderValue>) -> Router {
    use axum::routing::{get, post, put};

    let state = AppState { driver, authn: authn.clone() };
    let api = Router::new()
        .route("/courses", get(courses_get::handler).post(courses_post::handler))
        .route("/courses/metrics", get(courses_metrics_get::handler))
        .route(
            "/courses/:id",
            get(course_get::handler).put(course_put::handler).delete(course_delete::handler),
        )
        .route("/courses/:id/publish", post(course_publish_post::handler))
        .route("/courses/:id/unpublish", post(course_unpublish_post::handler))
        .route("/lessons", post(lessons_post::handler))
        .route("/lessons/:id", put(lesson_put::handler).delete(lesson_delete::handler))
        .route("/lessons/:id/move-up", put(lesson_move_up_put::handler))
        .route("/lessons/:id/move-down", put(lesson_move_down_put::handler))
        .with_state(state)
        .nest("/auth", coursedesk_authn::rest::app(authn));

    let router = Router::new().nest("/api", api);
    match cors_origin {
        Some(origin) => router.layer(
            CorsLayer::new().allow_origin(origin).allow_headers(Any).allow_methods(Any),
        ),
        None => router,
    }
}
