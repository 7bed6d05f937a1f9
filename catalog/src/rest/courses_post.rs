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

//! API to create a new course.

use crate::model::Title;
use crate::rest::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::{self, HeaderMap};
use axum::response::IntoResponse;
use coursedesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to create or rename a course.
#[derive(Deserialize, Serialize)]
pub(crate) struct CourseRequest {
    /// Title of the course.
    pub(crate) title: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CourseRequest>,
) -> Result<impl IntoResponse, RestError> {
    let (driver, _session) = state.authorize(&headers)?;
    let title = Title::new(request.title)?;

    let course = driver.create_course(title).await?;
    let location = format!("/api/courses/{}", course.id());
    Ok((http::StatusCode::CREATED, [(http::header::LOCATION, location)], Json(course)))
}
