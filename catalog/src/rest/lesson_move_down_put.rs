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

//! API to move a lesson one position later within its course.

use crate::model::LessonId;
use crate::rest::AppState;
use axum::extract::{Path, State};
use axum::http::{self, HeaderMap};
use coursedesk_core::rest::{EmptyBody, RestError};

/// PUT handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<http::StatusCode, RestError> {
    let (driver, _session) = state.authorize(&headers)?;
    let id = LessonId::parse(&id)?;

    driver.move_lesson_down(id).await?;
    Ok(http::StatusCode::NO_CONTENT)
}
