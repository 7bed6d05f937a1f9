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

//! API to add a lesson to a course.

use crate::model::{CourseId, LessonOrder, Title};
use crate::rest::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::{self, HeaderMap};
use axum::response::IntoResponse;
use coursedesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to create or update a lesson.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonRequest {
    /// Identifier of the course the lesson belongs to.
    pub(crate) course_id: String,

    /// Title of the lesson.
    pub(crate) title: String,

    /// Position of the lesson within its course.
    pub(crate) order: i32,
}

impl LessonRequest {
    /// Validates the raw fields of the request.
    pub(crate) fn parse(self) -> Result<(CourseId, Title, LessonOrder), RestError> {
        let course_id = CourseId::parse(&self.course_id)?;
        let title = Title::new(self.title)?;
        let order = LessonOrder::new(self.order)?;
        Ok((course_id, title, order))
    }
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LessonRequest>,
) -> Result<impl IntoResponse, RestError> {
    let (driver, _session) = state.authorize(&headers)?;
    let (course_id, title, order) = request.parse()?;

    let lesson = driver.create_lesson(course_id, title, order).await?;
    Ok((http::StatusCode::CREATED, Json(lesson)))
}
