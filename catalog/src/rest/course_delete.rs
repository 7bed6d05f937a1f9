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

//! API to delete a course, either softly or permanently.

use crate::model::CourseId;
use crate::rest::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{self, HeaderMap};
use coursedesk_core::rest::{EmptyBody, RestError};
use serde::{Deserialize, Serialize};

/// Query parameters accepted by this API.
#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRequest {
    /// Whether to physically remove the course and its lessons instead of hiding them.
    #[serde(default)]
    pub(crate) hard_delete: bool,
}

/// DELETE handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(request): Query<DeleteRequest>,
    _: EmptyBody,
) -> Result<http::StatusCode, RestError> {
    let (driver, session) = state.authorize(&headers)?;
    let id = CourseId::parse(&id)?;

    if request.hard_delete {
        driver.hard_delete_course(&session, id).await?;
    } else {
        driver.delete_course(id).await?;
    }
    Ok(http::StatusCode::NO_CONTENT)
}
