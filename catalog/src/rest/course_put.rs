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

//! API to rename a course.

use crate::model::{CourseId, Title};
use crate::rest::AppState;
use crate::rest::courses_post::CourseRequest;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{self, HeaderMap};
use coursedesk_core::rest::RestError;

/// PUT handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<CourseRequest>,
) -> Result<http::StatusCode, RestError> {
    let (driver, _session) = state.authorize(&headers)?;
    let id = CourseId::parse(&id)?;
    let title = Title::new(request.title)?;

    driver.update_course(id, title).await?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use coursedesk_core::rest::testutils::OneShotBuilder;
    use coursedesk_core::test_payload_must_be_json;

    fn route(id: impl std::fmt::Display) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/courses/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Before").await;

        OneShotBuilder::new(context.app(), route(course.id()))
            .with_bearer_auth(context.user_token())
            .send_json(CourseRequest { title: "After".to_owned() })
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let course = context.catalog().get_course(*course.id()).await.unwrap();
        assert_eq!("After", course.title().as_str());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(CourseId::generate()))
            .with_bearer_auth(context.user_token())
            .send_json(CourseRequest { title: "After".to_owned() })
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Course not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_title() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Before").await;

        OneShotBuilder::new(context.app(), route(course.id()))
            .with_bearer_auth(context.user_token())
            .send_json(CourseRequest { title: "".to_owned() })
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Title cannot be empty")
            .await;

        let course = context.catalog().get_course(*course.id()).await.unwrap();
        assert_eq!("Before", course.title().as_str());
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route(CourseId::generate()));
}
