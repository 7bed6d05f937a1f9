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

//! API to update a lesson.

use crate::model::LessonId;
use crate::rest::AppState;
use crate::rest::lessons_post::LessonRequest;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{self, HeaderMap};
use coursedesk_core::rest::RestError;

/// PUT handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<LessonRequest>,
) -> Result<http::StatusCode, RestError> {
    let (driver, _session) = state.authorize(&headers)?;
    let id = LessonId::parse(&id)?;
    let (course_id, title, order) = request.parse()?;

    driver.update_lesson(id, course_id, title, order).await?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CourseId;
    use crate::rest::testutils::*;
    use coursedesk_core::rest::testutils::OneShotBuilder;
    use coursedesk_core::test_payload_must_be_json;

    fn route(id: impl std::fmt::Display) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/lessons/{}", id))
    }

    fn request(course_id: CourseId, title: &str, order: i32) -> LessonRequest {
        LessonRequest { course_id: course_id.to_string(), title: title.to_owned(), order }
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Course").await;
        let lesson = context.catalog().create_lesson(*course.id(), 1).await;

        OneShotBuilder::new(context.app(), route(lesson.id()))
            .with_bearer_auth(context.user_token())
            .send_json(request(*course.id(), "Renamed", 4))
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let lesson = context.catalog().get_lesson(*lesson.id()).await.unwrap();
        assert_eq!("Renamed", lesson.title().as_str());
        assert_eq!(4, lesson.order().as_i32());
    }

    #[tokio::test]
    async fn test_move_to_other_course() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Course").await;
        let other = context.catalog().create_course("Other").await;
        let lesson = context.catalog().create_lesson(*course.id(), 1).await;

        OneShotBuilder::new(context.app(), route(lesson.id()))
            .with_bearer_auth(context.user_token())
            .send_json(request(*other.id(), "Moved", 1))
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let lesson = context.catalog().get_lesson(*lesson.id()).await.unwrap();
        assert_eq!(other.id(), lesson.course_id());
    }

    #[tokio::test]
    async fn test_duplicate_order() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Course").await;
        let lesson = context.catalog().create_lesson(*course.id(), 1).await;
        context.catalog().create_lesson(*course.id(), 2).await;

        OneShotBuilder::new(context.app(), route(lesson.id()))
            .with_bearer_auth(context.user_token())
            .send_json(request(*course.id(), "Renamed", 2))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("A lesson with order 2 already exists")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Course").await;

        OneShotBuilder::new(context.app(), route(LessonId::generate()))
            .with_bearer_auth(context.user_token())
            .send_json(request(*course.id(), "Renamed", 2))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Lesson not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_title() {
        let context = TestContext::setup().await;
        let course = context.catalog().create_course("Course").await;
        let lesson = context.catalog().create_lesson(*course.id(), 1).await;

        OneShotBuilder::new(context.app(), route(lesson.id()))
            .with_bearer_auth(context.user_token())
            .send_json(request(*course.id(), " ", 1))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Title cannot be empty")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route(LessonId::generate()));
}
