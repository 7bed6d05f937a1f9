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

//! API to list courses.

use crate::model::CourseStatus;
use crate::rest::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use coursedesk_core::rest::{EmptyBody, RestError};
use serde::{Deserialize, Serialize};

/// Query parameters accepted by this API.
#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListRequest {
    /// 1-based index of the page to return.
    pub(crate) page_number: Option<u32>,

    /// Number of courses per page.
    pub(crate) page_size: Option<u32>,

    /// Only return courses in this status.
    pub(crate) status: Option<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<ListRequest>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let (driver, _session) = state.authorize(&headers)?;

    let status = match request.status {
        Some(status) if !status.trim().is_empty() => Some(CourseStatus::parse(&status)?),
        _ => None,
    };

    let page = driver.list_courses(status, request.page_number, request.page_size).await?;
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Course, Page};
    use crate::rest::testutils::*;
    use axum::http;
    use coursedesk_core::rest::testutils::OneShotBuilder;
    use coursedesk_core::test_payload_must_be_empty;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/courses".to_owned())
    }

    /// Extracts the titles of the courses in `page`.
    fn titles(page: &Page<Course>) -> Vec<&str> {
        page.items.iter().map(|c| c.title().as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let page = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .send_empty()
            .await
            .expect_json::<Page<Course>>()
            .await;
        assert_eq!(Page { items: vec![], total_items: 0, current_page: 1, total_pages: 0 }, page);
    }

    #[tokio::test]
    async fn test_pagination() {
        let context = TestContext::setup().await;
        for title in ["First", "Second", "Third"] {
            context.catalog().create_course(title).await;
        }

        let page = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .with_query(ListRequest { page_number: Some(1), page_size: Some(2), status: None })
            .send_empty()
            .await
            .expect_json::<Page<Course>>()
            .await;
        assert_eq!(vec!["Third", "Second"], titles(&page));
        assert_eq!(3, page.total_items);
        assert_eq!(1, page.current_page);
        assert_eq!(2, page.total_pages);

        let page = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .with_query(ListRequest { page_number: Some(2), page_size: Some(2), status: None })
            .send_empty()
            .await
            .expect_json::<Page<Course>>()
            .await;
        assert_eq!(vec!["First"], titles(&page));
        assert_eq!(2, page.current_page);
    }

    #[tokio::test]
    async fn test_status_filter() {
        let context = TestContext::setup().await;
        context.catalog().create_course("Draft").await;
        let published = context.catalog().create_course("Published").await;
        context.catalog().create_lesson(*published.id(), 1).await;
        context.catalog().driver().publish_course(*published.id()).await.unwrap();

        for (status, exp_titles) in
            [("Draft", vec!["Draft"]), ("published", vec!["Published"]), ("DRAFT", vec!["Draft"])]
        {
            let page = OneShotBuilder::new(context.app(), route())
                .with_bearer_auth(context.user_token())
                .with_query(ListRequest { status: Some(status.to_owned()), ..Default::default() })
                .send_empty()
                .await
                .expect_json::<Page<Course>>()
                .await;
            assert_eq!(exp_titles, titles(&page));
        }
    }

    #[tokio::test]
    async fn test_empty_status_is_no_filter() {
        let context = TestContext::setup().await;
        context.catalog().create_course("Draft").await;
        let published = context.catalog().create_course("Published").await;
        context.catalog().create_lesson(*published.id(), 1).await;
        context.catalog().driver().publish_course(*published.id()).await.unwrap();

        for status in ["", "  "] {
            let page = OneShotBuilder::new(context.app(), route())
                .with_bearer_auth(context.user_token())
                .with_query(ListRequest { status: Some(status.to_owned()), ..Default::default() })
                .send_empty()
                .await
                .expect_json::<Page<Course>>()
                .await;
            assert_eq!(vec!["Published", "Draft"], titles(&page));
        }
    }

    #[tokio::test]
    async fn test_soft_deleted_are_hidden() {
        let context = TestContext::setup().await;
        context.catalog().create_course("Visible").await;
        let deleted = context.catalog().create_course("Deleted").await;
        context.catalog().driver().delete_course(*deleted.id()).await.unwrap();

        let page = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .send_empty()
            .await
            .expect_json::<Page<Course>>()
            .await;
        assert_eq!(vec!["Visible"], titles(&page));
        assert_eq!(1, page.total_items);
    }

    #[tokio::test]
    async fn test_bad_status() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .with_query(ListRequest { status: Some("archived".to_owned()), ..Default::default() })
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Unknown course status 'archived'")
            .await;
    }

    #[tokio::test]
    async fn test_bad_page() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .with_query(ListRequest { page_number: Some(0), ..Default::default() })
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Page number must be at least 1")
            .await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.user_token())
            .with_query(ListRequest { page_size: Some(101), ..Default::default() })
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Page size must be between 1 and 100")
            .await;
    }

    #[tokio::test]
    async fn test_unauthenticated() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Missing Authorization header")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
