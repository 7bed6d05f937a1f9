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

//! Database abstraction to manipulate courses and lessons.
//!
//! Soft-deleted rows are filtered out by every query in this module except for
//! `hard_delete_course`, which can purge a course regardless of its state.

use crate::model::{
    Course, CourseId, CourseMetrics, CourseStatus, Lesson, LessonId, LessonOrder, PageRequest, Title,
};
#[cfg(feature = "postgres")]
use coursedesk_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use coursedesk_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use coursedesk_core::db::{DbError, DbResult, Executor, ensure_one_row};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;
#[cfg(feature = "postgres")]
use uuid::Uuid;


/// Order assigned to a lesson while it swaps positions with another one.
///
/// Lesson orders are unique within a course, so one of the two lessons has to be moved out of the
/// way first.  Valid orders are strictly positive so this value never collides with them.
const PARKED_ORDER: i32 = -1;

/// Which neighbor of a lesson to look for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Neighbor {
    /// The lesson with the closest smaller order.
    Previous,

    /// The lesson with the closest larger order.
    Next,
}

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Converts a row count as returned by the database into an unsigned integer.
fn count_to_u64(count: i64) -> DbResult<u64> {
    u64::try_from(count)
        .map_err(|_| DbError::DataIntegrityError(format!("Negative count {}", count)))
}

/// Converts an unsigned quantity into the signed type that the databases accept.
fn u64_to_param(value: u64) -> DbResult<i64> {
    i64::try_from(value)
        .map_err(|_| DbError::BackendError(format!("Value {} is too large for a query", value)))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Course {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(postgres::map_sqlx_error)?;
        let created: OffsetDateTime = row.try_get("created").map_err(postgres::map_sqlx_error)?;

        Ok(Course::new(CourseId::from(id), Title::new(title)?, created)
            .with_status(CourseStatus::parse(&status)?))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Course {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;
        let created_secs: i64 = row.try_get("created_secs").map_err(sqlite::map_sqlx_error)?;
        let created_nsecs: i64 = row.try_get("created_nsecs").map_err(sqlite::map_sqlx_error)?;

        Ok(Course::new(
            CourseId::parse(&id)?,
            Title::new(title)?,
            build_timestamp(created_secs, created_nsecs)?,
        )
        .with_status(CourseStatus::parse(&status)?))
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Lesson {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let course_id: Uuid = row.try_get("course_id").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let order: i32 = row.try_get("lesson_order").map_err(postgres::map_sqlx_error)?;

        Ok(Lesson::new(
            LessonId::from(id),
            CourseId::from(course_id),
            Title::new(title)?,
            LessonOrder::new(order)?,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Lesson {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let course_id: String = row.try_get("course_id").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let order: i32 = row.try_get("lesson_order").map_err(sqlite::map_sqlx_error)?;

        Ok(Lesson::new(
            LessonId::parse(&id)?,
            CourseId::parse(&course_id)?,
            Title::new(title)?,
            LessonOrder::new(order)?,
        ))
    }
}

/// Creates a new draft course with `title`.
pub(crate) async fn create_course(
    ex: &mut Executor,
    id: CourseId,
    title: Title,
    created: OffsetDateTime,
) -> DbResult<Course> {
    let status = CourseStatus::Draft;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO courses (id, title, status, created) VALUES ($1, $2, $3, $4)";
            let done = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .bind(title.as_str())
                .bind(status.as_str())
                .bind(created)
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (created_secs, created_nsecs) = unpack_timestamp(created)?;

            let query_str = "
                INSERT INTO courses (id, title, status, created_secs, created_nsecs)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(title.as_str())
                .bind(status.as_str())
                .bind(created_secs)
                .bind(created_nsecs)
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)?;

    Ok(Course::new(id, title, created).with_status(status))
}

/// Gets the live lessons of the course `course_id`, sorted by their order.
async fn get_course_lessons(ex: &mut Executor, course_id: CourseId) -> DbResult<Vec<Lesson>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM lessons
                WHERE course_id = $1 AND NOT deleted
                ORDER BY lesson_order";
            let rows = sqlx::query(query_str)
                .bind(*course_id.as_uuid())
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Lesson::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM lessons
                WHERE course_id = ? AND NOT deleted
                ORDER BY lesson_order";
            let rows = sqlx::query(query_str)
                .bind(course_id.to_string())
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Lesson::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the live course `id` along with its live lessons.
pub(crate) async fn get_course(ex: &mut Executor, id: CourseId) -> DbResult<Course> {
    let course = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM courses WHERE id = $1 AND NOT deleted";
            let row = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Course::try_from(row)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM courses WHERE id = ? AND NOT deleted";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Course::try_from(row)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let lessons = get_course_lessons(ex, id).await?;
    Ok(course.with_lessons(lessons))
}

/// Checks that the live course `id` exists.
pub(crate) async fn ensure_course_exists(ex: &mut Executor, id: CourseId) -> DbResult<()> {
    let found = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT id FROM courses WHERE id = $1 AND NOT deleted";
            sqlx::query(query_str)
                .bind(*id.as_uuid())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .is_some()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT id FROM courses WHERE id = ? AND NOT deleted";
            sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .is_some()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    if found { Ok(()) } else { Err(DbError::NotFound) }
}

/// Gets one page of live courses, newest first, optionally restricted to those with `status`.
///
/// Returns the courses in the page along with the number of courses across all pages.
pub(crate) async fn list_courses(
    ex: &mut Executor,
    status: Option<CourseStatus>,
    page: PageRequest,
) -> DbResult<(Vec<Course>, u64)> {
    let status = status.map(|s| s.as_str());
    let limit = u64_to_param(u64::from(page.size()))?;
    let offset = u64_to_param(page.offset())?;

    let (courses, total) = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT COUNT(*) AS total FROM courses
                WHERE NOT deleted AND ($1::VARCHAR IS NULL OR status = $1)";
            let row = sqlx::query(query_str)
                .bind(status)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let total: i64 = row.try_get("total").map_err(postgres::map_sqlx_error)?;

            let query_str = "
                SELECT * FROM courses
                WHERE NOT deleted AND ($1::VARCHAR IS NULL OR status = $1)
                ORDER BY created DESC, id
                LIMIT $2 OFFSET $3";
            let rows = sqlx::query(query_str)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let courses = rows.into_iter().map(Course::try_from).collect::<DbResult<Vec<_>>>()?;
            (courses, total)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT COUNT(*) AS total FROM courses
                WHERE NOT deleted AND (?1 IS NULL OR status = ?1)";
            let row = sqlx::query(query_str)
                .bind(status)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let total: i64 = row.try_get("total").map_err(sqlite::map_sqlx_error)?;

            let query_str = "
                SELECT * FROM courses
                WHERE NOT deleted AND (?1 IS NULL OR status = ?1)
                ORDER BY created_secs DESC, created_nsecs DESC, id
                LIMIT ?2 OFFSET ?3";
            let rows = sqlx::query(query_str)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let courses = rows.into_iter().map(Course::try_from).collect::<DbResult<Vec<_>>>()?;
            (courses, total)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut result = Vec::with_capacity(courses.len());
    for course in courses {
        let lessons = get_course_lessons(ex, *course.id()).await?;
        result.push(course.with_lessons(lessons));
    }
    Ok((result, count_to_u64(total)?))
}

/// Changes the title of the live course `id`.
pub(crate) async fn update_course_title(
    ex: &mut Executor,
    id: CourseId,
    title: &Title,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE courses SET title = $1 WHERE id = $2 AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(title.as_str())
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE courses SET title = ? WHERE id = ? AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(title.as_str())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Changes the publication status of the live course `id`.
pub(crate) async fn update_course_status(
    ex: &mut Executor,
    id: CourseId,
    status: CourseStatus,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE courses SET status = $1 WHERE id = $2 AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(status.as_str())
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE courses SET status = ? WHERE id = ? AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(status.as_str())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Marks the live course `id` as deleted.  Its lessons are left untouched.
pub(crate) async fn soft_delete_course(ex: &mut Executor, id: CourseId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE courses SET deleted = TRUE WHERE id = $1 AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE courses SET deleted = TRUE WHERE id = ? AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Physically removes the course `id` and all of its lessons, whether deleted or not.
pub(crate) async fn hard_delete_course(ex: &mut Executor, id: CourseId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query("DELETE FROM lessons WHERE course_id = $1")
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let done = sqlx::query("DELETE FROM courses WHERE id = $1")
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            sqlx::query("DELETE FROM lessons WHERE course_id = ?")
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let done = sqlx::query("DELETE FROM courses WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Counts the live lessons of the course `course_id`.
pub(crate) async fn count_course_lessons(ex: &mut Executor, course_id: CourseId) -> DbResult<u64> {
    let count: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "SELECT COUNT(*) AS count FROM lessons WHERE course_id = $1 AND NOT deleted";
            let row = sqlx::query(query_str)
                .bind(*course_id.as_uuid())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str =
                "SELECT COUNT(*) AS count FROM lessons WHERE course_id = ? AND NOT deleted";
            let row = sqlx::query(query_str)
                .bind(course_id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    count_to_u64(count)
}

/// Computes aggregate counters over the live courses and their live lessons.
pub(crate) async fn get_metrics(ex: &mut Executor) -> DbResult<CourseMetrics> {
    let courses_query = "
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN status = 'Published' THEN 1 ELSE 0 END), 0) AS published,
            COALESCE(SUM(CASE WHEN status = 'Draft' THEN 1 ELSE 0 END), 0) AS draft
        FROM courses
        WHERE NOT deleted";
    let lessons_query = "
        SELECT COUNT(*) AS total
        FROM lessons JOIN courses ON lessons.course_id = courses.id
        WHERE NOT lessons.deleted AND NOT courses.deleted";

    let (total, published, draft, lessons): (i64, i64, i64, i64) = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query(courses_query)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let total = row.try_get("total").map_err(postgres::map_sqlx_error)?;
            let published = row.try_get("published").map_err(postgres::map_sqlx_error)?;
            let draft = row.try_get("draft").map_err(postgres::map_sqlx_error)?;

            let row = sqlx::query(lessons_query)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let lessons = row.try_get("total").map_err(postgres::map_sqlx_error)?;

            (total, published, draft, lessons)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row = sqlx::query(courses_query)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let total = row.try_get("total").map_err(sqlite::map_sqlx_error)?;
            let published = row.try_get("published").map_err(sqlite::map_sqlx_error)?;
            let draft = row.try_get("draft").map_err(sqlite::map_sqlx_error)?;

            let row = sqlx::query(lessons_query)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let lessons = row.try_get("total").map_err(sqlite::map_sqlx_error)?;

            (total, published, draft, lessons)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(CourseMetrics {
        total_courses: count_to_u64(total)?,
        published_courses: count_to_u64(published)?,
        draft_courses: count_to_u64(draft)?,
        total_lessons: count_to_u64(lessons)?,
    })
}

/// Creates a new lesson in the course `course_id` at position `order`.
///
/// Fails with `NotFound` if the course does not exist and with `AlreadyExists` if another live
/// lesson of the course already has `order`.
pub(crate) async fn create_lesson(
    ex: &mut Executor,
    id: LessonId,
    course_id: CourseId,
    title: Title,
    order: LessonOrder,
) -> DbResult<Lesson> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "INSERT INTO lessons (id, course_id, title, lesson_order) VALUES ($1, $2, $3, $4)";
            let done = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .bind(*course_id.as_uuid())
                .bind(title.as_str())
                .bind(order.as_i32())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str =
                "INSERT INTO lessons (id, course_id, title, lesson_order) VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(course_id.to_string())
                .bind(title.as_str())
                .bind(order.as_i32())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)?;

    Ok(Lesson::new(id, course_id, title, order))
}

/// Gets the live lesson `id`.
pub(crate) async fn get_lesson(ex: &mut Executor, id: LessonId) -> DbResult<Lesson> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM lessons WHERE id = $1 AND NOT deleted";
            let row = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Lesson::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM lessons WHERE id = ? AND NOT deleted";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Lesson::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Checks if a live lesson other than `except` already holds `order` in the course `course_id`.
pub(crate) async fn is_order_taken(
    ex: &mut Executor,
    course_id: CourseId,
    order: LessonOrder,
    except: Option<LessonId>,
) -> DbResult<bool> {
    let ids: Vec<String> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id FROM lessons
                WHERE course_id = $1 AND lesson_order = $2 AND NOT deleted";
            let rows = sqlx::query(query_str)
                .bind(*course_id.as_uuid())
                .bind(order.as_i32())
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let mut ids = Vec::with_capacity(rows.len());
            for row in rows {
                let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
                ids.push(id.to_string());
            }
            ids
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id FROM lessons
                WHERE course_id = ? AND lesson_order = ? AND NOT deleted";
            let rows = sqlx::query(query_str)
                .bind(course_id.to_string())
                .bind(order.as_i32())
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let mut ids = Vec::with_capacity(rows.len());
            for row in rows {
                ids.push(row.try_get("id").map_err(sqlite::map_sqlx_error)?);
            }
            ids
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let except = except.map(|id| id.to_string());
    Ok(ids.iter().any(|id| Some(id) != except.as_ref()))
}

/// Replaces the course, title and order of the live lesson `id`.
pub(crate) async fn update_lesson(
    ex: &mut Executor,
    id: LessonId,
    course_id: CourseId,
    title: &Title,
    order: LessonOrder,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE lessons SET course_id = $1, title = $2, lesson_order = $3
                WHERE id = $4 AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(*course_id.as_uuid())
                .bind(title.as_str())
                .bind(order.as_i32())
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE lessons SET course_id = ?, title = ?, lesson_order = ?
                WHERE id = ? AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(course_id.to_string())
                .bind(title.as_str())
                .bind(order.as_i32())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Marks the live lesson `id` as deleted, which frees its order for other lessons.
pub(crate) async fn soft_delete_lesson(ex: &mut Executor, id: LessonId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE lessons SET deleted = TRUE WHERE id = $1 AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE lessons SET deleted = TRUE WHERE id = ? AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Finds the live lesson of the same course that sits right before or after `lesson`.
pub(crate) async fn get_neighbor_lesson(
    ex: &mut Executor,
    lesson: &Lesson,
    neighbor: Neighbor,
) -> DbResult<Option<Lesson>> {
    let (cmp, direction) = match neighbor {
        Neighbor::Previous => ("<", "DESC"),
        Neighbor::Next => (">", "ASC"),
    };

    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "SELECT * FROM lessons
                WHERE course_id = $1 AND NOT deleted AND lesson_order {} $2
                ORDER BY lesson_order {} LIMIT 1",
                cmp, direction
            );
            let row = sqlx::query(&query_str)
                .bind(*lesson.course_id().as_uuid())
                .bind(lesson.order().as_i32())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Lesson::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "SELECT * FROM lessons
                WHERE course_id = ? AND NOT deleted AND lesson_order {} ?
                ORDER BY lesson_order {} LIMIT 1",
                cmp, direction
            );
            let row = sqlx::query(&query_str)
                .bind(lesson.course_id().to_string())
                .bind(lesson.order().as_i32())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Lesson::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Sets the order of the live lesson `id` to the raw value `order`.
async fn set_raw_lesson_order(ex: &mut Executor, id: LessonId, order: i32) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE lessons SET lesson_order = $1 WHERE id = $2 AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(order)
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE lessons SET lesson_order = ? WHERE id = ? AND NOT deleted";
            let done = sqlx::query(query_str)
                .bind(order)
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Moves the live lesson `id` out of the way by giving it a temporary order that no other lesson
/// can hold.  The caller must assign a real order to the lesson before committing.
pub(crate) async fn park_lesson(ex: &mut Executor, id: LessonId) -> DbResult<()> {
    set_raw_lesson_order(ex, id, PARKED_ORDER).await
}

/// Sets the order of the live lesson `id`.
pub(crate) async fn set_lesson_order(
    ex: &mut Executor,
    id: LessonId,
    order: LessonOrder,
) -> DbResult<()> {
    set_raw_lesson_order(ex, id, order.as_i32()).await
}
