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

//! Database abstraction to manipulate users and their roles.

use crate::model::{HashedPassword, Role, User, UserId};
#[cfg(feature = "postgres")]
use coursedesk_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use coursedesk_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use coursedesk_core::db::{DbError, DbResult, Executor, ensure_one_row};
use coursedesk_core::model::EmailAddress;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;
#[cfg(feature = "postgres")]
use uuid::Uuid;

#[cfg(test)]
mod tests;

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

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for User {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(postgres::map_sqlx_error)?;
        let created: OffsetDateTime = row.try_get("created").map_err(postgres::map_sqlx_error)?;
        let last_login: Option<OffsetDateTime> =
            row.try_get("last_login").map_err(postgres::map_sqlx_error)?;

        let mut user = User::new(
            UserId::from(id),
            EmailAddress::new(email)?,
            HashedPassword::new(password),
            created,
        );
        if let Some(last_login) = last_login {
            user = user.with_last_login(last_login);
        }
        Ok(user)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(sqlite::map_sqlx_error)?;
        let created_secs: i64 = row.try_get("created_secs").map_err(sqlite::map_sqlx_error)?;
        let created_nsecs: i64 = row.try_get("created_nsecs").map_err(sqlite::map_sqlx_error)?;
        let last_login_secs: Option<i64> =
            row.try_get("last_login_secs").map_err(sqlite::map_sqlx_error)?;
        let last_login_nsecs: Option<i64> =
            row.try_get("last_login_nsecs").map_err(sqlite::map_sqlx_error)?;

        let mut user = User::new(
            UserId::parse(&id)?,
            EmailAddress::new(email)?,
            HashedPassword::new(password),
            build_timestamp(created_secs, created_nsecs)?,
        );
        match (last_login_secs, last_login_nsecs) {
            (Some(secs), Some(nsecs)) => user = user.with_last_login(build_timestamp(secs, nsecs)?),
            (None, None) => (),
            (_, _) => {
                return Err(DbError::DataIntegrityError(
                    "Inconsistent values for last_login".to_owned(),
                ));
            }
        }
        Ok(user)
    }
}

/// Creates a new user identified by `id` with an `email` address and a `password` in hashed form.
/// The user is created without roles and as not having logged in.
pub async fn create_user(
    ex: &mut Executor,
    id: UserId,
    email: EmailAddress,
    password: HashedPassword,
    created: OffsetDateTime,
) -> DbResult<User> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "INSERT INTO users (id, email, password, created) VALUES ($1, $2, $3, $4)";
            let done = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .bind(email.as_str())
                .bind(password.as_str())
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
                INSERT INTO users (id, email, password, created_secs, created_nsecs)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(email.as_str())
                .bind(password.as_str())
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

    Ok(User::new(id, email, password, created))
}

/// Grants `role` to the user identified by `id`.  Granting a role twice is an error.
pub async fn add_user_role(ex: &mut Executor, id: UserId, role: Role) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO user_roles (user_id, role) VALUES ($1, $2)";
            let done = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .bind(role.as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO user_roles (user_id, role) VALUES (?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(role.as_str())
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

/// Gets the roles granted to the user identified by `id`.
async fn get_user_roles(ex: &mut Executor, id: UserId) -> DbResult<Vec<Role>> {
    let raw_roles: Vec<String> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT role FROM user_roles WHERE user_id = $1";
            let rows = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            let mut raw_roles = Vec::with_capacity(rows.len());
            for row in rows {
                raw_roles.push(row.try_get("role").map_err(postgres::map_sqlx_error)?);
            }
            raw_roles
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT role FROM user_roles WHERE user_id = ?";
            let rows = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let mut raw_roles = Vec::with_capacity(rows.len());
            for row in rows {
                raw_roles.push(row.try_get("role").map_err(sqlite::map_sqlx_error)?);
            }
            raw_roles
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut roles = Vec::with_capacity(raw_roles.len());
    for raw_role in raw_roles {
        roles.push(Role::parse(&raw_role)?);
    }
    Ok(roles)
}

/// Gets information about an existing user with `email`, including its roles.
pub async fn get_user_by_email(ex: &mut Executor, email: &EmailAddress) -> DbResult<User> {
    let user = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM users WHERE email = $1";
            let raw_user = sqlx::query(query_str)
                .bind(email.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            User::try_from(raw_user)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM users WHERE email = ?";
            let raw_user = sqlx::query(query_str)
                .bind(email.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            User::try_from(raw_user)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let roles = get_user_roles(ex, user.id()).await?;
    Ok(roles.into_iter().fold(user, User::with_role))
}

/// Updates an existing user identified by `id` to record a new `last_login` time.
pub(crate) async fn update_last_login(
    ex: &mut Executor,
    id: UserId,
    last_login: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE users SET last_login = $1 WHERE id = $2";
            let done = sqlx::query(query_str)
                .bind(last_login)
                .bind(*id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (last_login_secs, last_login_nsecs) = unpack_timestamp(last_login)?;

            let query_str = "
                UPDATE users SET last_login_secs = ?, last_login_nsecs = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(last_login_secs)
                .bind(last_login_nsecs)
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
