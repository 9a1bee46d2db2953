//! People repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::person::{CreatePerson, Person, PersonRow, Role},
    repository::is_unique_violation,
};

#[derive(Clone)]
pub struct PeopleRepository {
    pool: Pool<Postgres>,
}

impl PeopleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Register a person under the given role, allocating the next
    /// role-scoped identifier. The counter update and the insert share one
    /// transaction: the counter row lock serializes concurrent registrations
    /// per role, and a dni conflict rolls the allocation back, so numbers
    /// stay gap-free and monotonic.
    pub async fn create(&self, role: Role, person: &CreatePerson) -> AppResult<Person> {
        let mut tx = self.pool.begin().await?;

        let number: i32 = sqlx::query_scalar(
            r#"
            UPDATE role_counters
            SET next_value = next_value + 1
            WHERE role_id = $1
            RETURNING next_value - 1
            "#,
        )
        .bind(role.id())
        .fetch_one(&mut *tx)
        .await?;

        let identifier = format!("{}-{:05}", role.identifier_prefix(), number);
        let (member_id, enrollment) = match role {
            Role::Member => (Some(identifier), None),
            Role::Librarian => (None, Some(identifier)),
        };

        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            INSERT INTO people (name, lastname, dni, role_id, member_id, enrollment_librarian)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, lastname, dni, role_id, member_id, enrollment_librarian
            "#,
        )
        .bind(&person.name)
        .bind(&person.lastname)
        .bind(&person.dni)
        .bind(role.id())
        .bind(&member_id)
        .bind(&enrollment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "people_dni_key") {
                AppError::Conflict(format!(
                    "A person with dni {} is already registered",
                    person.dni
                ))
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;

        row.try_into()
    }

    /// Get person by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Person> {
        sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, name, lastname, dni, role_id, member_id, enrollment_librarian
            FROM people
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))?
        .try_into()
    }

    /// List people of one role, insertion order
    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, name, lastname, dni, role_id, member_id, enrollment_librarian
            FROM people
            WHERE role_id = $1
            ORDER BY id
            "#,
        )
        .bind(role.id())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Person::try_from).collect()
    }
}
