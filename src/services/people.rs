//! People service: member and librarian registration and rosters

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        debt::Debt,
        person::{CreatePerson, Person, Role},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PeopleService {
    repository: Repository,
}

impl PeopleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a person under the given role
    pub async fn register(&self, role: Role, person: CreatePerson) -> AppResult<Person> {
        person
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let created = self.repository.people.create(role, &person).await?;
        tracing::info!("Registered {} {} (person {})", role, created.dni, created.id);
        Ok(created)
    }

    /// List people of one role
    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<Person>> {
        self.repository.people.list_by_role(role).await
    }

    /// Debts of one person; the person must exist
    pub async fn debts_for_person(
        &self,
        person_id: i32,
        only_unpaid: bool,
    ) -> AppResult<Vec<Debt>> {
        // Verify the person exists
        self.repository.people.get_by_id(person_id).await?;
        self.repository.debts.for_person(person_id, only_unpaid).await
    }
}
