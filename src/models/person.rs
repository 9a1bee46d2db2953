//! Person model: members and librarians share the roster, the role decides
//! which identifier they carry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;

/// Roster roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Member,
    Librarian,
}

impl Role {
    /// Numeric role id as stored and served (1 = member, 2 = librarian)
    pub fn id(self) -> i16 {
        match self {
            Role::Member => 1,
            Role::Librarian => 2,
        }
    }

    pub fn from_id(id: i16) -> Option<Role> {
        match id {
            1 => Some(Role::Member),
            2 => Some(Role::Librarian),
            _ => None,
        }
    }

    /// Prefix of the role-scoped identifier (SOC-00001, BIB-00001, ...)
    pub fn identifier_prefix(self) -> &'static str {
        match self {
            Role::Member => "SOC",
            Role::Librarian => "BIB",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Librarian => write!(f, "librarian"),
        }
    }
}

/// Role-scoped identifier. Exactly one variant exists per person, so "member
/// number or enrollment number, never both" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleIdentifier {
    Member { member_id: String },
    Librarian { enrollment: String },
}

impl RoleIdentifier {
    pub fn role(&self) -> Role {
        match self {
            RoleIdentifier::Member { .. } => Role::Member,
            RoleIdentifier::Librarian { .. } => Role::Librarian,
        }
    }
}

/// Person domain model
#[derive(Debug, Clone)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub dni: String,
    pub identifier: RoleIdentifier,
}

impl Person {
    pub fn role(&self) -> Role {
        self.identifier.role()
    }
}

/// Internal row structure for database queries (nullable identifier columns)
#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub dni: String,
    pub role_id: i16,
    pub member_id: Option<String>,
    pub enrollment_librarian: Option<String>,
}

impl TryFrom<PersonRow> for Person {
    type Error = AppError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let identifier = match (Role::from_id(row.role_id), row.member_id, row.enrollment_librarian) {
            (Some(Role::Member), Some(member_id), None) => RoleIdentifier::Member { member_id },
            (Some(Role::Librarian), None, Some(enrollment)) => {
                RoleIdentifier::Librarian { enrollment }
            }
            _ => {
                return Err(AppError::Internal(format!(
                    "Person row {} has inconsistent role data",
                    row.id
                )))
            }
        };
        Ok(Person {
            id: row.id,
            name: row.name,
            lastname: row.lastname,
            dni: row.dni,
            identifier,
        })
    }
}

/// Person wire representation consumed by the front-end: exactly one of
/// `member_id` / `enrollment_librarian` is non-null.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonResponse {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub dni: String,
    pub member_id: Option<String>,
    pub enrollment_librarian: Option<String>,
    pub role_id: i16,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        let role_id = person.role().id();
        let (member_id, enrollment_librarian) = match person.identifier {
            RoleIdentifier::Member { member_id } => (Some(member_id), None),
            RoleIdentifier::Librarian { enrollment } => (None, Some(enrollment)),
        };
        PersonResponse {
            id: person.id,
            name: person.name,
            lastname: person.lastname,
            dni: person.dni,
            member_id,
            enrollment_librarian,
            role_id,
        }
    }
}

/// Register person request (role comes from the endpoint)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePerson {
    #[validate(length(min = 1, max = 250, message = "name must be 1-250 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 250, message = "lastname must be 1-250 characters"))]
    pub lastname: String,
    #[validate(length(min = 1, max = 9, message = "dni must be 1-9 characters"))]
    pub dni: String,
}

/// Query parameters for the person debts listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct PersonDebtsQuery {
    #[serde(rename = "onlyUnpaid")]
    pub only_unpaid: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_row() -> PersonRow {
        PersonRow {
            id: 1,
            name: "Ana".into(),
            lastname: "García".into(),
            dni: "12345678A".into(),
            role_id: 1,
            member_id: Some("SOC-00001".into()),
            enrollment_librarian: None,
        }
    }

    #[test]
    fn member_row_converts_to_member() {
        let person = Person::try_from(member_row()).unwrap();
        assert_eq!(person.role(), Role::Member);
        assert_eq!(
            person.identifier,
            RoleIdentifier::Member {
                member_id: "SOC-00001".into()
            }
        );
    }

    #[test]
    fn row_with_both_identifiers_is_rejected() {
        let mut row = member_row();
        row.enrollment_librarian = Some("BIB-00001".into());
        assert!(Person::try_from(row).is_err());
    }

    #[test]
    fn row_with_unknown_role_is_rejected() {
        let mut row = member_row();
        row.role_id = 9;
        assert!(Person::try_from(row).is_err());
    }

    #[test]
    fn response_populates_exactly_one_identifier() {
        let member = Person::try_from(member_row()).unwrap();
        let response = PersonResponse::from(member);
        assert_eq!(response.role_id, 1);
        assert!(response.member_id.is_some());
        assert!(response.enrollment_librarian.is_none());

        let librarian = Person {
            id: 2,
            name: "Luis".into(),
            lastname: "Pérez".into(),
            dni: "87654321B".into(),
            identifier: RoleIdentifier::Librarian {
                enrollment: "BIB-00001".into(),
            },
        };
        let response = PersonResponse::from(librarian);
        assert_eq!(response.role_id, 2);
        assert!(response.member_id.is_none());
        assert!(response.enrollment_librarian.is_some());
    }

    #[test]
    fn create_person_rejects_overlong_dni() {
        let person = CreatePerson {
            name: "Ana".into(),
            lastname: "García".into(),
            dni: "1234567890".into(),
        };
        assert!(person.validate().is_err());
    }
}
