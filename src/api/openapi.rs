//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, people, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblion API",
        version = "0.1.0",
        description = "Library Loan & Inventory Ledger REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        books::register_book,
        books::search_books,
        books::availability,
        books::available_books,
        // People
        people::register_member,
        people::register_librarian,
        people::list_members,
        people::list_librarians,
        people::person_debts,
        // Loans
        loans::create_loan,
        loans::active_loans,
        loans::return_loan,
        loans::pay_debt,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::Book,
            crate::models::book::Copy,
            crate::models::book::BookWithCopies,
            crate::models::book::CreateBook,
            crate::models::book::BookAvailability,
            crate::models::book::AvailableBook,
            crate::models::book::AvailableCopy,
            books::SearchBooksResponse,
            // People
            crate::models::person::PersonResponse,
            crate::models::person::CreatePerson,
            people::PersonResult,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            crate::models::loan::ActiveLoan,
            crate::models::loan::CopyWithBook,
            crate::models::loan::ReturnLoan,
            crate::models::loan::ReturnOutcome,
            loans::LoanResult,
            loans::ReturnResult,
            loans::DebtResult,
            // Debts
            crate::models::debt::Debt,
            // Stats
            stats::LedgerStats,
            stats::StatsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog and availability"),
        (name = "people", description = "Members and librarians"),
        (name = "loans", description = "Loans and debts"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
