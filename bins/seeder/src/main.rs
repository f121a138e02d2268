//! Database seeder for IT budget development and testing.
//!
//! Seeds an admin, a regular user, and a handful of OPEX and CAPEX plans with
//! transactions for the current year. Plans go through the repositories, so
//! they receive real display IDs.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

use itbudget_core::auth::hash_password;
use itbudget_core::budget::{BudgetType, PlanClassification, TransactionStatus};
use itbudget_db::entities::{budget_plans, sea_orm_active_enums::UserRole};
use itbudget_db::repositories::{
    CreatePlanInput, CreateTransactionInput, CreateUserInput, PlanRepository,
    TransactionRepository, UserRepository,
};

const ADMIN_EMAIL: &str = "admin@itbudget.local";
const USER_EMAIL: &str = "user@itbudget.local";
/// Satisfies the default password policy.
const DEFAULT_PASSWORD: &str = "ChangeMe123";

/// (category, coa, component, planned, spent)
const OPEX_PLANS: &[(&str, &str, &str, i64, &[i64])] = &[
    ("Software Licenses", "6100", "Office Suite", 120_000_000, &[45_000_000, 30_000_000]),
    ("Software Licenses", "6100", "Design Tools", 40_000_000, &[12_500_000]),
    ("Cloud Services", "6200", "Compute", 250_000_000, &[90_000_000, 85_000_000, 60_000_000]),
    ("Network", "6300", "Internet Uplink", 60_000_000, &[]),
];

/// (item_code, description, capex_number, planned, spent)
const CAPEX_PLANS: &[(&str, &str, &str, i64, &[i64])] = &[
    ("SRV-01", "Rack servers for the data room", "CX-001", 500_000_000, &[480_000_000]),
    ("LAP-02", "Developer laptop refresh", "CX-002", 300_000_000, &[150_000_000]),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = itbudget_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    let admin_id = seed_user(&db, ADMIN_EMAIL, "Budget Admin", UserRole::Admin).await;
    seed_user(&db, USER_EMAIL, "Budget User", UserRole::User).await;

    println!("Seeding budget plans...");
    seed_plans(&db, admin_id).await;

    println!("Seeding complete!");
}

/// Creates a user unless the email is taken; returns the user's ID.
async fn seed_user(db: &DatabaseConnection, email: &str, name: &str, role: UserRole) -> Uuid {
    let repo = UserRepository::new(db.clone());
    if let Some(existing) = repo.find_by_email(email).await.expect("Failed to query users") {
        println!("  {email} already exists, skipping...");
        return existing.id;
    }

    let password_hash = hash_password(DEFAULT_PASSWORD).expect("Failed to hash password");
    let user = repo
        .create_user(
            CreateUserInput {
                email: email.to_string(),
                full_name: name.to_string(),
                password_hash,
                role,
            },
            Utc::now(),
        )
        .await
        .expect("Failed to insert user");

    println!("  Created {email} (password: {DEFAULT_PASSWORD})");
    user.id
}

/// Seeds sample plans for the current year when the table is empty.
async fn seed_plans(db: &DatabaseConnection, admin_id: Uuid) {
    let existing = budget_plans::Entity::find()
        .count(db)
        .await
        .expect("Failed to count plans");
    if existing > 0 {
        println!("  {existing} plans already exist, skipping...");
        return;
    }

    let year = Utc::now().year();
    let plans = PlanRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());

    let opex = OPEX_PLANS
        .iter()
        .map(|&(category, coa, component, planned, spent)| {
            (
                PlanClassification::Opex {
                    coa: Some(coa.to_string()),
                    category: Some(category.to_string()),
                    component: Some(component.to_string()),
                },
                planned,
                spent,
            )
        });
    let capex = CAPEX_PLANS
        .iter()
        .map(|&(item_code, description, capex_number, planned, spent)| {
            (
                PlanClassification::Capex {
                    item_code: Some(item_code.to_string()),
                    item_description: Some(description.to_string()),
                    capex_number: Some(capex_number.to_string()),
                },
                planned,
                spent,
            )
        });

    for (classification, planned, spent) in opex.chain(capex) {
        let budget_type: BudgetType = classification.budget_type();
        let plan = plans
            .create_plan(
                CreatePlanInput {
                    year,
                    planned_amount: Decimal::from(planned),
                    classification,
                    created_by: admin_id,
                },
                Utc::now(),
            )
            .await
            .expect("Failed to create plan");
        println!("  Created {} ({planned})", plan.display_id);

        for (i, &amount) in spent.iter().enumerate() {
            let day = u32::try_from(i + 1).unwrap_or(1);
            let transaction = transactions
                .create_transaction(
                    CreateTransactionInput {
                        budget_plan_id: plan.id,
                        budget_type,
                        amount: Decimal::from(amount),
                        status: TransactionStatus::Paid,
                        description: format!("Invoice {}", i + 1),
                        vendor: Some("Sample Vendor".to_string()),
                        transaction_date: NaiveDate::from_ymd_opt(year, 1, day)
                            .unwrap_or_else(|| Utc::now().date_naive()),
                        created_by: admin_id,
                    },
                    Utc::now(),
                )
                .await
                .expect("Failed to create transaction");
            println!("    Recorded {} ({amount})", transaction.display_id);
        }
    }
}
