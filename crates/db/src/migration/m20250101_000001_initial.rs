//! Initial database migration.
//!
//! Creates the enums, users, budget plans, budget transactions and the
//! display-ID counter table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BUDGET_PLANS_SQL).await?;
        db.execute_unprepared(BUDGET_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(DISPLAY_ID_COUNTERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE budget_type AS ENUM ('opex', 'capex');
CREATE TYPE budget_transaction_status AS ENUM ('draft', 'submitted', 'approved', 'paid', 'cancelled');
CREATE TYPE user_role AS ENUM ('admin', 'user');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'user',
    is_active BOOLEAN NOT NULL DEFAULT true,
    password_changed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_email_lowercase CHECK (email = lower(email))
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const BUDGET_PLANS_SQL: &str = r"
CREATE TABLE budget_plans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    display_id VARCHAR(20) NOT NULL UNIQUE,
    budget_type budget_type NOT NULL,
    year INTEGER NOT NULL,
    planned_amount NUMERIC(20, 0) NOT NULL,
    realized_amount NUMERIC(20, 0) NOT NULL DEFAULT 0,
    remaining_amount NUMERIC(20, 0) NOT NULL,

    -- OPEX classification
    coa VARCHAR(100),
    category VARCHAR(255),
    component VARCHAR(255),

    -- CAPEX classification
    item_code VARCHAR(100),
    item_description TEXT,
    capex_number VARCHAR(100),

    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_planned_non_negative CHECK (planned_amount >= 0),
    CONSTRAINT chk_remaining_balance CHECK (remaining_amount = planned_amount - realized_amount)
);

CREATE INDEX idx_budget_plans_type_year ON budget_plans(budget_type, year);
CREATE INDEX idx_budget_plans_display_id ON budget_plans(budget_type, display_id DESC);
CREATE INDEX idx_budget_plans_category ON budget_plans(category) WHERE category IS NOT NULL;
";

const BUDGET_TRANSACTIONS_SQL: &str = r"
CREATE TABLE budget_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    display_id VARCHAR(24) NOT NULL UNIQUE,
    budget_plan_id UUID NOT NULL REFERENCES budget_plans(id) ON DELETE CASCADE,
    budget_type budget_type NOT NULL,
    amount NUMERIC(20, 0) NOT NULL,
    status budget_transaction_status NOT NULL DEFAULT 'draft',
    description TEXT NOT NULL,
    vendor VARCHAR(255),
    transaction_date DATE NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_budget_transactions_plan ON budget_transactions(budget_plan_id);
CREATE INDEX idx_budget_transactions_display_id ON budget_transactions(budget_type, display_id DESC);
";

const DISPLAY_ID_COUNTERS_SQL: &str = r"
CREATE TABLE display_id_counters (
    sequence VARCHAR(32) NOT NULL,
    year_prefix CHAR(2) NOT NULL,
    last_value INTEGER NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    PRIMARY KEY (sequence, year_prefix),
    CONSTRAINT chk_last_value_positive CHECK (last_value > 0)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS display_id_counters CASCADE;
DROP TABLE IF EXISTS budget_transactions CASCADE;
DROP TABLE IF EXISTS budget_plans CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS user_role CASCADE;
DROP TYPE IF EXISTS budget_transaction_status CASCADE;
DROP TYPE IF EXISTS budget_type CASCADE;
";
