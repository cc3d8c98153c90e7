//! Shared fixture: users with tokens and sessions.

#![allow(dead_code)]

use quarry::{Catalog, ColumnType, DryRun, Entity, Model, Relation};
use std::sync::Arc;

pub const USER_ID: &str = "01HH1QP44SYMMHTFTESFVNW770";
pub const USER_NAME: &str = "Fulanito Pérez";
pub const USER_EMAIL: &str = "fulanito.perez@domain.example";

pub fn users() -> Entity {
    Entity::new("users")
        .schema("public")
        .primary_key("user_id")
        .column("user_id", ColumnType::Varchar)
        .column("user_name", ColumnType::Varchar)
        .column("user_email", ColumnType::Varchar)
        .column("user_password", ColumnType::Varchar)
        .column("user_age", ColumnType::Integer)
        .column("user_min_credit", ColumnType::Integer)
        .column("user_max_credit", ColumnType::Integer)
        .column("created_at", ColumnType::Timestamp)
        .column("updated_at", ColumnType::Timestamp)
        .relation(Relation::new("tokens", "tokens", "token_tokenable_id", "user_id"))
        .relation(Relation::new("sessions", "sessions", "session_iduser", "user_id"))
}

pub fn tokens() -> Entity {
    Entity::new("tokens")
        .schema("public")
        .primary_key("token_id")
        .column("token_id", ColumnType::Varchar)
        .column("token_tokenable_type", ColumnType::Varchar)
        .column("token_tokenable_id", ColumnType::Varchar)
        .column("token_device", ColumnType::Varchar)
        .column("token_ip", ColumnType::Varchar)
        .column("token_data", ColumnType::Varchar)
        .column("token_abilities", ColumnType::Varchar)
        .column("last_used_at", ColumnType::Timestamp)
        .column("expires_at", ColumnType::Timestamp)
        .column("created_at", ColumnType::Timestamp)
        .column("updated_at", ColumnType::Timestamp)
}

pub fn sessions() -> Entity {
    Entity::new("sessions")
        .schema("public")
        .primary_key("session_id")
        .column("session_id", ColumnType::Varchar)
        .column("session_iduser", ColumnType::Varchar)
        .column("session_ipaddress", ColumnType::Varchar)
        .column("session_useragent", ColumnType::Varchar)
        .column("session_payload", ColumnType::Varchar)
        .column("session_last_activity", ColumnType::Timestamp)
}

pub fn catalog() -> Arc<Catalog> {
    let catalog = Catalog::new()
        .with(users())
        .and_then(|c| c.with(tokens()))
        .and_then(|c| c.with(sessions()))
        .expect("fixture catalog");
    catalog.validate().expect("fixture catalog is consistent");
    Arc::new(catalog)
}

/// A users model that captures SQL instead of running it.
pub fn user_model() -> Model<DryRun> {
    Model::new(catalog(), "users", DryRun::new())
        .expect("users entity")
        .debug(true)
}

/// Every users column, qualified, in declaration order.
pub const USER_COLUMNS: &str = "public.users.user_id, public.users.user_name, public.users.user_email, \
public.users.user_password, public.users.user_age, public.users.user_min_credit, \
public.users.user_max_credit, public.users.created_at, public.users.updated_at";

/// The select list shared by the WHERE tests.
pub const WHERE_SELECT: &str = "SELECT public.users.user_id, public.users.user_email AS email, \
public.users.user_name, public.users.user_password FROM public.users";

pub const WHERE_COLUMNS: [&str; 4] = ["user_id", "user_email AS email", "user_name", "user_password"];
