//! Wiring of the production adapters.

use std::sync::Arc;

use crate::{
    adapters::{clock::SystemClock, database::postgres::PostgresDatabase},
    commands::DomainLogic,
    config::Config,
};

pub type ProductionDomainLogic = DomainLogic<PostgresDatabase, PostgresDatabase, SystemClock>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database connection error: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("database migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect to PostgreSQL, apply migrations and build the domain logic on top of it
pub async fn make_domain_logic(config: &Config) -> Result<ProductionDomainLogic, Error> {
    let database = PostgresDatabase::connect(&config.database).await?;
    database.migrate().await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        "connected to the database"
    );

    let database = Arc::new(database);
    Ok(DomainLogic::new(
        database.clone(),
        database,
        Arc::new(SystemClock),
    ))
}
