use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use sea_orm_migration::MigrationTrait;
use tracing::info;

mod m00001_create_account;
mod m00002_create_failed_login_username;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m00001_create_account::Migration),
            Box::new(m00002_create_failed_login_username::Migration),
        ]
    }
}

pub async fn migrate_database(connection: &DatabaseConnection) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(connection).await?.len();
    if pending > 0 {
        info!(pending, "Applying database migrations");
    }
    Migrator::up(connection, None).await
}
