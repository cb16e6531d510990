use sea_orm::Schema;
use sea_orm_migration::prelude::*;

pub mod failed_login_username {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "failed_login_usernames")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub username: String,
        pub occurred_at_utc: DateTime<Utc>,
        pub block_until_utc: Option<DateTime<Utc>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m00002_create_failed_login_username"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let builder = manager.get_database_backend();
        let schema = Schema::new(builder);

        manager
            .create_table(schema.create_table_from_entity(failed_login_username::Entity))
            .await?;

        // Block state is read per submitted username
        manager
            .create_index(
                Index::create()
                    .table(failed_login_username::Entity)
                    .name("idx_failed_login_usernames_username_occurred_at")
                    .col(Alias::new("username"))
                    .col(Alias::new("occurred_at_utc"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(failed_login_username::Entity)
                    .name("idx_failed_login_usernames_username_occurred_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(failed_login_username::Entity).to_owned())
            .await?;

        Ok(())
    }
}
