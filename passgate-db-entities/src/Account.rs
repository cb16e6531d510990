use chrono::{DateTime, Utc};
use passgate_common::{PassgateError, Secret};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_id: Uuid,
    #[sea_orm(unique)]
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Free text, see `passgate_common::AccountFlag`
    pub active: Option<String>,
    pub locked: Option<String>,
    pub failed_login_attempts: i32,
    pub block_until_utc: Option<DateTime<Utc>>,
    pub last_updated_utc: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for passgate_common::Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            external_id: model.external_id,
            employee_id: model.employee_id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash.map(Secret::new),
            active: model.active,
            locked: model.locked,
            failed_login_attempts: u32::try_from(model.failed_login_attempts).unwrap_or(0),
            block_until_utc: model.block_until_utc,
            last_updated_utc: model.last_updated_utc,
        }
    }
}

impl TryFrom<&passgate_common::Account> for ActiveModel {
    type Error = PassgateError;

    fn try_from(account: &passgate_common::Account) -> Result<Self, Self::Error> {
        if account.is_stand_in() {
            return Err(PassgateError::StandInAccount);
        }
        Ok(Self {
            id: Set(account.id),
            external_id: Set(account.external_id),
            employee_id: Set(account.employee_id.clone()),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            username: Set(account.username.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account
                .password_hash
                .as_ref()
                .map(|h| h.expose_secret().clone())),
            active: Set(account.active.clone()),
            locked: Set(account.locked.clone()),
            failed_login_attempts: Set(
                i32::try_from(account.failed_login_attempts).map_err(PassgateError::other)?
            ),
            block_until_utc: Set(account.block_until_utc),
            last_updated_utc: Set(account.last_updated_utc),
        })
    }
}
