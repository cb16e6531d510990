use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use passgate_common::{Account as AccountData, PassgateError};
use passgate_db_entities::{Account, FailedLoginUsername};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{AuthStore, FailedAttempt, FailedLoginRecord};
use crate::RateLimitPolicy;

pub struct DatabaseStore {
    db: Arc<Mutex<DatabaseConnection>>,
}

impl DatabaseStore {
    pub fn new(db: Arc<Mutex<DatabaseConnection>>) -> Self {
        Self { db }
    }

    async fn ensure_unique<C: ConnectionTrait>(
        db: &C,
        account: &AccountData,
    ) -> Result<(), PassgateError> {
        let checks = [
            (
                "external id",
                Account::Column::ExternalId.eq(account.external_id),
            ),
            (
                "employee id",
                Account::Column::EmployeeId.eq(account.employee_id.clone()),
            ),
            ("username", Account::Column::Username.eq(account.username.clone())),
            ("email", Account::Column::Email.eq(account.email.clone())),
        ];
        for (field, condition) in checks {
            let taken = Account::Entity::find()
                .filter(condition)
                .filter(Account::Column::Id.ne(account.id))
                .count(db)
                .await?
                > 0;
            if taken {
                return Err(PassgateError::DuplicateAccount(field));
            }
        }
        Ok(())
    }

    async fn append_entry<C: ConnectionTrait>(
        db: &C,
        username: &str,
        occurred_at_utc: DateTime<Utc>,
        block_until_utc: Option<DateTime<Utc>>,
    ) -> Result<(), PassgateError> {
        FailedLoginUsername::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_owned()),
            occurred_at_utc: Set(occurred_at_utc),
            block_until_utc: Set(block_until_utc),
        }
        .insert(db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthStore for DatabaseStore {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountData>, PassgateError> {
        let db = self.db.lock().await;
        Ok(Account::Entity::find()
            .filter(Account::Column::Username.eq(username))
            .one(&*db)
            .await?
            .map(Into::into))
    }

    async fn save_account(&self, account: &AccountData) -> Result<(), PassgateError> {
        let mut model = Account::ActiveModel::try_from(account)?;

        let db = self.db.lock().await;
        let txn = db.begin().await?;
        Self::ensure_unique(&txn, account).await?;

        match Account::Entity::find_by_id(account.id).one(&txn).await? {
            Some(existing) => {
                if existing.external_id != account.external_id {
                    return Err(PassgateError::ImmutableField("external id"));
                }
                // Rate-limit state is owned by record_failed_login and
                // reset_failed_logins; a stale copy must not roll it back
                model.failed_login_attempts = NotSet;
                model.block_until_utc = NotSet;
                if existing.last_updated_utc >= account.last_updated_utc {
                    model.last_updated_utc = NotSet;
                }
                model.update(&txn).await?;
            }
            None => {
                model.insert(&txn).await?;
            }
        }
        txn.commit().await?;
        Ok(())
    }

    async fn append_failed_attempt(
        &self,
        username: &str,
        occurred_at_utc: DateTime<Utc>,
        block_until_utc: Option<DateTime<Utc>>,
    ) -> Result<(), PassgateError> {
        let db = self.db.lock().await;
        Self::append_entry(&*db, username, occurred_at_utc, block_until_utc).await
    }

    async fn find_failed_attempts(
        &self,
        username: &str,
    ) -> Result<Vec<FailedAttempt>, PassgateError> {
        let db = self.db.lock().await;
        Ok(FailedLoginUsername::Entity::find()
            .filter(FailedLoginUsername::Column::Username.eq(username))
            .order_by_asc(FailedLoginUsername::Column::OccurredAtUtc)
            .all(&*db)
            .await?
            .into_iter()
            .map(|entry| FailedAttempt {
                username: entry.username,
                occurred_at_utc: entry.occurred_at_utc,
                block_until_utc: entry.block_until_utc,
            })
            .collect())
    }

    async fn latest_block_until(
        &self,
        username: &str,
    ) -> Result<Option<DateTime<Utc>>, PassgateError> {
        let db = self.db.lock().await;
        Ok(FailedLoginUsername::Entity::find()
            .select_only()
            .column_as(
                Expr::col(FailedLoginUsername::Column::BlockUntilUtc).max(),
                "block_until_utc",
            )
            .filter(FailedLoginUsername::Column::Username.eq(username))
            .into_tuple::<Option<DateTime<Utc>>>()
            .one(&*db)
            .await?
            .flatten())
    }

    async fn count_failed_attempts(&self, username: &str) -> Result<u64, PassgateError> {
        let db = self.db.lock().await;
        Ok(FailedLoginUsername::Entity::find()
            .filter(FailedLoginUsername::Column::Username.eq(username))
            .count(&*db)
            .await?)
    }

    async fn record_failed_login(
        &self,
        account_id: Option<Uuid>,
        username: &str,
        now: DateTime<Utc>,
        policy: &RateLimitPolicy,
    ) -> Result<FailedLoginRecord, PassgateError> {
        let db = self.db.lock().await;
        let txn = db.begin().await?;

        let failed_login_attempts = match account_id {
            Some(id) => {
                // Increment in SQL so concurrent writers never lose an update
                let result = Account::Entity::update_many()
                    .col_expr(
                        Account::Column::FailedLoginAttempts,
                        Expr::col(Account::Column::FailedLoginAttempts).add(1),
                    )
                    .col_expr(Account::Column::LastUpdatedUtc, Expr::value(now))
                    .filter(Account::Column::Id.eq(id))
                    .exec(&txn)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(PassgateError::AccountNotFound(id));
                }

                let account = Account::Entity::find_by_id(id)
                    .one(&txn)
                    .await?
                    .ok_or(PassgateError::AccountNotFound(id))?;
                u32::try_from(account.failed_login_attempts).unwrap_or(0)
            }
            None => {
                let previous = FailedLoginUsername::Entity::find()
                    .filter(FailedLoginUsername::Column::Username.eq(username))
                    .count(&txn)
                    .await?;
                u32::try_from(previous.saturating_add(1)).unwrap_or(u32::MAX)
            }
        };

        let block_until_utc = policy.block_until(failed_login_attempts, now);

        if let (Some(id), Some(block_until)) = (account_id, block_until_utc) {
            // Only ever moves the block later
            Account::Entity::update_many()
                .col_expr(Account::Column::BlockUntilUtc, Expr::value(block_until))
                .filter(Account::Column::Id.eq(id))
                .filter(
                    Condition::any()
                        .add(Account::Column::BlockUntilUtc.is_null())
                        .add(Account::Column::BlockUntilUtc.lt(block_until)),
                )
                .exec(&txn)
                .await?;
        }

        Self::append_entry(&txn, username, now, block_until_utc).await?;
        txn.commit().await?;

        debug!(
            username = %username,
            failed_login_attempts,
            block_until = ?block_until_utc,
            "Failed login recorded"
        );

        Ok(FailedLoginRecord {
            failed_login_attempts,
            block_until_utc,
        })
    }

    async fn reset_failed_logins(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), PassgateError> {
        let db = self.db.lock().await;
        Account::Entity::update_many()
            .col_expr(Account::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(
                Account::Column::BlockUntilUtc,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(Account::Column::LastUpdatedUtc, Expr::value(now))
            .filter(Account::Column::Id.eq(account_id))
            .exec(&*db)
            .await?;
        debug!(%account_id, "Failed login counter reset");
        Ok(())
    }
}
