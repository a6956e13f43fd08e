use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::domain::{ApiKey, ApiKeyRepositoryInterface, DomainError, DomainResult};
use crate::infrastructure::database::entities::api_key;

pub struct ApiKeyRepository {
    db: DatabaseConnection,
}

impl ApiKeyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn key_model_to_domain(model: api_key::Model) -> ApiKey {
    ApiKey {
        id: model.id,
        user_id: model.user_id,
        token_hash: model.token_hash,
        prefix: model.prefix,
        created_at: model.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[async_trait]
impl ApiKeyRepositoryInterface for ApiKeyRepository {
    async fn insert(&self, key: ApiKey) -> DomainResult<ApiKey> {
        let new_key = api_key::ActiveModel {
            id: Set(key.id),
            user_id: Set(key.user_id),
            token_hash: Set(key.token_hash),
            prefix: Set(key.prefix),
            created_at: Set(key.created_at),
        };

        let model = new_key
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::TokenCollision,
                _ => db_err(e),
            })?;

        Ok(key_model_to_domain(model))
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<ApiKey>> {
        let model = api_key::Entity::find()
            .filter(api_key::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(key_model_to_domain))
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<ApiKey>> {
        let models = api_key::Entity::find()
            .filter(api_key::Column::UserId.eq(user_id))
            .order_by_asc(api_key::Column::CreatedAt)
            .order_by_asc(api_key::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(key_model_to_domain).collect())
    }
}
