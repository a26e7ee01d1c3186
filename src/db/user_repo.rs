// src/db/user_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::auth::UserRow};

// O repositório de usuários, responsável pelas leituras da tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca o usuário pelo login, já com a flag de super-cargo vinda de `roles`
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, AppError> {
        let maybe_user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id, u.username, u.full_name, u.password_hash,
                u.role_name, r.is_super_role
            FROM users u
            JOIN roles r ON r.name = u.role_name
            WHERE u.username = $1
            "#,
        )
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }
}
