use sea_orm::*;

use crate::models::users::{self, CreateUserFromSession};

/// Find the user behind a session, creating the row on first sight.
///
/// Profile fields already stored are left alone; a later session carrying a
/// wallet address fills it in if the row has none yet.
pub async fn find_or_create_from_session<C: ConnectionTrait>(
    db: &C,
    input: CreateUserFromSession,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        if existing.wallet_address.is_none() && input.wallet_address.is_some() {
            let mut active: users::ActiveModel = existing.into();
            active.wallet_address = Set(input.wallet_address);
            active.updated_at = Set(Some(chrono::Utc::now()));
            return active.update(db).await;
        }
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        wallet_address: Set(input.wallet_address),
        display_name: Set(input.display_name),
        avatar_url: Set(input.avatar_url),
        skills: Set(serde_json::json!([])),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

