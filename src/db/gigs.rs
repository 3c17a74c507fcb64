use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, CreateGig, GigStatus};
use crate::models::users;

/// Insert a new gig owned by `user_id`.
pub async fn insert_gig<C: ConnectionTrait>(
    db: &C,
    input: CreateGig,
    user_id: Uuid,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description.trim().to_string()),
        amount: Set(input.amount),
        image: Set(input.image),
        status: Set(input.status),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_gig.insert(db).await
}

/// Rows to skip for a 1-indexed `page`. Saturates instead of overflowing on huge pages.
fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Active gigs joined with their owners, newest first.
pub async fn get_active_gigs_with_owner<C: ConnectionTrait>(
    db: &C,
    page: u64,
    limit: u64,
) -> Result<Vec<(gigs::Model, Option<users::Model>)>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::Status.eq(GigStatus::Active))
        .find_also_related(users::Entity)
        .order_by_desc(gigs::Column::CreatedAt)
        .offset(page_offset(page, limit))
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single gig and its owner by ID.
pub async fn get_gig_with_owner<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<(gigs::Model, Option<users::Model>)>, DbErr> {
    gigs::Entity::find_by_id(id)
        .find_also_related(users::Entity)
        .one(db)
        .await
}
