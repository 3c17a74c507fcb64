use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `gigs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gigs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,
    pub status: GigStatus,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

/// Lifecycle marker stored as upper-case text, matching the wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GigStatus {
    #[default]
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "PAUSED")]
    Paused,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/gigs`. The client flow serializes the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGig {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub image: Option<String>,
    #[serde(default)]
    pub status: GigStatus,
}

impl CreateGig {
    /// Server-side guard; the handler answers 400 with the returned message.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("amount must be a positive number".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> CreateGig {
        CreateGig {
            title: "Smart Contract Dev".to_string(),
            description: "Audits for Solana programs".to_string(),
            amount: 8.0,
            image: None,
            status: GigStatus::Active,
        }
    }

    #[test]
    fn status_defaults_to_active_when_omitted() {
        let parsed: CreateGig = serde_json::from_value(serde_json::json!({
            "title": "t",
            "description": "d",
            "amount": 2.5,
            "image": null,
        }))
        .unwrap();
        assert_eq!(parsed.status, GigStatus::Active);
    }

    #[test]
    fn serializes_wire_shape() {
        let json = serde_json::to_value(body()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Smart Contract Dev",
                "description": "Audits for Solana programs",
                "amount": 8.0,
                "image": null,
                "status": "ACTIVE",
            })
        );
    }

    #[test]
    fn validate_rejects_blank_fields_and_bad_amounts() {
        assert!(body().validate().is_ok());

        let mut blank = body();
        blank.title = "   ".to_string();
        assert!(blank.validate().is_err());

        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut bad = body();
            bad.amount = amount;
            assert!(bad.validate().is_err(), "amount {amount} should be rejected");
        }
    }
}
