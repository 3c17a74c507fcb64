use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::listings::Freelancer;

/// SeaORM entity for the `users` table.
///
/// `id` is the session subject issued by the wallet session provider.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub wallet_address: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::gigs::Entity")]
    Gigs,
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Avatar shown when the session provider supplied no picture.
pub const DEFAULT_AVATAR: &str = "/images/user.png";

impl Model {
    /// Skill tags in display order. Non-string entries are ignored.
    pub fn skill_tags(&self) -> Vec<String> {
        self.skills
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Never empty: falls back to a shortened wallet address, then to "Anonymous".
    pub fn public_name(&self) -> String {
        if let Some(name) = self.display_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        let Some(addr) = self.wallet_address.as_deref().filter(|a| !a.is_empty()) else {
            return "Anonymous".to_string();
        };
        let chars: Vec<char> = addr.chars().collect();
        if chars.len() <= 8 {
            return addr.to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }

    pub fn freelancer_summary(&self) -> Freelancer {
        let skills = self.skill_tags();
        Freelancer {
            name: self.public_name(),
            avatar: self
                .avatar_url
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            skills: if skills.is_empty() { None } else { Some(skills) },
        }
    }
}

// ── DTOs ──

/// Used internally by the auth extractor to create a user from session claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromSession {
    pub id: Uuid,
    pub wallet_address: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
