use serde::{Deserialize, Serialize};

use crate::models::{gigs, users};

/// Display identity embedded in every listing and shown in the profile view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freelancer {
    pub name: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

/// A gig as the marketplace page sees it: the stored row joined with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: Option<String>,
    pub freelancer: Freelancer,
}

impl Listing {
    /// Joins a gig with its owner. A missing owner row still yields a valid summary.
    pub fn from_row(gig: gigs::Model, owner: Option<users::Model>) -> Self {
        let freelancer = match owner {
            Some(user) => user.freelancer_summary(),
            None => Freelancer {
                name: "Anonymous".to_string(),
                avatar: users::DEFAULT_AVATAR.to_string(),
                skills: None,
            },
        };

        Self {
            id: gig.id.to_string(),
            title: gig.title,
            description: gig.description,
            price: gig.amount,
            image: gig.image,
            freelancer,
        }
    }
}
