use crate::models::listings::Listing;

/// The listings currently shown by the page.
///
/// Listings are never patched in place. A reload replaces the whole collection
/// and bumps `version`, which derived views use as part of their cache key.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
    version: u64,
}

impl ListingStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            version: 1,
        }
    }

    pub fn replace(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        self.version += 1;
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }
}
