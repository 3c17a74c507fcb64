use crate::models::listings::Listing;

/// Anything the search box can match against.
pub trait Searchable {
    /// Lower-cased text the query terms are matched against.
    fn searchable_text(&self) -> String;
}

impl Searchable for Listing {
    /// `title description freelancer-name`, space-joined.
    fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title, self.description, self.freelancer.name
        )
        .to_lowercase()
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn searchable_text(&self) -> String {
        (**self).searchable_text()
    }
}

/// A free-text query split into lower-case whitespace-separated terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        Self {
            terms: query
                .split_whitespace()
                .map(str::to_lowercase)
                .collect(),
        }
    }

    /// An empty or whitespace-only query filters nothing out.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Every term must appear as a substring; there is no ranking.
    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let text = item.searchable_text();
        self.terms.iter().all(|term| text.contains(term.as_str()))
    }
}

/// Positions of the items that survive `query`, in input order.
pub fn filter_indices<T: Searchable>(items: &[T], query: &str) -> Vec<usize> {
    let query = SearchQuery::parse(query);
    if query.is_empty() {
        return (0..items.len()).collect();
    }
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| query.matches(*item))
        .map(|(i, _)| i)
        .collect()
}

/// Stable AND-of-substrings filter. The result is always a subsequence of `items`.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    filter_indices(items, query)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}
