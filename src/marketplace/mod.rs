//! Client-side marketplace page: listing state, search, pagination, the gig
//! submission flow and the view controller that composes them.
//!
//! Data flows one way. Listings loaded into the [`ListingStore`] pass through
//! the search filter and the paginator to produce a [`PageView`]. User input
//! goes back into the [`ViewController`] as state updates, and each update
//! re-derives the view.

pub mod api;
pub mod notification;
pub mod pagination;
pub mod search;
pub mod store;
pub mod submission;
pub mod view;
pub mod wallet;

pub use api::{ApiError, HttpMarketplaceApi, ImageFile, MarketplaceApi};
pub use notification::{TimerEvent, Timers, Toast, ToastKind};
pub use pagination::{PageState, paginate, total_pages};
pub use search::{SearchQuery, Searchable, filter};
pub use store::ListingStore;
pub use submission::{Draft, SubmissionError, SubmissionFlow, SubmissionState};
pub use view::{PageBody, PageView, Tab, ViewController};
pub use wallet::WalletSession;
