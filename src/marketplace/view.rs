//! The marketplace page controller.
//!
//! [`ViewController`] owns every piece of page state: the listings, the query,
//! the current page, the post-gig form, the toast and the modal flags. It is
//! mutated only through its methods, one event at a time. Timers never reach in
//! directly. They post [`TimerEvent`]s that the controller applies when drained
//! (see [`ViewController::pump_timers`] and [`ViewController::next_timer`]).

use std::sync::Arc;
use tracing::{debug, info};

use super::api::{ApiError, MarketplaceApi};
use super::notification::{TimerEvent, Timers, Toast, ToastKind};
use super::pagination::{PageState, paginate, shows_controls, total_pages};
use super::search::filter_indices;
use super::store::ListingStore;
use super::submission::{Draft, SubmissionError, SubmissionFlow, SubmissionState};
use super::wallet::WalletSession;
use crate::config::ClientConfig;
use crate::models::listings::{Freelancer, Listing};

pub const PAGE_TITLE: &str = "Soleer Marketplace";
pub const POSTED_MESSAGE: &str = "Gig Posted Successfully! 🎉";

/// Listing tab selector. Display state only; it does not reorder listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Trending,
    Popular,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletPrompt {
    pub status_line: String,
    /// The prompt can only be closed once a wallet is connected.
    pub dismissible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationControls {
    pub current: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostGigForm {
    pub draft: Draft,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceView {
    pub query: String,
    pub active_tab: Tab,
    /// Listings on the current page.
    pub cards: Vec<Listing>,
    /// Listings matching the query across all pages.
    pub result_count: usize,
    pub pagination: Option<PaginationControls>,
    pub profile: Option<Freelancer>,
    pub post_gig: Option<PostGigForm>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    ConnectPrompt { headline: String, message: String },
    Marketplace(MarketplaceView),
}

/// Everything needed to draw the page at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: &'static str,
    pub wallet_prompt: Option<WalletPrompt>,
    pub coming_soon_open: bool,
    pub toast: Option<Toast>,
    pub body: PageBody,
}

/// Filtered positions, keyed by store version and query.
#[derive(Debug, Default)]
struct FilterCache {
    version: u64,
    query: String,
    indices: Vec<usize>,
}

pub struct ViewController {
    config: ClientConfig,
    api: Arc<dyn MarketplaceApi>,
    store: ListingStore,
    query: String,
    filtered: FilterCache,
    page: PageState,
    active_tab: Tab,
    wallet: WalletSession,
    wallet_prompt_open: bool,
    coming_soon_open: bool,
    coming_soon_scheduled: bool,
    selected_freelancer: Option<Freelancer>,
    submission: SubmissionFlow,
    toast: Option<Toast>,
    next_toast_id: u64,
    timers: Timers,
}

impl ViewController {
    pub fn new(config: ClientConfig, api: Arc<dyn MarketplaceApi>) -> Self {
        let page = PageState::new(config.page_size);
        let mut controller = Self {
            submission: SubmissionFlow::new(api.clone()),
            config,
            api,
            store: ListingStore::default(),
            query: String::new(),
            filtered: FilterCache::default(),
            page,
            active_tab: Tab::default(),
            wallet: WalletSession::disconnected(),
            wallet_prompt_open: true,
            coming_soon_open: false,
            coming_soon_scheduled: false,
            selected_freelancer: None,
            toast: None,
            next_toast_id: 0,
            timers: Timers::new(),
        };
        controller.refresh();
        controller
    }

    /// Starts the one-shot "coming soon" timer. Later calls do nothing.
    /// Must be called inside a tokio runtime.
    pub fn mount(&mut self) {
        if !self.coming_soon_scheduled {
            self.coming_soon_scheduled = true;
            self.timers
                .schedule(self.config.coming_soon_delay, TimerEvent::ComingSoonDue);
        }
    }

    /// Cancels every pending timer. Dropping the controller does the same.
    pub fn teardown(&mut self) {
        debug!("Tearing down marketplace view");
        self.timers.cancel_all();
    }

    // ── Derived state ──

    fn refresh(&mut self) {
        let stale = self.filtered.version != self.store.version() || self.filtered.query != self.query;
        if stale {
            self.filtered = FilterCache {
                version: self.store.version(),
                query: self.query.clone(),
                indices: filter_indices(self.store.listings(), &self.query),
            };
        }
        self.page.clamp(self.total_pages());
    }

    pub fn filtered_listings(&self) -> Vec<&Listing> {
        let listings = self.store.listings();
        self.filtered.indices.iter().map(|&i| &listings[i]).collect()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.indices.len(), self.page.page_size())
    }

    pub fn current_page(&self) -> usize {
        self.page.current()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn listings(&self) -> &ListingStore {
        &self.store
    }

    // ── Listings, search and paging ──

    pub fn set_listings(&mut self, listings: Vec<Listing>) {
        self.store.replace(listings);
        self.refresh();
    }

    /// Replaces the store with whatever the backend currently lists.
    /// On failure the old listings stay and an error toast is raised.
    pub async fn reload_listings(&mut self) -> Result<(), ApiError> {
        match self.api.list_gigs().await {
            Ok(listings) => {
                debug!("Loaded {} listings", listings.len());
                self.set_listings(listings);
                Ok(())
            }
            Err(e) => {
                self.show_toast(ToastKind::Error, "Failed to load gigs");
                Err(e)
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh();
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        self.page.go_to(page, total)
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Opens the profile of the freelancer behind `listing_id`.
    pub fn open_profile(&mut self, listing_id: &str) -> bool {
        match self.store.get(listing_id) {
            Some(listing) => {
                self.selected_freelancer = Some(listing.freelancer.clone());
                true
            }
            None => false,
        }
    }

    pub fn close_profile(&mut self) {
        self.selected_freelancer = None;
    }

    // ── Wallet gating ──

    /// Applies a new wallet state from the adapter.
    ///
    /// Connecting closes the wallet prompt. Losing the connection opens it again
    /// and closes the post-gig form, discarding its draft.
    pub fn set_wallet(&mut self, session: WalletSession) {
        let was_connected = self.wallet.connected;
        self.wallet = session;

        match (was_connected, self.wallet.connected) {
            (false, true) => {
                info!("Wallet connected");
                self.wallet_prompt_open = false;
            }
            (true, false) => {
                info!("Wallet disconnected");
                self.wallet_prompt_open = true;
                self.submission.close();
            }
            _ => {}
        }
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.connected
    }

    /// The prompt cannot be closed while no wallet is connected.
    pub fn dismiss_wallet_prompt(&mut self) -> bool {
        if self.wallet.connected {
            self.wallet_prompt_open = false;
        }
        !self.wallet_prompt_open
    }

    pub fn dismiss_coming_soon(&mut self) {
        self.coming_soon_open = false;
    }

    // ── Gig submission ──

    /// Opens the post-gig form. Only reachable while connected.
    pub fn open_post_gig(&mut self) -> bool {
        if !self.wallet.connected {
            return false;
        }
        self.submission.open();
        true
    }

    pub fn close_post_gig(&mut self) -> bool {
        self.submission.close()
    }

    /// Field edits go straight to the form.
    pub fn submission_mut(&mut self) -> &mut SubmissionFlow {
        &mut self.submission
    }

    pub fn submission(&self) -> &SubmissionFlow {
        &self.submission
    }

    /// Submits the form and raises a success or error toast for the outcome.
    pub async fn submit_gig(&mut self) -> Result<(), SubmissionError> {
        match self.submission.submit().await {
            Ok(()) => {
                info!("Gig posted");
                self.show_toast(ToastKind::Success, POSTED_MESSAGE);
                Ok(())
            }
            Err(e) => {
                self.show_toast(ToastKind::Error, e.to_string());
                Err(e)
            }
        }
    }

    // ── Toasts and timers ──

    /// Shows `message`, replacing any current toast, and arms its dismissal.
    /// Must be called inside a tokio runtime.
    pub(crate) fn show_toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toast = Some(Toast {
            id,
            kind,
            message: message.into(),
        });
        self.timers
            .schedule(self.config.toast_ttl, TimerEvent::ToastExpired(id));
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::ComingSoonDue => self.coming_soon_open = true,
            // A replaced toast's timer must not dismiss its successor.
            TimerEvent::ToastExpired(id) => {
                if self.toast.as_ref().is_some_and(|t| t.id == id) {
                    self.toast = None;
                }
            }
        }
    }

    /// Applies every timer event that has already fired. Returns how many.
    pub fn pump_timers(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.timers.try_next() {
            self.handle_timer(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next timer event and applies it. `None` when none are pending.
    pub async fn next_timer(&mut self) -> Option<TimerEvent> {
        let event = self.timers.next().await?;
        self.handle_timer(event);
        Some(event)
    }

    // ── Rendering ──

    pub fn render(&self) -> PageView {
        let wallet_prompt = self.wallet_prompt_open.then(|| WalletPrompt {
            status_line: self.wallet.status_line(),
            dismissible: self.wallet.connected,
        });

        let body = if self.wallet.connected {
            PageBody::Marketplace(self.render_marketplace())
        } else {
            PageBody::ConnectPrompt {
                headline: format!("Welcome to {PAGE_TITLE}"),
                message: "Connect your wallet to access the decentralized freelance marketplace"
                    .to_string(),
            }
        };

        PageView {
            title: PAGE_TITLE,
            wallet_prompt,
            coming_soon_open: self.coming_soon_open,
            toast: self.toast.clone(),
            body,
        }
    }

    fn render_marketplace(&self) -> MarketplaceView {
        let filtered = self.filtered_listings();
        let total = self.total_pages();
        let cards = paginate(&filtered, self.page.page_size(), self.page.current())
            .iter()
            .map(|&listing| listing.clone())
            .collect();

        MarketplaceView {
            query: self.query.clone(),
            active_tab: self.active_tab,
            cards,
            result_count: filtered.len(),
            pagination: shows_controls(total).then(|| PaginationControls {
                current: self.page.current(),
                total_pages: total,
            }),
            profile: self.selected_freelancer.clone(),
            post_gig: self.submission.is_open().then(|| PostGigForm {
                draft: self.submission.draft().clone(),
                submitting: self.submission.state() == SubmissionState::Submitting,
                error: self.submission.error().map(ToString::to_string),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::marketplace::api::ImageFile;
    use crate::models::gigs::CreateGig;

    struct NoopApi;

    #[async_trait]
    impl MarketplaceApi for NoopApi {
        async fn upload_image(&self, _image: &ImageFile) -> Result<String, ApiError> {
            Err(ApiError::Status(500))
        }

        async fn create_gig(&self, _gig: &CreateGig) -> Result<(), ApiError> {
            Ok(())
        }

        async fn list_gigs(&self) -> Result<Vec<Listing>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn listing(id: usize, title: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: title.to_string(),
            description: "blockchain work".to_string(),
            price: 8.0,
            image: None,
            freelancer: Freelancer {
                name: "Freexyz".to_string(),
                avatar: "/images/user.png".to_string(),
                skills: Some(vec!["Rust".to_string()]),
            },
        }
    }

    fn controller() -> ViewController {
        let mut c = ViewController::new(ClientConfig::default(), Arc::new(NoopApi));
        c.set_wallet(WalletSession::connected("Phantom"));
        c
    }

    #[test]
    fn filter_cache_follows_store_version_and_query() {
        let mut c = controller();
        c.set_listings(vec![listing(1, "Smart Contract Dev"), listing(2, "Design")]);
        c.set_query("design");
        assert_eq!(c.filtered_listings().len(), 1);

        c.set_listings(vec![listing(3, "Design"), listing(4, "Design again")]);
        assert_eq!(c.filtered_listings().len(), 2);

        c.set_query("");
        assert_eq!(c.filtered_listings().len(), 2);
    }

    #[test]
    fn page_is_clamped_when_results_shrink() {
        let mut c = controller();
        let mut items: Vec<Listing> = (1..=40).map(|i| listing(i, "Audit")).collect();
        items.push(listing(41, "Tokenomics"));
        c.set_listings(items);

        assert_eq!(c.total_pages(), 3);
        assert!(c.go_to_page(3));
        c.set_query("tokenomics");
        assert_eq!(c.current_page(), 1);

        match c.render().body {
            PageBody::Marketplace(view) => {
                assert_eq!(view.cards.len(), 1);
                assert!(view.pagination.is_none());
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn profile_opens_for_known_listings_only() {
        let mut c = controller();
        c.set_listings(vec![listing(1, "Audit")]);
        assert!(!c.open_profile("missing"));
        assert!(c.open_profile("1"));

        let PageBody::Marketplace(view) = c.render().body else {
            panic!("expected marketplace");
        };
        assert_eq!(view.profile.map(|f| f.name), Some("Freexyz".to_string()));

        c.close_profile();
        let PageBody::Marketplace(view) = c.render().body else {
            panic!("expected marketplace");
        };
        assert!(view.profile.is_none());
    }

    #[test]
    fn tabs_are_display_only() {
        let mut c = controller();
        c.set_listings(vec![listing(1, "a"), listing(2, "b")]);
        c.select_tab(Tab::Popular);
        let PageBody::Marketplace(view) = c.render().body else {
            panic!("expected marketplace");
        };
        assert_eq!(view.active_tab, Tab::Popular);
        assert_eq!(view.cards.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(), ["1", "2"]);
    }

    #[tokio::test]
    async fn stale_toast_timer_does_not_dismiss_newer_toast() {
        let mut c = controller();
        c.show_toast(ToastKind::Info, "first");
        c.show_toast(ToastKind::Info, "second");

        c.handle_timer(TimerEvent::ToastExpired(1));
        assert_eq!(c.toast().map(|t| t.message.as_str()), Some("second"));

        c.handle_timer(TimerEvent::ToastExpired(2));
        assert!(c.toast().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn toast_dismisses_itself_after_ttl() {
        let mut c = controller();
        c.show_toast(ToastKind::Info, "saved");

        let event = c.next_timer().await;
        assert!(matches!(event, Some(TimerEvent::ToastExpired(_))));
        assert!(c.toast().is_none());
    }
}
