//! Infinite list state shared by the course and message feeds.
//!
//! Data flows: trigger (scroll / sentinel) → `load_more` → Paginator request
//! → droppable fetch task → Paginator result → item signals.

use crate::action_buttons::action_button;
use futures::future::LocalBoxFuture;
use lms_shared::config::FeedSection;
use lms_shared::{Page, PageRequest, Paginator};
use std::cell::RefCell;
use std::rc::Rc;
use zoon::*;

pub type FetchPage<T> = Rc<dyn Fn(PageRequest) -> LocalBoxFuture<'static, Result<Page<T>, String>>>;
type FirstPageHook<T> = Rc<dyn Fn(&[T])>;

#[derive(Clone)]
pub struct InfiniteFeed<T: Clone + 'static> {
    paginator: Mutable<Paginator<T>>,
    fetch: FetchPage<T>,
    // Only the newest request is kept alive; replacing it cancels the old one
    request_task: Rc<RefCell<Option<TaskHandle>>>,
    initial_page: u32,
    on_first_page: Option<FirstPageHook<T>>,
}

impl<T: Clone + 'static> InfiniteFeed<T> {
    pub fn new(config: &FeedSection, fetch: FetchPage<T>) -> Self {
        Self {
            paginator: Mutable::new(Paginator::new(config.initial_page, config.page_size)),
            fetch,
            request_task: Rc::new(RefCell::new(None)),
            initial_page: config.initial_page,
            on_first_page: None,
        }
    }

    /// Called with the first page whenever it is (re)loaded successfully.
    pub fn on_first_page(mut self, hook: impl Fn(&[T]) + 'static) -> Self {
        self.on_first_page = Some(Rc::new(hook));
        self
    }

    pub fn prefill(&self, items: Vec<T>) {
        if !items.is_empty() {
            self.paginator.lock_mut().prefill(items);
        }
    }

    pub fn load_more(&self) {
        let request = self.paginator.lock_mut().begin();
        if let Some(request) = request {
            self.run(request);
        }
    }

    /// Pause or resume loading. Resuming asks for the next page right away.
    pub fn set_enabled(&self, enabled: bool) {
        self.paginator.lock_mut().set_enabled(enabled);
        if enabled {
            self.load_more();
        }
    }

    /// Re-request the page that failed.
    pub fn retry(&self) {
        let request = self.paginator.lock_mut().retry();
        if let Some(request) = request {
            self.run(request);
        }
    }

    pub fn reset(&self) {
        let request = self.paginator.lock_mut().reset();
        if let Some(request) = request {
            self.run(request);
        }
    }

    pub fn refresh(&self) {
        let request = self.paginator.lock_mut().refresh();
        if let Some(request) = request {
            self.run(request);
        }
    }

    pub fn items_signal_vec(&self) -> impl SignalVec<Item = T> + use<T> {
        self.paginator.signal_ref(|paginator| paginator.items().to_vec()).to_signal_vec()
    }

    pub fn count_signal(&self) -> impl Signal<Item = usize> + use<T> {
        self.paginator.signal_ref(|paginator| paginator.items().len())
    }

    pub fn has_more_signal(&self) -> impl Signal<Item = bool> + use<T> {
        self.paginator.signal_ref(|paginator| paginator.has_more())
    }

    pub fn loading_signal(&self) -> impl Signal<Item = bool> + use<T> {
        self.paginator.signal_ref(|paginator| paginator.is_loading())
    }

    pub fn error_signal(&self) -> impl Signal<Item = Option<String>> + use<T> {
        self.paginator.signal_ref(|paginator| paginator.error().map(str::to_string))
    }

    fn run(&self, request: PageRequest) {
        let paginator = self.paginator.clone();
        let fetch = self.fetch.clone();
        let on_first_page = self.on_first_page.clone();
        let first_page = request.page == self.initial_page;

        let handle = Task::start_droppable(async move {
            let result = fetch(request).await;
            let succeeded = result.is_ok();
            let applied = paginator.lock_mut().finish(request, result);
            if applied && succeeded && first_page {
                if let Some(hook) = on_first_page {
                    let items = paginator.lock_ref().items().to_vec();
                    hook(&items);
                }
            }
        });
        *self.request_task.borrow_mut() = Some(handle);
    }
}

/// Loading / error / end-of-list line under a feed.
///
/// A failed page stays failed until the user presses "Retry".
pub fn feed_status<T: Clone + 'static>(feed: InfiniteFeed<T>) -> impl Element {
    let status = map_ref! {
        let loading = feed.loading_signal(),
        let has_more = feed.has_more_signal(),
        let error = feed.error_signal(),
        let count = feed.count_signal() => {
            if let Some(error) = error {
                Some(format!("Error loading data: {error}"))
            } else if *loading {
                Some("Loading…".to_string())
            } else if !*has_more {
                Some(format!("All {count} loaded"))
            } else {
                None
            }
        }
    };
    let failed = feed.error_signal().map(|error| error.is_some());
    Row::new()
        .s(Padding::new().y(8))
        .s(Gap::new().x(8))
        .s(Align::new().center_x())
        .item_signal(status.map(|text| {
            text.map(|text| El::new().s(Font::new().size(13).color("oklch(55% 0.03 255)").italic()).child(text))
        }))
        .item_signal(failed.map_true(move || {
            let feed = feed.clone();
            action_button("Retry", move || feed.retry())
        }))
}
