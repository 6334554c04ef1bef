//! DOM wiring for the load-more triggers.
//!
//! Both guards detach from the DOM when dropped, so storing them next to the
//! element and dropping them in `after_remove` leaves no callbacks behind.
//! A missing browser API is logged once and the trigger simply never fires.

use lms_shared::{ArmChange, ObserverOptions, ObserverRoot, ProximityTrigger, ScrollMetrics, VisibilityTrigger};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use zoon::*;

pub type LoadMore = Rc<dyn Fn()>;

// ===== PROXIMITY TO BOTTOM =====

/// `scroll` listener on a scrollable container.
pub struct ScrollListener {
    element: web_sys::Element,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl ScrollListener {
    pub fn attach(element: &web_sys::Element, threshold: f64, on_load_more: LoadMore) -> Option<Self> {
        let target = element.clone();
        let mut trigger = ProximityTrigger::new(threshold);
        let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let metrics = ScrollMetrics::new(
                target.scroll_top() as f64,
                target.scroll_height() as f64,
                target.client_height() as f64,
            );
            if trigger.check(metrics) {
                log::trace!("near bottom, {:.0}px remaining", metrics.remaining());
                on_load_more();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(error) = element.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref()) {
            log::warn!("Scroll trigger disabled: {error:?}");
            return None;
        }
        Some(Self {
            element: element.clone(),
            callback,
        })
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback("scroll", self.callback.as_ref().unchecked_ref());
    }
}

/// Scrollable column that calls `on_load_more` near its bottom edge.
pub fn near_bottom_column<I: Element>(
    items: impl SignalVec<Item = I> + Unpin + 'static,
    threshold: f64,
    on_load_more: LoadMore,
) -> impl Element {
    let listener: Rc<RefCell<Option<ScrollListener>>> = Rc::new(RefCell::new(None));
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Scrollbars::y_and_clip_x())
        .s(Gap::new().y(6))
        .items_signal_vec(items)
        .after_insert({
            let listener = listener.clone();
            move |element: web_sys::HtmlElement| {
                *listener.borrow_mut() = ScrollListener::attach(&element, threshold, on_load_more);
            }
        })
        .after_remove(move |_| {
            listener.borrow_mut().take();
        })
}

// ===== SENTINEL VISIBILITY =====

fn resolve_root(root: ObserverRoot, sentinel: &web_sys::Element) -> Option<web_sys::Element> {
    match root {
        ObserverRoot::Viewport => None,
        ObserverRoot::ScrollParent => {
            let parent = sentinel.parent_element();
            if parent.is_none() {
                log::warn!("Sentinel has no parent, observing against the viewport");
            }
            parent
        }
    }
}

/// `IntersectionObserver` watching one sentinel element.
pub struct SentinelObserver {
    observer: web_sys::IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>,
}

impl SentinelObserver {
    pub fn observe(
        sentinel: &web_sys::Element,
        root: Option<&web_sys::Element>,
        options: ObserverOptions,
        trigger: Rc<RefCell<VisibilityTrigger>>,
        on_load_more: LoadMore,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<web_sys::IntersectionObserverEntry>() else {
                    continue;
                };
                let fire = trigger.borrow_mut().on_intersection(entry.is_intersecting());
                if fire {
                    log::trace!("sentinel visible");
                    on_load_more();
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>);

        let init = web_sys::IntersectionObserverInit::new();
        init.set_root(root);
        init.set_root_margin(&options.root_margin());
        init.set_threshold(&JsValue::from_f64(options.threshold));

        let observer = match web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => observer,
            Err(error) => {
                log::warn!("IntersectionObserver unavailable, automatic loading disabled: {error:?}");
                return None;
            }
        };
        observer.observe(sentinel);
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for SentinelObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Invisible marker placed after the last list item.
///
/// The observer exists only while `has_more && !loading`; it is created again
/// whenever both flags turn favourable and torn down with the element.
pub fn load_more_sentinel(
    has_more: impl Signal<Item = bool> + Unpin + 'static,
    loading: impl Signal<Item = bool> + Unpin + 'static,
    options: ObserverOptions,
    on_load_more: LoadMore,
) -> impl Element {
    let watcher: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));
    El::new()
        .s(Width::fill())
        .s(Height::exact(1))
        .after_insert({
            let watcher = watcher.clone();
            move |element: web_sys::HtmlElement| {
                let sentinel: web_sys::Element = element.unchecked_into();
                let root = resolve_root(options.root, &sentinel);
                let flags = map_ref! {
                    let has_more = has_more,
                    let loading = loading => (*has_more, *loading)
                };
                *watcher.borrow_mut() = Some(Task::start_droppable(watch_flags(sentinel, root, flags, options, on_load_more)));
            }
        })
        .after_remove(move |_| {
            // Dropping the task drops the observer, which disconnects it
            watcher.borrow_mut().take();
        })
}

async fn watch_flags(
    sentinel: web_sys::Element,
    root: Option<web_sys::Element>,
    flags: impl Signal<Item = (bool, bool)>,
    options: ObserverOptions,
    on_load_more: LoadMore,
) {
    let trigger = Rc::new(RefCell::new(VisibilityTrigger::default()));
    let mut observer: Option<SentinelObserver> = None;
    flags
        .for_each(|(has_more, loading)| {
            let change = trigger.borrow_mut().set_flags(has_more, loading);
            match change {
                ArmChange::Armed => {
                    observer.take();
                    if let Some(armed) = SentinelObserver::observe(&sentinel, root.as_ref(), options, trigger.clone(), on_load_more.clone()) {
                        observer.replace(armed);
                    }
                }
                ArmChange::Disarmed => {
                    observer.take();
                }
                ArmChange::Unchanged => {}
            }
            async {}
        })
        .await;
}
