//! Course catalogue: sentinel-driven infinite list, cached first page and
//! debounced search.

use crate::action_buttons::action_button;
use crate::config::ui_config;
use crate::feed::{InfiniteFeed, feed_status};
use crate::mock_api;
use crate::scroll_trigger::load_more_sentinel;
use crate::storage::{BrowserClock, BrowserStorage};
use lms_shared::search::normalize_query;
use lms_shared::{Course, ObserverRoot, TtlCache};
use std::cell::RefCell;
use std::rc::Rc;
use zoon::*;

const COURSES_CACHE_KEY: &str = "lms_courses_page1";

type CourseCache = Rc<RefCell<TtlCache<Vec<Course>, BrowserStorage, BrowserClock>>>;

pub fn course_catalogue() -> impl Element {
    let config = ui_config();
    let cache: CourseCache = Rc::new(RefCell::new(TtlCache::with_clock(
        COURSES_CACHE_KEY,
        Vec::new(),
        config.cache.ttl(),
        BrowserStorage::local(),
        BrowserClock,
    )));

    let feed = InfiniteFeed::new(&config.feed, Rc::new(mock_api::fetch_courses)).on_first_page({
        let cache = cache.clone();
        move |courses: &[Course]| cache.borrow_mut().write(courses.to_vec())
    });
    let cached = cache.borrow_mut().read();
    if cached.is_empty() {
        log::debug!("nothing cached under '{}', waiting for the sentinel", cache.borrow().key());
    } else {
        let cache = cache.borrow();
        log::info!("showing {} cached courses from '{}' (ttl {:?})", cached.len(), cache.key(), cache.ttl());
        feed.prefill(cached);
    }

    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(10))
        .item(
            Row::new()
                .s(Gap::new().x(8))
                .item(El::new().s(Font::new().size(18).weight(FontWeight::SemiBold)).child("Courses"))
                .item(action_button("Refresh", {
                    let feed = feed.clone();
                    move || feed.refresh()
                }))
                .item(action_button("Reset", {
                    let feed = feed.clone();
                    move || feed.reset()
                }))
                .item(action_button("Clear cache", move || cache.borrow_mut().clear())),
        )
        .item(course_search())
        .item(
            Column::new()
                .s(Width::fill())
                .s(Height::exact(420))
                .s(Scrollbars::y_and_clip_x())
                .s(Gap::new().y(6))
                .item(
                    Column::new()
                        .s(Width::fill())
                        .s(Gap::new().y(6))
                        .items_signal_vec(feed.items_signal_vec().map(course_card)),
                )
                .item(load_more_sentinel(
                    feed.has_more_signal(),
                    feed.loading_signal(),
                    config.observer_options().with_root(ObserverRoot::ScrollParent),
                    Rc::new({
                        let feed = feed.clone();
                        move || feed.load_more()
                    }),
                ))
                .item(feed_status(feed)),
        )
}

fn course_card(course: Course) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Padding::new().x(12).y(8))
        .s(RoundedCorners::all(6))
        .s(Borders::all(Border::new().width(1).color("oklch(88% 0.02 255)")))
        .item(El::new().s(Font::new().weight(FontWeight::SemiBold)).child(course.title))
        .item(El::new().s(Font::new().size(13).color("oklch(55% 0.03 255)")).child(course.instructor))
}

// ===== SEARCH =====

fn course_search() -> impl Element {
    let results: Mutable<Option<Vec<Course>>> = Mutable::new(None);
    let searching = Mutable::new(false);
    let pending: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));
    let debounce_ms = ui_config().search.debounce_ms;

    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(4))
        .item(
            TextInput::new()
                .s(Width::fill())
                .s(Padding::new().x(10).y(6))
                .s(RoundedCorners::all(4))
                .s(Borders::all(Border::new().width(1).color("oklch(80% 0.02 255)")))
                .label_hidden("Search courses")
                .placeholder(Placeholder::new("Search courses…"))
                .on_change({
                    let results = results.clone();
                    let searching = searching.clone();
                    move |text| {
                        let Some(query) = normalize_query(&text) else {
                            // Dropping the pending task cancels it
                            pending.borrow_mut().take();
                            searching.set_neq(false);
                            results.set(None);
                            return;
                        };
                        searching.set_neq(false);
                        let results = results.clone();
                        let searching = searching.clone();
                        let task = Task::start_droppable(async move {
                            Timer::sleep(debounce_ms).await;
                            searching.set_neq(true);
                            let found = mock_api::search_courses(query).await;
                            searching.set_neq(false);
                            results.set(Some(found));
                        });
                        *pending.borrow_mut() = Some(task);
                    }
                }),
        )
        .item_signal(map_ref! {
            let searching = searching.signal(),
            let results = results.signal_cloned() => search_results(*searching, results.clone())
        })
}

fn search_results(searching: bool, results: Option<Vec<Course>>) -> Option<RawElOrText> {
    if searching {
        return Some(El::new().s(Font::new().size(13).italic()).child("Searching…").unify());
    }
    let results = results?;
    if results.is_empty() {
        return Some(El::new().s(Font::new().size(13).italic()).child("No courses match").unify());
    }
    Some(
        Column::new()
            .s(Gap::new().y(4))
            .s(Padding::new().bottom(8))
            .items(results.into_iter().map(|course| {
                El::new().s(Font::new().size(14)).child(format!("{} · {}", course.title, course.instructor))
            }))
            .unify(),
    )
}
