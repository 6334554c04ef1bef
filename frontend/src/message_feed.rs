//! Announcement feed that loads the next page as the reader nears the bottom.

use crate::action_buttons::toggle_button;
use crate::config::ui_config;
use crate::feed::{InfiniteFeed, feed_status};
use crate::mock_api;
use crate::scroll_trigger::near_bottom_column;
use lms_shared::Message;
use std::rc::Rc;
use zoon::*;

pub fn message_feed() -> impl Element {
    let config = ui_config();
    let feed = InfiniteFeed::<Message>::new(&config.feed, Rc::new(mock_api::fetch_messages));
    let paused = Mutable::new(false);
    Task::start(paused.signal().for_each_sync({
        let feed = feed.clone();
        move |paused| feed.set_enabled(!paused)
    }));

    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(10))
        .item(
            Row::new()
                .s(Gap::new().x(12))
                .item(El::new().s(Font::new().size(18).weight(FontWeight::SemiBold)).child("Announcements"))
                .item(toggle_button(paused, "Resume loading", "Pause loading")),
        )
        .item(
            El::new().s(Width::fill()).s(Height::exact(360)).child(near_bottom_column(
                feed.items_signal_vec().map(message_card),
                config.feed.scroll_threshold_px,
                Rc::new({
                    let feed = feed.clone();
                    move || feed.load_more()
                }),
            )),
        )
        .item(feed_status(feed))
}

fn message_card(message: Message) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Padding::new().x(12).y(8))
        .s(RoundedCorners::all(6))
        .s(Background::new().color("oklch(97% 0.01 255)"))
        .item(El::new().s(Font::new().size(13).weight(FontWeight::SemiBold)).child(message.author))
        .item(El::new().s(Font::new().size(14)).child(message.body))
}
