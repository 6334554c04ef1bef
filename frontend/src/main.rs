//! LMS UI Entry Point

use crate::config::ui_config;
use zoon::*;

mod action_buttons;
mod config;
mod course_feed;
mod feed;
mod logging;
mod message_feed;
mod mock_api;
mod question_list;
mod scroll_trigger;
mod storage;

/// Quiz builder on the left, course catalogue and announcements on the right.
pub fn main_layout() -> impl Element {
    let questions = question_list::QuestionList::new(mock_api::sample_questions());

    Row::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::all(16))
        .s(Gap::new().x(24))
        .s(Align::new().top())
        .item(
            El::new()
                .s(Width::percent(45))
                .child(question_list::question_list_panel(questions)),
        )
        .item(
            Column::new()
                .s(Width::fill())
                .s(Gap::new().y(24))
                .item(course_feed::course_catalogue())
                .item(message_feed::message_feed()),
        )
}

pub fn main() {
    logging::init(ui_config().logging.level_filter());
    log::info!("starting LMS UI");
    start_app("app", main_layout);
}
