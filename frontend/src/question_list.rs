//! Quiz builder list with native HTML5 drag-and-drop reordering.

use crate::action_buttons::toggle_button;
use crate::mock_api;
use lms_shared::{question_orders, Question, ReorderEngine};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use zoon::*;

const DRAG_EVENTS: [&str; 5] = ["dragstart", "dragover", "dragleave", "drop", "dragend"];

#[derive(Clone)]
pub struct QuestionList {
    questions: Mutable<Vec<Question>>,
    engine: Mutable<ReorderEngine>,
    read_only: Mutable<bool>,
}

impl QuestionList {
    pub fn new(questions: Vec<Question>) -> Self {
        let list = Self {
            questions: Mutable::new(questions),
            engine: Mutable::new(ReorderEngine::new()),
            read_only: Mutable::new(false),
        };
        list.sync_read_only();
        list
    }

    /// Keep the engine's read-only flag in step with the toggle.
    fn sync_read_only(&self) {
        let engine = self.engine.clone();
        Task::start(self.read_only.signal().for_each_sync(move |read_only| {
            let mut next = engine.get();
            next.set_read_only(read_only);
            engine.set_neq(next);
        }));
    }

    fn handle(&self, row: &web_sys::HtmlElement, index: usize, event: &web_sys::DragEvent) {
        let mut engine = self.engine.get();
        match event.type_().as_str() {
            "dragstart" => {
                if engine.is_read_only() {
                    event.prevent_default();
                    return;
                }
                if let Some(transfer) = event.data_transfer() {
                    transfer.set_effect_allowed("move");
                    let _ = transfer.set_data("text/plain", &index.to_string());
                }
                engine.begin_drag(index, self.questions.lock_ref().len());
            }
            "dragover" => {
                // Only drags started in this list may drop here
                if engine.state().is_active() {
                    event.prevent_default();
                    engine.hover(index);
                }
            }
            "dragleave" => {
                let into_child = event
                    .related_target()
                    .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
                    .is_some_and(|node| row.contains(Some(&node)));
                engine.leave_item(index, into_child);
            }
            "drop" => {
                event.prevent_default();
                let items = self.questions.get_cloned();
                let mut reordered = None;
                engine.drop(index, &items, |updated| reordered = Some(updated));
                if let Some(updated) = reordered {
                    self.apply(updated);
                }
            }
            "dragend" => engine.cancel_drag(),
            _ => {}
        }
        self.engine.set_neq(engine);
    }

    fn apply(&self, updated: Vec<Question>) {
        let orders = question_orders(&updated);
        self.questions.set(updated);
        Task::start(async move {
            if let Err(error) = mock_api::persist_question_order(orders).await {
                log::error!("Failed to save question order: {error}");
            }
        });
    }
}

/// Drag listeners on one row, removed again on drop.
struct DragListeners {
    element: web_sys::HtmlElement,
    callback: Closure<dyn FnMut(web_sys::DragEvent)>,
}

impl DragListeners {
    fn attach(element: web_sys::HtmlElement, list: QuestionList, index: usize) -> Self {
        let row = element.clone();
        let callback = Closure::wrap(Box::new(move |event: web_sys::DragEvent| {
            list.handle(&row, index, &event);
        }) as Box<dyn FnMut(web_sys::DragEvent)>);
        for name in DRAG_EVENTS {
            if let Err(error) = element.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref()) {
                log::warn!("Could not listen to {name}: {error:?}");
            }
        }
        Self { element, callback }
    }
}

impl Drop for DragListeners {
    fn drop(&mut self) {
        for name in DRAG_EVENTS {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, self.callback.as_ref().unchecked_ref());
        }
    }
}

pub fn question_list_panel(list: QuestionList) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(10))
        .item(
            Row::new()
                .s(Gap::new().x(12))
                .item(El::new().s(Font::new().size(18).weight(FontWeight::SemiBold)).child("Quiz questions"))
                .item(toggle_button(list.read_only.clone(), "Enable editing", "Lock order")),
        )
        .item(El::new().s(Width::fill()).child_signal(list.questions.signal_cloned().map({
            let list = list.clone();
            move |questions| question_rows(list.clone(), questions)
        })))
}

fn question_rows(list: QuestionList, questions: Vec<Question>) -> RawElOrText {
    if questions.is_empty() {
        return El::new()
            .s(Padding::all(16))
            .s(Font::new().color("oklch(55% 0.03 255)").italic())
            .child("No questions yet. Add a question to get started.")
            .unify();
    }
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(6))
        .items(
            questions
                .into_iter()
                .enumerate()
                .map(|(index, question)| question_row(list.clone(), index, question)),
        )
        .unify()
}

fn question_row(list: QuestionList, index: usize, question: Question) -> impl Element {
    let listeners: Rc<RefCell<Option<DragListeners>>> = Rc::new(RefCell::new(None));
    let is_source = list.engine.signal_ref(move |engine| engine.state().source() == Some(index));
    let is_target = list
        .engine
        .signal_ref(move |engine| engine.state().target() == Some(index) && engine.state().source() != Some(index));
    let draggable = list.read_only.signal().map(|read_only| Some(if read_only { "false" } else { "true" }));

    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(10))
        .s(Padding::new().x(12).y(8))
        .s(RoundedCorners::all(6))
        .s(Background::new().color("oklch(99% 0.005 255)"))
        .s(Borders::all_signal(is_target.map_bool(
            || Border::new().width(2).color("oklch(60% 0.15 250)"),
            || Border::new().width(1).color("oklch(88% 0.02 255)"),
        )))
        .update_raw_el(move |raw_el| {
            raw_el
                .attr_signal("draggable", draggable)
                .style_signal("opacity", is_source.map_bool(|| "0.5", || "1"))
        })
        .after_insert({
            let listeners = listeners.clone();
            move |element: web_sys::HtmlElement| {
                *listeners.borrow_mut() = Some(DragListeners::attach(element, list, index));
            }
        })
        .after_remove(move |_| {
            listeners.borrow_mut().take();
        })
        .item(El::new().s(Font::new().size(16).color("oklch(60% 0.02 255)")).child("⠿"))
        .item(El::new().child(question.kind.icon()))
        .item(El::new().s(Width::fill()).child(question.text.clone()))
        .item(question_badges(&question))
}

fn question_badges(question: &Question) -> impl Element + use<> {
    let mut badges = vec![question.kind.label().to_string()];
    if let Some(difficulty) = question.difficulty {
        badges.push(difficulty.label().to_string());
    }
    if let Some(points) = question.points {
        badges.push(format!("{points} pts"));
    }
    Row::new().s(Gap::new().x(6)).items(badges.into_iter().map(|badge| {
        El::new()
            .s(Padding::new().x(6).y(2))
            .s(RoundedCorners::all(4))
            .s(Background::new().color("oklch(94% 0.02 255)"))
            .s(Font::new().size(12))
            .child(badge)
    }))
}
