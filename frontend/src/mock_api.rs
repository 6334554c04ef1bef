//! In-browser stand-in for the LMS REST endpoints.
//!
//! Every call waits a little so loading indicators and stale-result handling
//! behave as they would against a real server.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use lms_shared::search::matches_query;
use lms_shared::{Course, Difficulty, Message, Page, PageRequest, Question, QuestionKind, QuestionOrder};
use zoon::*;

const TOTAL_COURSES: u64 = 95;
const TOTAL_MESSAGES: u64 = 130;
const SEARCH_LIMIT: usize = 10;
const LATENCY_MS: u32 = 400;

const SUBJECTS: [&str; 8] = [
    "Rust Fundamentals",
    "Linear Algebra",
    "Organic Chemistry",
    "World History",
    "Data Structures",
    "Creative Writing",
    "Microeconomics",
    "Music Theory",
];

const INSTRUCTORS: [&str; 5] = ["A. Novak", "B. Okafor", "C. Lindqvist", "D. Tanaka", "E. Moreau"];

fn course(id: u64) -> Course {
    let subject = SUBJECTS[(id as usize - 1) % SUBJECTS.len()];
    Course {
        id,
        title: format!("{subject} {}", 100 + id),
        instructor: INSTRUCTORS[(id as usize - 1) % INSTRUCTORS.len()].to_string(),
    }
}

fn message(id: u64) -> Message {
    Message {
        id,
        author: INSTRUCTORS[(id as usize - 1) % INSTRUCTORS.len()].to_string(),
        body: format!("Announcement #{id}: please check the updated course materials."),
    }
}

/// Slice `1..=total` into the page described by `request`.
fn paged<T>(request: PageRequest, total: u64, endpoint: &str, make: impl Fn(u64) -> T) -> Page<T> {
    let size = u64::from(request.page_size.max(1));
    let start = u64::from(request.page.saturating_sub(1)) * size;
    let end = (start + size).min(total);
    Page {
        results: (start..end).map(|index| make(index + 1)).collect(),
        next: (end < total).then(|| format!("/api/{endpoint}/?page={}", request.page + 1)),
    }
}

pub fn fetch_courses(request: PageRequest) -> LocalBoxFuture<'static, Result<Page<Course>, String>> {
    async move {
        Timer::sleep(LATENCY_MS).await;
        Ok(paged(request, TOTAL_COURSES, "courses", course))
    }
    .boxed_local()
}

pub fn fetch_messages(request: PageRequest) -> LocalBoxFuture<'static, Result<Page<Message>, String>> {
    async move {
        Timer::sleep(LATENCY_MS).await;
        Ok(paged(request, TOTAL_MESSAGES, "messages", message))
    }
    .boxed_local()
}

pub async fn search_courses(query: String) -> Vec<Course> {
    Timer::sleep(LATENCY_MS / 2).await;
    (1..=TOTAL_COURSES)
        .map(course)
        .filter(|course| matches_query(&course.title, &query) || matches_query(&course.instructor, &query))
        .take(SEARCH_LIMIT)
        .collect()
}

/// `POST /api/quizzes/<id>/reorder/` with the new `order` values.
pub async fn persist_question_order(orders: Vec<QuestionOrder>) -> Result<(), String> {
    let body = serde_json::to_string(&orders).map_err(|error| error.to_string())?;
    Timer::sleep(LATENCY_MS / 2).await;
    log::info!("persisted question order {body}");
    Ok(())
}

pub fn sample_questions() -> Vec<Question> {
    let rows = [
        ("Which keyword declares an immutable binding?", QuestionKind::MultipleChoice, Some(Difficulty::Easy), Some(2)),
        ("A `Vec<T>` always lives on the stack.", QuestionKind::TrueFalse, Some(Difficulty::Easy), Some(1)),
        ("Name the trait used for explicit duplication.", QuestionKind::ShortAnswer, Some(Difficulty::Medium), Some(3)),
        ("Explain how the borrow checker prevents data races.", QuestionKind::Essay, Some(Difficulty::Hard), Some(10)),
        ("What does `?` do in a function returning `Result`?", QuestionKind::ShortAnswer, None, None),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(index, (text, kind, difficulty, points))| Question {
            id: index as u64 + 1,
            text: text.to_string(),
            kind,
            difficulty,
            points,
            order: index as u32 + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u32, page_size: u32) -> PageRequest {
        let mut paginator = lms_shared::Paginator::<u64>::new(page, page_size);
        paginator.begin().unwrap()
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let first = paged(request(1, 20), TOTAL_COURSES, "courses", |id| id);
        assert_eq!(first.results.first(), Some(&1));
        assert_eq!(first.next.as_deref(), Some("/api/courses/?page=2"));

        let last = paged(request(5, 20), TOTAL_COURSES, "courses", |id| id);
        assert_eq!(last.results, (81..=95).collect::<Vec<_>>());
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_sample_questions_are_numbered() {
        let questions = sample_questions();
        assert!(questions.iter().enumerate().all(|(index, question)| question.order == index as u32 + 1));
    }
}
