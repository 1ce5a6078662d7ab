//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the lesson API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        CourseListing, ErrorResponse, StartLessonResponse, SubmitAnswerPayload,
        SubmitAnswerResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_courses,
        handlers::start_lesson_multi,
        handlers::submit_answer_multi,
        handlers::start_lesson,
        handlers::submit_answer,
    ),
    components(
        schemas(CourseListing, StartLessonResponse, SubmitAnswerPayload, SubmitAnswerResponse, ErrorResponse)
    ),
    tags(
        (name = "Tutor API", description = "Scripted lessons with AI-generated explanations and feedback")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/courses", get(handlers::list_courses))
        .route("/start_lesson_multi", get(handlers::start_lesson_multi))
        .route("/submit_answer_multi", post(handlers::submit_answer_multi))
        .route("/start_lesson", get(handlers::start_lesson))
        .route("/submit_answer", post(handlers::submit_answer))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::util::ServiceExt;
    use tutor_core::{
        catalog::CourseCatalog,
        llm_client::{FALLBACK_REPLY, ScriptedTutorClient},
        progression::LessonEngine,
        prompts::PromptSet,
    };

    const CATALOG: &str = include_str!("../../../content/courses.json");

    /// Builds a router whose tutor replies with `replies` in order.
    fn test_app(replies: &[&str]) -> (Router, Arc<ScriptedTutorClient>) {
        let tutor = Arc::new(ScriptedTutorClient::new(replies.iter().copied()));
        let engine = LessonEngine::new(
            Arc::new(CourseCatalog::from_json(CATALOG).unwrap()),
            tutor.clone(),
            Arc::new(PromptSet::default()),
        );
        let state = Arc::new(AppState {
            engine: Arc::new(engine),
            default_course_id: Arc::new("python-basics".to_string()),
        });
        (create_router(state), tutor)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_courses() {
        let (router, tutor) = test_app(&[]);

        let (status, body) = send(router, get_request("/courses")).await;

        assert_eq!(status, StatusCode::OK);
        let courses = body.as_array().unwrap();
        assert_eq!(courses.len(), 3);
        assert_eq!(
            courses[0],
            json!({"id": "python-basics", "title": "Python Basics: Variables and Data Types"})
        );
        assert!(tutor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_lesson_multi() {
        let (router, tutor) = test_app(&["Hello! Variables hold values."]);

        let (status, body) = send(
            router,
            get_request("/start_lesson_multi?course_id=python-basics&student_id=guest@student.com"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["module_id"], 1);
        assert_eq!(body["message"], "Hello! Variables hold values.");
        assert_eq!(body["expects_code"], true);
        assert_eq!(body["course_id"], "python-basics");
        assert!(
            body["question"]
                .as_str()
                .unwrap()
                .contains("player_name")
        );
        assert_eq!(tutor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_start_lesson_unknown_or_missing_course() {
        for uri in ["/start_lesson_multi?course_id=rust-101", "/start_lesson_multi"] {
            let (router, tutor) = test_app(&[]);
            let (status, body) = send(router, get_request(uri)).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"error": "Invalid course ID."}));
            assert!(tutor.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_submit_correct_answer_advances() {
        let (router, tutor) = test_app(&["Perfect! Well done.", "Now, strings."]);

        let (status, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=python-basics",
                json!({"module_id": 1, "answer": "player_name = 'Alice'"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback"], "Perfect! Well done.");
        assert_eq!(body["next_module_id"], 2);
        assert_eq!(body["next_explanation"], "Now, strings.");
        assert_eq!(body["expects_code"], true);
        assert_eq!(body["next_question"], body["question"]);
        assert!(body["question"].as_str().unwrap().contains("first_word"));

        let calls = tutor.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].1.contains("`player_name = 'Alice'`"));
    }

    #[tokio::test]
    async fn test_submit_incorrect_answer_retries() {
        let (router, tutor) = test_app(&["Not quite, check the quotes."]);

        let (_, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=python-basics",
                json!({"module_id": 1, "answer": "player_name = Alice"}),
            ),
        )
        .await;

        assert_eq!(body["next_module_id"], 1);
        assert_eq!(body["next_explanation"], "Give it another try!");
        assert_eq!(body["expects_code"], true);
        assert_eq!(tutor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_last_question_reaches_final_module() {
        let (router, tutor) = test_app(&["Great job!", "Congratulations, you made it!"]);

        let (_, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=python-basics",
                json!({"module_id": 3, "answer": "player_score = 100"}),
            ),
        )
        .await;

        assert_eq!(
            body,
            json!({
                "feedback": "Great job!",
                "next_module_id": 4,
                "next_explanation": "Congratulations, you made it!",
                "expects_code": false,
                "question": null
            })
        );
        assert_eq!(tutor.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_to_final_module_completes_course() {
        let (router, tutor) = test_app(&["Great job!"]);

        let (_, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=python-basics",
                json!({"module_id": 4, "answer": "thanks!"}),
            ),
        )
        .await;

        assert_eq!(
            body,
            json!({
                "feedback": "Great job!",
                "next_module_id": null,
                "expects_code": false,
                "question": null
            })
        );
        assert_eq!(tutor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_unknown_module_returns_only_error() {
        let (router, tutor) = test_app(&["Perfect!"]);

        let (status, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=python-basics",
                json!({"module_id": 99, "answer": "x"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "Invalid module ID."}));
        assert!(tutor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_unknown_course() {
        let (router, _) = test_app(&[]);

        let (_, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=nope",
                json!({"module_id": 1, "answer": "x"}),
            ),
        )
        .await;

        assert_eq!(body, json!({"error": "Invalid course ID."}));
    }

    #[tokio::test]
    async fn test_provider_outage_keeps_student_on_module() {
        let (router, _) = test_app(&[]);

        let (_, body) = send(
            router,
            post_request(
                "/submit_answer_multi?course_id=thinking-like-a-programmer",
                json!({"module_id": 2, "answer": "split it into tasks"}),
            ),
        )
        .await;

        assert_eq!(body["feedback"], FALLBACK_REPLY);
        assert_eq!(body["next_module_id"], 2);
        assert_eq!(body["next_explanation"], "Give it another try!");
    }

    #[tokio::test]
    async fn test_single_course_routes_use_default_course() {
        let (router, _) = test_app(&["Welcome!", "Exactly right.", "Numbers next."]);

        let (_, start) = send(router.clone(), get_request("/start_lesson")).await;
        assert_eq!(start["course_id"], "python-basics");
        assert_eq!(start["module_id"], 1);

        let (_, body) = send(
            router,
            post_request("/submit_answer", json!({"module_id": 2, "answer": "first_word = 'Programming'"})),
        )
        .await;
        assert_eq!(body["next_module_id"], 3);
        assert_eq!(body["next_explanation"], "Numbers next.");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let (router, _) = test_app(&[]);

        let (status, body) = send(router, get_request("/api-docs/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/submit_answer_multi"]["post"].is_object());
        assert!(body["paths"]["/courses"]["get"].is_object());
    }
}
