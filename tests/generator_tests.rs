
use std::sync::Arc;
use std::time::Duration;

use pdf_quiz::clients::gemini::{GeminiClient, GeminiConfig, GeminiModel};
use pdf_quiz::clients::mock::{MockClient, MockResponse};
use pdf_quiz::clients::FlexibleClient;
use pdf_quiz::core::QuizGenerator;
use pdf_quiz::error::QuizError;
use pdf_quiz::request::{Document, GenerationConfig, PDF_MEDIA_TYPE};

use crate::test_utils::{quiz_with, sample_pdf, valid_quiz_json};

#[tokio::test]
async fn generates_quiz_with_exactly_one_call() {
    let (client, handle) = MockClient::with_responses(vec![MockResponse::text(valid_quiz_json())]);
    let generator = QuizGenerator::new(client);

    let quiz = generator
        .generate(Some(Document::pdf(sample_pdf())))
        .await
        .expect("quiz should be generated");

    assert_eq!(quiz.questions.len(), 10);
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn schema_guided_request_carries_document_and_schema() {
    let (client, handle) = MockClient::with_responses(vec![MockResponse::text(valid_quiz_json())]);
    let generator = QuizGenerator::new(client);

    generator
        .generate(Some(Document::pdf(sample_pdf()).with_file_name("notes.pdf")))
        .await
        .unwrap();

    let request = handle.last_request().expect("request recorded");
    assert_eq!(request.document.bytes.as_ref(), sample_pdf().as_slice());
    assert_eq!(request.document.media_type, PDF_MEDIA_TYPE);
    assert_eq!(request.document.file_name.as_deref(), Some("notes.pdf"));
    assert!(request.prompt.contains("exactly 10 questions"));
    assert!(request.prompt.contains("correctAnswer"));
    assert_eq!(request.generation, GenerationConfig::default());
    assert_eq!(request.generation.temperature, 0.7);

    let schema = request.response_schema.expect("schema declared");
    assert_eq!(schema["required"], serde_json::json!(["title", "questions"]));
    assert_eq!(schema["properties"]["questions"]["minItems"], 10);
    assert_eq!(schema["properties"]["questions"]["maxItems"], 10);
    let question = &schema["properties"]["questions"]["items"];
    assert_eq!(question["properties"]["options"]["minItems"], 4);
    assert_eq!(question["properties"]["options"]["maxItems"], 4);
    assert_eq!(question["properties"]["correctAnswer"]["minimum"], 0);
    assert_eq!(question["properties"]["correctAnswer"]["maximum"], 3);
}

#[tokio::test]
async fn without_schema_support_the_shape_is_embedded_in_the_prompt() {
    let (client, handle) = MockClient::with_responses(vec![MockResponse::text(format!(
        "Here is the quiz: {}",
        valid_quiz_json()
    ))]);
    let generator = QuizGenerator::new(client.without_schema_support());

    let quiz = generator.generate(Some(Document::pdf(sample_pdf()))).await.unwrap();
    assert_eq!(quiz.questions.len(), 10);

    let request = handle.last_request().unwrap();
    assert!(request.response_schema.is_none());
    assert!(request.prompt.contains("\"correctAnswer\": 0"));
    assert!(request.prompt.contains("\"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"]"));
    assert!(request.prompt.contains("## Response Format"));
}

#[tokio::test]
async fn missing_document_makes_no_external_call() {
    let (client, handle) = MockClient::with_responses(vec![MockResponse::text(valid_quiz_json())]);
    let generator = QuizGenerator::new(client);

    let result = generator.generate(None).await;
    assert!(matches!(result, Err(QuizError::MissingInput)));

    let result = generator.generate(Some(Document::pdf(Vec::new()))).await;
    assert!(matches!(result, Err(QuizError::MissingInput)));

    assert_eq!(handle.call_count(), 0);
}

#[tokio::test]
async fn upstream_failure_is_not_retried() {
    let (client, handle) = MockClient::with_responses(vec![
        MockResponse::Status { status: 503, message: "overloaded".to_string() },
        MockResponse::text(valid_quiz_json()),
    ]);
    let generator = QuizGenerator::new(client);

    let err = generator
        .generate(Some(Document::pdf(sample_pdf())))
        .await
        .expect_err("upstream failure must surface");

    assert!(matches!(err, QuizError::Upstream(_)));
    assert_eq!(err.upstream_status(), Some(503));
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn malformed_and_invalid_replies_fail_after_one_call() {
    let (client, handle) = MockClient::with_responses(vec![
        MockResponse::text("Sorry, I cannot help with that."),
        MockResponse::text(quiz_with(|v| v["questions"][9]["correctAnswer"] = serde_json::json!(4))),
    ]);
    let generator = QuizGenerator::new(client);
    let doc = Document::pdf(sample_pdf());

    let first = generator.generate(Some(doc.clone())).await;
    assert!(matches!(first, Err(QuizError::MalformedResponse { .. })));
    assert_eq!(handle.call_count(), 1);

    let second = generator.generate(Some(doc)).await;
    assert!(matches!(second, Err(QuizError::InvalidQuizStructure(_))));
    assert_eq!(handle.call_count(), 2);
}

#[tokio::test]
async fn slow_upstream_hits_the_deadline() {
    let (client, handle) = MockClient::with_responses(vec![
        MockResponse::text(valid_quiz_json()).delayed(Duration::from_secs(5)),
    ]);
    let generator = QuizGenerator::new(client).with_timeout(Duration::from_millis(50));

    let result = generator.generate(Some(Document::pdf(sample_pdf()))).await;
    match result {
        Err(QuizError::Timeout(limit)) => assert_eq!(limit, Duration::from_millis(50)),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let config = GeminiConfig::new(None, GeminiModel::Flash20)
        .with_base_url("http://127.0.0.1:9");
    let generator = QuizGenerator::new(GeminiClient::new(config));

    let result = generator.generate(Some(Document::pdf(sample_pdf()))).await;
    assert!(
        matches!(result, Err(QuizError::Configuration(_))),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn custom_generation_config_is_forwarded() {
    let (client, handle) = MockClient::with_responses(vec![MockResponse::text(valid_quiz_json())]);
    let generation = GenerationConfig {
        temperature: 0.2,
        ..GenerationConfig::default()
    };
    let generator = QuizGenerator::new(client).with_generation_config(generation.clone());

    generator.generate(Some(Document::pdf(sample_pdf()))).await.unwrap();
    assert_eq!(handle.last_request().unwrap().generation, generation);
}

#[tokio::test]
async fn concurrent_requests_share_one_generator() {
    let (client, handle) = FlexibleClient::mock();
    handle.set_fallback(MockResponse::text(valid_quiz_json()));
    let generator = Arc::new(QuizGenerator::new(client));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let generator = generator.clone();
        tasks.push(tokio::spawn(async move {
            generator.generate(Some(Document::pdf(sample_pdf()))).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(handle.call_count(), 8);
}

#[tokio::test]
async fn demo_client_produces_a_valid_quiz() {
    let generator = QuizGenerator::new(FlexibleClient::demo());
    let quiz = generator.generate(Some(Document::pdf(sample_pdf()))).await.unwrap();
    assert_eq!(quiz.title, "Demo Arithmetic Quiz");
    for (i, q) in quiz.questions.iter().enumerate() {
        let n = i + 1;
        assert_eq!(q.correct_option(), Some((2 * n).to_string().as_str()));
    }
}
