
use pdf_quiz::error::QuizError;
use pdf_quiz::parse_quiz_reply;
use pdf_quiz::quiz::{QuizViolation, OPTION_COUNT, QUESTION_COUNT};
use serde_json::{json, Value};

use crate::test_utils::{quiz_with, valid_question, valid_quiz_json, valid_quiz_value};

fn violations(raw: &str) -> Vec<QuizViolation> {
    match parse_quiz_reply(raw) {
        Err(QuizError::InvalidQuizStructure(v)) => v,
        other => panic!("expected InvalidQuizStructure, got {:?}", other),
    }
}

#[test]
fn accepts_valid_quiz_unchanged() {
    let quiz = parse_quiz_reply(&valid_quiz_json()).expect("valid quiz");
    assert_eq!(quiz.title, "Cell Biology Basics");
    assert_eq!(quiz.questions.len(), QUESTION_COUNT);
    for (i, q) in quiz.questions.iter().enumerate() {
        assert_eq!(q.question, format!("What does section {} describe?", i + 1));
        assert_eq!(q.options, vec!["Alpha", "Beta", "Gamma", "Delta"]);
        assert_eq!(q.correct_answer, (i % 4) as i64);
    }
}

#[test]
fn serializes_back_with_camel_case_answer() {
    let quiz = parse_quiz_reply(&valid_quiz_json()).unwrap();
    let value = serde_json::to_value(&quiz).unwrap();
    assert_eq!(value, valid_quiz_value());
}

#[test]
fn rejects_every_question_count_other_than_ten() {
    for count in [0usize, 1, 5, 9, 11, 15, 20] {
        let raw = quiz_with(|v| {
            v["questions"] = Value::Array((0..count).map(valid_question).collect());
        });
        let found = violations(&raw);
        assert!(
            found.contains(&QuizViolation::WrongQuestionCount { found: count }),
            "count {} should be rejected, got {:?}",
            count,
            found
        );
    }
}

#[test]
fn rejects_every_option_count_other_than_four() {
    for count in (0..=8).filter(|c| *c != OPTION_COUNT) {
        for index in [0usize, 4, 9] {
            let raw = quiz_with(|v| {
                let options: Vec<Value> = (0..count).map(|i| json!(format!("Option {}", i))).collect();
                v["questions"][index]["options"] = Value::Array(options);
            });
            let found = violations(&raw);
            assert!(
                found.contains(&QuizViolation::WrongOptionCount { index, found: count }),
                "{} options at question {} should be rejected, got {:?}",
                count,
                index,
                found
            );
        }
    }
}

#[test]
fn rejects_out_of_range_answers() {
    for value in [-1i64, 4, 5, 100, i64::MIN] {
        let raw = quiz_with(|v| v["questions"][3]["correctAnswer"] = json!(value));
        assert_eq!(
            violations(&raw),
            vec![QuizViolation::AnswerOutOfRange { index: 3, value }]
        );
    }
}

#[test]
fn accepts_every_in_range_answer() {
    for answer in 0..OPTION_COUNT {
        let raw = quiz_with(|v| {
            for q in v["questions"].as_array_mut().unwrap() {
                q["correctAnswer"] = json!(answer);
            }
        });
        assert!(parse_quiz_reply(&raw).is_ok(), "answer {} should be accepted", answer);
    }
}

#[test]
fn rejects_non_integer_answers() {
    for value in [json!(1.5), json!("1"), Value::Null, json!([1]), json!(u64::MAX)] {
        let raw = quiz_with(|v| v["questions"][7]["correctAnswer"] = value.clone());
        assert_eq!(
            violations(&raw),
            vec![QuizViolation::AnswerNotInteger { index: 7 }],
            "correctAnswer {} should be rejected",
            value
        );
    }

    let raw = quiz_with(|v| {
        v["questions"][7].as_object_mut().unwrap().remove("correctAnswer");
    });
    assert_eq!(violations(&raw), vec![QuizViolation::AnswerNotInteger { index: 7 }]);
}

#[test]
fn rejects_missing_or_empty_title() {
    let missing = quiz_with(|v| {
        v.as_object_mut().unwrap().remove("title");
    });
    assert_eq!(violations(&missing), vec![QuizViolation::MissingTitle]);

    let empty = quiz_with(|v| v["title"] = json!(""));
    assert_eq!(violations(&empty), vec![QuizViolation::MissingTitle]);

    let not_text = quiz_with(|v| v["title"] = json!(42));
    assert_eq!(violations(&not_text), vec![QuizViolation::MissingTitle]);
}

#[test]
fn rejects_missing_questions_array() {
    let raw = quiz_with(|v| {
        v.as_object_mut().unwrap().remove("questions");
    });
    assert_eq!(violations(&raw), vec![QuizViolation::MissingQuestions]);

    let raw = quiz_with(|v| v["questions"] = json!("ten questions"));
    assert_eq!(violations(&raw), vec![QuizViolation::MissingQuestions]);
}

#[test]
fn rejects_missing_question_text_and_options() {
    let raw = quiz_with(|v| {
        v["questions"][2]["question"] = json!("");
        v["questions"][6].as_object_mut().unwrap().remove("options");
        v["questions"][8]["options"][1] = json!(7);
    });
    assert_eq!(
        violations(&raw),
        vec![
            QuizViolation::MissingQuestionText { index: 2 },
            QuizViolation::MissingOptions { index: 6 },
            QuizViolation::OptionNotText { index: 8, option: 1 },
        ]
    );
}

#[test]
fn one_bad_question_rejects_the_whole_quiz() {
    for index in 0..QUESTION_COUNT {
        let raw = quiz_with(|v| v["questions"][index]["options"] = json!(["only", "three", "options"]));
        let result = parse_quiz_reply(&raw);
        assert!(
            matches!(result, Err(QuizError::InvalidQuizStructure(_))),
            "quiz with bad question {} must be rejected entirely",
            index
        );
    }

    let raw = quiz_with(|v| v["questions"][5] = json!("not an object"));
    assert_eq!(violations(&raw), vec![QuizViolation::QuestionNotAnObject { index: 5 }]);
}

#[test]
fn extracts_quiz_embedded_in_free_text() {
    let raw = format!("Here is the quiz: {} Let me know if you need more.", valid_quiz_json());
    let quiz = parse_quiz_reply(&raw).expect("embedded quiz should parse");
    assert_eq!(quiz.questions.len(), 10);

    let fenced = format!("Sure! Here's your \"quiz\":\n```json\n{}\n```", valid_quiz_json());
    assert!(parse_quiz_reply(&fenced).is_ok());
}

#[test]
fn embedded_json_is_still_validated() {
    let raw = format!(
        "Here is the quiz: {}",
        quiz_with(|v| v["questions"].as_array_mut().unwrap().truncate(9))
    );
    assert_eq!(
        violations(&raw),
        vec![QuizViolation::WrongQuestionCount { found: 9 }]
    );
}

#[test]
fn text_without_json_is_malformed() {
    for raw in [
        "I could not read this document.",
        "",
        "Here is the quiz: {\"title\": \"T\", \"questions\": [",
        "[1, 2, 3]",
        "42",
    ] {
        assert!(
            matches!(parse_quiz_reply(raw), Err(QuizError::MalformedResponse { .. })),
            "{:?} should be malformed",
            raw
        );
    }
}

#[test]
fn malformed_error_keeps_raw_reply_for_diagnostics() {
    match parse_quiz_reply("no quiz today") {
        Err(QuizError::MalformedResponse { raw, .. }) => assert_eq!(raw, "no quiz today"),
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}
