// Question fetcher: downloads practice questions for a topic, flattens
// them into plain records, and exports records to a fixed-column CSV.

use crate::api::{ApiClient, QuestionsResponse};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// One multiple-choice question, flattened for export. `answers` keeps the
/// server's order, which decides the A/B/C/D mapping in the CSV. A missing
/// question prompt or explanation stays `None` instead of collapsing to an
/// empty string; an unflagged correct answer is the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub question: Option<String>,
    pub answers: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// CSV row shape. Field names double as the header row.
#[derive(Serialize)]
struct CsvRow<'a> {
    question: Option<&'a str>,
    option_a: &'a str,
    option_b: &'a str,
    option_c: &'a str,
    option_d: &'a str,
    correct_answer: &'a str,
    explanation: Option<&'a str>,
}

/// Fetch practice questions and flatten them into records. Transport and
/// parse failures come back as `Err` for the session to report.
pub fn fetch(
    api: &ApiClient,
    subject_slug: &str,
    unit_id: &str,
    topic_id: &str,
    limit: u32,
    question_type: Option<&str>,
) -> Result<Vec<QuestionRecord>> {
    let response = api.fetch_questions(subject_slug, unit_id, topic_id, limit, question_type)?;
    Ok(flatten(response))
}

fn flatten(response: QuestionsResponse) -> Vec<QuestionRecord> {
    let entries = response.data.map(|d| d.questions).unwrap_or_default();
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut answers = Vec::with_capacity(entry.answers.len());
        let mut correct: Option<String> = None;
        for ans in entry.answers {
            let text = ans.answer.unwrap_or_default();
            if correct.is_none() && ans.kind.as_deref() == Some("CORRECT") {
                correct = Some(text.clone());
            }
            answers.push(text);
        }
        records.push(QuestionRecord {
            question: entry.question,
            answers,
            correct_answer: correct.unwrap_or_default(),
            explanation: entry.explanation,
        });
    }

    records
}

/// Write `records` to `path` as CSV with the fixed seven-column header.
/// Answers map positionally onto option_a..option_d; short lists pad with
/// empty cells and anything past the fourth answer is dropped. An empty
/// record list writes nothing and returns 0.
pub fn export(records: &[QuestionRecord], path: &Path) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Opening '{}' for writing", path.display()))?;
    for record in records {
        writer
            .serialize(CsvRow {
                question: record.question.as_deref(),
                option_a: option_at(&record.answers, 0),
                option_b: option_at(&record.answers, 1),
                option_c: option_at(&record.answers, 2),
                option_d: option_at(&record.answers, 3),
                correct_answer: &record.correct_answer,
                explanation: record.explanation.as_deref(),
            })
            .with_context(|| format!("Writing row to '{}'", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Flushing '{}'", path.display()))?;

    Ok(records.len())
}

fn option_at(answers: &[String], index: usize) -> &str {
    answers.get(index).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> QuestionsResponse {
        serde_json::from_value(value).unwrap()
    }

    fn record(question: &str, answers: &[&str], correct: &str, explanation: &str) -> QuestionRecord {
        QuestionRecord {
            question: Some(question.to_string()),
            answers: answers.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.to_string(),
            explanation: Some(explanation.to_string()),
        }
    }

    #[test]
    fn flattens_answers_in_server_order_and_finds_correct() {
        let records = flatten(response(json!({
            "data": {"practiceQuestionsByTopic": [{
                "question": "Q1",
                "explanation": "E",
                "answers": [
                    {"answer": "A", "type": "INCORRECT"},
                    {"answer": "B", "type": "CORRECT"},
                    {"answer": "C", "type": "INCORRECT"}
                ]
            }]}
        })));
        assert_eq!(records, vec![record("Q1", &["A", "B", "C"], "B", "E")]);
    }

    #[test]
    fn no_correct_flag_leaves_correct_answer_empty() {
        let records = flatten(response(json!({
            "data": {"practiceQuestionsByTopic": [{
                "question": "Q",
                "answers": [{"answer": "A"}, {"answer": "B"}]
            }]}
        })));
        assert_eq!(records[0].correct_answer, "");
        assert_eq!(records[0].explanation, None);
    }

    #[test]
    fn missing_data_key_flattens_to_no_records() {
        assert!(flatten(response(json!({}))).is_empty());
        assert!(flatten(response(json!({"data": null}))).is_empty());
        assert!(flatten(response(json!({"data": {}}))).is_empty());
    }

    #[test]
    fn export_maps_three_answers_with_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let written = export(&[record("Q1", &["A", "B", "C"], "B", "E")], &path).unwrap();
        assert_eq!(written, 1);

        let body = std::fs::read_to_string(&path).unwrap();
        let mut lines = body.lines();
        assert_eq!(
            lines.next().unwrap(),
            "question,option_a,option_b,option_c,option_d,correct_answer,explanation"
        );
        assert_eq!(lines.next().unwrap(), "Q1,A,B,C,,B,E");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_pads_and_truncates_to_four_option_slots() {
        let dir = tempfile::tempdir().unwrap();
        let cases: &[(&[&str], &str)] = &[
            (&[], "Q,,,,,X,E"),
            (&["A", "B"], "Q,A,B,,,X,E"),
            (&["A", "B", "C", "D"], "Q,A,B,C,D,X,E"),
            (&["A", "B", "C", "D", "E5", "F6"], "Q,A,B,C,D,X,E"),
        ];
        for (i, (answers, expected)) in cases.iter().enumerate() {
            let path = dir.path().join(format!("case{}.csv", i));
            export(&[record("Q", answers, "X", "E")], &path).unwrap();
            let body = std::fs::read_to_string(&path).unwrap();
            assert_eq!(body.lines().nth(1).unwrap(), *expected);
        }
    }

    #[test]
    fn export_round_trips_through_a_csv_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");
        export(
            &[record("What, exactly?", &["1,000", "2"], "1,000", "see \"notes\"")],
            &path,
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "What, exactly?");
        assert_eq!(&row[1], "1,000");
        assert_eq!(&row[2], "2");
        assert_eq!(&row[3], "");
        assert_eq!(&row[5], "1,000");
        assert_eq!(&row[6], "see \"notes\"");
    }

    #[test]
    fn export_of_nothing_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        assert_eq!(export(&[], &path).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn missing_prompt_and_explanation_export_as_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        export(
            &[QuestionRecord {
                question: None,
                answers: vec!["A".into()],
                correct_answer: "A".into(),
                explanation: None,
            }],
            &path,
        )
        .unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().nth(1).unwrap(), ",A,,,,A,");
    }
}
