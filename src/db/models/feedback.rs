use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::{Json, Uuid};
use time::OffsetDateTime;
use validator::Validate;

/// A single feedback answer: a 1-5 rating or free text / choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Rating(i64),
    Text(String),
}

impl AnswerValue {
    /// Returns the numeric value when this answer is a rating in 1..=5.
    pub fn as_rating(&self) -> Option<i64> {
        match self {
            AnswerValue::Rating(n) if (1..=5).contains(n) => Some(*n),
            _ => None,
        }
    }
}

/// The fixed nine-question form the original paper feedback sheet used.
/// q7-q11 and q13 are ratings, q12/q15 free text, q14 a yes/no choice.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LegacyAnswers {
    #[validate(range(min = 1, max = 5))]
    pub q7: i64,
    #[validate(range(min = 1, max = 5))]
    pub q8: i64,
    #[validate(range(min = 1, max = 5))]
    pub q9: i64,
    #[validate(range(min = 1, max = 5))]
    pub q10: i64,
    #[validate(range(min = 1, max = 5))]
    pub q11: i64,
    pub q12: String,
    #[validate(range(min = 1, max = 5))]
    pub q13: i64,
    pub q14: String,
    pub q15: String,
}

/// Feedback payload shape, resolved exactly once at intake.
#[derive(Debug, Clone)]
pub enum FeedbackAnswers {
    Structured(BTreeMap<String, AnswerValue>),
    Legacy(LegacyAnswers),
}

impl FeedbackAnswers {
    /// Rounded mean of the numeric answers. The structured path averages
    /// whichever 1-5 ratings are present (`None` when there are none);
    /// the legacy path averages the six fixed rating questions.
    pub fn overall_rating(&self) -> Option<i16> {
        match self {
            FeedbackAnswers::Structured(responses) => {
                let ratings: Vec<i64> =
                    responses.values().filter_map(AnswerValue::as_rating).collect();
                if ratings.is_empty() {
                    return None;
                }
                let sum: i64 = ratings.iter().sum();
                Some((sum as f64 / ratings.len() as f64).round() as i16)
            }
            FeedbackAnswers::Legacy(l) => {
                let sum = l.q7 + l.q8 + l.q9 + l.q10 + l.q11 + l.q13;
                Some((sum as f64 / 6.0).round() as i16)
            }
        }
    }

    /// Flattens either shape into the stored question-id -> answer map.
    pub fn into_responses(self) -> BTreeMap<String, AnswerValue> {
        match self {
            FeedbackAnswers::Structured(responses) => responses,
            FeedbackAnswers::Legacy(l) => BTreeMap::from([
                ("q7".to_string(), AnswerValue::Rating(l.q7)),
                ("q8".to_string(), AnswerValue::Rating(l.q8)),
                ("q9".to_string(), AnswerValue::Rating(l.q9)),
                ("q10".to_string(), AnswerValue::Rating(l.q10)),
                ("q11".to_string(), AnswerValue::Rating(l.q11)),
                ("q12".to_string(), AnswerValue::Text(l.q12)),
                ("q13".to_string(), AnswerValue::Rating(l.q13)),
                ("q14".to_string(), AnswerValue::Text(l.q14)),
                ("q15".to_string(), AnswerValue::Text(l.q15)),
            ]),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct PersonalInfo {
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub designation: String,
    pub institute: String,
    pub contact: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub institute: Option<String>,
    pub contact: Option<String>,
    pub responses: Option<BTreeMap<String, AnswerValue>>,
    pub q7: Option<i64>,
    pub q8: Option<i64>,
    pub q9: Option<i64>,
    pub q10: Option<i64>,
    pub q11: Option<i64>,
    pub q12: Option<String>,
    pub q13: Option<i64>,
    pub q14: Option<String>,
    pub q15: Option<String>,
}

impl SubmitFeedbackRequest {
    /// All personal-info fields are required once the lifecycle
    /// preconditions have passed.
    pub fn personal_info(&self) -> Result<PersonalInfo, String> {
        match (
            self.name.clone(),
            self.email.clone(),
            self.designation.clone(),
            self.institute.clone(),
            self.contact.clone(),
        ) {
            (Some(name), Some(email), Some(designation), Some(institute), Some(contact))
                if !name.is_empty()
                    && !email.is_empty()
                    && !designation.is_empty()
                    && !institute.is_empty()
                    && !contact.is_empty() =>
            {
                Ok(PersonalInfo { name, email, designation, institute, contact })
            }
            _ => Err("All personal information fields are required".to_string()),
        }
    }

    /// Resolves the duck-typed wire shape into a tagged union: a
    /// non-empty `responses` mapping wins, otherwise all nine legacy
    /// question keys must be present.
    pub fn answers(&self) -> Result<FeedbackAnswers, String> {
        if let Some(responses) = &self.responses {
            if !responses.is_empty() {
                return Ok(FeedbackAnswers::Structured(responses.clone()));
            }
        }
        match (
            self.q7, self.q8, self.q9, self.q10, self.q11, self.q12.clone(), self.q13,
            self.q14.clone(), self.q15.clone(),
        ) {
            (
                Some(q7),
                Some(q8),
                Some(q9),
                Some(q10),
                Some(q11),
                Some(q12),
                Some(q13),
                Some(q14),
                Some(q15),
            ) => Ok(FeedbackAnswers::Legacy(LegacyAnswers {
                q7,
                q8,
                q9,
                q10,
                q11,
                q12,
                q13,
                q14,
                q15,
            })),
            _ => Err("All feedback questions must be answered".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub designation: String,
    pub institute: String,
    pub contact: String,
    pub responses: BTreeMap<String, AnswerValue>,
    pub overall_rating: Option<i16>,
    pub submission_source: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub designation: String,
    pub institute: String,
    pub contact: String,
    pub responses: Json<BTreeMap<String, AnswerValue>>,
    pub overall_rating: Option<i16>,
    pub submission_source: String,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> SubmitFeedbackRequest {
        SubmitFeedbackRequest {
            participant_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: Some("Asha Verma".to_string()),
            email: Some("asha@example.com".to_string()),
            designation: Some("Assistant Professor".to_string()),
            institute: Some("NIT".to_string()),
            contact: Some("9876543210".to_string()),
            responses: None,
            q7: None,
            q8: None,
            q9: None,
            q10: None,
            q11: None,
            q12: None,
            q13: None,
            q14: None,
            q15: None,
        }
    }

    #[test]
    fn structured_rating_is_rounded_mean_of_numeric_answers() {
        let responses = BTreeMap::from([
            ("q1".to_string(), AnswerValue::Rating(5)),
            ("q2".to_string(), AnswerValue::Rating(3)),
            ("q3".to_string(), AnswerValue::Rating(4)),
        ]);
        let answers = FeedbackAnswers::Structured(responses);
        assert_eq!(answers.overall_rating(), Some(4));
    }

    #[test]
    fn structured_rating_ignores_text_and_out_of_range_answers() {
        let responses = BTreeMap::from([
            ("q1".to_string(), AnswerValue::Rating(5)),
            ("q2".to_string(), AnswerValue::Text("great session".to_string())),
            ("q3".to_string(), AnswerValue::Rating(9)),
        ]);
        let answers = FeedbackAnswers::Structured(responses);
        assert_eq!(answers.overall_rating(), Some(5));
    }

    #[test]
    fn structured_rating_is_none_without_numeric_answers() {
        let responses =
            BTreeMap::from([("q1".to_string(), AnswerValue::Text("n/a".to_string()))]);
        assert_eq!(FeedbackAnswers::Structured(responses).overall_rating(), None);
    }

    #[test]
    fn legacy_rating_averages_the_six_rating_questions() {
        let answers = FeedbackAnswers::Legacy(LegacyAnswers {
            q7: 4,
            q8: 5,
            q9: 3,
            q10: 4,
            q11: 5,
            q12: "More hands-on time".to_string(),
            q13: 4,
            q14: "Yes".to_string(),
            q15: "The lab sessions".to_string(),
        });
        // round((4+5+3+4+5+4)/6) = round(4.166) = 4
        assert_eq!(answers.overall_rating(), Some(4));
    }

    #[test]
    fn legacy_rating_rounds_half_up() {
        let answers = FeedbackAnswers::Legacy(LegacyAnswers {
            q7: 4,
            q8: 4,
            q9: 4,
            q10: 5,
            q11: 5,
            q12: String::new(),
            q13: 5,
            q14: "Yes".to_string(),
            q15: String::new(),
        });
        // mean 4.5 rounds to 5
        assert_eq!(answers.overall_rating(), Some(5));
    }

    #[test]
    fn answers_prefer_non_empty_structured_responses() {
        let mut req = base_request();
        req.responses = Some(BTreeMap::from([(
            "q1".to_string(),
            AnswerValue::Rating(4),
        )]));
        req.q7 = Some(1);
        assert!(matches!(req.answers(), Ok(FeedbackAnswers::Structured(_))));
    }

    #[test]
    fn empty_structured_responses_fall_back_to_legacy_keys() {
        let mut req = base_request();
        req.responses = Some(BTreeMap::new());
        assert!(req.answers().is_err());

        req.q7 = Some(4);
        req.q8 = Some(4);
        req.q9 = Some(4);
        req.q10 = Some(4);
        req.q11 = Some(4);
        req.q12 = Some("ok".to_string());
        req.q13 = Some(4);
        req.q14 = Some("Yes".to_string());
        req.q15 = Some("ok".to_string());
        assert!(matches!(req.answers(), Ok(FeedbackAnswers::Legacy(_))));
    }

    #[test]
    fn incomplete_legacy_answers_are_rejected() {
        let mut req = base_request();
        req.q7 = Some(4);
        req.q8 = Some(4);
        assert!(req.answers().is_err());
    }

    #[test]
    fn missing_personal_info_is_rejected() {
        let mut req = base_request();
        req.contact = None;
        assert!(req.personal_info().is_err());

        let mut req = base_request();
        req.name = Some(String::new());
        assert!(req.personal_info().is_err());
    }

    #[test]
    fn legacy_answers_flatten_into_nine_responses() {
        let answers = FeedbackAnswers::Legacy(LegacyAnswers {
            q7: 1,
            q8: 2,
            q9: 3,
            q10: 4,
            q11: 5,
            q12: "text".to_string(),
            q13: 2,
            q14: "No".to_string(),
            q15: "text".to_string(),
        });
        let responses = answers.into_responses();
        assert_eq!(responses.len(), 9);
        assert_eq!(responses.get("q7"), Some(&AnswerValue::Rating(1)));
        assert_eq!(responses.get("q14"), Some(&AnswerValue::Text("No".to_string())));
    }

    #[test]
    fn answer_value_deserializes_untagged() {
        let rating: AnswerValue = serde_json::from_str("4").unwrap();
        assert_eq!(rating, AnswerValue::Rating(4));
        let text: AnswerValue = serde_json::from_str("\"useful\"").unwrap();
        assert_eq!(text, AnswerValue::Text("useful".to_string()));
    }
}
