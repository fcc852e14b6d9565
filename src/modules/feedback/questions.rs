use serde::Serialize;

/// Form definition for the fixed nine-question feedback sheet. Question
/// ids q7..q15 are stable: stored submissions key their answers by them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuestion {
    pub id: &'static str,
    pub question: &'static str,
    #[serde(rename = "type")]
    pub question_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u8>,
    pub required: bool,
}

pub fn feedback_questions() -> Vec<FeedbackQuestion> {
    vec![
        FeedbackQuestion {
            id: "q7",
            question: "How effectively do you think the organization of this training programme \
                       facilitated a conducive learning environment and promoted active \
                       participation among participants?",
            question_type: "rating",
            options: None,
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q8",
            question: "How effectively did the resource persons communicate and engage with the \
                       participants to enhance their learning experience?",
            question_type: "rating",
            options: None,
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q9",
            question: "How well do you think the topics covered align with the current trends \
                       and challenges, and to what extent did they contribute to your \
                       professional development?",
            question_type: "rating",
            options: None,
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q10",
            question: "How effective was the presentation style in conveying the key concepts \
                       and fostering a dynamic learning environment for the participants?",
            question_type: "rating",
            options: None,
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q11",
            question: "Please provide an overall assessment of the program's overall \
                       effectiveness",
            question_type: "rating",
            options: None,
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q12",
            question: "How do you think the training programme could have been more effective? \
                       (In 2 lines)",
            question_type: "text",
            options: None,
            multiline: Some(true),
            rows: Some(2),
            required: true,
        },
        FeedbackQuestion {
            id: "q13",
            question: "How satisfied were you overall?",
            question_type: "rating",
            options: None,
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q14",
            question: "Would you recommend the workshop to your colleagues or peers?",
            question_type: "radio",
            options: Some(&["Yes", "No"]),
            multiline: None,
            rows: None,
            required: true,
        },
        FeedbackQuestion {
            id: "q15",
            question: "Which topics or aspects of the sessions did you find most interesting or \
                       useful?",
            question_type: "text",
            options: None,
            multiline: Some(true),
            rows: Some(3),
            required: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_form_has_nine_questions_with_stable_ids() {
        let questions = feedback_questions();
        let ids: Vec<&str> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, ["q7", "q8", "q9", "q10", "q11", "q12", "q13", "q14", "q15"]);
        assert!(questions.iter().all(|q| q.required));
    }

    #[test]
    fn six_questions_are_ratings() {
        let ratings = feedback_questions()
            .iter()
            .filter(|q| q.question_type == "rating")
            .count();
        assert_eq!(ratings, 6);
    }
}
