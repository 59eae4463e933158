// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A quiz as held by the catalog. Never mutated after it is loaded; an
/// update replaces the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub category: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,

    /// Advisory limit in minutes. Nothing is submitted automatically when it
    /// runs out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<QuizOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

impl Quiz {
    pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Case-insensitive match over title, description and tags.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
    }
}

impl QuizQuestion {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

/// DTO for listing and viewing quizzes (excludes answers and explanations).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub category: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicOption {
    pub id: String,
    pub text: String,
}

impl From<&QuizQuestion> for PublicQuestion {
    fn from(q: &QuizQuestion) -> Self {
        PublicQuestion {
            id: q.id.clone(),
            question: q.question.clone(),
            options: q
                .options
                .iter()
                .map(|o| PublicOption {
                    id: o.id.clone(),
                    text: o.text.clone(),
                })
                .collect(),
        }
    }
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        PublicQuiz {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            created_by: quiz.created_by.clone(),
            created_at: quiz.created_at,
            category: quiz.category.clone(),
            difficulty: quiz.difficulty,
            question_count: quiz.questions.len(),
            time_limit: quiz.time_limit,
            tags: quiz.tags.clone(),
            image_url: quiz.image_url.clone(),
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

/// Query string for `GET /api/quizzes`.
#[derive(Debug, Default, Deserialize)]
pub struct QuizFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuizFilter {
    pub fn accepts(&self, quiz: &Quiz) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .is_none_or(|s| quiz.matches_search(s.trim()));
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| quiz.category.eq_ignore_ascii_case(c));
        let difficulty_ok = self.difficulty.is_none_or(|d| quiz.difficulty == d);
        search_ok && category_ok && difficulty_ok
    }
}

/// DTO for creating or replacing a quiz.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Quiz title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Quiz description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    pub difficulty: Difficulty,
    #[validate(
        length(min = 1, message = "At least one question is required"),
        nested
    )]
    pub questions: Vec<CreateQuestionRequest>,
    #[validate(range(min = 1, max = 600))]
    pub time_limit: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
    #[validate(custom(function = validate_image_url))]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_single_correct))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 2, max = 10), custom(function = validate_options))]
    pub options: Vec<CreateOptionRequest>,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

fn validate_options(options: &[CreateOptionRequest]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.text.trim().is_empty() {
            return Err(validator::ValidationError::new("option_text_required")
                .with_message("All options must have text".into()));
        }
        if opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// Scoring assumes one correct option per question, so the catalog refuses
/// anything else.
fn validate_single_correct(q: &CreateQuestionRequest) -> Result<(), validator::ValidationError> {
    let correct = q.options.iter().filter(|o| o.is_correct).count();
    if correct != 1 {
        return Err(validator::ValidationError::new("exactly_one_correct_option")
            .with_message("Each question needs exactly one correct option".into()));
    }
    Ok(())
}

fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
