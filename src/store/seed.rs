// src/store/seed.rs

use chrono::{DateTime, Utc};

use crate::models::{
    attempt::LeaderboardEntry,
    quiz::{Difficulty, Quiz, QuizOption, QuizQuestion},
};

fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Options are numbered `<question id>-1`, `<question id>-2`, ... and the
/// one at `correct` is the right answer.
fn question(id: &str, text: &str, options: &[&str], correct: usize, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        question: text.to_string(),
        options: options
            .iter()
            .enumerate()
            .map(|(i, text)| QuizOption {
                id: format!("{}-{}", id, i + 1),
                text: text.to_string(),
                is_correct: i == correct,
            })
            .collect(),
        explanation: Some(explanation.to_string()),
    }
}

pub fn sample_quizzes() -> Vec<Quiz> {
    vec![
        Quiz {
            id: "1".to_string(),
            title: "General Knowledge Quiz".to_string(),
            description: "Test your knowledge across a variety of topics.".to_string(),
            created_by: "admin".to_string(),
            created_at: ts("2025-04-01T12:00:00Z"),
            category: "Miscellaneous".to_string(),
            difficulty: Difficulty::Medium,
            tags: vec!["general".into(), "knowledge".into(), "trivia".into()],
            image_url: Some("https://images.unsplash.com/photo-1516383607781-913a19294fd1".to_string()),
            time_limit: None,
            questions: vec![
                question(
                    "1-1",
                    "What is the capital of France?",
                    &["London", "Berlin", "Paris", "Madrid"],
                    2,
                    "Paris is the capital and most populous city of France.",
                ),
                question(
                    "1-2",
                    "Which planet is known as the Red Planet?",
                    &["Venus", "Mars", "Jupiter", "Saturn"],
                    1,
                    "Mars appears reddish because of iron oxide on its surface.",
                ),
                question(
                    "1-3",
                    "What is the largest ocean on Earth?",
                    &["Atlantic Ocean", "Indian Ocean", "Arctic Ocean", "Pacific Ocean"],
                    3,
                    "The Pacific Ocean covers more than 30% of the Earth's surface.",
                ),
            ],
        },
        Quiz {
            id: "2".to_string(),
            title: "Science Quiz".to_string(),
            description: "Challenge yourself with these science questions!".to_string(),
            created_by: "admin".to_string(),
            created_at: ts("2025-04-10T14:30:00Z"),
            category: "Science".to_string(),
            difficulty: Difficulty::Hard,
            tags: vec![
                "science".into(),
                "biology".into(),
                "physics".into(),
                "chemistry".into(),
            ],
            image_url: Some("https://images.unsplash.com/photo-1532094349884-543bc11b234d".to_string()),
            time_limit: Some(5),
            questions: vec![
                question(
                    "2-1",
                    "What is the chemical symbol for gold?",
                    &["Go", "Au", "Ag", "Gd"],
                    1,
                    "Au comes from the Latin word for gold, \"aurum\".",
                ),
                question(
                    "2-2",
                    "Which of the following is NOT a state of matter?",
                    &["Solid", "Liquid", "Gas", "Mineral"],
                    3,
                    "The common states of matter are solid, liquid, gas and plasma.",
                ),
            ],
        },
        Quiz {
            id: "3".to_string(),
            title: "Movie Trivia".to_string(),
            description: "How well do you know your films?".to_string(),
            created_by: "filmBuff22".to_string(),
            created_at: ts("2025-03-25T09:15:00Z"),
            category: "Entertainment".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec![
                "movies".into(),
                "cinema".into(),
                "trivia".into(),
                "entertainment".into(),
            ],
            image_url: Some("https://images.unsplash.com/photo-1536440136628-849c177e76a1".to_string()),
            time_limit: None,
            questions: vec![
                question(
                    "3-1",
                    "Which film won the Oscar for Best Picture in 2020?",
                    &["1917", "Joker", "Parasite", "Once Upon a Time in Hollywood"],
                    2,
                    "Parasite was the first non-English language film to win Best Picture.",
                ),
                question(
                    "3-2",
                    "Who played Tony Stark/Iron Man in the Marvel Cinematic Universe?",
                    &["Chris Evans", "Robert Downey Jr.", "Chris Hemsworth", "Mark Ruffalo"],
                    1,
                    "Robert Downey Jr. played Tony Stark from 2008 to 2019.",
                ),
            ],
        },
    ]
}

pub fn sample_leaderboard() -> Vec<LeaderboardEntry> {
    let rows = [
        ("1", "user1", "QuizMaster", "1", "General Knowledge Quiz", 3, 3, "2025-04-15T10:30:00Z"),
        ("2", "user2", "BrainiacAlex", "1", "General Knowledge Quiz", 2, 3, "2025-04-14T14:22:00Z"),
        ("3", "user3", "QuizWizard", "2", "Science Quiz", 2, 2, "2025-04-16T09:45:00Z"),
        ("4", "user4", "TriviaKing", "3", "Movie Trivia", 2, 2, "2025-04-13T16:10:00Z"),
        ("5", "user5", "KnowledgeNinja", "2", "Science Quiz", 1, 2, "2025-04-15T11:05:00Z"),
    ];

    rows.into_iter()
        .map(
            |(id, user_id, user_name, quiz_id, quiz_title, score, total, date)| LeaderboardEntry {
                id: id.to_string(),
                user_id: user_id.to_string(),
                user_name: user_name.to_string(),
                quiz_id: quiz_id.to_string(),
                quiz_title: quiz_title.to_string(),
                score,
                total_questions: total,
                date_attempted: ts(date),
            },
        )
        .collect()
}
