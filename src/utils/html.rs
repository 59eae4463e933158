use crate::models::quiz::CreateQuizRequest;

/// Strips markup from user-supplied text before it enters the catalog.
///
/// Whitelist-based via ammonia: harmless tags survive, `<script>` and event
/// attributes do not.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes every free-text field of a quiz submission in place.
pub fn clean_quiz_request(req: &mut CreateQuizRequest) {
    req.title = clean_html(&req.title);
    req.description = clean_html(&req.description);
    req.category = clean_html(&req.category);
    for tag in &mut req.tags {
        *tag = clean_html(tag);
    }
    for question in &mut req.questions {
        question.question = clean_html(&question.question);
        if let Some(explanation) = question.explanation.as_mut() {
            *explanation = clean_html(explanation);
        }
        for option in &mut question.options {
            option.text = clean_html(&option.text);
        }
    }
}
