//! Prompt templates for keyword extraction.

/// Generic words that never count as keywords (Korean service vocabulary
/// plus English equivalents).
pub const GENERIC_TERMS: [&str; 8] = [
    "책",
    "추천",
    "분위기",
    "느낌",
    "book",
    "recommendation",
    "mood",
    "feeling",
];

/// System prompt for keyword extraction.
pub const DEFAULT_SYSTEM: &str = "You extract meaningful, concise keywords from user requests. \
Focus on specific adjectives, nouns and descriptive words that capture the mood, \
characteristics or themes of the request. Never output overly broad or common words, \
and exclude generic terms such as '책', '추천', '분위기', '느낌', 'book', 'recommendation', \
'mood' and 'feeling'.";

/// Builds the user prompt for the current query and up to two previous ones.
pub fn build_user_prompt(previous_queries: &[String], current_query: &str) -> String {
    let mut out = String::with_capacity(1024);

    if previous_queries.is_empty() {
        out.push_str("The user has no previous questions.\n");
    } else {
        out.push_str("The user has asked the following questions in the past: ");
        out.push_str(&previous_queries.join(", "));
        out.push_str(".\n");
    }
    out.push_str(&format!("The user is now asking: '{current_query}'.\n"));

    out.push_str(
        "Decide whether the current question is about a completely different topic than the \
previous ones. If it is, extract keywords from the current question only. If it is related, \
combine the previous and current questions, summarize them, and then extract keywords.\n",
    );
    out.push_str(
        "Prefer adjectives, descriptive words and attributes over full phrases or sentences.\n",
    );
    out.push_str(&format!(
        "Do not include generic terms such as {}.\n",
        GENERIC_TERMS
            .iter()
            .map(|t| format!("'{t}'"))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    out.push_str(
        "Output exactly one keyword or short phrase per line, without commas, numbering, \
labels like 'Keywords:' or any other text.",
    );

    out
}
