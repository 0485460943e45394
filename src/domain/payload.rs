use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- GraphQL Response Structures ---

/// Envelope of every LeetCode GraphQL response
#[derive(Debug, Deserialize, Serialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileQueryData {
    #[serde(rename = "matchedUser")]
    pub matched_user: Option<MatchedUser>,
    #[serde(rename = "recentSubmissionList", default)]
    pub recent_submission_list: Option<Vec<RecentSubmissionPayload>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionQueryData {
    pub question: Option<QuestionInfo>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionInfo {
    pub difficulty: Option<String>,
}

/// Profile of an existing user, as returned by the source before validation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfilePayload {
    pub matched_user: MatchedUser,
    #[serde(default)]
    pub recent_submissions: Vec<RecentSubmissionPayload>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchedUser {
    #[serde(default)]
    pub username: String,
    #[serde(rename = "submitStatsGlobal", default)]
    pub submit_stats: Option<SubmitStats>,
    #[serde(default)]
    pub profile: Option<ProfileInfo>,
    /// JSON-encoded object of day-start timestamp → submission count
    #[serde(rename = "submissionCalendar", default)]
    pub submission_calendar: Option<String>,
    #[serde(rename = "languageProblemCount", default)]
    pub language_problem_count: Option<Vec<LanguageCount>>,
    #[serde(rename = "tagProblemCounts", default)]
    pub tag_problem_counts: Option<TagProblemCounts>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubmitStats {
    #[serde(rename = "acSubmissionNum", default)]
    pub ac_submission_num: Option<Vec<DifficultyCount>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileInfo {
    #[serde(rename = "realName", default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub ranking: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageCount {
    #[serde(rename = "languageName")]
    pub language_name: String,
    #[serde(rename = "problemsSolved")]
    pub problems_solved: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TagProblemCounts {
    #[serde(default)]
    pub fundamental: Option<Vec<TagCount>>,
    #[serde(default)]
    pub intermediate: Option<Vec<TagCount>>,
    #[serde(default)]
    pub advanced: Option<Vec<TagCount>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagCount {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    #[serde(rename = "problemsSolved")]
    pub problems_solved: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecentSubmissionPayload {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "titleSlug", default)]
    pub title_slug: Option<String>,
    /// Seconds since epoch; the API sends it as a string
    #[serde(default)]
    pub timestamp: Value,
    #[serde(rename = "statusDisplay", default)]
    pub status_display: String,
    #[serde(default)]
    pub lang: Option<String>,
    /// Not part of the API response; filled in when difficulties are resolved
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl RecentSubmissionPayload {
    pub fn timestamp_secs(&self) -> Option<i64> {
        match &self.timestamp {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status_display == super::models::ACCEPTED_STATUS
    }
}
