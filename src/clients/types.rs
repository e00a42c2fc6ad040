use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope used by every internal service: `code` 1000 means
/// success, anything else is a platform error code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default = "default_code")]
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

fn default_code() -> i32 {
    1000
}

impl<T> ApiResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            code: 1000,
            message: None,
            result: Some(result),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            result: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectResponse {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// User record as returned by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub performance_score: Option<f64>,
}

/// Profile record as returned by the profile service, with the identity
/// summary the profile service itself stitched in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub current_work_load_hours: Option<i32>,
    #[serde(default)]
    pub total_tasks_completed: Option<i32>,
    #[serde(default)]
    pub average_task_completion_rate: Option<f64>,
    #[serde(default)]
    pub skills: Vec<UserSkillResponse>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub position_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkillResponse {
    pub skill_name: String,
    #[serde(default)]
    pub proficiency_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Websocket,
    Email,
    Sms,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    High,
    Medium,
    Low,
}

/// Payload for the notification service's internal send endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignmentNotificationRequest {
    pub channel: NotificationChannel,
    /// User ID who will receive the notification
    pub recipient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    /// TASK_ASSIGNED, TASK_REASSIGNED, TASK_DUE_REMINDER, etc.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NotificationPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TaskAssignmentNotificationRequest {
    pub fn new(
        channel: NotificationChannel,
        recipient: impl Into<String>,
        kind: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            recipient: recipient.into(),
            recipient_name: None,
            kind: kind.into(),
            title: title.into(),
            body: body.into(),
            content_type: None,
            template_code: None,
            param: None,
            data: None,
            priority: None,
            ttl: None,
            persistent: None,
            category: None,
        }
    }
}

/// One candidate produced by the AI service's assignment scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecommendation {
    pub user_id: String,
    pub task_id: String,
    /// Final recommendation score (0-1)
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub skill_match_score: Option<f64>,
    #[serde(default)]
    pub workload_score: Option<f64>,
    #[serde(default)]
    pub recommendation_reason: Option<String>,
    /// Ranking among all candidates
    #[serde(default)]
    pub rank: Option<i32>,
}
