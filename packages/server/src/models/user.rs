use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::auth::validate_graduation_year;
use super::shared::{double_option, validate_optional_text, validate_text_len};
use crate::entity::user;
use crate::error::AppError;

/// Public profile of a user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "Asha Rao")]
    pub full_name: String,
    pub college: Option<String>,
    pub graduation_year: Option<i32>,
    pub target_role: Option<String>,
    #[schema(example = "candidate")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            full_name: m.full_name,
            college: m.college,
            graduation_year: m.graduation_year,
            target_role: m.target_role,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// Progress counters shown on the dashboard.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProgress {
    #[schema(example = 12)]
    pub problems_solved: i32,
    #[schema(example = 40)]
    pub submissions_count: i32,
    #[schema(example = 3)]
    pub interviews_completed: i32,
    #[schema(example = 81)]
    pub best_interview_score: i32,
    /// Mean overall score of completed interviews; NULL before the first one.
    #[schema(example = 68.3)]
    pub average_interview_score: Option<f64>,
}

impl From<&user::Model> for UserProgress {
    fn from(m: &user::Model) -> Self {
        let average_interview_score = (m.interviews_completed > 0)
            .then(|| m.total_interview_score as f64 / f64::from(m.interviews_completed));
        Self {
            problems_solved: m.problems_solved,
            submissions_count: m.submissions_count,
            interviews_completed: m.interviews_completed,
            best_interview_score: m.best_interview_score,
            average_interview_score,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserMeResponse {
    pub profile: UserProfile,
    pub progress: UserProgress,
}

impl From<user::Model> for UserMeResponse {
    fn from(m: user::Model) -> Self {
        let progress = UserProgress::from(&m);
        Self {
            profile: m.into(),
            progress,
        }
    }
}

/// Partial profile update. Nullable fields accept `null` to clear.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub college: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub graduation_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub target_role: Option<Option<String>>,
}

pub fn validate_update_profile(req: &UpdateProfileRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.full_name {
        validate_text_len(name, "Full name", 128)?;
    }
    if let Some(ref college) = req.college {
        validate_optional_text(college.as_deref(), "College", 256)?;
    }
    if let Some(year) = req.graduation_year {
        validate_graduation_year(year)?;
    }
    if let Some(ref role) = req.target_role {
        validate_optional_text(role.as_deref(), "Target role", 128)?;
    }
    Ok(())
}
