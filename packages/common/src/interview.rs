//! Enumerations describing interview sessions and coding problems.

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
    valid: &'static [&'static str],
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.kind,
            self.invalid,
            self.valid.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}

/// Problem and interview difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "easy"))]
    Easy,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "medium"))]
    Medium,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "hard"))]
    Hard,
}

impl Difficulty {
    const NAMES: &'static [&'static str] = &["easy", "medium", "hard"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseEnumError {
                kind: "difficulty",
                invalid: s.to_string(),
                valid: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which interview track a session belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum InterviewKind {
    /// MCQ and written technical questions.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "technical"))]
    Technical,
    /// Behavioral written questions.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "hr"))]
    Hr,
}

impl InterviewKind {
    const NAMES: &'static [&'static str] = &["technical", "hr"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Hr => "hr",
        }
    }
}

impl FromStr for InterviewKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(Self::Technical),
            "hr" => Ok(Self::Hr),
            _ => Err(ParseEnumError {
                kind: "interview kind",
                invalid: s.to_string(),
                valid: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a single interview question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "mcq"))]
    Mcq,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "written"))]
    Written,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Written => "written",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a session still accepts answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "active"))]
    Active,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "completed"))]
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
