//! Records produced by the extraction pipeline
//!
//! Both record types serialize with the camelCase field names consumers of
//! `project_links.json` and `project_details.json` expect. Optional fields
//! are omitted when absent.

use serde::{Deserialize, Serialize};

/// Title recorded for a listing anchor with no visible text ("untitled")
pub const UNTITLED: &str = "제목 없음";

/// Lightweight pointer to a project, produced by the discovery pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    /// Anchor text, or [`UNTITLED`] when the anchor has none
    pub title: String,

    /// Canonical absolute URL of the detail page (dedup key)
    pub url: String,

    pub uid: Option<String>,

    pub term: Option<String>,
}

/// The team member who submitted the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One row of the team roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    /// True when no sub-field was found for this row
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.name.is_none()
            && self.department.is_none()
            && self.grade.is_none()
            && self.email.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

impl Mentor {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.affiliation.is_none()
    }
}

/// Team section of a project page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant: Option<Registrant>,

    /// Empty when the roster sub-section is missing
    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor: Option<Mentor>,
}

/// Structured record for one project page
///
/// A detail is either a best-effort extraction (any subset of fields set,
/// `error` unset) or a failure record carrying only `url` and `error`. The
/// latter is only built through [`ProjectDetail::failed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_info: Option<TeamInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectDetail {
    /// Builds a failure record: only `url` and `error` are set
    pub fn failed(url: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            url: url.into(),
            error: Some(cause.to_string()),
            ..Self::default()
        }
    }

    /// Returns true if this record represents a failed fetch
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
