//! Common types used throughout the point collector
//!
//! This module contains shared type definitions, type aliases,
//! and the point type enumeration with its fixed mappings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Point Type
// ============================================================================

/// A GitHub endpoint family that can be collected as a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    Organization,
    Repository,
    User,
    Team,
    Issues,
    IssueComments,
    PullRequests,
    PullRequestReviews,
    Commits,
    Releases,
    Milestones,
    Labels,
    Members,
}

impl PointType {
    /// All point types, in declaration order
    pub const ALL: [PointType; 13] = [
        PointType::Organization,
        PointType::Repository,
        PointType::User,
        PointType::Team,
        PointType::Issues,
        PointType::IssueComments,
        PointType::PullRequests,
        PointType::PullRequestReviews,
        PointType::Commits,
        PointType::Releases,
        PointType::Milestones,
        PointType::Labels,
        PointType::Members,
    ];

    /// Record type written alongside every record of this point type
    pub fn record_type(self) -> &'static str {
        match self {
            PointType::Organization => "GitHub.Organization",
            PointType::Repository => "GitHub.Repository",
            PointType::User => "GitHub.User",
            PointType::Team => "GitHub.Team",
            PointType::Issues => "GitHub.Issue",
            PointType::IssueComments => "GitHub.IssueComment",
            PointType::PullRequests => "GitHub.PullRequest",
            PointType::PullRequestReviews => "GitHub.PullRequestReview",
            PointType::Commits => "GitHub.Commit",
            PointType::Releases => "GitHub.Release",
            PointType::Milestones => "GitHub.Milestone",
            PointType::Labels => "GitHub.Label",
            PointType::Members => "GitHub.Member",
        }
    }

    /// API name used for cache bypass lists and allowlisted responses
    pub fn api_name(self) -> &'static str {
        match self {
            PointType::Organization => "Organization",
            PointType::Repository => "Repository",
            PointType::User => "User",
            PointType::Team => "Teams",
            PointType::Issues => "Issues",
            PointType::IssueComments => "IssueComments",
            PointType::PullRequests => "PullRequests",
            PointType::PullRequestReviews => "PullRequestReviews",
            PointType::Commits => "Commits",
            PointType::Releases => "Releases",
            PointType::Milestones => "Milestones",
            PointType::Labels => "Labels",
            PointType::Members => "Members",
        }
    }

    /// Stable name used in cache keys and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            PointType::Organization => "Organization",
            PointType::Repository => "Repository",
            PointType::User => "User",
            PointType::Team => "Team",
            PointType::Issues => "Issues",
            PointType::IssueComments => "IssueComments",
            PointType::PullRequests => "PullRequests",
            PointType::PullRequestReviews => "PullRequestReviews",
            PointType::Commits => "Commits",
            PointType::Releases => "Releases",
            PointType::Milestones => "Milestones",
            PointType::Labels => "Labels",
            PointType::Members => "Members",
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PointType::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown point type '{s}'"))
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
