//! GitHub GraphQL integration
//!
//! One request/response exchange against the contribution calendar API.
//! Exactly one request per call - retry is the orchestrator's job via its
//! polling cadence.

use reqwest::{header, Client};
use serde::Deserialize;

use crate::error::FetchError;
use crate::grid::ContributionLevel;

const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Fixed client identifier sent with every request
const CLIENT_ID: &str = "contrib-display";

/// Query for the contribution calendar, parameterized by username
const GRAPHQL_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      contributionCalendar {
        weeks {
          contributionDays {
            contributionLevel
            weekday
          }
        }
      }
    }
  }
}
"#;

/// Top-level GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    pub data: Option<ResponseData>,
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
pub struct ContributionCalendar {
    pub weeks: Vec<Week>,
}

/// One week of the calendar. A week with no recorded days is valid and
/// renders as an empty column.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    #[serde(default)]
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    /// Missing level on the wire means no recorded activity
    #[serde(default)]
    pub contribution_level: ContributionLevel,
    #[serde(default)]
    pub weekday: i64,
}

impl GraphqlResponse {
    /// Extract the calendar, turning API-level errors and shape mismatches
    /// into [`FetchError`]s.
    pub fn into_calendar(self) -> Result<ContributionCalendar, FetchError> {
        if let Some(errors) = &self.errors {
            if !errors.is_empty() {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FetchError::Api(joined));
            }
        }

        self.data
            .and_then(|d| d.user)
            .map(|u| u.contributions_collection.contribution_calendar)
            .ok_or_else(|| FetchError::Shape("missing data.user".into()))
    }
}

/// Fetch the contribution calendar for `username`.
///
/// Any non-200 status, transport failure, `errors[]` entry in the body or
/// unexpected response shape is an error; the payload is otherwise returned
/// as-is for the grid parser.
pub async fn fetch_contributions(
    client: &Client,
    token: &str,
    username: &str,
) -> Result<ContributionCalendar, FetchError> {
    let body = serde_json::json!({
        "query": GRAPHQL_QUERY,
        "variables": { "username": username },
    });

    let response = client
        .post(GRAPHQL_ENDPOINT)
        .bearer_auth(token)
        .header(header::USER_AGENT, CLIENT_ID)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let raw = response.text().await?;
    let parsed: GraphqlResponse = serde_json::from_str(&raw)?;
    parsed.into_calendar()
}
