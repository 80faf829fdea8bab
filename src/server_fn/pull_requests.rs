use leptos::prelude::*;
use serde::Deserialize;

use crate::types::PullRequest;

/// Either a bare list of pull requests or a page object holding them under
/// `diffs`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PullRequestFile {
    List(Vec<PullRequest>),
    Page { diffs: Vec<PullRequest> },
}

pub fn parse_pull_requests(raw: &str) -> Result<Vec<PullRequest>, serde_json::Error> {
    Ok(match serde_json::from_str(raw)? {
        PullRequestFile::List(prs) => prs,
        PullRequestFile::Page { diffs } => diffs,
    })
}

#[server(GetPullRequests, "/api")]
pub async fn get_pull_requests() -> Result<Vec<PullRequest>, ServerFnError> {
    use crate::state::AppState;
    use log::{debug, error};

    let state = use_context::<AppState>()
        .ok_or_else(|| ServerFnError::new("app state not found"))?;

    let Some(path) = state.pull_requests_path else {
        debug!("No pull request file configured");
        return Ok(Vec::new());
    };

    let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
        error!("Failed to read {}: {e}", path.display());
        ServerFnError::new("Failed to read pull requests")
    })?;

    let prs = parse_pull_requests(&raw).map_err(|e| {
        error!("Failed to parse {}: {e}", path.display());
        ServerFnError::new("Failed to parse pull requests")
    })?;

    debug!("Loaded {} pull requests from {}", prs.len(), path.display());
    Ok(prs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_list() {
        let prs = parse_pull_requests(
            r#"[{"id":"1","description":"Add login","diff":"+x","url":"https://example.com/1"}]"#,
        )
        .unwrap();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].description, "Add login");
    }

    #[test]
    fn test_parses_page_object() {
        let prs = parse_pull_requests(
            r#"{"diffs":[{"id":"2","description":"d","diff":"-y","url":"u"}],"nextPage":null,"currentPage":1,"perPage":10}"#,
        )
        .unwrap();
        assert_eq!(prs[0].id, "2");
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(parse_pull_requests(r#"{"items":[]}"#).is_err());
    }
}
