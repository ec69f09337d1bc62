use serde::Deserialize;

pub const VIEWER: &str = "query { viewer { login } }";

pub const REPOSITORY: &str =
    "query($owner: String!, $name: String!) { repository(owner: $owner, name: $name) { id } }";

pub const ISSUES: &str = "query($owner: String!, $name: String!, $cursor: String) { repository(owner: $owner, name: $name) { issues(first: 100, after: $cursor) { nodes { id } pageInfo { hasNextPage endCursor } } } }";

pub const CREATE_ISSUE: &str =
    "mutation($input: CreateIssueInput!) { createIssue(input: $input) { issue { id } } }";

pub const DELETE_ISSUE: &str = "mutation($input: DeleteIssueInput!) { deleteIssue(input: $input) { repository { issues { totalCount } } } }";

#[derive(Deserialize, Debug)]
pub struct RawResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<RawError>,
}

#[derive(Deserialize, Debug)]
pub struct RawError {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct Viewer {
    pub viewer: Login,
}

#[derive(Deserialize, Debug)]
pub struct Login {
    pub login: String,
}

#[derive(Deserialize, Debug)]
pub struct Repository<T> {
    pub repository: Option<T>,
}

#[derive(Deserialize, Debug)]
pub struct Id<T> {
    pub id: T,
}

#[derive(Deserialize, Debug)]
pub struct RepositoryIssues {
    pub issues: Issues,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Issues {
    pub nodes: Vec<Id<super::IssueId>>,
    pub page_info: PageInfo,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssue {
    pub create_issue: CreatedIssue,
}

#[derive(Deserialize, Debug)]
pub struct CreatedIssue {
    pub issue: Id<super::IssueId>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteIssue {
    pub delete_issue: DeletedIssue,
}

#[derive(Deserialize, Debug)]
pub struct DeletedIssue {
    pub repository: RemainingIssues,
}

#[derive(Deserialize, Debug)]
pub struct RemainingIssues {
    pub issues: TotalCount,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_issues_page() {
        let raw: RawResponse<Repository<RepositoryIssues>> = serde_json::from_str(
            r#"{"data":{"repository":{"issues":{"nodes":[{"id":"I_1"},{"id":"I_2"}],"pageInfo":{"hasNextPage":true,"endCursor":"Y3Vy"}}}}}"#,
        )
        .unwrap();

        let issues = raw.data.unwrap().repository.unwrap().issues;
        assert_eq!(2, issues.nodes.len());
        assert!(issues.page_info.has_next_page);
        assert_eq!(Some("Y3Vy"), issues.page_info.end_cursor.as_deref());
    }

    #[test]
    fn should_deserialize_errors_without_data() {
        let raw: RawResponse<Viewer> = serde_json::from_str(
            r#"{"errors":[{"type":"NOT_FOUND","message":"Could not resolve to a Repository"}]}"#,
        )
        .unwrap();

        assert!(raw.data.is_none());
        assert_eq!("Could not resolve to a Repository", raw.errors[0].message);
    }
}
