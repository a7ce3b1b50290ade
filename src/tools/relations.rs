//
//  redmine-cli
//  tools/relations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue relation tools.

use serde::Deserialize;
use serde_json::Value;

use crate::api::relations::{NewRelation, RelationEnvelope};
use crate::api::{ApiError, RedmineClient};

/// Arguments for `create_issue_relation`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelationArgs {
    /// Source issue.
    pub issue_id: u64,

    /// Target issue.
    pub issue_to_id: u64,

    pub relation_type: String,

    /// Days between the two issues; `precedes` and `follows` only.
    #[serde(default)]
    pub delay: Option<i64>,
}

/// Links two issues.
///
/// Some types also create their inverse on the target issue: `duplicates`
/// adds `duplicated`, `blocks` adds `blocked` and `precedes` adds `follows`.
pub async fn create_issue_relation(
    client: &RedmineClient,
    args: CreateRelationArgs,
) -> Result<Value, ApiError> {
    let relation = NewRelation::new(args.issue_to_id, &args.relation_type, args.delay)?;
    client
        .post(
            &format!("/issues/{}/relations.json", args.issue_id),
            &RelationEnvelope {
                relation: &relation,
            },
        )
        .await
}

/// Arguments for `delete_issue_relation`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRelationArgs {
    /// Listed in the `relations` of `get_issue`.
    pub relation_id: u64,
}

/// Removes a relation. Redmine answers with an empty body.
pub async fn delete_issue_relation(
    client: &RedmineClient,
    args: DeleteRelationArgs,
) -> Result<Value, ApiError> {
    client
        .delete(&format!("/relations/{}.json", args.relation_id))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_with_delay() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/issues/1/relations.json")
            .match_body(Matcher::Json(json!({
                "relation": {"issue_to_id": 2, "relation_type": "precedes", "delay": 3}
            })))
            .with_status(201)
            .with_body(r#"{"relation":{"id":5,"issue_id":1,"issue_to_id":2,"relation_type":"precedes","delay":3}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let value = create_issue_relation(
            &client,
            CreateRelationArgs {
                issue_id: 1,
                issue_to_id: 2,
                relation_type: "precedes".into(),
                delay: Some(3),
            },
        )
        .await
        .unwrap();

        assert_eq!(value["relation"]["id"], 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_delay_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/issues/1/relations.json")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = create_issue_relation(
            &client,
            CreateRelationArgs {
                issue_id: 1,
                issue_to_id: 2,
                relation_type: "relates".into(),
                delay: Some(3),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_relation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/relations/5.json")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        let value = delete_issue_relation(&client, DeleteRelationArgs { relation_id: 5 })
            .await
            .unwrap();
        assert_eq!(value, json!({}));
        mock.assert_async().await;
    }
}
