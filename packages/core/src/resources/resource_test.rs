//! Tests for the cached resource
//!
//! Covers cache updates after reads and writes, loading keys, and the
//! normalization of empty or malformed query responses.

#[cfg(test)]
mod tests {
    use crate::error::ResourceError;
    use crate::http::{InMemoryTransport, RequestBody, TransportError};
    use crate::models::{Category, Id};
    use crate::query::{equal, ModelQuery};
    use crate::resources::{Operation, OperationOptions, Payload, Resource, ResourceContext};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn setup() -> (InMemoryTransport, Resource<Category>) {
        let transport = InMemoryTransport::new();
        let ctx = ResourceContext::with_transport(Arc::new(transport.clone()));
        (transport, Resource::new("categories", ctx))
    }

    fn sent_query(body: &RequestBody) -> Value {
        let RequestBody::Json(body) = body else {
            panic!("query requests carry a JSON body");
        };
        serde_json::from_str(body["query"].as_str().unwrap()).unwrap()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[tokio::test]
    async fn test_fetch_caches_rows_with_fake_pagination() {
        let (transport, resource) = setup();
        transport
            .push_json(json!({"data": {"categories": [
                {"id": 1, "name": "food"},
                {"id": 2, "name": "rent"}
            ]}}))
            .await;

        let items = resource.fetch(None).await.unwrap();

        assert_eq!(items, vec![category(1, "food"), category(2, "rent")]);
        assert_eq!(resource.items().await, items);
        let pagination = resource.pagination().await;
        assert_eq!(pagination.total, 2);
        assert_eq!(pagination.last_page, 1);

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/query");
        assert_eq!(sent_query(&request.body), json!({"categories": {}}));
    }

    #[tokio::test]
    async fn test_fetch_with_override_becomes_default_query() {
        let (transport, resource) = setup();
        transport.push_json(json!({"data": {"categories": []}})).await;
        transport.push_json(json!({"data": {"categories": []}})).await;

        let model = ModelQuery::new().field("name", equal("food"));
        resource.fetch(Some(model.clone())).await.unwrap();
        assert_eq!(resource.query().await, Some(model));

        resource.fetch(None).await.unwrap();
        let requests = transport.requests().await;
        assert_eq!(sent_query(&requests[0].body), sent_query(&requests[1].body));
        assert_eq!(
            sent_query(&requests[1].body)["categories"]["clauses"][0]["value"],
            json!(["name", "=", "food"])
        );
    }

    #[tokio::test]
    async fn test_fetch_paginated_envelope() {
        let (transport, resource) = setup();
        transport
            .push_json(json!({"data": {"categories": {
                "current_page": 2,
                "data": [{"id": 3, "name": "fun"}],
                "from": 11,
                "to": 11,
                "total": 11,
                "per_page": 10,
                "last_page": 2,
                "next_page_url": null,
                "prev_page_url": "/api/query?page=1",
                "first_page_url": "/api/query?page=1",
                "last_page_url": "/api/query?page=2",
                "path": "/api/query",
                "links": []
            }}}))
            .await;

        let items = resource
            .fetch(Some(ModelQuery::new().paginate(json!({"page": 2}))))
            .await
            .unwrap();

        assert_eq!(items, vec![category(3, "fun")]);
        let pagination = resource.pagination().await;
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total, 11);
        assert!(!pagination.has_more_pages());
    }

    #[tokio::test]
    async fn test_paginated_query_ignores_plain_rows() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "food")]).await;
        transport
            .push_json(json!({"data": {"categories": [{"id": 2, "name": "rent"}]}}))
            .await;

        let items = resource
            .fetch(Some(ModelQuery::new().paginate(json!([15]))))
            .await
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(resource.items().await, vec![category(1, "food")]);
    }

    #[tokio::test]
    async fn test_unpaginated_query_ignores_envelope() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "food")]).await;
        transport
            .push_json(json!({"data": {"categories": {
                "current_page": 1,
                "data": [{"id": 2, "name": "rent"}]
            }}}))
            .await;

        assert!(resource.fetch(None).await.unwrap().is_empty());
        assert_eq!(resource.items().await, vec![category(1, "food")]);
    }

    #[tokio::test]
    async fn test_fetch_missing_model_key_leaves_cache() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "food")]).await;
        transport.push_json(json!({"data": {}})).await;
        transport.push_json(json!({})).await;

        assert!(resource.fetch(None).await.unwrap().is_empty());
        assert!(resource.fetch(None).await.unwrap().is_empty());
        assert_eq!(resource.items().await, vec![category(1, "food")]);
    }

    #[tokio::test]
    async fn test_fetch_empty_array_clears_items() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "food")]).await;
        transport.push_json(json!({"data": {"categories": []}})).await;

        assert!(resource.fetch(None).await.unwrap().is_empty());
        assert!(resource.items().await.is_empty());
        assert_eq!(resource.pagination().await.total, 0);
    }

    #[tokio::test]
    async fn test_fetch_rejects_undecodable_rows() {
        let (transport, resource) = setup();
        transport
            .push_json(json!({"data": {"categories": [{"name": "no id"}]}}))
            .await;

        let err = resource.fetch(None).await.unwrap_err();
        assert!(matches!(err, ResourceError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_one_forces_limit_and_sets_current() {
        let (transport, resource) = setup();
        transport
            .push_json(json!({"data": {"categories": [{"id": 7, "name": "travel"}]}}))
            .await;

        let model = ModelQuery::new().field("name", "travel");
        let found = resource.fetch_one(Some(model)).await.unwrap();

        assert_eq!(found, Some(category(7, "travel")));
        assert_eq!(resource.current().await, Some(category(7, "travel")));
        assert!(resource.query().await.is_none());

        let request = transport.last_request().await.unwrap();
        assert_eq!(sent_query(&request.body)["categories"]["limit"], json!(1));
    }

    #[tokio::test]
    async fn test_fetch_one_zero_rows_is_none() {
        let (transport, resource) = setup();
        transport.push_json(json!({"data": {"categories": []}})).await;

        assert_eq!(resource.fetch_one(None).await.unwrap(), None);
        assert!(resource.current().await.is_none());
    }

    // ========================================================================
    // Local state
    // ========================================================================

    #[tokio::test]
    async fn test_local_setters() {
        let (_, resource) = setup();
        resource
            .set_items(vec![category(1, "a"), category(2, "b"), category(3, "c")])
            .await;

        resource.add(category(0, "z"), true).await;
        resource.add(category(4, "d"), false).await;
        let ids: Vec<i64> = resource.items().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        resource.remove(0).await;
        resource.filter(|item, _| item.id % 2 == 1).await;
        let ids: Vec<i64> = resource.items().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);

        resource.sync_with_id(category(3, "renamed")).await;
        assert_eq!(resource.items().await[1].name, "renamed");

        resource.reset().await;
        assert!(resource.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_current_merges_patch() {
        let (_, resource) = setup();
        resource.select_current(Some(category(5, "old"))).await;

        resource.set_current(json!({"name": "new"})).await.unwrap();
        assert_eq!(resource.current().await, Some(category(5, "new")));

        assert!(resource.set_current(json!("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_transform_applies_to_fetched_rows() {
        let transport = InMemoryTransport::new();
        let ctx = ResourceContext::with_transport(Arc::new(transport.clone()));
        let resource = Resource::<Category>::new("categories", ctx).with_transform(|mut c| {
            c.name = c.name.to_uppercase();
            c
        });
        transport
            .push_json(json!({"data": {"categories": [{"id": 1, "name": "food"}]}}))
            .await;

        resource.fetch(None).await.unwrap();
        assert_eq!(resource.items().await[0].name, "FOOD");
    }

    // ========================================================================
    // Writes
    // ========================================================================

    #[tokio::test]
    async fn test_create_syncs_by_default() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "a")]).await;
        transport.push_json(json!({"data": {"id": 2, "name": "b"}})).await;
        transport.push_json(json!({"data": {"id": 0, "name": "z"}})).await;

        resource
            .create(json!({"name": "b"}).into(), OperationOptions::default())
            .await
            .unwrap();
        resource
            .create(json!({"name": "z"}).into(), OperationOptions::new().add_first())
            .await
            .unwrap();

        let ids: Vec<i64> = resource.items().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_create_without_sync_leaves_items() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "a")]).await;
        transport.push_json(json!({"data": {"id": 2, "name": "b"}})).await;

        let created = resource
            .create(json!({"name": "b"}).into(), OperationOptions::new().without_sync())
            .await
            .unwrap();

        assert_eq!(created, category(2, "b"));
        assert_eq!(resource.items().await, vec![category(1, "a")]);
    }

    #[tokio::test]
    async fn test_update_replaces_matching_item() {
        let (transport, resource) = setup();
        resource
            .set_items(vec![category(1, "a"), category(2, "b")])
            .await;
        transport.push_json(json!({"data": {"id": 2, "name": "bb"}})).await;

        let payload = Payload::json(&json!({"name": "bb"})).unwrap();
        resource
            .update(2, payload, OperationOptions::default())
            .await
            .unwrap();

        assert_eq!(
            resource.items().await,
            vec![category(1, "a"), category(2, "bb")]
        );
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/categories/2");
    }

    #[tokio::test]
    async fn test_destroy_removes_matching_item_keeping_order() {
        let (transport, resource) = setup();
        resource
            .set_items(vec![category(1, "a"), category(2, "b"), category(3, "c")])
            .await;
        transport.push_json(json!({"id": 2})).await;

        let answer = resource
            .destroy(2, OperationOptions::default())
            .await
            .unwrap();

        assert_eq!(answer, json!({"id": 2}));
        assert_eq!(
            resource.items().await,
            vec![category(1, "a"), category(3, "c")]
        );
    }

    #[tokio::test]
    async fn test_failed_write_records_error_and_keeps_cache() {
        let (transport, resource) = setup();
        resource.set_items(vec![category(1, "a")]).await;
        transport
            .push_error(TransportError::status(422, "name taken"))
            .await;

        let err = resource
            .update(1, json!({"name": "b"}).into(), OperationOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err, ResourceError::Transport(TransportError::status(422, "name taken")));
        assert_eq!(resource.items().await, vec![category(1, "a")]);
        assert!(!resource.loading(Operation::Update, Some(&Id::from(1))).await);
        assert_eq!(
            resource.error(Operation::Update, Some(&Id::from(1))).await,
            Some(err.to_string())
        );
    }

    #[tokio::test]
    async fn test_update_current_without_current_fails_fast() {
        let (transport, resource) = setup();

        let err = resource
            .update_current(json!({"name": "x"}).into(), OperationOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No current element selected.");
        assert_eq!(transport.request_count().await, 0);
        assert_eq!(
            resource.context().tracker().error("categories").await.as_deref(),
            Some("No current element selected.")
        );

        assert!(resource
            .destroy_current(OperationOptions::default())
            .await
            .is_err());
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_destroy_current_targets_current_id() {
        let (transport, resource) = setup();
        resource.select_current(Some(category(8, "x"))).await;
        transport.push_json(json!({"id": 8})).await;

        resource
            .destroy_current(OperationOptions::default())
            .await
            .unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/categories/8");
    }

    #[tokio::test]
    async fn test_loading_current_without_current_is_false() {
        let (_, resource) = setup();
        assert!(!resource.loading_current(Operation::Update).await);
        assert!(!resource.loading(Operation::Destroy, None).await);
    }
}
