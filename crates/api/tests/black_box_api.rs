use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = storefront_api::app::build_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (StatusCode, Value) {
    let res = client.post(url).json(&body).send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn seed_catalog(client: &reqwest::Client, base_url: &str, id: &str, name: &str) {
    let (status, _) = post_json(
        client,
        format!("{base_url}/catalogs"),
        json!({ "id": id, "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_resolution_layers_base_and_overrides() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &srv.base_url, "CAT1", "Drinkware").await;

    let (status, _) = post_json(
        &client,
        format!("{}/bases", srv.base_url),
        json!({
            "id": "PB1",
            "name": "Mug base",
            "defaults": {
                "ProductDefinition": { "Name": "Mug", "ShortDescription": "A mug" },
                "capabilities": { "personalizable": true },
                "config": { "pricing": { "basePrice": 10 } },
            },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post_json(
        &client,
        format!("{}/products", srv.base_url),
        json!({
            "id": "P1",
            "baseProductId": "PB1",
            "catalogIds": ["CAT1"],
            "overrides": { "ProductDefinition": { "Name": "Team Mug" } },
            "extensions": { "config": { "pricing": { "basePrice": 12 } } },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get_json(
        &client,
        format!("{}/products/P1/resolved", srv.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let doc = &body["document"];
    // Override wins over the base default.
    assert_eq!(doc["ProductDefinition"]["Name"], "Team Mug");
    // Untouched base defaults shine through.
    assert_eq!(doc["ProductDefinition"]["ShortDescription"], "A mug");
    assert_eq!(doc["capabilities"]["personalizable"], true);
    // Extensions win over base defaults.
    assert_eq!(doc["config"]["pricing"]["basePrice"], 12);
    assert_eq!(body["baseMissing"], false);
}

#[tokio::test]
async fn dangling_base_is_flagged_not_fatal() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &srv.base_url, "CAT1", "Drinkware").await;

    let (status, _) = post_json(
        &client,
        format!("{}/products", srv.base_url),
        json!({
            "id": "P1",
            "baseProductId": "PB_GONE",
            "catalogIds": ["CAT1"],
            "overrides": { "ProductDefinition": { "Name": "Orphan" } },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get_json(
        &client,
        format!("{}/products/P1/resolved", srv.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseMissing"], true);
    assert_eq!(body["document"]["ProductDefinition"]["Name"], "Orphan");
}

#[tokio::test]
async fn create_product_requires_catalog_membership() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{}/products", srv.base_url),
        json!({
            "id": "P1",
            "overrides": { "ProductDefinition": { "Name": "Nowhere" } },
            "catalogIds": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn clone_rewrites_identity_and_respects_catalog_precedence() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &srv.base_url, "CAT1", "Drinkware").await;
    seed_catalog(&client, &srv.base_url, "CAT2", "Gifts").await;

    let (status, _) = post_json(
        &client,
        format!("{}/products", srv.base_url),
        json!({
            "id": "P1",
            "catalogIds": ["CAT1"],
            "overrides": { "ProductDefinition": { "Name": "Mug" } },
            "identityRecords": [
                { "system": "StoreFront", "id": "P1" },
                { "system": "XMPie", "id": "XMPie1723" },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &client,
        format!("{}/products/P1/clone", srv.base_url),
        json!({ "newId": "P1_COPY", "catalogIds": ["CAT2"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "P1_COPY");
    assert_eq!(body["catalogIds"], json!(["CAT2"]));
    // StoreFront identity rewritten to the new id, foreign identities kept.
    assert_eq!(body["identityRecords"][0]["system"], "StoreFront");
    assert_eq!(body["identityRecords"][0]["id"], "P1_COPY");
    assert_eq!(body["identityRecords"][1]["system"], "XMPie");
    // Name gains the copy marker, written into the legacy definition slot
    // which wins at resolution time.
    assert_eq!(
        body["productDefinition"]["Name"],
        "Mug (Copy)"
    );

    // Cloning onto an existing id conflicts.
    let (status, body) = post_json(
        &client,
        format!("{}/products/P1/clone", srv.base_url),
        json!({ "newId": "P1_COPY" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn clone_without_any_catalog_membership_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &srv.base_url, "CAT1", "Drinkware").await;

    let (status, _) = post_json(
        &client,
        format!("{}/products", srv.base_url),
        json!({
            "id": "P1",
            "catalogIds": ["CAT1"],
            "overrides": { "ProductDefinition": { "Name": "Mug" } },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &client,
        format!("{}/products/P1/clone", srv.base_url),
        json!({ "newId": "P1_COPY", "keepCatalogIds": false }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn catalog_cycle_is_rejected_on_reparent() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    seed_catalog(&client, &srv.base_url, "A", "Alpha").await;
    let (status, _) = post_json(
        &client,
        format!("{}/catalogs", srv.base_url),
        json!({ "id": "B", "name": "Beta", "parentId": "A" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A under B closes A -> B -> A.
    let res = client
        .put(format!("{}/catalogs/A", srv.base_url))
        .json(&json!({ "name": "Alpha", "parentId": "B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn catalog_products_follow_placement_order() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &srv.base_url, "CAT1", "Drinkware").await;

    for (id, name) in [("PA", "Mug A"), ("PB", "Mug B")] {
        let (status, _) = post_json(
            &client,
            format!("{}/products", srv.base_url),
            json!({
                "id": id,
                "catalogIds": ["CAT1"],
                "overrides": { "ProductDefinition": { "Name": name } },
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Placement order says B first, overriding the lexicographic tiebreak.
    for id in ["PB", "PA"] {
        let (status, _) = post_json(
            &client,
            format!("{}/catalogs/CAT1/products", srv.base_url),
            json!({ "productId": id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_json(
        &client,
        format!("{}/catalogs/CAT1/products", srv.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["PB", "PA"]);
}

#[tokio::test]
async fn storefront_page_resolves_template_by_precedence() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &srv.base_url, "CAT1", "Drinkware").await;

    let (status, _) = post_json(
        &client,
        format!("{}/products", srv.base_url),
        json!({
            "id": "P1",
            "catalogIds": ["CAT1"],
            "overrides": { "ProductDefinition": { "Name": "Mug" } },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // No templates at all: the page cannot render.
    let (status, body) = get_json(
        &client,
        format!("{}/storefront/products/P1", srv.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = post_json(
        &client,
        format!("{}/templates", srv.base_url),
        json!({ "key": "generic", "name": "Generic", "isDefault": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Default template kicks in.
    let (status, body) = get_json(
        &client,
        format!("{}/storefront/products/P1", srv.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"]["key"], "generic");
    assert_eq!(body["product"]["document"]["ProductDefinition"]["Name"], "Mug");

    // An explicit product key beats the default.
    let (status, _) = post_json(
        &client,
        format!("{}/templates", srv.base_url),
        json!({ "key": "hero", "name": "Hero" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let res = client
        .put(format!("{}/products/P1", srv.base_url))
        .json(&json!({
            "catalogIds": ["CAT1"],
            "overrides": { "ProductDefinition": { "Name": "Mug" } },
            "templateKey": "hero",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, body) = get_json(
        &client,
        format!("{}/storefront/products/P1", srv.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"]["key"], "hero");
}

#[tokio::test]
async fn template_default_stays_unique_through_api() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (key, is_default) in [("classic", true), ("modern", true)] {
        let (status, _) = post_json(
            &client,
            format!("{}/templates", srv.base_url),
            json!({ "key": key, "name": key, "isDefault": is_default }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get_json(&client, format!("{}/templates", srv.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    let defaults: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["isDefault"] == true)
        .map(|t| t["key"].as_str().unwrap())
        .collect();
    assert_eq!(defaults, vec!["modern"]);
}

#[tokio::test]
async fn unknown_ids_are_404_and_blank_ids_are_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, format!("{}/products/NOPE", srv.base_url)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = get_json(&client, format!("{}/products/%20%20", srv.base_url)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");
}
