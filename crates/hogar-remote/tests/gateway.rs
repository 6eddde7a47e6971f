//! Remote catalog and contact relay against a scripted transport.

use std::sync::Arc;

use hogar_core::catalog::{Category, ProductDraft, ProductPatch};
use hogar_core::{Money, ProductId};
use hogar_data::{Method, MockTransport};
use hogar_remote::prelude::*;
use serde_json::json;

fn row(id: i64, name: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "category": "muebles",
        "subcategory": null,
        "price": 249990,
        "original_price": null,
        "description": "Mesa de centro en roble",
        "image": null,
        "images": [],
        "badge": null,
        "stock": 5,
        "sku": null,
        "material": "Roble",
        "dimensions": null,
        "weight": null,
        "color": null,
        "tags": [],
        "created_at": created_at,
        "updated_at": created_at
    })
}

fn catalog(mock: &Arc<MockTransport>) -> RemoteCatalog {
    let config = GatewayConfig::new("https://demo.supabase.co", "anon-key");
    let client = config.client(mock.clone()).unwrap();
    RemoteCatalog::new(Arc::new(RestProductTable::new(client, &config.table)))
}

#[tokio::test]
async fn test_fetch_sends_auth_headers() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(200, &json!([row(2, "Mesa B", "2024-02-01T00:00:00Z"), row(1, "Mesa A", "2024-01-01T00:00:00Z")]));

    let mut remote = catalog(&mock);
    remote.fetch().await.unwrap();

    assert_eq!(remote.products().len(), 2);
    assert_eq!(remote.products()[0].material.as_deref(), Some("Roble"));

    let sent = &mock.requests()[0];
    assert_eq!(sent.header("apikey"), Some("anon-key"));
    assert_eq!(sent.header("authorization"), Some("Bearer anon-key"));
}

#[tokio::test]
async fn test_update_then_refetch() {
    let mock = Arc::new(MockTransport::new());
    mock.push_status(204);
    mock.push_json(200, &json!([row(1, "Mesa Roble", "2024-01-01T00:00:00Z")]));

    let mut remote = catalog(&mock);
    let patch = ProductPatch {
        name: Some("Mesa Roble".into()),
        price: Some(Money::new(229990.0)),
        ..ProductPatch::default()
    };
    remote.update(ProductId::new(1), &patch).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Patch);
    assert!(requests[0].url.ends_with("products?id=eq.1"));
    let body: serde_json::Value = serde_json::from_str(requests[0].body_text().unwrap()).unwrap();
    assert_eq!(body["name"], "Mesa Roble");
    assert!(body.get("updated_at").is_some());
    assert!(body.get("description").is_none());
    assert_eq!(requests[1].method, Method::Get);
    assert_eq!(remote.products()[0].name, "Mesa Roble");
}

#[tokio::test]
async fn test_failed_insert_leaves_list_alone() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(200, &json!([row(1, "Mesa A", "2024-01-01T00:00:00Z")]));
    mock.push_json(409, &json!({"message": "duplicate key"}));

    let mut remote = catalog(&mock);
    remote.fetch().await.unwrap();

    let draft = ProductDraft::new("Mesa A", Category::Muebles, 249990.0);
    let err = remote.add(&draft).await.unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 409, .. }));
    assert_eq!(remote.products().len(), 1);
    assert!(remote.error().is_some());
    // No refetch after the failed write.
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_contact_with_attachments_is_multipart() {
    let mock = Arc::new(MockTransport::new());
    mock.push_status(200);
    let relay = FormRelay::new(
        hogar_data::FetchClient::new(mock.clone()),
        ContactConfig::default().endpoint,
    );

    let form = ContactForm::new("Ana", "ana@example.cl", "Adjunto fotos del espacio")
        .with_phone("+56 9 1234 5678")
        .with_attachment(Attachment::new("living.jpg", "image/jpeg", vec![0xFF, 0xD8]));
    relay.submit(&form).await.unwrap();

    let sent = &mock.requests()[0];
    assert_eq!(sent.url, "https://formspree.io/f/mbdjnypn");
    assert_eq!(sent.body, None);
    let form = sent.form.as_ref().unwrap();
    assert_eq!(form.text_value("nombre"), Some("Ana"));
    assert_eq!(form.text_value("telefono"), Some("+56 9 1234 5678"));
    assert_eq!(form.filenames(), vec!["living.jpg"]);
}
