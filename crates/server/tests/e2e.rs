use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

struct TestServer {
    base_url: String,
    stop: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }
}

async fn start_server() -> anyhow::Result<TestServer> {
    let dir = format!("target/test-data/{}", Uuid::new_v4());
    tokio::fs::create_dir_all(&dir).await?;
    let mut cfg = AppConfig::default();
    cfg.storage.data_file = format!("{dir}/assets_master.json").into();
    cfg.normalize_and_validate()?;

    let (app, _state) = server::build_app(&cfg)?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = server::serve(listener, app, shutdown).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestServer { base_url, stop: Some(tx) })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_asset_crud_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let collection = format!("{}/assets_master", app.base_url);

    // Create
    let res = c.post(&collection).json(&json!({"name": "Laptop"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Laptop");
    assert_eq!(created["created_at"], created["updated_at"]);

    // List
    let res = c.get(&collection).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let listed = res.json::<Value>().await?;
    assert_eq!(listed["assets_master"][0], created);

    // Update
    let res = c
        .put(format!("{collection}/{id}"))
        .json(&json!({"name": "Laptop Pro"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["id"], json!(id));
    assert_eq!(updated["name"], "Laptop Pro");
    assert_eq!(updated["created_at"], created["created_at"]);

    // Delete twice
    let res = c.delete(format!("{collection}/{id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Asset deleted successfully"}));
    let res = c.delete(format!("{collection}/{id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Asset not found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_creates_are_not_lost() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let collection = format!("{}/assets_master", app.base_url);

    let mut tasks = Vec::new();
    for i in 0..10 {
        let c = c.clone();
        let url = collection.clone();
        tasks.push(tokio::spawn(async move {
            c.post(&url).json(&json!({"seq": i})).send().await
        }));
    }
    for t in tasks {
        assert_eq!(t.await??.status(), HttpStatusCode::CREATED);
    }

    let listed = c.get(&collection).send().await?.json::<Value>().await?;
    assert_eq!(listed["assets_master"].as_array().map(Vec::len), Some(10));
    Ok(())
}
