//! Startup loading order, checked against a fake Microcks API

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
};
use microcks_client::MicrocksClient;
use microcks_core::domain::artifact::RemoteArtifact;
use microcks_core::domain::secret::Secret;
use microcks_testcontainers::{ContainerError, MicrocksContainerConfig};
use tokio::net::TcpListener;

type Calls = Arc<Mutex<Vec<String>>>;

async fn record(State(calls): State<Calls>, method: Method, uri: Uri, _body: Bytes) -> StatusCode {
    calls.lock().unwrap().push(format!("{} {}", method, uri));
    StatusCode::CREATED
}

async fn rejecting(State(calls): State<Calls>, method: Method, uri: Uri, _body: Bytes) -> StatusCode {
    calls.lock().unwrap().push(format!("{} {}", method, uri));
    StatusCode::BAD_REQUEST
}

async fn start(reject: bool) -> (MicrocksClient, Calls) {
    let calls = Calls::default();
    let router = if reject {
        Router::new().fallback(rejecting)
    } else {
        Router::new().fallback(record)
    };
    let app = router.with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (MicrocksClient::new(format!("http://{}", addr)), calls)
}

#[tokio::test]
async fn test_import_order() -> anyhow::Result<()> {
    let (client, calls) = start(false).await;

    let dir = tempfile::tempdir()?;
    let write = |name: &str| -> std::io::Result<std::path::PathBuf> {
        let path = dir.path().join(name);
        std::fs::write(&path, "{}")?;
        Ok(path)
    };

    let mut config = MicrocksContainerConfig::default();
    config.secondary_artifacts.push(write("postman.json")?);
    config.main_artifacts.push(write("openapi.yaml")?);
    config
        .secondary_remote_artifacts
        .push(RemoteArtifact::new("https://example.com/metadata.yaml"));
    config
        .main_remote_artifacts
        .push(RemoteArtifact::with_secret("https://example.com/openapi.yaml", "github"));
    config.secrets.push(Secret::token("github", "ghp_xxx", "Authorization"));
    config.snapshots.push(write("snapshot.json")?);

    config.import_into(&client).await?;

    let calls = calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            "POST /api/import",
            "POST /api/secrets",
            "POST /api/artifact/download",
            "POST /api/artifact/download",
            "POST /api/artifact/upload",
            "POST /api/artifact/upload?mainArtifact=false",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_import_stops_at_first_failure() -> anyhow::Result<()> {
    let (client, calls) = start(true).await;

    let mut config = MicrocksContainerConfig::default();
    config.secrets.push(Secret::token("first", "t1", "X-Token"));
    config.secrets.push(Secret::token("second", "t2", "X-Token"));

    let err = config.import_into(&client).await.unwrap_err();
    assert!(matches!(err, ContainerError::Client(_)));
    assert_eq!(calls.lock().unwrap().len(), 1);
    Ok(())
}
