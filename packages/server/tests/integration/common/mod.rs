use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig};
use server::notify::Notifier;
use server::state::AppState;
use server::storage::UploadStore;

pub mod routes {
    pub const ARTICLES: &str = "/articles";
    pub const WORKSPACES: &str = "/workspaces";

    pub fn article(id: &str) -> String {
        format!("/articles/{id}")
    }

    pub fn article_comments(id: &str) -> String {
        format!("/articles/{id}/comments")
    }

    pub fn article_attachments(id: &str) -> String {
        format!("/articles/{id}/attachments")
    }

    pub fn comment(id: &str) -> String {
        format!("/comments/{id}")
    }

    pub fn workspace(id: &str) -> String {
        format!("/workspaces/{id}")
    }

    pub fn upload(filename: &str) -> String {
        format!("/uploads/{filename}")
    }
}

/// A running test server backed by a temp SQLite database and upload dir.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
    _dirs: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dirs = TempDir::new().expect("Failed to create temp dir");
        let db_path = dirs.path().join("test.sqlite");
        let upload_dir = dirs.path().join("uploads");

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                max_upload_size: 1024 * 1024,
            },
        };

        let uploads = UploadStore::new(&config.storage.upload_dir, config.storage.max_upload_size);
        uploads
            .ensure_root()
            .await
            .expect("Failed to create upload dir");

        let state = AppState {
            db: db.clone(),
            notifier: Arc::new(Notifier::new()),
            uploads,
            config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_dir,
            _dirs: dirs,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Upload a file to an article's attachment endpoint.
    pub async fn upload_attachment(
        &self,
        article_id: &str,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(self.url(&routes::article_attachments(article_id)))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Create an article via the API and return its `id`.
    pub async fn create_article(&self, title: &str, content: &str) -> String {
        let res = self
            .post(
                routes::ARTICLES,
                &serde_json::json!({ "title": title, "content": content }),
            )
            .await;
        assert_eq!(res.status, 201, "create_article failed: {}", res.text);
        res.id()
    }

    /// Create an article inside a workspace and return its `id`.
    pub async fn create_article_in_workspace(
        &self,
        title: &str,
        content: &str,
        workspace_id: &str,
    ) -> String {
        let res = self
            .post(
                routes::ARTICLES,
                &serde_json::json!({
                    "title": title,
                    "content": content,
                    "workspaceId": workspace_id,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_article failed: {}", res.text);
        res.id()
    }

    /// Create a workspace via the API and return its `id`.
    pub async fn create_workspace(&self, name: &str) -> String {
        let res = self
            .post(routes::WORKSPACES, &serde_json::json!({ "name": name }))
            .await;
        assert_eq!(res.status, 201, "create_workspace failed: {}", res.text);
        res.id()
    }

    /// Post a comment on an article via the API and return its `id`.
    pub async fn create_comment(
        &self,
        article_id: &str,
        content: &str,
        author: Option<&str>,
    ) -> String {
        let mut body = serde_json::json!({ "content": content });
        if let Some(author) = author {
            body["author"] = Value::String(author.to_string());
        }

        let res = self.post(&routes::article_comments(article_id), &body).await;
        assert_eq!(res.status, 201, "create_comment failed: {}", res.text);
        res.id()
    }

    /// Number of files currently in the upload directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }
}

/// A random UUID that matches no persisted entity.
pub fn missing_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
