//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use dashboard_lib::api::UserApi;
use dashboard_lib::error::ApiError;
use dashboard_lib::model::Credentials;
use dashboard_lib::model::User;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request received by [`MockServer`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Canned response for one `METHOD /path`.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub body: &'static str,
}

impl Route {
    pub fn new(method: &'static str, path: &'static str, status: u16, body: &'static str) -> Self {
        Self {
            method,
            path,
            status,
            body,
        }
    }
}

/// Local HTTP backend bound on an ephemeral port.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let recorded = recorded.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let routes = routes.clone();
                        let recorded = recorded.clone();
                        async move {
                            let method = req.method().to_string();
                            let path = req.uri().path().to_string();
                            let body = req
                                .into_body()
                                .collect()
                                .await
                                .map(|b| String::from_utf8_lossy(&b.to_bytes()).into_owned())
                                .unwrap_or_default();

                            let route = routes
                                .iter()
                                .find(|r| r.method == method && r.path == path);
                            recorded.lock().unwrap().push(Recorded { method, path, body });

                            let (status, body) = match route {
                                Some(r) => (r.status, r.body),
                                None => (404, r#"{"message":"not found"}"#),
                            };

                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(StatusCode::from_u16(status).unwrap())
                                    .header("Content-Type", "application/json")
                                    .body(Full::new(Bytes::from(body)))
                                    .unwrap(),
                            )
                        }
                    });

                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// In-process [`UserApi`] returning fixed results.
#[derive(Debug, Default)]
pub struct StubApi {
    pub user: Option<User>,
    pub logins: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn with_user(user: User) -> Self {
        Self {
            user: Some(user),
            logins: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserApi for StubApi {
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.logins.lock().unwrap().push(credentials.email.clone());
        self.user
            .clone()
            .ok_or_else(|| ApiError::http(401, "Login failed"))
    }

    async fn fetch_user(&self) -> Result<User, ApiError> {
        self.user
            .clone()
            .ok_or_else(|| ApiError::http(401, "Failed to fetch user"))
    }
}
