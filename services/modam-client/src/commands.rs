//! Command execution against the authenticated client

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use auth_pipeline::{AuthClient, AuthFailureNotifier};
use common::Secret;
use tracing::{error, info, warn};

use crate::cli::{Command, USAGE};

/// Exit code when the stored session was rejected by the server.
pub const EXIT_SESSION_EXPIRED: u8 = 2;

/// Register the handler that reacts to a rejected session.
///
/// Returns the flag the handler raises, checked when choosing the exit code.
pub fn watch_session(notifier: &AuthFailureNotifier) -> Arc<AtomicBool> {
    let expired = Arc::new(AtomicBool::new(false));
    let flag = expired.clone();
    notifier.on_auth_fail(move || {
        warn!("session expired, run `modam-client login` again");
        flag.store(true, Ordering::SeqCst);
    });
    expired
}

/// Run one command; returns the process exit code.
///
/// `password` is only consulted for `login`.
pub async fn run(
    client: &AuthClient,
    command: Command,
    login_path: &str,
    password: impl FnOnce() -> common::Result<Secret<String>>,
    expired: &AtomicBool,
) -> u8 {
    match command {
        Command::Help => {
            println!("{USAGE}");
            0
        }
        Command::Login { email } => {
            let password = match password() {
                Ok(p) => p,
                Err(e) => {
                    error!(error = %e, "cannot log in");
                    return 1;
                }
            };
            let body = serde_json::json!({
                "email": email,
                "password": password.expose_str(),
            });
            match client.login(login_path, &body).await {
                Ok(_) => {
                    println!("logged in");
                    0
                }
                Err(e) => {
                    error!(error = %e, "login failed");
                    1
                }
            }
        }
        Command::Logout => {
            let failed = client.logout().await;
            if failed > 0 {
                error!(failed, "some credentials could not be removed");
                return 1;
            }
            println!("logged out");
            0
        }
        Command::Status => {
            if client.is_authenticated().await {
                println!("signed in");
            } else {
                println!("signed out");
            }
            0
        }
        Command::Get { path } => match client.get(&path).await {
            Ok(response) => {
                info!(status = response.status, "request succeeded");
                match serde_json::to_string_pretty(&response.body) {
                    Ok(text) => {
                        println!("{text}");
                        0
                    }
                    Err(e) => {
                        error!(error = %e, "failed to render response");
                        1
                    }
                }
            }
            Err(e) => {
                error!(error = %e, code = ?e.error_code(), "request failed");
                if expired.load(Ordering::SeqCst) {
                    EXIT_SESSION_EXPIRED
                } else {
                    1
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_pipeline::HttpTransport;
    use axum::http::{HeaderMap, StatusCode};
    use credential_store::{ACCESS_TOKEN_KEY, CredentialStore, FileStore};
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::TcpListener;

    /// Mock API with a login route and one protected route.
    async fn start_api() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let app = axum::Router::new()
                .route(
                    "/auth/login",
                    axum::routing::post(|| async {
                        axum::Json(json!({
                            "accessToken": "at_live",
                            "refreshToken": "rt_live",
                            "expiresIn": 3600
                        }))
                    }),
                )
                .route(
                    "/reports/streak",
                    axum::routing::get(|headers: HeaderMap| async move {
                        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                            Some("Bearer at_live") => {
                                (StatusCode::OK, axum::Json(json!({"days": 7})))
                            }
                            Some(_) => (
                                StatusCode::FORBIDDEN,
                                axum::Json(json!({"error": {"code": "4032", "message": "TOKEN_EXPIRED"}})),
                            ),
                            None => (
                                StatusCode::UNAUTHORIZED,
                                axum::Json(json!({"error": {"code": "4010"}})),
                            ),
                        }
                    }),
                );
            axum::serve(listener, app).await.unwrap();
        });
        (url, handle)
    }

    async fn setup(
        url: &str,
        dir: &tempfile::TempDir,
    ) -> (AuthClient, Arc<FileStore>, Arc<AtomicBool>) {
        let store = Arc::new(
            FileStore::load(dir.path().join("credentials.json"))
                .await
                .unwrap(),
        );
        let notifier = AuthFailureNotifier::new();
        let expired = watch_session(&notifier);
        let transport = HttpTransport::new(reqwest::Client::new(), url, Duration::from_secs(5));
        let client = AuthClient::new(Arc::new(transport), store.clone(), notifier);
        (client, store, expired)
    }

    fn password() -> common::Result<Secret<String>> {
        Ok(Secret::from("correct horse"))
    }

    #[tokio::test]
    async fn login_then_get_succeeds() {
        let (url, _handle) = start_api().await;
        let dir = tempfile::tempdir().unwrap();
        let (client, store, expired) = setup(&url, &dir).await;

        let login = Command::Login {
            email: "reader@example.com".into(),
        };
        assert_eq!(run(&client, login, "/auth/login", password, &expired).await, 0);
        assert_eq!(
            store.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
            Some("at_live")
        );

        let get = Command::Get {
            path: "/reports/streak".into(),
        };
        assert_eq!(run(&client, get, "/auth/login", password, &expired).await, 0);
        assert!(!expired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn rejected_session_exits_with_expired_code() {
        let (url, _handle) = start_api().await;
        let dir = tempfile::tempdir().unwrap();
        let (client, store, expired) = setup(&url, &dir).await;
        store.set(ACCESS_TOKEN_KEY, "at_revoked").await.unwrap();

        let get = Command::Get {
            path: "/reports/streak".into(),
        };
        let code = run(&client, get, "/auth/login", password, &expired).await;

        assert_eq!(code, EXIT_SESSION_EXPIRED);
        assert!(expired.load(Ordering::SeqCst));
        assert!(store.get(ACCESS_TOKEN_KEY).await.unwrap().is_none());
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn unrelated_failure_exits_one() {
        let (url, _handle) = start_api().await;
        let dir = tempfile::tempdir().unwrap();
        let (client, _store, expired) = setup(&url, &dir).await;

        let get = Command::Get {
            path: "/reports/streak".into(),
        };
        assert_eq!(run(&client, get, "/auth/login", password, &expired).await, 1);
        assert!(!expired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn login_without_password_fails() {
        let (url, _handle) = start_api().await;
        let dir = tempfile::tempdir().unwrap();
        let (client, store, expired) = setup(&url, &dir).await;

        let login = Command::Login {
            email: "reader@example.com".into(),
        };
        let no_password = || Err(common::Error::Config("MODAM_PASSWORD must be set".into()));
        assert_eq!(run(&client, login, "/auth/login", no_password, &expired).await, 1);
        assert!(store.get(ACCESS_TOKEN_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let (client, store, expired) = setup("http://127.0.0.1:9", &dir).await;
        store.set(ACCESS_TOKEN_KEY, "at_live").await.unwrap();

        assert_eq!(run(&client, Command::Status, "/auth/login", password, &expired).await, 0);
        assert_eq!(run(&client, Command::Logout, "/auth/login", password, &expired).await, 0);
        assert!(!client.is_authenticated().await);
        assert!(!expired.load(Ordering::SeqCst));
    }
}
