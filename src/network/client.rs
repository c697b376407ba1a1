//! HTTP client for the friends resource

use std::time::{Duration, Instant};

use crate::constants::FRIENDS_PATH;
use crate::error::StoreError;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{BalanceUpdate, Friend, NewFriend};

/// The four REST calls against `{base}/api/friends`
#[derive(Clone, Debug)]
pub struct FriendsClient {
    client: reqwest::Client,
    base_url: String,
}

impl FriendsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        FriendsClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, FRIENDS_PATH)
    }

    pub fn friend_url(&self, friend_id: &str) -> String {
        format!("{}{}/{}", self.base_url, FRIENDS_PATH, friend_id)
    }

    /// GET the whole collection
    pub async fn list_friends(&self) -> Result<Vec<Friend>, StoreError> {
        let resp = self
            .client
            .get(self.collection_url())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<Vec<Friend>>().await?)
    }

    /// POST a candidate; the returned record is authoritative
    pub async fn create_friend(&self, friend: &NewFriend) -> Result<Friend, StoreError> {
        let resp = self
            .client
            .post(self.collection_url())
            .json(friend)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<Friend>().await?)
    }

    /// PUT a new balance
    pub async fn update_balance(&self, friend_id: &str, balance: f64) -> Result<Friend, StoreError> {
        let resp = self
            .client
            .put(self.friend_url(friend_id))
            .json(&BalanceUpdate { balance })
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<Friend>().await?)
    }

    /// DELETE a friend. The response body is ignored.
    pub async fn delete_friend(&self, friend_id: &str) -> Result<(), StoreError> {
        self.client
            .delete(self.friend_url(friend_id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Run one command and turn the outcome into a response for the App layer.
    /// Returns `None` for commands that are not exchanges.
    pub async fn execute(&self, command: NetworkCommand) -> Option<NetworkResponse> {
        let id = command.id()?;
        let operation = command.operation()?;
        let start = Instant::now();

        let result = match command {
            NetworkCommand::LoadFriends { .. } => self
                .list_friends()
                .await
                .map(|friends| NetworkResponse::FriendsLoaded { id, friends }),
            NetworkCommand::CreateFriend { friend, .. } => self
                .create_friend(&friend)
                .await
                .map(|friend| NetworkResponse::FriendCreated { id, friend }),
            NetworkCommand::UpdateBalance { friend_id, balance, .. } => self
                .update_balance(&friend_id, balance)
                .await
                .map(|friend| NetworkResponse::FriendUpdated { id, friend }),
            NetworkCommand::DeleteFriend { friend_id, .. } => self
                .delete_friend(&friend_id)
                .await
                .map(|()| NetworkResponse::FriendDeleted { id, friend_id }),
            NetworkCommand::Shutdown => return None,
        };

        let time_ms = start.elapsed().as_millis() as u64;
        Some(match result {
            Ok(response) => {
                tracing::info!(id, operation = operation.as_str(), time_ms, "Exchange completed");
                response
            }
            Err(e) => {
                tracing::warn!(id, operation = operation.as_str(), time_ms, error = %e, "Exchange failed");
                NetworkResponse::Error {
                    id,
                    operation,
                    reason: e.to_string(),
                }
            }
        })
    }
}

/// Create an HTTP client with the given timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Operation;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response on a loopback port, yielding the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= head_end + 4 + content_length
    }

    fn client(base: &str) -> FriendsClient {
        FriendsClient::new(create_client(Duration::from_secs(5)), base)
    }

    #[test]
    fn test_urls() {
        let c = client("http://localhost:5000/");
        assert_eq!(c.collection_url(), "http://localhost:5000/api/friends");
        assert_eq!(c.friend_url("abc"), "http://localhost:5000/api/friends/abc");
    }

    #[tokio::test]
    async fn test_list_friends() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"_id":"1","name":"Ann","image":"a","balance":0},{"_id":"2","name":"Bob","image":"b","balance":-4}]"#,
        )
        .await;

        let friends = client(&base).list_friends().await.unwrap();
        assert_eq!(friends.len(), 2);
        assert_eq!(friends[1].name, "Bob");
        assert_eq!(friends[1].balance, -4.0);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/friends HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_update_sends_balance_only() {
        let (base, server) =
            serve_once("200 OK", r#"{"_id":"1","name":"Ann","image":"a","balance":20}"#).await;

        let response = client(&base)
            .execute(NetworkCommand::UpdateBalance {
                id: 3,
                friend_id: "1".into(),
                balance: 20.0,
            })
            .await
            .unwrap();
        match response {
            NetworkResponse::FriendUpdated { id, friend } => {
                assert_eq!(id, 3);
                assert_eq!(friend.balance, 20.0);
            }
            other => panic!("unexpected {:?}", other),
        }

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/friends/1 HTTP/1.1"));
        assert!(request.ends_with(r#"{"balance":20.0}"#));
    }

    #[tokio::test]
    async fn test_create_posts_candidate() {
        let (base, server) =
            serve_once("201 Created", r#"{"_id":"srv","name":"Bob","image":"https://x/48","balance":0}"#).await;

        let candidate = NewFriend::from_form("Bob", "https://x/48").unwrap();
        let created = client(&base).create_friend(&candidate).await.unwrap();
        assert_eq!(created.id, "srv");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/friends HTTP/1.1"));
        assert!(request.contains(&format!(r#""id":"{}""#, candidate.id)));
        assert!(request.contains(r#""balance":0.0"#));
    }

    #[tokio::test]
    async fn test_error_status_becomes_error_response() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#).await;

        let response = client(&base)
            .execute(NetworkCommand::DeleteFriend {
                id: 7,
                friend_id: "1".into(),
            })
            .await
            .unwrap();
        match response {
            NetworkResponse::Error { id, operation, reason } => {
                assert_eq!(id, 7);
                assert_eq!(operation, Operation::Delete);
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let (base, server) = serve_once("200 OK", "").await;

        let response = client(&base)
            .execute(NetworkCommand::DeleteFriend {
                id: 4,
                friend_id: "1".into(),
            })
            .await
            .unwrap();
        match response {
            NetworkResponse::FriendDeleted { id, friend_id } => {
                assert_eq!(id, 4);
                assert_eq!(friend_id, "1");
            }
            other => panic!("unexpected {:?}", other),
        }

        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/friends/1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_execute_load() {
        let (base, server) =
            serve_once("200 OK", r#"[{"_id":"1","name":"Ann","image":"a","balance":2.5}]"#).await;

        let response = client(&base)
            .execute(NetworkCommand::LoadFriends { id: 9 })
            .await
            .unwrap();
        match response {
            NetworkResponse::FriendsLoaded { id, friends } => {
                assert_eq!(id, 9);
                assert_eq!(friends.len(), 1);
                assert_eq!(friends[0].id, "1");
                assert_eq!(friends[0].balance, 2.5);
            }
            other => panic!("unexpected {:?}", other),
        }

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/friends HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{}", addr)).list_friends().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_is_not_an_exchange() {
        assert!(client("http://localhost:1").execute(NetworkCommand::Shutdown).await.is_none());
    }
}
