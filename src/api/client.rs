use crate::api::models::{AuthUser, LikeRequest, Song};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

const SESSION_COOKIE: &str = "harmony_token";

/// Error payload the server attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct SongIdReply {
    #[serde(rename = "songId")]
    song_id: String,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    username: String,
}

/// Typed client for the Harmony server. The session token rides along as the
/// `harmony_token` cookie on every request; construct a fresh client when the
/// session changes (login/logout), the same way the UI swaps auth state.
#[derive(Debug, Clone)]
pub struct HarmonyClient {
    http: reqwest::Client,
    base: String,
}

impl HarmonyClient {
    pub fn new(base_url: &str, token: Option<&str>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("harmony-tui/0.1"));
        if let Some(tok) = token {
            let cookie = format!("{SESSION_COOKIE}={tok}");
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&cookie).context("session token as cookie header")?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn songs(&self) -> anyhow::Result<Vec<Song>> {
        let resp = self
            .http
            .get(format!("{}/api/songs", self.base))
            .send()
            .await
            .context("send songs request")?;
        let resp = check(resp).await?;
        resp.json().await.context("parse songs json")
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<Song>> {
        let url = format!(
            "{}/api/jamendo/search?query={}",
            self.base,
            urlencoding::encode(query)
        );
        let resp = self.http.get(url).send().await.context("send search request")?;
        let resp = check(resp).await?;
        resp.json().await.context("parse search json")
    }

    /// Returns the canonical id the server settled on (a liked remote track
    /// may be inserted server-side first).
    pub async fn like(&self, req: &LikeRequest) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/songs/like", self.base))
            .json(req)
            .send()
            .await
            .context("send like request")?;
        let resp = check(resp).await?;
        let reply: SongIdReply = resp.json().await.context("parse like reply")?;
        Ok(reply.song_id)
    }

    pub async fn unlike(&self, song_id: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/songs/unlike", self.base))
            .json(&json!({ "songId": song_id }))
            .send()
            .await
            .context("send unlike request")?;
        let resp = check(resp).await?;
        let reply: SongIdReply = resp.json().await.context("parse unlike reply")?;
        Ok(reply.song_id)
    }

    /// One request per file; callers report each outcome independently.
    pub async fn upload(&self, path: &Path) -> anyhow::Result<Song> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let title = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("read {}", path.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .context("build upload part")?;
        let form = reqwest::multipart::Form::new()
            .part("audioFile", part)
            .text("title", title)
            .text("artist", "")
            .text("album", "");

        let resp = self
            .http
            .post(format!("{}/api/songs/upload", self.base))
            .multipart(form)
            .send()
            .await
            .context("send upload request")?;
        let resp = check(resp).await?;
        resp.json().await.context("parse uploaded song")
    }

    pub async fn delete(&self, song_id: &str) -> anyhow::Result<()> {
        let url = format!(
            "{}/api/songs/delete?id={}",
            self.base,
            urlencoding::encode(song_id)
        );
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .context("send delete request")?;
        check(resp).await?;
        Ok(())
    }

    /// `None` means "not signed in", which is an answer, not an error.
    pub async fn me(&self) -> anyhow::Result<Option<AuthUser>> {
        let resp = self
            .http
            .get(format!("{}/auth/me", self.base))
            .send()
            .await
            .context("send me request")?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let resp = check(resp).await?;
        let user: AuthUser = resp.json().await.context("parse me reply")?;
        Ok(Some(user))
    }

    /// On success returns the confirmed username and the session token pulled
    /// out of the server's Set-Cookie header.
    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<(String, String)> {
        let resp = self
            .http
            .post(format!("{}/auth/login", self.base))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .context("send login request")?;
        let resp = check(resp).await?;

        let token = session_cookie(resp.headers())
            .context("login reply carried no session cookie")?;
        let reply: LoginReply = resp.json().await.context("parse login reply")?;
        Ok((reply.username, token))
    }

    pub async fn register(&self, username: &str, password: &str) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(format!("{}/auth/register", self.base))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .context("send register request")?;
        check(resp).await?;
        Ok(())
    }

    pub async fn logout(&self) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(format!("{}/auth/logout", self.base))
            .send()
            .await
            .context("send logout request")?;
        check(resp).await?;
        Ok(())
    }
}

/// Map non-2xx replies to the server's `{"error": ...}` message when there is
/// one, so toasts show what the server actually said.
async fn check(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match resp.json::<ApiError>().await {
        Ok(body) => anyhow::bail!("{}", body.error),
        Err(_) => anyhow::bail!("server replied {status}"),
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(SET_COOKIE) {
        let raw = value.to_str().ok()?;
        let pair = raw.split(';').next()?.trim();
        if let Some(tok) = pair.strip_prefix(&format!("{SESSION_COOKIE}=")) {
            if !tok.is_empty() {
                return Some(tok.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_extracted_from_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("other=1; Path=/"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("harmony_token=abc.def.ghi; Path=/; HttpOnly"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cleared_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("harmony_token=; Path=/"));
        assert_eq!(session_cookie(&headers), None);
    }
}
