// TorrTide - GPL-3.0-or-later
// This file is part of TorrTide.
//
// Copyright (C) 2026 TorrTide contributors
//
// TorrTide is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// TorrTide is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with TorrTide.  If not, see <https://www.gnu.org/licenses/>.

//! HTTP client for the daemon's WebUI API (cookie-session based).

pub mod types;

use reqwest::StatusCode;
use types::SyncSnapshot;

/// Errors from the daemon boundary.
///
/// The polling loop only cares about one distinction: terminal errors
/// (session gone, endpoint gone) stop the loop; everything else is a
/// transient connectivity problem.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("login rejected by the daemon")]
    AuthRejected,
    #[error("session expired or access forbidden")]
    Forbidden,
    #[error("endpoint not found on the daemon")]
    NotFound,
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Terminal errors stop the polling loop; the caller must
    /// re-authenticate rather than retry.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApiError::AuthRejected | ApiError::Forbidden | ApiError::NotFound
        )
    }
}

/// Client for one daemon instance. Cheap to clone; the underlying
/// connection pool and cookie jar are shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: reqwest::Url,
}

impl ApiClient {
    pub fn new(base: reqwest::Url) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()?;
        Ok(ApiClient { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        // Url::join only fails on malformed paths, which ours are not,
        // but surface it rather than panic.
        self.base
            .join(path)
            .map_err(|_| ApiError::NotFound)
    }

    fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        match resp.status() {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            s if s.is_success() => Ok(resp),
            s => Err(ApiError::Status(s)),
        }
    }

    /// Establish a cookie session. The daemon answers 200 with a literal
    /// "Fails." body on bad credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint("api/v2/auth/login")?;
        let resp = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let resp = Self::check(resp)?;
        let body = resp.text().await?;
        if body.trim() == "Ok." {
            log::info!("logged in as {username}");
            Ok(())
        } else {
            Err(ApiError::AuthRejected)
        }
    }

    /// Fetch the next sync payload. `rid=0` requests a full snapshot.
    pub async fn sync_main_data(&self, rid: i64) -> Result<SyncSnapshot, ApiError> {
        let url = self.endpoint("api/v2/sync/maindata")?;
        let resp = self
            .http
            .get(url)
            .query(&[("rid", rid.to_string())])
            .send()
            .await?;
        let resp = Self::check(resp)?;
        Ok(resp.json::<SyncSnapshot>().await?)
    }

    pub async fn pause(&self, hashes: &[String]) -> Result<(), ApiError> {
        self.torrents_action("api/v2/torrents/stop", hashes, &[]).await
    }

    pub async fn resume(&self, hashes: &[String]) -> Result<(), ApiError> {
        self.torrents_action("api/v2/torrents/start", hashes, &[]).await
    }

    pub async fn delete(&self, hashes: &[String], delete_files: bool) -> Result<(), ApiError> {
        let extra = [("deleteFiles", delete_files.to_string())];
        self.torrents_action("api/v2/torrents/delete", hashes, &extra)
            .await
    }

    async fn torrents_action(
        &self,
        path: &str,
        hashes: &[String],
        extra: &[(&str, String)],
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let mut form: Vec<(&str, String)> = vec![("hashes", hashes.join("|"))];
        form.extend(extra.iter().cloned());
        let resp = self.http.post(url).form(&form).send().await?;
        Self::check(resp)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(ApiError::Forbidden.is_terminal());
        assert!(ApiError::NotFound.is_terminal());
        assert!(ApiError::AuthRejected.is_terminal());
        assert!(!ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR).is_terminal());
    }
}
