//! Read-only catalog and audience listings used by the dashboard overview.

use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::instrument;

use tunenest_core::{GenreId, UserId};

use super::{ApiClient, ApiError, BackendCookie};

/// A platform end-user (listener).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl EndUser {
    /// Name, falling back to the email, for select boxes and tables.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unnamed user")
    }
}

/// One month of the user-growth series.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GrowthPoint {
    pub month: String,
    #[serde(default)]
    pub users: u64,
}

/// A genre with its song count.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    #[serde(rename = "_id", default)]
    pub id: Option<GenreId>,
    pub name: String,
    #[serde(default)]
    pub total_songs: Option<u64>,
}

#[derive(Deserialize)]
struct AlbumsEnvelope {
    #[serde(default)]
    albums: Vec<IgnoredAny>,
}

impl ApiClient {
    /// List all platform users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn users(&self, cookie: Option<&BackendCookie>) -> Result<Vec<EndUser>, ApiError> {
        self.get("/user", cookie).await
    }

    /// Monthly user sign-up counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn user_growth(
        &self,
        cookie: Option<&BackendCookie>,
    ) -> Result<Vec<GrowthPoint>, ApiError> {
        self.get("/user/growth", cookie).await
    }

    /// List genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn genres(&self, cookie: Option<&BackendCookie>) -> Result<Vec<Genre>, ApiError> {
        self.get("/genres", cookie).await
    }

    /// Number of playlists (items are only counted).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a list.
    #[instrument(skip(self, cookie))]
    pub async fn playlist_count(&self, cookie: Option<&BackendCookie>) -> Result<usize, ApiError> {
        let playlists: Vec<IgnoredAny> = self.get("/playlists/all", cookie).await?;
        Ok(playlists.len())
    }

    /// Number of albums.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body has no `albums` list.
    #[instrument(skip(self, cookie))]
    pub async fn album_count(&self, cookie: Option<&BackendCookie>) -> Result<usize, ApiError> {
        let envelope: AlbumsEnvelope = self.get("/albums", cookie).await?;
        Ok(envelope.albums.len())
    }

    /// Number of artists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a list.
    #[instrument(skip(self, cookie))]
    pub async fn artist_count(&self, cookie: Option<&BackendCookie>) -> Result<usize, ApiError> {
        let artists: Vec<IgnoredAny> = self.get("/artist", cookie).await?;
        Ok(artists.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let user: EndUser =
            serde_json::from_str(r#"{"_id":"u1","name":"","email":"a@b.co"}"#).unwrap();
        assert_eq!(user.display_name(), "a@b.co");

        let user: EndUser = serde_json::from_str(r#"{"_id":"u2"}"#).unwrap();
        assert_eq!(user.display_name(), "Unnamed user");
    }

    #[test]
    fn test_genre_total_songs_optional() {
        let genres: Vec<Genre> =
            serde_json::from_str(r#"[{"name":"Pop","totalSongs":12},{"name":"Lo-fi"}]"#).unwrap();
        assert_eq!(genres[0].total_songs, Some(12));
        assert_eq!(genres[1].total_songs, None);
    }

    #[test]
    fn test_albums_envelope() {
        let envelope: AlbumsEnvelope =
            serde_json::from_str(r#"{"albums":[{"title":"A"},{"title":"B"}]}"#).unwrap();
        assert_eq!(envelope.albums.len(), 2);
    }
}
