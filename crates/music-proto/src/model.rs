use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Kinds of records kept in the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    PlayMode,
    PlayerSnapshot,
}

impl RecordKind {
    /// Stable storage key. Changing one orphans existing records.
    pub fn key(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::PlayMode => "play_mode",
            Self::PlayerSnapshot => "player_snapshot",
        }
    }
}

/// Account identity returned by a successful login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: i64,
    #[serde(default)]
    pub account_id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub vip_type: i64,
}

#[derive(Debug, Error)]
pub enum UserParseError {
    #[error("login response is empty")]
    Empty,
    #[error("login response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("login response has no profile.userId")]
    MissingUserId,
}

impl UserIdentity {
    /// Parse the body of a successful login reply.
    ///
    /// `profile.userId` is mandatory; the remaining fields fall back to their
    /// defaults when absent or mistyped.
    pub fn from_login_response(body: &[u8]) -> Result<Self, UserParseError> {
        if body.is_empty() {
            return Err(UserParseError::Empty);
        }
        let root: Value = serde_json::from_slice(body)?;
        let profile = &root["profile"];
        let user_id = profile["userId"]
            .as_i64()
            .ok_or(UserParseError::MissingUserId)?;

        Ok(Self {
            user_id,
            account_id: root["account"]["id"].as_i64().unwrap_or_default(),
            nickname: profile["nickname"].as_str().unwrap_or_default().to_string(),
            avatar_url: profile["avatarUrl"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            vip_type: profile["vipType"].as_i64().unwrap_or_default(),
        })
    }

    /// Name shown in the UI; falls back to the numeric id.
    pub fn display_name(&self) -> String {
        if self.nickname.is_empty() {
            format!("#{}", self.user_id)
        } else {
            self.nickname.clone()
        }
    }
}

/// Order in which the player walks the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    ListLoop,
    Order,
    SingleLoop,
    Random,
    Intelligent,
}

impl PlayMode {
    pub fn next(self) -> Self {
        match self {
            Self::ListLoop => Self::Order,
            Self::Order => Self::SingleLoop,
            Self::SingleLoop => Self::Random,
            Self::Random => Self::Intelligent,
            Self::Intelligent => Self::ListLoop,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ListLoop => "list loop",
            Self::Order => "in order",
            Self::SingleLoop => "single loop",
            Self::Random => "shuffle",
            Self::Intelligent => "intelligent",
        }
    }
}

/// Reference to a track; enough to display it and ask the player for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub album: String,
}

impl TrackRef {
    /// "Artist, Artist – Title", or just the title.
    pub fn display(&self) -> String {
        if self.artists.is_empty() {
            self.name.clone()
        } else {
            format!("{} \u{2013} {}", self.artists.join(", "), self.name)
        }
    }
}

/// What the player was doing when the client last exited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub playlist: Vec<TrackRef>,
    /// Key of the menu the playlist was started from.
    #[serde(default)]
    pub playing_menu_key: String,
}
