//! Session: identity and playback state shared by every mode.
//!
//! The controller owns the one `Session`. Persisted state reaches it through
//! [`restore`], which runs once on a blocking worker and hands back a
//! [`RestoredSession`]; [`Session::merge_restored`] then fills only the
//! fields that are still at their zero value, so anything the user changed
//! in the meantime wins.

use music_proto::model::{PlayMode, PlayerSnapshot, RecordKind, TrackRef, UserIdentity};
use music_proto::store::{load_record, SessionStore};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct Session {
    pub user: Option<UserIdentity>,
    /// `None` until restored or chosen by the user.
    play_mode: Option<PlayMode>,
    pub playlist: Vec<TrackRef>,
    pub current_index: usize,
    pub playing_menu_key: String,
}

/// Whatever the restore task managed to read. Every field is independent.
#[derive(Debug, Default)]
pub struct RestoredSession {
    pub user: Option<UserIdentity>,
    pub play_mode: Option<PlayMode>,
    pub snapshot: Option<PlayerSnapshot>,
}

impl Session {
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode.unwrap_or_default()
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.play_mode = Some(mode);
    }

    #[cfg(test)]
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.playlist.get(self.current_index)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_index: self.current_index,
            playlist: self.playlist.clone(),
            playing_menu_key: self.playing_menu_key.clone(),
        }
    }

    /// Apply restored values to fields still at their zero value.
    pub fn merge_restored(&mut self, restored: RestoredSession) {
        if let Some(user) = restored.user {
            if self.user.is_none() {
                info!("session: restored user {}", user.user_id);
                self.user = Some(user);
            } else {
                debug!("session: user already set, dropping restored identity");
            }
        }

        if let Some(mode) = restored.play_mode {
            if self.play_mode.is_none() {
                debug!("session: restored play mode {:?}", mode);
                self.play_mode = Some(mode);
            } else {
                debug!("session: play mode already chosen, keeping {:?}", self.play_mode());
            }
        }

        // Snapshot fields are applied together or not at all.
        if let Some(snapshot) = restored.snapshot {
            if self.playlist.is_empty() {
                debug!(
                    "session: restored playlist of {} tracks at {}",
                    snapshot.playlist.len(),
                    snapshot.current_index
                );
                self.current_index = if snapshot.current_index < snapshot.playlist.len() {
                    snapshot.current_index
                } else {
                    0
                };
                self.playlist = snapshot.playlist;
                self.playing_menu_key = snapshot.playing_menu_key;
            } else {
                debug!("session: playlist already populated, dropping snapshot");
            }
        }
    }
}

/// Read the three session records. A missing or unreadable record only
/// leaves its own field empty.
pub fn restore(store: &dyn SessionStore) -> RestoredSession {
    RestoredSession {
        user: read_record(store, RecordKind::User),
        play_mode: read_record(store, RecordKind::PlayMode),
        snapshot: read_record(store, RecordKind::PlayerSnapshot),
    }
}

fn read_record<T: serde::de::DeserializeOwned>(
    store: &dyn SessionStore,
    kind: RecordKind,
) -> Option<T> {
    match load_record(store, kind) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!("restore: no {} record", kind.key());
            None
        }
        Err(e) => {
            warn!("restore: skipping {}: {}", kind.key(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use music_proto::store::MemoryStore;

    fn track(id: i64, name: &str) -> TrackRef {
        TrackRef {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    fn user(id: i64) -> UserIdentity {
        UserIdentity {
            user_id: id,
            nickname: format!("user{}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_partial_restore_only_play_mode() {
        let store = MemoryStore::new()
            .with_record(RecordKind::PlayMode, "\"single_loop\"")
            .with_record(RecordKind::User, "{ this is not json")
            .with_record(RecordKind::PlayerSnapshot, "\"not a snapshot\"");

        let restored = restore(&store);
        assert!(restored.user.is_none());
        assert!(restored.snapshot.is_none());

        let mut session = Session::default();
        session.merge_restored(restored);
        assert_eq!(session.play_mode(), PlayMode::SingleLoop);
        assert!(session.user.is_none());
        assert!(session.playlist.is_empty());
    }

    #[test]
    fn test_restore_from_empty_store() {
        let restored = restore(&MemoryStore::new());
        let mut session = Session::default();
        session.merge_restored(restored);
        assert!(session.user.is_none());
        assert_eq!(session.play_mode(), PlayMode::ListLoop);
        assert!(session.current_track().is_none());
    }

    #[test]
    fn test_restore_does_not_clobber_login() {
        let mut session = Session::default();
        session.user = Some(user(2));

        session.merge_restored(RestoredSession {
            user: Some(user(1)),
            ..Default::default()
        });
        assert_eq!(session.user.as_ref().map(|u| u.user_id), Some(2));
    }

    #[test]
    fn test_restore_does_not_clobber_chosen_mode() {
        let mut session = Session::default();
        // The user picked the default mode explicitly; it still counts as chosen.
        session.set_play_mode(PlayMode::ListLoop);

        session.merge_restored(RestoredSession {
            play_mode: Some(PlayMode::Random),
            ..Default::default()
        });
        assert_eq!(session.play_mode(), PlayMode::ListLoop);
    }

    #[test]
    fn test_snapshot_applied_as_a_unit() {
        let mut session = Session::default();
        session.merge_restored(RestoredSession {
            snapshot: Some(PlayerSnapshot {
                current_index: 1,
                playlist: vec![track(1, "a"), track(2, "b")],
                playing_menu_key: "liked".into(),
            }),
            ..Default::default()
        });
        assert_eq!(session.current_track().map(|t| t.id), Some(2));
        assert_eq!(session.playing_menu_key, "liked");

        // A second snapshot must not replace the live playlist.
        session.merge_restored(RestoredSession {
            snapshot: Some(PlayerSnapshot {
                current_index: 0,
                playlist: vec![track(9, "z")],
                playing_menu_key: "other".into(),
            }),
            ..Default::default()
        });
        assert_eq!(session.playlist.len(), 2);
        assert_eq!(session.current_index, 1);
        assert_eq!(session.playing_menu_key, "liked");
    }

    #[test]
    fn test_out_of_range_index_is_reset() {
        let mut session = Session::default();
        session.merge_restored(RestoredSession {
            snapshot: Some(PlayerSnapshot {
                current_index: 5,
                playlist: vec![track(1, "a")],
                playing_menu_key: String::new(),
            }),
            ..Default::default()
        });
        assert_eq!(session.current_index, 0);
    }
}
