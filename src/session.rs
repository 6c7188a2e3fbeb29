use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::Mutex};
use tracing::error;

use crate::errors::AppError;
use crate::models::Session;

/// Single source of truth for the signed-in session. Holds the current
/// session in memory and mirrors it to a JSON file so a restart keeps the
/// operator signed in. Views receive this store through app state instead of
/// reading any ambient global.
#[derive(Clone)]
pub struct SessionStore {
    path: PathBuf,
    current: Arc<Mutex<Option<Session>>>,
}

impl SessionStore {
    /// Opens the store, loading any previously persisted session.
    pub async fn open(path: PathBuf) -> Self {
        let current = load_session(&path).await;
        Self {
            path,
            current: Arc::new(Mutex::new(current)),
        }
    }

    pub async fn get(&self) -> Option<Session> {
        self.current.lock().await.clone()
    }

    /// Stores a new session, replacing any existing one.
    pub async fn set(&self, session: Session) -> Result<(), AppError> {
        let mut current = self.current.lock().await;
        let payload = serde_json::to_vec_pretty(&session).map_err(AppError::internal)?;
        fs::write(&self.path, payload)
            .await
            .map_err(AppError::internal)?;
        *current = Some(session);
        Ok(())
    }

    /// Drops the session and removes the file. Called on sign-out and on any
    /// upstream response that says the token is no longer valid.
    pub async fn clear(&self) -> Result<(), AppError> {
        let mut current = self.current.lock().await;
        *current = None;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::internal(err)),
        }
    }
}

async fn load_session(path: &Path) -> Option<Session> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(err) => {
                error!("failed to parse session file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read session file: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("session_{label}_{}_{nanos}.json", std::process::id()));
        path
    }

    fn sample_session() -> Session {
        Session {
            token: "tok-123".to_string(),
            username: "admin".to_string(),
            roles: vec!["ADMIN".to_string()],
        }
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = SessionStore::open(unique_path("roundtrip")).await;
        assert!(store.get().await.is_none());

        store.set(sample_session()).await.unwrap();
        let session = store.get().await.expect("session should be present");
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.username, "admin");

        store.clear().await.unwrap();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn persisted_session_survives_reopen() {
        let path = unique_path("reopen");
        let store = SessionStore::open(path.clone()).await;
        store.set(sample_session()).await.unwrap();

        let reopened = SessionStore::open(path.clone()).await;
        let session = reopened.get().await.expect("session should persist");
        assert_eq!(session.roles, vec!["ADMIN".to_string()]);

        reopened.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = SessionStore::open(unique_path("clear")).await;
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}
