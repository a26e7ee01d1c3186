// src/services/session.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::services::gate::SessionGate;

pub type SessionHandle = Arc<Mutex<SessionGate>>;

struct SessionEntry {
    handle: SessionHandle,
    expires_at: DateTime<Utc>,
}

/// Sessões ativas. Cada uma tem o seu próprio porteiro (e portanto o seu próprio cache).
///
/// O `Mutex` de cada sessão serializa load/clear/get daquela sessão. Uma sessão
/// vencida não é mais devolvida e sai do mapa no próximo acesso ou na próxima abertura.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, gate: SessionGate, expires_at: DateTime<Utc>) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(gate));

        let mut sessions = self.sessions.write().await;
        let evicted = purge_expired(&mut sessions, Utc::now());
        if evicted > 0 {
            tracing::debug!("{} sessões vencidas removidas", evicted);
        }
        sessions.insert(id, SessionEntry { handle: handle.clone(), expires_at });
        (id, handle)
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&id) {
                Some(entry) if entry.expires_at > now => return Some(entry.handle.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Vencida: remove e limpa o cache antes de descartar
        let expired = self.sessions.write().await.remove(&id);
        if let Some(entry) = expired {
            entry.handle.lock().await.on_logout();
        }
        None
    }

    pub async fn close(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&id).map(|entry| entry.handle)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn purge_expired(sessions: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| entry.expires_at > now);
    before - sessions.len()
}
