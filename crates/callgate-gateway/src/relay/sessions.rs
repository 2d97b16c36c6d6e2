use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// One session's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

/// Live transport sessions: `conn_id -> Connection`.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Connection>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, conn_id: String, conn: Connection) {
        self.sessions.insert(conn_id, conn);
    }

    pub fn remove(&self, conn_id: &str) -> Option<Connection> {
        self.sessions.remove(conn_id).map(|(_, conn)| conn)
    }

    pub fn get(&self, conn_id: &str) -> Option<Connection> {
        self.sessions.get(conn_id).map(|r| r.value().clone())
    }

    pub fn contains(&self, conn_id: &str) -> bool {
        self.sessions.contains_key(conn_id)
    }
}
