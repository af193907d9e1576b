use async_trait::async_trait;
use redis::AsyncCommands;
use uuid::Uuid;

use super::{SessionData, SessionError, SessionStore};

const KEY_PREFIX: &str = "interview-prep:session:";

/// Session store backed by Redis. Each session is one JSON string that
/// expires after the TTL; every load and save refreshes the expiry.
pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, SessionError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn session_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// GETEX (Redis 6.2+) reads the session and slides its expiry in one round trip.
fn load_command(id: Uuid, ttl_secs: u64) -> redis::Cmd {
    let mut cmd = redis::cmd("GETEX");
    cmd.arg(session_key(id)).arg("EX").arg(ttl_secs);
    cmd
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<SessionData, SessionError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = load_command(id, self.ttl_secs)
            .query_async(&mut conn)
            .await?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(SessionData::default()),
        }
    }

    async fn save(&self, id: Uuid, data: &SessionData) -> Result<(), SessionError> {
        let json = serde_json::to_string(data)?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(session_key(id), json, self.ttl_secs)
            .await?;
        Ok(())
    }

    async fn clear(&self, id: Uuid) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(session_key(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_is_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            session_key(id),
            "interview-prep:session:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_load_refreshes_expiry() {
        let packed = load_command(Uuid::nil(), 3600).get_packed_command();
        let expected = redis::cmd("GETEX")
            .arg("interview-prep:session:00000000-0000-0000-0000-000000000000")
            .arg("EX")
            .arg(3600u64)
            .get_packed_command();
        assert_eq!(packed, expected);
        assert!(String::from_utf8_lossy(&packed).contains("GETEX"));
    }

    #[test]
    fn test_session_payload_survives_json() {
        let mut data = SessionData::default();
        data.record_generation("resume text".to_string(), vec!["Why Rust?".to_string()]);

        let json = serde_json::to_string(&data).unwrap();
        let back: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_open_accepts_url_without_connecting() {
        let client = redis::Client::open("redis://127.0.0.1:6379").unwrap();
        let _store = RedisSessionStore::new(client, 60);
    }
}
