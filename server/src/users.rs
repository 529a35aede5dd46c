//! Account registry and username/password persistence (SPEC_FULL.md §6),
//! grounded on `user_manager.h`'s `UserManager`: an in-memory username ->
//! password map, an fd -> username online map, and a background writer
//! that rewrites the whole file rather than appending.

use std::collections::HashMap;
use std::fs;
use std::io::Write as _;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginResult {
    Success,
    WrongPassword,
    UnknownUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterResult {
    Success,
    AlreadyExists,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, String>,
    online: HashMap<i32, String>,
}

/// Shared across every connection-handling thread, per SPEC_FULL.md §5:
/// this is one of only two structures in the whole server guarded by a
/// lock, since account lookup is the one piece of state every room needs
/// to reach into from outside its own worker thread.
pub struct UserRegistry {
    inner: Mutex<Inner>,
    persist_path: String,
}

impl UserRegistry {
    pub fn load(persist_path: &str) -> Arc<UserRegistry> {
        let mut accounts = HashMap::new();
        if let Ok(contents) = fs::read_to_string(persist_path) {
            for line in contents.lines() {
                if let Some((user, pass)) = line.split_once(' ') {
                    accounts.insert(user.to_string(), pass.to_string());
                }
            }
        }
        Arc::new(UserRegistry {
            inner: Mutex::new(Inner {
                accounts,
                online: HashMap::new(),
            }),
            persist_path: persist_path.to_string(),
        })
    }

    pub fn register(&self, username: &str, password: &str) -> RegisterResult {
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.contains_key(username) {
            return RegisterResult::AlreadyExists;
        }
        inner.accounts.insert(username.to_string(), password.to_string());
        RegisterResult::Success
    }

    pub fn login(&self, fd: i32, username: &str, password: &str) -> LoginResult {
        let mut inner = self.inner.lock().unwrap();
        match inner.accounts.get(username) {
            None => LoginResult::UnknownUser,
            Some(stored) if stored != password => LoginResult::WrongPassword,
            Some(_) => {
                inner.online.insert(fd, username.to_string());
                LoginResult::Success
            }
        }
    }

    pub fn logout(&self, fd: i32) {
        self.inner.lock().unwrap().online.remove(&fd);
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.inner.lock().unwrap().online.values().any(|u| u == username)
    }

    pub fn username_of(&self, fd: i32) -> Option<String> {
        self.inner.lock().unwrap().online.get(&fd).cloned()
    }

    pub fn online_count(&self) -> usize {
        self.inner.lock().unwrap().online.len()
    }

    fn snapshot_lines(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .accounts
            .iter()
            .map(|(user, pass)| format!("{user} {pass}"))
            .collect()
    }
}

/// Rewrites the whole persistence file on a fixed cadence. The registry is
/// only locked long enough to clone the in-memory map; the (possibly slow)
/// file write happens outside the lock so logins never block on disk I/O.
pub fn spawn_persister(registry: Arc<UserRegistry>, period: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(period);
        let lines = registry.snapshot_lines();
        if let Err(e) = write_lines(&registry.persist_path, &lines) {
            log::warn!("failed to persist user db to {}: {e}", registry.persist_path);
        }
    })
}

fn write_lines(path: &str, lines: &[String]) -> std::io::Result<()> {
    let tmp_path = format!("{path}.tmp");
    let mut f = fs::File::create(&tmp_path)?;
    for line in lines {
        writeln!(f, "{line}")?;
    }
    f.flush()?;
    fs::rename(tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_login_succeeds() {
        let reg = UserRegistry::load("/nonexistent/does-not-exist.txt");
        assert_eq!(reg.register("alice", "hunter2"), RegisterResult::Success);
        assert_eq!(reg.register("alice", "other"), RegisterResult::AlreadyExists);
        assert_eq!(reg.login(1, "alice", "hunter2"), LoginResult::Success);
        assert_eq!(reg.login(2, "alice", "wrong"), LoginResult::WrongPassword);
        assert_eq!(reg.login(3, "bob", "x"), LoginResult::UnknownUser);
    }

    #[test]
    fn logout_clears_online_state() {
        let reg = UserRegistry::load("/nonexistent/does-not-exist.txt");
        reg.register("alice", "pw");
        reg.login(7, "alice", "pw");
        assert!(reg.is_online("alice"));
        reg.logout(7);
        assert!(!reg.is_online("alice"));
    }
}
