// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::OptionalExtension;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// A minimal key-value store. Progress is the only durable state, so this
/// is all the session engine needs.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Fallible<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Fallible<()>;
}

/// SQLite-backed storage, one file per collection.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let conn = Connection::open(database_path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ErrorReport::new("database lock poisoned"))
    }
}

impl Storage for Database {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let conn = self.acquire()?;
        let sql = "select value from kv where key = ?;";
        let value: Option<String> = conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Fallible<()> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let sql = "insert into kv (key, value) values (?, ?) on conflict (key) do update set value = excluded.value;";
        tx.execute(sql, (key, value))?;
        tx.commit()?;
        Ok(())
    }
}

/// Volatile storage. Clones share the same backing map, which lets a test
/// "reload" an engine against the state a previous one left behind.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| ErrorReport::new("storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Fallible<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ErrorReport::new("storage lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::error::fail;

    /// Storage that fails every read and write.
    pub struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Fallible<Option<String>> {
            fail("storage unavailable")
        }

        fn set(&self, _key: &str, _value: &str) -> Fallible<()> {
            fail("quota exceeded")
        }
    }
}
