use std::path::{Path, PathBuf};

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::SchoolStore;
use crate::calendar::{format_iso_date, parse_iso_date, DayIndex, Holiday, ScheduleSlot};

pub const DB_FILE_NAME: &str = "schooldesk.sqlite3";

pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database inside `workspace`.
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(workspace)
            .with_context(|| format!("failed to create workspace {}", workspace.display()))?;
        let path = workspace.join(DB_FILE_NAME);
        let conn = Connection::open(&path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings(
                key TEXT PRIMARY KEY,
                value_json TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS holidays(
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                holiday_date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                is_school_holiday INTEGER NOT NULL DEFAULT 1
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_holidays_date ON holidays(holiday_date)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schedule_slots(
                day_index INTEGER NOT NULL CHECK(day_index BETWEEN 0 AND 6),
                time_slot TEXT NOT NULL,
                subject TEXT NOT NULL,
                class_name TEXT NOT NULL,
                PRIMARY KEY(day_index, time_slot)
            )",
            [],
        )?;

        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchoolStore for SqliteStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn settings_get_json(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value_json FROM settings WHERE key = ?",
                [key],
                |r| r.get(0),
            )
            .optional()?;
        match raw {
            Some(text) => Ok(Some(
                serde_json::from_str(&text)
                    .with_context(|| format!("settings {} is not valid JSON", key))?,
            )),
            None => Ok(None),
        }
    }

    fn settings_set_json(&mut self, key: &str, value: &Value) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value_json) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
            params![key, serde_json::to_string(value)?],
        )?;
        Ok(())
    }

    fn holidays_list(&self) -> anyhow::Result<Vec<Holiday>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, holiday_date, description, is_school_holiday
             FROM holidays
             ORDER BY holiday_date, name",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, i64>(4)? != 0,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(rows.len());
        for (id, name, raw_date, description, is_school_holiday) in rows {
            let date = match parse_iso_date(&raw_date) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(holiday = %id, error = %e, "skipping holiday with bad date");
                    continue;
                }
            };
            out.push(Holiday {
                id,
                name,
                date,
                description,
                is_school_holiday,
            });
        }
        Ok(out)
    }

    fn holiday_insert(&mut self, holiday: &Holiday) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO holidays(id, name, holiday_date, description, is_school_holiday)
             VALUES(?, ?, ?, ?, ?)",
            params![
                holiday.id,
                holiday.name,
                format_iso_date(holiday.date),
                holiday.description,
                if holiday.is_school_holiday { 1 } else { 0 }
            ],
        )?;
        Ok(())
    }

    fn holiday_update(&mut self, holiday: &Holiday) -> anyhow::Result<bool> {
        let changed = self.conn.execute(
            "UPDATE holidays
             SET name = ?, holiday_date = ?, description = ?, is_school_holiday = ?
             WHERE id = ?",
            params![
                holiday.name,
                format_iso_date(holiday.date),
                holiday.description,
                if holiday.is_school_holiday { 1 } else { 0 },
                holiday.id
            ],
        )?;
        Ok(changed > 0)
    }

    fn holiday_delete(&mut self, id: &str) -> anyhow::Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM holidays WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    fn slots_list(&self) -> anyhow::Result<Vec<ScheduleSlot>> {
        let mut stmt = self.conn.prepare(
            "SELECT day_index, time_slot, subject, class_name
             FROM schedule_slots
             ORDER BY day_index, time_slot",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(rows.len());
        for (raw_index, time_slot, subject, class_name) in rows {
            let Ok(day_index) = DayIndex::new(raw_index) else {
                tracing::warn!(day_index = raw_index, "skipping slot with bad day index");
                continue;
            };
            out.push(ScheduleSlot {
                day_index,
                time_slot,
                subject,
                class_name,
            });
        }
        Ok(out)
    }

    fn slot_upsert(&mut self, slot: &ScheduleSlot) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO schedule_slots(day_index, time_slot, subject, class_name)
             VALUES(?, ?, ?, ?)
             ON CONFLICT(day_index, time_slot) DO UPDATE SET
               subject = excluded.subject,
               class_name = excluded.class_name",
            params![
                slot.day_index.get() as i64,
                slot.time_slot,
                slot.subject,
                slot.class_name
            ],
        )?;
        Ok(())
    }

    fn slot_delete(&mut self, day_index: DayIndex, time_slot: &str) -> anyhow::Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM schedule_slots WHERE day_index = ? AND time_slot = ?",
            params![day_index.get() as i64, time_slot],
        )?;
        Ok(changed > 0)
    }
}
