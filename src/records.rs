use crate::shift_notes::{
    present, CareRecipientProfile, ShiftContext, ShiftNote,
};
use crate::AppState;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{instrument, warn};

/// Caregiver name used when a shift only has a single free-text entry.
pub const SHIFT_CAREGIVER: &str = "Shift Caregiver";

#[derive(Debug, Clone)]
pub struct ShiftRecord {
    pub uuid: String,
    pub care_recipient_id: Option<String>,
    pub shift_no: Option<i64>,
    pub date: Option<String>,
    pub day: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub content: Option<String>,
}

impl ShiftRecord {
    fn try_from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(ShiftRecord {
            uuid: row.get("uuid")?,
            care_recipient_id: row.get("care_recipient_id")?,
            shift_no: row.get("shift_no")?,
            date: row.get("date")?,
            day: row.get("day")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            content: row.get("content")?,
        })
    }

    pub fn context(&self) -> ShiftContext {
        ShiftContext {
            shift_number: self.shift_no.map(|n| n.to_string()),
            date: self.date.clone(),
            day: self.day.map(|n| n.to_string()),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }

    /// Notes to analyze for this shift.
    ///
    /// Stored notes win. Otherwise the shift's own `content` becomes a single
    /// note stamped with the shift date.
    pub fn notes(&self, stored: Vec<ShiftNote>) -> Vec<ShiftNote> {
        if !stored.is_empty() {
            return stored;
        }
        match present(&self.content) {
            Some(content) => vec![ShiftNote::new(
                content,
                SHIFT_CAREGIVER,
                self.date.clone().unwrap_or_default(),
            )],
            None => vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CareRecipientRecord {
    pub id: String,
    pub name: Option<String>,
    pub profile: Option<CareRecipientProfile>,
}

#[instrument(skip(state))]
pub fn get_shift(state: &AppState, uuid: &str) -> Result<Option<ShiftRecord>> {
    let conn = state.db.get()?;
    let shift = conn
        .query_row(
            "SELECT uuid, care_recipient_id, shift_no, date, day, start_time, end_time, content
             FROM shifts WHERE uuid = ?1",
            params![uuid],
            |row| ShiftRecord::try_from_row(row),
        )
        .optional()?;
    Ok(shift)
}

/// Stored notes for a shift, oldest first.
#[instrument(skip(state))]
pub fn get_shift_notes(
    state: &AppState,
    shift_uuid: &str,
) -> Result<Vec<ShiftNote>> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(
        "SELECT caregiver_name, content, created_at
         FROM shift_notes
         WHERE shift_uuid = ?1
         ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![shift_uuid], |row| {
        Ok(ShiftNote {
            caregiver_name: row.get(0)?,
            content: row.get(1)?,
            timestamp: row.get(2)?,
        })
    })?;
    let notes = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(notes)
}

#[instrument(skip(state))]
pub fn get_care_recipient(
    state: &AppState,
    id: &str,
) -> Result<Option<CareRecipientRecord>> {
    let conn = state.db.get()?;
    let row = conn
        .query_row(
            "SELECT id, name, profile FROM care_recipients WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()?;

    Ok(row.map(|(id, name, profile_json)| {
        let profile = profile_json.and_then(|json| {
            serde_json::from_str::<CareRecipientProfile>(&json)
                .map_err(|e| {
                    warn!("Ignoring malformed profile for {}: {}", id, e)
                })
                .ok()
        });
        CareRecipientRecord { id, name, profile }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn insert_shift(state: &AppState, uuid: &str, content: Option<&str>) {
        let conn = state.db.get().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO care_recipients (id, name) VALUES ('CR001', 'John Doe')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO shifts (uuid, care_recipient_id, shift_no, date, day, content)
             VALUES (?1, 'CR001', 2, '2025-03-01', 4, ?2)",
            params![uuid, content],
        )
        .unwrap();
    }

    #[test]
    fn test_get_shift_and_context() -> Result<()> {
        let state = AppState::new_for_testing();
        insert_shift(&state, "shift-1", Some("Ate well"));

        let shift = get_shift(&state, "shift-1")?.unwrap();
        assert_eq!(shift.care_recipient_id.as_deref(), Some("CR001"));
        assert_eq!(
            shift.context(),
            ShiftContext {
                shift_number: Some("2".to_string()),
                date: Some("2025-03-01".to_string()),
                day: Some("4".to_string()),
                start_time: None,
                end_time: None,
            }
        );
        Ok(())
    }

    #[test]
    fn test_get_missing_shift() -> Result<()> {
        let state = AppState::new_for_testing();
        assert!(get_shift(&state, "nope")?.is_none());
        Ok(())
    }

    #[test]
    fn test_content_becomes_single_note() -> Result<()> {
        let state = AppState::new_for_testing();
        insert_shift(&state, "shift-1", Some("Ate well"));

        let shift = get_shift(&state, "shift-1")?.unwrap();
        let notes = shift.notes(get_shift_notes(&state, "shift-1")?);
        assert_eq!(
            notes,
            vec![ShiftNote::new("Ate well", SHIFT_CAREGIVER, "2025-03-01")]
        );
        Ok(())
    }

    #[test]
    fn test_blank_content_yields_no_notes() -> Result<()> {
        let state = AppState::new_for_testing();
        insert_shift(&state, "shift-1", Some("   "));
        insert_shift(&state, "shift-2", None);

        for uuid in ["shift-1", "shift-2"] {
            let shift = get_shift(&state, uuid)?.unwrap();
            assert!(shift.notes(vec![]).is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_stored_notes_are_oldest_first() -> Result<()> {
        let state = AppState::new_for_testing();
        insert_shift(&state, "shift-1", Some("Fallback"));
        insert_shift(&state, "other", None);
        {
            let conn = state.db.get()?;
            conn.execute(
                "INSERT INTO shift_notes (shift_uuid, caregiver_name, content, created_at) VALUES
                 ('shift-1', 'Bob', 'Evening meds given', '2025-03-01 19:00'),
                 ('shift-1', 'Alice', 'Breakfast eaten', '2025-03-01 08:00'),
                 ('other', 'Carol', 'Not this shift', '2025-03-01 09:00')",
                [],
            )?;
        }

        let shift = get_shift(&state, "shift-1")?.unwrap();
        let notes = shift.notes(get_shift_notes(&state, "shift-1")?);
        assert_eq!(
            notes,
            vec![
                ShiftNote::new("Breakfast eaten", "Alice", "2025-03-01 08:00"),
                ShiftNote::new("Evening meds given", "Bob", "2025-03-01 19:00"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_get_care_recipient_with_profile() -> Result<()> {
        let state = AppState::new_for_testing();
        {
            let conn = state.db.get()?;
            conn.execute(
                "INSERT INTO care_recipients (id, name, profile) VALUES
                 ('CR001', 'John Doe', '{\"fall_risk\": \"High\", \"age\": \"82\"}'),
                 ('CR002', 'Mary Smith', NULL),
                 ('CR003', 'Emma Brown', 'not json')",
                [],
            )?;
        }

        let john = get_care_recipient(&state, "CR001")?.unwrap();
        assert_eq!(john.name.as_deref(), Some("John Doe"));
        let profile = john.profile.unwrap();
        assert_eq!(profile.fall_risk.as_deref(), Some("High"));
        assert_eq!(profile.age.as_deref(), Some("82"));

        let mary = get_care_recipient(&state, "CR002")?.unwrap();
        assert!(mary.profile.is_none());

        let emma = get_care_recipient(&state, "CR003")?.unwrap();
        assert_eq!(emma.name.as_deref(), Some("Emma Brown"));
        assert!(emma.profile.is_none());

        assert!(get_care_recipient(&state, "CR404")?.is_none());
        Ok(())
    }

    #[test]
    fn test_numeric_profile_values_keep_whole_profile() -> Result<()> {
        let state = AppState::new_for_testing();
        {
            let conn = state.db.get()?;
            conn.execute(
                "INSERT INTO care_recipients (id, name, profile) VALUES
                 ('CR001', 'John Doe', '{\"fall_risk\": \"High\", \"age\": 84, \"allergies\": \"Penicillin\"}')",
                [],
            )?;
        }

        let john = get_care_recipient(&state, "CR001")?.unwrap();
        let profile = john.profile.expect("profile kept");
        assert_eq!(profile.age.as_deref(), Some("84"));
        assert_eq!(profile.fall_risk.as_deref(), Some("High"));
        assert_eq!(profile.allergies.as_deref(), Some("Penicillin"));
        Ok(())
    }
}
