use chrono::{DateTime, NaiveDate, Utc};
use medikeep_model::{
    IntakeRecord, IntakeRecordCreate, Medication, MedicationCreate, MedicationTiming, User,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteRow},
    Row, SqlitePool,
};
use std::path::Path;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS medications (
        medication_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (user_id),
        name TEXT NOT NULL,
        dosage TEXT NOT NULL,
        is_as_needed INTEGER NOT NULL DEFAULT 0,
        memo TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS medication_timings (
        timing_id INTEGER PRIMARY KEY AUTOINCREMENT,
        medication_id INTEGER NOT NULL REFERENCES medications (medication_id),
        take_time TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS intake_records (
        record_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (user_id),
        medication_id INTEGER NOT NULL REFERENCES medications (medication_id),
        timing_id INTEGER REFERENCES medication_timings (timing_id),
        taken_at TEXT NOT NULL
    )"#,
];

/// SQLite-backed storage for users, medications and intake records.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// A private database for tests. A single connection, as every in-memory
    /// connection is its own database.
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self, sqlx::Error> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(User {
            user_id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
        })
    }

    /// Look up a user by email, returning the stored password hash alongside.
    pub async fn user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT user_id, username, email, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| (user_from(&row), row.get("password_hash"))))
    }

    pub async fn username_taken(&self, username: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT user_id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn medications(&self, user_id: i64) -> Result<Vec<Medication>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT medication_id, user_id, name, dosage, is_as_needed, memo
             FROM medications WHERE user_id = ? ORDER BY medication_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut medications = Vec::with_capacity(rows.len());
        for row in rows {
            let mut medication = medication_from(&row);
            medication.timings = self.timings(medication.medication_id).await?;
            medications.push(medication);
        }
        Ok(medications)
    }

    pub async fn medication(
        &self,
        user_id: i64,
        medication_id: i64,
    ) -> Result<Option<Medication>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT medication_id, user_id, name, dosage, is_as_needed, memo
             FROM medications WHERE medication_id = ? AND user_id = ?",
        )
        .bind(medication_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut medication = medication_from(&row);
                medication.timings = self.timings(medication.medication_id).await?;
                Ok(Some(medication))
            }
            None => Ok(None),
        }
    }

    async fn timings(&self, medication_id: i64) -> Result<Vec<MedicationTiming>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT timing_id, medication_id, take_time
             FROM medication_timings WHERE medication_id = ? ORDER BY take_time",
        )
        .bind(medication_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(timing_from).collect())
    }

    pub async fn create_medication(
        &self,
        user_id: i64,
        medication: &MedicationCreate,
    ) -> Result<Medication, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO medications (user_id, name, dosage, is_as_needed, memo)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(medication.is_as_needed)
        .bind(&medication.memo)
        .execute(&mut *tx)
        .await?;

        let medication_id = result.last_insert_rowid();
        for take_time in &medication.timings {
            sqlx::query("INSERT INTO medication_timings (medication_id, take_time) VALUES (?, ?)")
                .bind(medication_id)
                .bind(take_time)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        let mut created = Medication {
            medication_id,
            user_id,
            name: medication.name.clone(),
            dosage: medication.dosage.clone(),
            is_as_needed: medication.is_as_needed,
            memo: medication.memo.clone(),
            timings: Vec::new(),
        };
        created.timings = self.timings(medication_id).await?;
        Ok(created)
    }

    /// Delete a medication owned by the user, together with its timings and
    /// intake records. Returns `false` when there is nothing to delete.
    pub async fn delete_medication(
        &self,
        user_id: i64,
        medication_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let owned =
            sqlx::query("SELECT medication_id FROM medications WHERE medication_id = ? AND user_id = ?")
                .bind(medication_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Ok(false);
        }

        // referencing rows first, the foreign keys are enforced
        sqlx::query("DELETE FROM intake_records WHERE medication_id = ?")
            .bind(medication_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM medication_timings WHERE medication_id = ?")
            .bind(medication_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM medications WHERE medication_id = ?")
            .bind(medication_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn create_intake(
        &self,
        user_id: i64,
        record: &IntakeRecordCreate,
    ) -> Result<IntakeRecord, sqlx::Error> {
        let taken_at = record.taken_at.unwrap_or_else(Utc::now);

        let result = sqlx::query(
            "INSERT INTO intake_records (user_id, medication_id, timing_id, taken_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(record.medication_id)
        .bind(record.timing_id)
        .bind(taken_at)
        .execute(&self.pool)
        .await?;

        Ok(IntakeRecord {
            record_id: result.last_insert_rowid(),
            user_id,
            medication_id: record.medication_id,
            timing_id: record.timing_id,
            taken_at,
        })
    }

    /// Intake records for a user, optionally restricted to a single day.
    pub async fn intakes(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<IntakeRecord>, sqlx::Error> {
        let rows = match date {
            Some(date) => {
                let start = day_start(date);
                let end = day_start(date + chrono::Duration::days(1));
                sqlx::query(
                    "SELECT record_id, user_id, medication_id, timing_id, taken_at
                     FROM intake_records
                     WHERE user_id = ? AND taken_at >= ? AND taken_at < ?
                     ORDER BY taken_at",
                )
                .bind(user_id)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT record_id, user_id, medication_id, timing_id, taken_at
                     FROM intake_records WHERE user_id = ? ORDER BY taken_at",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(intake_from).collect())
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    // midnight always exists
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

fn user_from(row: &SqliteRow) -> User {
    User {
        user_id: row.get("user_id"),
        username: row.get("username"),
        email: row.get("email"),
    }
}

fn medication_from(row: &SqliteRow) -> Medication {
    Medication {
        medication_id: row.get("medication_id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        dosage: row.get("dosage"),
        is_as_needed: row.get("is_as_needed"),
        memo: row.get("memo"),
        timings: Vec::new(),
    }
}

fn timing_from(row: &SqliteRow) -> MedicationTiming {
    MedicationTiming {
        timing_id: row.get("timing_id"),
        medication_id: row.get("medication_id"),
        take_time: row.get("take_time"),
    }
}

fn intake_from(row: &SqliteRow) -> IntakeRecord {
    IntakeRecord {
        record_id: row.get("record_id"),
        user_id: row.get("user_id"),
        medication_id: row.get("medication_id"),
        timing_id: row.get("timing_id"),
        taken_at: row.get("taken_at"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, NaiveTime};

    async fn store_with_user() -> (Store, User) {
        let store = Store::open_in_memory().await.unwrap();
        let user = store
            .create_user("alice", "alice@example.com", "salt$digest")
            .await
            .unwrap();
        (store, user)
    }

    fn aspirin() -> MedicationCreate {
        MedicationCreate {
            name: "Aspirin".into(),
            dosage: "100mg".into(),
            is_as_needed: false,
            memo: Some("after breakfast".into()),
            timings: vec![
                NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            ],
        }
    }

    #[actix_rt::test]
    async fn user_round_trip() {
        let (store, user) = store_with_user().await;

        let (found, hash) = store
            .user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, user);
        assert_eq!(hash, "salt$digest");

        assert!(store.user_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn duplicate_email_is_rejected() {
        let (store, _) = store_with_user().await;
        let result = store
            .create_user("alice2", "alice@example.com", "salt$digest")
            .await;
        assert!(result.is_err());
    }

    #[actix_rt::test]
    async fn medication_carries_sorted_timings() {
        let (store, user) = store_with_user().await;

        let created = store.create_medication(user.user_id, &aspirin()).await.unwrap();
        assert_eq!(created.timings.len(), 2);
        assert_eq!(
            created.timings[0].take_time,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );

        let listed = store.medications(user.user_id).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[actix_rt::test]
    async fn delete_is_scoped_to_the_owner() {
        let (store, user) = store_with_user().await;
        let other = store
            .create_user("bob", "bob@example.com", "salt$digest")
            .await
            .unwrap();

        let medication = store.create_medication(user.user_id, &aspirin()).await.unwrap();

        assert!(!store
            .delete_medication(other.user_id, medication.medication_id)
            .await
            .unwrap());
        assert!(store
            .delete_medication(user.user_id, medication.medication_id)
            .await
            .unwrap());
        assert!(store.medications(user.user_id).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn delete_cascades_over_timings_and_intakes() {
        let (store, user) = store_with_user().await;
        let medication = store.create_medication(user.user_id, &aspirin()).await.unwrap();

        store
            .create_intake(
                user.user_id,
                &IntakeRecordCreate {
                    medication_id: medication.medication_id,
                    timing_id: Some(medication.timings[0].timing_id),
                    taken_at: None,
                },
            )
            .await
            .unwrap();

        assert!(store
            .delete_medication(user.user_id, medication.medication_id)
            .await
            .unwrap());
        assert!(store.medications(user.user_id).await.unwrap().is_empty());
        assert!(store.intakes(user.user_id, None).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn taken_usernames_are_reported() {
        let (store, _) = store_with_user().await;
        assert!(store.username_taken("alice").await.unwrap());
        assert!(!store.username_taken("bob").await.unwrap());
    }

    #[actix_rt::test]
    async fn intakes_filter_by_day() {
        let (store, user) = store_with_user().await;
        let medication = store.create_medication(user.user_id, &aspirin()).await.unwrap();

        let now = Utc::now();
        store
            .create_intake(
                user.user_id,
                &IntakeRecordCreate {
                    medication_id: medication.medication_id,
                    timing_id: None,
                    taken_at: Some(now),
                },
            )
            .await
            .unwrap();
        store
            .create_intake(
                user.user_id,
                &IntakeRecordCreate {
                    medication_id: medication.medication_id,
                    timing_id: None,
                    taken_at: Some(now - Duration::days(2)),
                },
            )
            .await
            .unwrap();

        let today = store
            .intakes(user.user_id, Some(now.date_naive()))
            .await
            .unwrap();
        assert_eq!(today.len(), 1);

        let all = store.intakes(user.user_id, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[actix_rt::test]
    async fn missing_taken_at_defaults_to_now() {
        let (store, user) = store_with_user().await;
        let medication = store.create_medication(user.user_id, &aspirin()).await.unwrap();

        let before = Utc::now();
        let record = store
            .create_intake(
                user.user_id,
                &IntakeRecordCreate {
                    medication_id: medication.medication_id,
                    timing_id: None,
                    taken_at: None,
                },
            )
            .await
            .unwrap();
        assert!(record.taken_at >= before);
    }
}
