//! Local store persisted to a JSON file.
//!
//! Used when no hosted backend is configured. The three tables live in one
//! document (by default `.fitkit/data.json`) that is rewritten after every
//! successful write. Routines from `.fitkit/routines/` seed the routine
//! table; a routine already present in the data file keeps its stored
//! exercises and status.

use crate::session::same_owner;
use crate::store::base::{collections, Store, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use fk_protocol::{CompletionRecord, DayOfWeek, MealPlan, Routine, RoutineEdit, RoutineStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    routines: Vec<Routine>,
    #[serde(default)]
    history: Vec<CompletionRecord>,
    #[serde(default)]
    meal_plans: Vec<MealPlan>,
}

pub struct FileStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl FileStore {
    /// Open the data file at `path`, creating nothing until the first write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the file exists but cannot be
    /// read or parsed.
    pub async fn open(
        path: impl Into<PathBuf>,
        seed: impl IntoIterator<Item = Routine>,
    ) -> StoreResult<Self> {
        let path = path.into();
        let mut tables = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Tables>(&bytes)
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        for routine in seed {
            if tables.routines.iter().all(|r| r.id != routine.id) {
                tables.routines.push(routine);
            }
        }

        debug!(
            path = %path.display(),
            routines = tables.routines.len(),
            history = tables.history.len(),
            meal_plans = tables.meal_plans.len(),
            "local store opened"
        );
        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the tables, persist the copy, and only
    /// then make it current. A failed write leaves the store unchanged.
    async fn commit<T>(
        &self,
        collection: &'static str,
        change: impl FnOnce(&mut Tables) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let out = change(&mut next)?;

        let bytes = serde_json::to_vec_pretty(&next).map_err(|e| StoreError::RequestFailed {
            collection,
            reason: e.to_string(),
        })?;
        write_atomic(&self.path, &bytes)
            .await
            .map_err(|e| StoreError::RequestFailed {
                collection,
                reason: format!("{}: {}", self.path.display(), e),
            })?;

        *tables = next;
        Ok(out)
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("data.json");
    let tmp = path.with_file_name(format!(".{}.tmp.{}", file_name, std::process::id()));

    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await
}

fn routine_not_found(id: Uuid) -> StoreError {
    StoreError::NotFound {
        collection: collections::ROUTINES,
        id: id.to_string(),
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get_routine(&self, id: Uuid) -> StoreResult<Routine> {
        let tables = self.tables.lock().await;
        tables
            .routines
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| routine_not_found(id))
    }

    async fn list_routines(&self, owner: &str) -> StoreResult<Vec<Routine>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .routines
            .iter()
            .filter(|r| same_owner(&r.user_email, owner))
            .cloned()
            .collect())
    }

    async fn update_routine_exercises(&self, id: Uuid, edit: &RoutineEdit) -> StoreResult<()> {
        self.commit(collections::ROUTINES, |tables| {
            let routine = tables
                .routines
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| routine_not_found(id))?;
            routine.day_of_week = edit.day_of_week;
            routine.exercises = edit.exercises.clone();
            routine.updated_at = Some(Utc::now());
            Ok(())
        })
        .await
    }

    async fn update_routine_status(&self, id: Uuid, status: RoutineStatus) -> StoreResult<()> {
        self.commit(collections::ROUTINES, |tables| {
            let routine = tables
                .routines
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| routine_not_found(id))?;
            routine.status = status;
            routine.updated_at = Some(Utc::now());
            Ok(())
        })
        .await
    }

    async fn insert_completion(&self, record: &CompletionRecord) -> StoreResult<()> {
        self.commit(collections::HISTORY, |tables| {
            tables.history.push(record.clone());
            Ok(())
        })
        .await
    }

    async fn find_meal_plan(&self, owner: &str, day: DayOfWeek) -> StoreResult<Option<MealPlan>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .meal_plans
            .iter()
            .find(|p| same_owner(&p.user_email, owner) && p.day == day)
            .cloned())
    }

    async fn insert_meal_plan(&self, plan: &MealPlan) -> StoreResult<()> {
        self.commit(collections::MEAL_PLANS, |tables| {
            tables.meal_plans.push(plan.clone());
            Ok(())
        })
        .await
    }

    async fn update_meal_plan(&self, plan: &MealPlan) -> StoreResult<()> {
        self.commit(collections::MEAL_PLANS, |tables| {
            let existing = tables
                .meal_plans
                .iter_mut()
                .find(|p| p.id == plan.id)
                .ok_or_else(|| StoreError::NotFound {
                    collection: collections::MEAL_PLANS,
                    id: plan.id.to_string(),
                })?;
            existing.meals = plan.meals.clone();
            existing.status = plan.status;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fk_protocol::{ExerciseDefinition, MealStatus, Meals};
    use tempfile::tempdir;

    fn routine() -> Routine {
        Routine {
            id: Uuid::new_v4(),
            user_email: "ana@example.com".to_string(),
            day_of_week: DayOfWeek::Monday,
            exercises: vec![ExerciseDefinition {
                name: "Squat".to_string(),
                category: "lower".to_string(),
                sets: 3,
                reps: 5,
                weight: Some(60.0),
                rest: "90".to_string(),
            }],
            created_at: None,
            updated_at: None,
            status: RoutineStatus::Pending,
        }
    }

    fn plan(day: DayOfWeek) -> MealPlan {
        MealPlan {
            id: Uuid::new_v4(),
            user_email: "ana@example.com".to_string(),
            day,
            meals: Meals::default(),
            status: MealStatus::default(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_and_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".fitkit/data.json");

        let store = FileStore::open(&path, Vec::new()).await.unwrap();

        assert!(store.list_routines("ana@example.com").await.unwrap().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".fitkit/data.json");
        let seeded = routine();
        let id = seeded.id;

        let store = FileStore::open(&path, vec![seeded.clone()]).await.unwrap();
        store
            .update_routine_status(id, RoutineStatus::Completed)
            .await
            .unwrap();
        store.insert_meal_plan(&plan(DayOfWeek::Friday)).await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path, vec![seeded]).await.unwrap();
        let routine = reopened.get_routine(id).await.unwrap();
        assert_eq!(routine.status, RoutineStatus::Completed, "stored row wins over seed");
        assert!(reopened
            .find_meal_plan("Ana@Example.com", DayOfWeek::Friday)
            .await
            .unwrap()
            .is_some());
        assert_eq!(reopened.list_routines("ana@example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_appends_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = FileStore::open(&path, Vec::new()).await.unwrap();

        let record = CompletionRecord {
            id: Uuid::new_v4(),
            user_email: "ana@example.com".to_string(),
            day_of_week: DayOfWeek::Monday,
            completed: true,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        store.insert_completion(&record).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(&record.id.to_string()));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let seeded = routine();
        let id = seeded.id;
        let store = FileStore::open(blocker.join("data.json"), vec![seeded])
            .await
            .unwrap();
        // The data file's parent is now a regular file, so no write can succeed.
        std::fs::write(&blocker, "").unwrap();

        let result = store
            .update_routine_status(id, RoutineStatus::Completed)
            .await;

        assert!(matches!(
            result,
            Err(StoreError::RequestFailed { collection, .. }) if collection == collections::ROUTINES
        ));
        assert_eq!(
            store.get_routine(id).await.unwrap().status,
            RoutineStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = FileStore::open(&path, Vec::new()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_update_routine_exercises_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let seeded = routine();
        let id = seeded.id;
        let store = FileStore::open(&path, vec![seeded]).await.unwrap();

        let edit = RoutineEdit {
            day_of_week: DayOfWeek::Saturday,
            exercises: vec![ExerciseDefinition {
                name: "Row".to_string(),
                category: String::new(),
                sets: 4,
                reps: 10,
                weight: None,
                rest: "60".to_string(),
            }],
        };
        store.update_routine_exercises(id, &edit).await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path, Vec::new()).await.unwrap();
        let routine = reopened.get_routine(id).await.unwrap();
        assert_eq!(routine.day_of_week, DayOfWeek::Saturday);
        assert_eq!(routine.exercises, edit.exercises);
    }
}
