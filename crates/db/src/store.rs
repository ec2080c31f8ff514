//! Slot-based persistence: each namespaced key maps to one file inside the
//! data directory. The project list lives in a single JSON blob; the user
//! name is a raw string under its own key. There is no cross-process
//! locking — last writer wins, acceptable under the single-session scope.

use std::path::{Path, PathBuf};

use chrono::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::project::{Project, now_millis};

pub const PROJECTS_SLOT_KEY: &str = "vibeshare_projects_v1";
pub const USER_SLOT_KEY: &str = "vibeshare_user";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Default machine-local data directory for the slot files.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vibeshare")
}

/// Store for the canonical project list.
///
/// Most-recently-created-first ordering is maintained by `create`, not
/// enforced by `list`.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    slot_path: PathBuf,
}

impl ProjectStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            slot_path: data_dir.join(format!("{PROJECTS_SLOT_KEY}.json")),
        }
    }

    /// Returns all records. On the first-ever call the slot is seeded with
    /// the fixture set. A present-but-unparseable slot fails closed to an
    /// empty list; the parse error is logged, never surfaced.
    pub fn list(&self) -> Result<Vec<Project>, StorageError> {
        match std::fs::read_to_string(&self.slot_path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(projects) => Ok(projects),
                Err(err) => {
                    tracing::warn!("unparseable project slot, treating as empty: {err}");
                    Ok(Vec::new())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no project slot found, seeding fixture data");
                let fixtures = fixture_projects();
                self.write_all(&fixtures)?;
                Ok(fixtures)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Prepends the record (new record becomes index 0) and writes the full
    /// list back.
    pub fn create(&self, project: Project) -> Result<(), StorageError> {
        let mut projects = self.list()?;
        projects.insert(0, project);
        self.write_all(&projects)
    }

    /// Removes all records matching `id` and writes the full list back.
    /// Silent no-op when the id is not present.
    pub fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        let mut projects = self.list()?;
        projects.retain(|p| p.id != id);
        self.write_all(&projects)
    }

    fn write_all(&self, projects: &[Project]) -> Result<(), StorageError> {
        if let Some(parent) = self.slot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(projects)?;
        std::fs::write(&self.slot_path, raw)?;
        Ok(())
    }
}

/// Store for the active user name. This is a label, not an auth system:
/// whatever name was last saved is the session.
#[derive(Debug, Clone)]
pub struct UserStore {
    slot_path: PathBuf,
}

impl UserStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            slot_path: data_dir.join(USER_SLOT_KEY),
        }
    }

    pub fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.slot_path) {
            Ok(name) if !name.is_empty() => Ok(Some(name)),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, name: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.slot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.slot_path, name)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.slot_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Demo records seeded into an empty slot on first use.
pub fn fixture_projects() -> Vec<Project> {
    let now = now_millis();
    vec![
        Project {
            id: Uuid::from_u128(1),
            title: "Inventory Dashboard".to_string(),
            description: "A real-time inventory tracking system with charts and CSV export capabilities.".to_string(),
            prompt: "Create a dark mode inventory dashboard using React and Recharts. It should list products, allow adding stock, and visualize trends.".to_string(),
            builder_url: "https://vibe.dev/builder/123".to_string(),
            repo_url: "https://github.com/org/inventory-dash".to_string(),
            deploy_url: "https://inventory-dash.vercel.app".to_string(),
            author: "Sarah Kim".to_string(),
            created_at: now - Duration::milliseconds(10_000_000),
            tags: vec!["Dashboard".to_string(), "React".to_string(), "Data Viz".to_string()],
        },
        Project {
            id: Uuid::from_u128(2),
            title: "AI Meeting Summarizer".to_string(),
            description: "Upload audio files to get instant summaries and action items using Gemini API.".to_string(),
            prompt: "Build a tool that takes mp3 uploads, sends them to Gemini 1.5 Flash, and outputs a markdown summary.".to_string(),
            builder_url: "https://vibe.dev/builder/456".to_string(),
            repo_url: "https://github.com/org/ai-summarizer".to_string(),
            deploy_url: "https://ai-meet.netlify.app".to_string(),
            author: "David Park".to_string(),
            created_at: now - Duration::milliseconds(5_000_000),
            tags: vec!["AI".to_string(), "Gemini".to_string(), "Productivity".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ProjectFormData;
    use tempfile::TempDir;

    fn sample(title: &str) -> Project {
        Project::from_form(
            ProjectFormData {
                title: title.to_string(),
                author: "Tester".to_string(),
                ..Default::default()
            },
            vec!["Test".to_string()],
        )
    }

    #[test]
    fn first_run_seeds_fixtures_into_the_slot() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());

        let projects = store.list().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Inventory Dashboard");

        let raw = std::fs::read_to_string(
            dir.path().join(format!("{PROJECTS_SLOT_KEY}.json")),
        )
        .unwrap();
        let persisted: Vec<Project> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, projects);
    }

    #[test]
    fn create_prepends_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        let before = store.list().unwrap();

        let project = sample("Newest");
        store.create(project.clone()).unwrap();

        let after = store.list().unwrap();
        assert_eq!(after[0], project);
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn delete_removes_exactly_the_target() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        let project = sample("Doomed");
        store.create(project.clone()).unwrap();
        let before = store.list().unwrap();

        store.delete(project.id).unwrap();

        let after = store.list().unwrap();
        assert!(!after.iter().any(|p| p.id == project.id));
        let expected: Vec<_> = before.into_iter().filter(|p| p.id != project.id).collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        let before = store.list().unwrap();

        store.delete(Uuid::new_v4()).unwrap();

        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn unparseable_slot_fails_closed_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path());
        std::fs::write(
            dir.path().join(format!("{PROJECTS_SLOT_KEY}.json")),
            "not json at all {",
        )
        .unwrap();

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn user_slot_round_trips() {
        let dir = TempDir::new().unwrap();
        let users = UserStore::new(dir.path());

        assert_eq!(users.load().unwrap(), None);
        users.save("Sarah Kim").unwrap();
        assert_eq!(users.load().unwrap(), Some("Sarah Kim".to_string()));
        users.clear().unwrap();
        assert_eq!(users.load().unwrap(), None);
    }
}
