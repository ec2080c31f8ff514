//! View/session controller: holds the current named user and the current
//! screen, and orchestrates reads/writes against the record store and calls
//! into the generation gateway.
//!
//! The controller keeps a cached copy of the canonical list and refreshes it
//! with a full reload after every mutation. O(n) per mutation is a deliberate
//! simplicity choice at this scale.

use std::path::Path;

use db::models::project::{Project, ProjectFormData};
use db::store::{ProjectStore, StorageError, UserStore};
use generation::GenerationClient;
use services::services::catalog;
use thiserror::Error;
use uuid::Uuid;

/// Tag assigned when the prompt is empty or the gateway yields nothing.
pub const DEFAULT_TAG: &str = "VibeCoding";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no active session, log in first")]
    NotLoggedIn,
    #[error("a user name must not be empty")]
    EmptyUserName,
}

/// The two screens. `Create` is entered by explicit navigation; submit and
/// cancel both return to `Catalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Catalog,
    Create,
}

pub struct App {
    store: ProjectStore,
    users: UserStore,
    gateway: GenerationClient,
    projects: Vec<Project>,
    view: ViewState,
    user: Option<String>,
    loading: bool,
}

impl App {
    pub fn new(data_dir: &Path, gateway: GenerationClient) -> Self {
        Self {
            store: ProjectStore::new(data_dir),
            users: UserStore::new(data_dir),
            gateway,
            projects: Vec::new(),
            view: ViewState::default(),
            user: None,
            loading: true,
        }
    }

    /// Initial read: populates the cached list and auto-establishes the
    /// session from a previously stored name, without re-prompting.
    pub fn load(&mut self) -> Result<(), AppError> {
        self.projects = self.store.list()?;
        self.user = self.users.load()?;
        self.loading = false;
        tracing::debug!("loaded {} projects from the store", self.projects.len());
        Ok(())
    }

    /// Accepts any non-empty name with no verification and persists it as
    /// the active user. This is a label, not authentication.
    pub fn login(&mut self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyUserName);
        }
        self.users.save(name)?;
        self.user = Some(name.to_string());
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        self.users.clear()?;
        self.user = None;
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<(), AppError> {
        if self.user.is_none() {
            return Err(AppError::NotLoggedIn);
        }
        self.view = ViewState::Create;
        Ok(())
    }

    pub fn cancel_create(&mut self) {
        self.view = ViewState::Catalog;
    }

    /// Optional, user-triggered enrichment before submit. Degrades to an
    /// empty string; the form keeps whatever the user typed in that case.
    pub async fn suggest_description(&self, prompt_text: &str) -> String {
        if prompt_text.is_empty() {
            return String::new();
        }
        self.gateway.generate_description(prompt_text).await
    }

    /// Submit of the create form: resolves the final tag set through the
    /// gateway, assigns a fresh id and timestamp, persists, reloads the full
    /// list and returns to the catalog.
    pub async fn submit_project(&mut self, form: ProjectFormData) -> Result<Project, AppError> {
        if self.user.is_none() {
            return Err(AppError::NotLoggedIn);
        }

        let mut tags = vec![DEFAULT_TAG.to_string()];
        if !form.prompt.is_empty() {
            let generated = self.gateway.generate_tags(&form.prompt).await;
            if !generated.is_empty() {
                tags = generated;
            }
        }

        let project = Project::from_form(form, tags);
        self.store.create(project.clone())?;
        self.projects = self.store.list()?;
        self.view = ViewState::Catalog;
        Ok(project)
    }

    /// Deletes and reloads. Confirmation is the caller's job: the CLI asks
    /// before invoking this, mirroring the blocking confirm in the source UI.
    pub fn delete_project(&mut self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(id)?;
        self.projects = self.store.list()?;
        Ok(())
    }

    pub fn filtered_projects(&self, query: &str, active_tag: Option<&str>) -> Vec<Project> {
        catalog::filter_projects(&self.projects, query, active_tag)
    }

    pub fn tag_choices(&self) -> Vec<String> {
        catalog::available_tags(&self.projects)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
