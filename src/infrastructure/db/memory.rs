//! In-process store behind the same repository traits as Postgres.
//!
//! Every table is a `Vec` in insertion order, guarded by its own lock. Each
//! mutation checks its invariants and applies under a single write guard, so
//! a failed write leaves the table untouched.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::{
        contact::{Contact, ContactFilter, ContactInsert, ContactSort, ContactStatus},
        project::{Project, ProjectFilter, ProjectInsert, ProjectSort},
        skill::{Skill, SkillFilter, SkillInsert, SkillSort},
        user::{check_identity, User, UserInsert},
    },
    errors::AppError,
    listing::{count_matching, select, Sort, Window},
    repositories::{
        contact::ContactRepository,
        project::ProjectRepository,
        skill::{SkillRepository, DUPLICATE_SKILL},
        user::{UserRepository, DUPLICATE_USER, IDENTITY_TAKEN},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    projects: RwLock<Vec<Project>>,
    skills: RwLock<Vec<Skill>>,
    contacts: RwLock<Vec<Contact>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        project.check_invariants()?;

        let now = Utc::now();
        let created = project.clone().into_project(Uuid::new_v4(), now, now);
        self.projects.write().push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.projects.read().iter().find(|p| p.id == *id).cloned())
    }

    async fn find(
        &self,
        filter: &ProjectFilter,
        sort: &Sort<ProjectSort>,
        window: Option<Window>,
    ) -> Result<Vec<Project>, AppError> {
        Ok(select(self.projects.read().as_slice(), filter, sort, window))
    }

    async fn count(&self, filter: &ProjectFilter) -> Result<u64, AppError> {
        Ok(count_matching(self.projects.read().as_slice(), filter))
    }

    async fn update(&self, id: &Uuid, project: &ProjectInsert) -> Result<Option<Project>, AppError> {
        project.check_invariants()?;

        let mut projects = self.projects.write();
        let Some(slot) = projects.iter_mut().find(|p| p.id == *id) else {
            return Ok(None);
        };

        *slot = project.clone().into_project(slot.id, slot.created_at, Utc::now());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        let mut projects = self.projects.write();
        let before = projects.len();
        projects.retain(|p| p.id != *id);
        Ok(projects.len() < before)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut projects = self.projects.write();
        let removed = projects.len() as u64;
        projects.clear();
        Ok(removed)
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        skill.check_invariants()?;

        let mut skills = self.skills.write();
        if skills.iter().any(|s| s.name == skill.name) {
            return Err(AppError::Conflict(DUPLICATE_SKILL.to_string()));
        }

        let now = Utc::now();
        let created = skill.clone().into_skill(Uuid::new_v4(), now, now);
        skills.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Skill>, AppError> {
        Ok(self.skills.read().iter().find(|s| s.id == *id).cloned())
    }

    async fn find(
        &self,
        filter: &SkillFilter,
        sort: &Sort<SkillSort>,
        window: Option<Window>,
    ) -> Result<Vec<Skill>, AppError> {
        Ok(select(self.skills.read().as_slice(), filter, sort, window))
    }

    async fn count(&self, filter: &SkillFilter) -> Result<u64, AppError> {
        Ok(count_matching(self.skills.read().as_slice(), filter))
    }

    async fn update(&self, id: &Uuid, skill: &SkillInsert) -> Result<Option<Skill>, AppError> {
        skill.check_invariants()?;

        let mut skills = self.skills.write();
        if skills.iter().any(|s| s.id != *id && s.name == skill.name) {
            return Err(AppError::Conflict(DUPLICATE_SKILL.to_string()));
        }

        let Some(slot) = skills.iter_mut().find(|s| s.id == *id) else {
            return Ok(None);
        };

        *slot = skill.clone().into_skill(slot.id, slot.created_at, Utc::now());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        let mut skills = self.skills.write();
        let before = skills.len();
        skills.retain(|s| s.id != *id);
        Ok(skills.len() < before)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut skills = self.skills.write();
        let removed = skills.len() as u64;
        skills.clear();
        Ok(removed)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, contact: &ContactInsert) -> Result<Contact, AppError> {
        contact.check_invariants()?;

        let created = contact.clone().into_contact(Uuid::new_v4(), Utc::now());
        self.contacts.write().push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Contact>, AppError> {
        Ok(self.contacts.read().iter().find(|c| c.id == *id).cloned())
    }

    async fn find(
        &self,
        filter: &ContactFilter,
        sort: &Sort<ContactSort>,
        window: Option<Window>,
    ) -> Result<Vec<Contact>, AppError> {
        Ok(select(self.contacts.read().as_slice(), filter, sort, window))
    }

    async fn count(&self, filter: &ContactFilter) -> Result<u64, AppError> {
        Ok(count_matching(self.contacts.read().as_slice(), filter))
    }

    async fn update_status(&self, id: &Uuid, status: ContactStatus) -> Result<Option<Contact>, AppError> {
        let mut contacts = self.contacts.write();
        let Some(slot) = contacts.iter_mut().find(|c| c.id == *id) else {
            return Ok(None);
        };

        slot.status = status;
        slot.updated_at = Utc::now();
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        let mut contacts = self.contacts.write();
        let before = contacts.len();
        contacts.retain(|c| c.id != *id);
        Ok(contacts.len() < before)
    }
}

fn holds_identity(user: &User, username: Option<&str>, email: Option<&str>) -> bool {
    username.is_some_and(|u| user.username == u) || email.is_some_and(|e| user.email == e)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        user.check_invariants()?;

        let mut users = self.users.write();
        if users
            .iter()
            .any(|u| holds_identity(u, Some(&user.username), Some(&user.email)))
        {
            return Err(AppError::Conflict(DUPLICATE_USER.to_string()));
        }

        let created = user.clone().into_user(Uuid::new_v4(), Utc::now());
        users.push(created.clone());
        Ok(created)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().iter().find(|u| u.id == *id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn identity_taken(
        &self,
        username: Option<String>,
        email: Option<String>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        Ok(self.users.read().iter().any(|u| {
            exclude != Some(u.id) && holds_identity(u, username.as_deref(), email.as_deref())
        }))
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>, AppError> {
        check_identity(username.as_deref(), email.as_deref())?;

        let mut users = self.users.write();
        if users
            .iter()
            .any(|u| u.id != *id && holds_identity(u, username.as_deref(), email.as_deref()))
        {
            return Err(AppError::Conflict(IDENTITY_TAKEN.to_string()));
        }

        let Some(slot) = users.iter_mut().find(|u| u.id == *id) else {
            return Ok(None);
        };

        if let Some(username) = username {
            slot.username = username;
        }
        if let Some(email) = email {
            slot.email = email;
        }
        slot.updated_at = Utc::now();
        Ok(Some(slot.clone()))
    }
}
