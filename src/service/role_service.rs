use std::sync::Arc;

use tracing::info;

use crate::{
    error::{AppError, AppResult},
    model::role::{Role, RoleRequest},
    models::{PageRequest, Paginated},
    repository::RoleRepository,
    service::DeleteOutcome,
};

pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    pub async fn get(&self, id: u64) -> AppResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role"))
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<Paginated<Role>> {
        let (roles, total) = self.roles.list(page).await?;
        Ok(Paginated::new(roles, total, page))
    }

    pub async fn list_active(&self) -> AppResult<Vec<Role>> {
        self.roles.list_active().await
    }

    pub async fn create(&self, req: RoleRequest, actor: &str) -> AppResult<Role> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid("role name is required"));
        }
        if self.roles.find_by_name(name).await?.is_some() {
            return Err(AppError::duplicate("role name"));
        }

        let id = self.roles.create(name, req.level, actor).await?;
        info!(role_id = id, actor, "Role created");
        self.get(id).await
    }

    pub async fn update(&self, id: u64, req: RoleRequest, actor: &str) -> AppResult<Role> {
        let mut role = self.get(id).await?;

        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid("role name is required"));
        }
        if name != role.name {
            if let Some(other) = self.roles.find_by_name(name).await? {
                if other.id != id {
                    return Err(AppError::duplicate("role name"));
                }
            }
            role.name = name.to_string();
        }
        role.level = req.level;

        self.roles.update(&role, actor).await?;
        self.get(id).await
    }

    /// Deactivates instead of deleting while any user still holds the role.
    pub async fn delete(&self, id: u64, actor: &str) -> AppResult<DeleteOutcome> {
        self.get(id).await?;

        let outcome = if self.roles.count_assignments(id).await? > 0 {
            self.roles.deactivate(id, actor).await?;
            DeleteOutcome::Deactivated
        } else {
            self.roles.remove(id).await?;
            DeleteOutcome::Deleted
        };

        info!(role_id = id, actor, outcome = %outcome, "Role delete handled");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::user::NewUser,
        repository::{UserRepository, memory::MemoryStore},
    };
    use chrono::NaiveDate;

    fn role(name: &str, level: i32) -> RoleRequest {
        RoleRequest {
            name: name.into(),
            level,
        }
    }

    #[actix_web::test]
    async fn test_create_and_unique_name() {
        let store = Arc::new(MemoryStore::new());
        let service = RoleService::new(store.clone());

        let admin = service.create(role("admin", 100), "seed").await.unwrap();
        assert!(admin.is_active);
        assert_eq!(admin.created_by, "seed");

        let err = service.create(role("admin", 1), "seed").await.unwrap_err();
        assert_eq!(err.to_string(), "role name already exists");

        let hr = service.create(role("hr", 50), "seed").await.unwrap();
        assert!(matches!(
            service.update(hr.id, role("admin", 50), "seed").await,
            Err(AppError::DuplicateField(_))
        ));

        let same = service.update(hr.id, role("hr", 60), "seed").await.unwrap();
        assert_eq!(same.level, 60);
    }

    #[actix_web::test]
    async fn test_active_roles_sorted_by_level() {
        let store = Arc::new(MemoryStore::new());
        let service = RoleService::new(store.clone());
        service.create(role("employee", 10), "seed").await.unwrap();
        service.create(role("admin", 100), "seed").await.unwrap();
        let hr = service.create(role("hr", 50), "seed").await.unwrap();

        service.delete(hr.id, "seed").await.unwrap();

        let names: Vec<String> = service
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["admin", "employee"]);
    }

    #[actix_web::test]
    async fn test_delete_assigned_role_deactivates() {
        let store = Arc::new(MemoryStore::new());
        let service = RoleService::new(store.clone());
        let admin = service.create(role("admin", 100), "seed").await.unwrap();
        let spare = service.create(role("spare", 1), "seed").await.unwrap();

        let user = NewUser {
            uid: "u-1".into(),
            employee_id: "EMP-1".into(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            password: "hash".into(),
            phone: String::new(),
            address: String::new(),
            birthdate: None,
            join_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            profile_image: String::new(),
            division_id: None,
            position_id: None,
            is_manager: false,
            manager_id: None,
            is_active: true,
        };
        UserRepository::create(&*store, &user, &[admin.id], "seed")
            .await
            .unwrap();

        assert_eq!(
            service.delete(admin.id, "EMP-9").await.unwrap(),
            DeleteOutcome::Deactivated
        );
        let kept = service.get(admin.id).await.unwrap();
        assert!(!kept.is_active);

        assert_eq!(
            service.delete(spare.id, "EMP-9").await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert!(matches!(service.get(spare.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.delete(spare.id, "EMP-9").await,
            Err(AppError::NotFound(_))
        ));
    }
}
