use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::password::hash_password,
    error::{AppError, AppResult},
    model::user::{
        CreateUserRequest, DATE_FORMAT, NewUser, UpdateUserRequest, User, UserResponse,
    },
    models::{PageRequest, Paginated},
    repository::UserRepository,
};

pub const MIN_PASSWORD_LEN: usize = 6;

fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid(format!("invalid {field} format, use YYYY-MM-DD")))
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Order-preserving dedupe; the join table holds one row per pair.
fn unique_ids(ids: &[u64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    async fn load(&self, id: u64) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn get(&self, id: u64) -> AppResult<UserResponse> {
        Ok(UserResponse::from(&self.load(id).await?))
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<Paginated<UserResponse>> {
        let (users, total) = self.users.list(page).await?;
        Ok(Paginated::new(users, total, page).map(|u| UserResponse::from(&u)))
    }

    pub async fn create(&self, req: CreateUserRequest, actor: &str) -> AppResult<UserResponse> {
        let employee_id = req.employee_id.trim();
        let name = req.name.trim();
        let email = req.email.trim();

        if employee_id.is_empty()
            || name.is_empty()
            || email.is_empty()
            || req.join_date.trim().is_empty()
        {
            return Err(AppError::invalid(
                "employee_id, name, email and join_date are required",
            ));
        }
        check_password(&req.password)?;

        if self.users.find_by_employee_id(employee_id).await?.is_some() {
            return Err(AppError::duplicate("employee ID"));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::duplicate("email"));
        }

        let birthdate = match req.birthdate.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() => Some(parse_date(b, "birthdate")?),
            _ => None,
        };
        let join_date = parse_date(&req.join_date, "join date")?;

        let new_user = NewUser {
            uid: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: hash_password(&req.password)?,
            phone: req.phone,
            address: req.address,
            birthdate,
            join_date,
            profile_image: req.profile_image,
            division_id: req.division_id,
            position_id: req.position_id,
            is_manager: req.is_manager,
            manager_id: req.manager_id,
            is_active: true,
        };

        let id = self
            .users
            .create(&new_user, &unique_ids(&req.role_ids), actor)
            .await?;

        info!(user_id = id, actor, "User created");
        self.get(id).await
    }

    pub async fn update(
        &self,
        id: u64,
        req: UpdateUserRequest,
        actor: &str,
    ) -> AppResult<UserResponse> {
        let mut user = self.load(id).await?;

        if let Some(email) = req.email.as_deref().map(str::trim) {
            if email.is_empty() {
                return Err(AppError::invalid("email must not be empty"));
            }
            if email != user.email {
                if let Some(other) = self.users.find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::duplicate("email"));
                    }
                }
                user.email = email.to_string();
            }
        }

        if let Some(name) = req.name.as_deref().map(str::trim) {
            if name.is_empty() {
                return Err(AppError::invalid("name must not be empty"));
            }
            user.name = name.to_string();
        }
        if let Some(phone) = req.phone {
            user.phone = phone;
        }
        if let Some(address) = req.address {
            user.address = address;
        }
        if let Some(birthdate) = req.birthdate.as_deref().map(str::trim) {
            // empty string clears the stored birthdate
            user.birthdate = if birthdate.is_empty() {
                None
            } else {
                Some(parse_date(birthdate, "birthdate")?)
            };
        }
        if let Some(join_date) = req.join_date.as_deref() {
            user.join_date = parse_date(join_date, "join date")?;
        }
        if let Some(image) = req.profile_image {
            user.profile_image = image;
        }
        if req.division_id.is_some() {
            user.division_id = req.division_id;
        }
        if req.position_id.is_some() {
            user.position_id = req.position_id;
        }
        if let Some(is_manager) = req.is_manager {
            user.is_manager = is_manager;
        }
        if let Some(manager_id) = req.manager_id {
            if manager_id == id {
                return Err(AppError::invalid("a user cannot be their own manager"));
            }
            user.manager_id = Some(manager_id);
        }
        if let Some(is_active) = req.is_active {
            user.is_active = is_active;
        }

        let role_ids = req.role_ids.as_deref().map(unique_ids);
        self.users.update(&user, role_ids.as_deref(), actor).await?;

        info!(user_id = id, actor, roles_replaced = role_ids.is_some(), "User updated");
        self.get(id).await
    }

    pub async fn update_password(&self, id: u64, password: &str, actor: &str) -> AppResult<()> {
        check_password(password)?;
        self.load(id).await?;

        let hash = hash_password(password)?;
        self.users.update_password(id, &hash, actor).await?;

        info!(user_id = id, actor, "Password changed");
        Ok(())
    }

    /// Always a hard delete; subordinates lose their manager reference.
    pub async fn delete(&self, id: u64, actor: &str) -> AppResult<()> {
        self.load(id).await?;
        self.users.delete(id).await?;

        warn!(user_id = id, actor, "User deleted");
        Ok(())
    }
}
