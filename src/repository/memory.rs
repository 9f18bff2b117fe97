//! In-memory store for tests. Enforces the same unique keys and foreign keys
//! as the migrations, and applies every multi-row write all-or-nothing.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::{
    error::{AppError, AppResult},
    model::{
        catalog::{CatalogEntry, CatalogKind},
        role::Role,
        statistics::{DivisionCount, PositionCount, Statistics},
        user::{NewUser, User},
    },
    models::PageRequest,
    repository::{CatalogRepository, RoleRepository, StatsRepository, UserRepository},
};

#[derive(Clone, Default)]
struct State {
    next_id: u64,
    users: BTreeMap<u64, User>,
    /// (user_id, role_id)
    user_roles: Vec<(u64, u64)>,
    roles: BTreeMap<u64, Role>,
    divisions: BTreeMap<u64, CatalogEntry>,
    positions: BTreeMap<u64, CatalogEntry>,
}

fn missing_reference() -> AppError {
    AppError::invalid("referenced record does not exist")
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T: Clone>(rows: Vec<T>, page: &PageRequest) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    (items, total)
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn catalog(&self, kind: CatalogKind) -> &BTreeMap<u64, CatalogEntry> {
        match kind {
            CatalogKind::Division => &self.divisions,
            CatalogKind::Position => &self.positions,
        }
    }

    fn catalog_mut(&mut self, kind: CatalogKind) -> &mut BTreeMap<u64, CatalogEntry> {
        match kind {
            CatalogKind::Division => &mut self.divisions,
            CatalogKind::Position => &mut self.positions,
        }
    }

    fn hydrate(&self, user: &User) -> User {
        let mut user = user.clone();
        user.division_name = user
            .division_id
            .and_then(|id| self.divisions.get(&id))
            .map(|d| d.name.clone());
        user.position_name = user
            .position_id
            .and_then(|id| self.positions.get(&id))
            .map(|p| p.name.clone());
        user.manager_name = user
            .manager_id
            .and_then(|id| self.users.get(&id))
            .map(|m| m.name.clone());

        let mut roles: Vec<&Role> = self
            .user_roles
            .iter()
            .filter(|(uid, _)| *uid == user.id)
            .filter_map(|(_, rid)| self.roles.get(rid))
            .collect();
        roles.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.name.cmp(&b.name)));
        user.roles = roles.into_iter().map(|r| r.name.clone()).collect();
        user
    }

    fn check_user_keys(&self, id: Option<u64>, user: &User) -> AppResult<()> {
        let clash = self.users.values().any(|u| {
            Some(u.id) != id
                && (u.email == user.email || u.employee_id == user.employee_id || u.uid == user.uid)
        });
        if clash {
            return Err(AppError::duplicate("record"));
        }

        let fk_ok = user.division_id.is_none_or(|d| self.divisions.contains_key(&d))
            && user.position_id.is_none_or(|p| self.positions.contains_key(&p))
            && user.manager_id.is_none_or(|m| self.users.contains_key(&m));
        if !fk_ok {
            return Err(missing_reference());
        }
        Ok(())
    }

    fn insert_roles(&mut self, user_id: u64, role_ids: &[u64]) -> AppResult<()> {
        for role_id in role_ids {
            if !self.roles.contains_key(role_id) {
                return Err(missing_reference());
            }
            if self.user_roles.contains(&(user_id, *role_id)) {
                return Err(AppError::duplicate("record"));
            }
            self.user_roles.push((user_id, *role_id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> AppResult<T> {
        let state = self
            .state
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".into()))?;
        Ok(f(&state))
    }

    /// Runs `f` on a copy of the state and keeps the copy only if `f` succeeds.
    fn transact<T>(&self, f: impl FnOnce(&mut State) -> AppResult<T>) -> AppResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".into()))?;
        let mut draft = state.clone();
        let out = f(&mut draft)?;
        *state = draft;
        Ok(out)
    }

    pub fn seed_role(&self, name: &str, level: i32) -> u64 {
        self.transact(|s| {
            let id = s.next_id();
            let now = Utc::now();
            s.roles.insert(
                id,
                Role {
                    id,
                    name: name.to_string(),
                    level,
                    is_active: true,
                    created_at: now,
                    created_by: "seed".into(),
                    updated_at: now,
                    updated_by: "seed".into(),
                },
            );
            Ok(id)
        })
        .unwrap()
    }

    pub fn seed_catalog(&self, kind: CatalogKind, code: &str, name: &str) -> u64 {
        self.transact(|s| {
            let id = s.next_id();
            let now = Utc::now();
            s.catalog_mut(kind).insert(
                id,
                CatalogEntry {
                    id,
                    code: code.to_string(),
                    name: name.to_string(),
                    is_active: true,
                    created_at: now,
                    created_by: "seed".into(),
                    updated_at: now,
                    updated_by: "seed".into(),
                },
            );
            Ok(id)
        })
        .unwrap()
    }

    pub fn user_role_rows(&self, user_id: u64) -> usize {
        self.read(|s| s.user_roles.iter().filter(|(u, _)| *u == user_id).count())
            .unwrap()
    }

    pub fn user_count(&self) -> usize {
        self.read(|s| s.users.len()).unwrap()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>> {
        self.read(|s| s.users.get(&id).map(|u| s.hydrate(u)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.read(|s| {
            s.users
                .values()
                .find(|u| u.email == email)
                .map(|u| s.hydrate(u))
        })
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> AppResult<Option<User>> {
        self.read(|s| {
            s.users
                .values()
                .find(|u| u.employee_id == employee_id)
                .map(|u| s.hydrate(u))
        })
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<User>, i64)> {
        self.read(|s| {
            let rows = s
                .users
                .values()
                .filter(|u| match page.search.as_deref() {
                    Some(term) => {
                        contains(&u.name, term)
                            || contains(&u.email, term)
                            || contains(&u.employee_id, term)
                    }
                    None => true,
                })
                .map(|u| s.hydrate(u))
                .collect();
            paginate(rows, page)
        })
    }

    async fn create(&self, user: &NewUser, role_ids: &[u64], actor: &str) -> AppResult<u64> {
        self.transact(|s| {
            let id = s.next_id();
            let now = Utc::now();
            let row = User {
                id,
                uid: user.uid.clone(),
                employee_id: user.employee_id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                password: user.password.clone(),
                phone: user.phone.clone(),
                address: user.address.clone(),
                birthdate: user.birthdate,
                join_date: user.join_date,
                profile_image: user.profile_image.clone(),
                division_id: user.division_id,
                position_id: user.position_id,
                is_manager: user.is_manager,
                manager_id: user.manager_id,
                is_active: user.is_active,
                created_at: now,
                created_by: actor.to_string(),
                updated_at: now,
                updated_by: actor.to_string(),
                division_name: None,
                position_name: None,
                manager_name: None,
                roles: Vec::new(),
            };
            s.check_user_keys(None, &row)?;
            s.users.insert(id, row);
            s.insert_roles(id, role_ids)?;
            Ok(id)
        })
    }

    async fn update(&self, user: &User, role_ids: Option<&[u64]>, actor: &str) -> AppResult<()> {
        self.transact(|s| {
            if !s.users.contains_key(&user.id) {
                return Ok(());
            }
            s.check_user_keys(Some(user.id), user)?;

            let mut row = user.clone();
            row.updated_at = Utc::now();
            row.updated_by = actor.to_string();
            s.users.insert(user.id, row);

            if let Some(ids) = role_ids {
                s.user_roles.retain(|(u, _)| *u != user.id);
                s.insert_roles(user.id, ids)?;
            }
            Ok(())
        })
    }

    async fn update_password(&self, id: u64, password_hash: &str, actor: &str) -> AppResult<()> {
        self.transact(|s| {
            if let Some(u) = s.users.get_mut(&id) {
                u.password = password_hash.to_string();
                u.updated_at = Utc::now();
                u.updated_by = actor.to_string();
            }
            Ok(())
        })
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        self.transact(|s| {
            s.user_roles.retain(|(u, _)| *u != id);
            s.users.remove(&id);
            for u in s.users.values_mut() {
                if u.manager_id == Some(id) {
                    u.manager_id = None;
                }
            }
            Ok(())
        })
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<Role>> {
        self.read(|s| s.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.read(|s| s.roles.values().find(|r| r.name == name).cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Role>, i64)> {
        self.read(|s| {
            let rows = s
                .roles
                .values()
                .filter(|r| page.search.as_deref().is_none_or(|t| contains(&r.name, t)))
                .cloned()
                .collect();
            paginate(rows, page)
        })
    }

    async fn list_active(&self) -> AppResult<Vec<Role>> {
        self.read(|s| {
            let mut roles: Vec<Role> = s.roles.values().filter(|r| r.is_active).cloned().collect();
            roles.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.id.cmp(&b.id)));
            roles
        })
    }

    async fn create(&self, name: &str, level: i32, actor: &str) -> AppResult<u64> {
        self.transact(|s| {
            if s.roles.values().any(|r| r.name == name) {
                return Err(AppError::duplicate("record"));
            }
            let id = s.next_id();
            let now = Utc::now();
            s.roles.insert(
                id,
                Role {
                    id,
                    name: name.to_string(),
                    level,
                    is_active: true,
                    created_at: now,
                    created_by: actor.to_string(),
                    updated_at: now,
                    updated_by: actor.to_string(),
                },
            );
            Ok(id)
        })
    }

    async fn update(&self, role: &Role, actor: &str) -> AppResult<()> {
        self.transact(|s| {
            if s.roles.values().any(|r| r.id != role.id && r.name == role.name) {
                return Err(AppError::duplicate("record"));
            }
            if let Some(r) = s.roles.get_mut(&role.id) {
                *r = role.clone();
                r.updated_at = Utc::now();
                r.updated_by = actor.to_string();
            }
            Ok(())
        })
    }

    async fn count_assignments(&self, id: u64) -> AppResult<i64> {
        self.read(|s| s.user_roles.iter().filter(|(_, r)| *r == id).count() as i64)
    }

    async fn deactivate(&self, id: u64, actor: &str) -> AppResult<()> {
        self.transact(|s| {
            if let Some(r) = s.roles.get_mut(&id) {
                r.is_active = false;
                r.updated_by = actor.to_string();
            }
            Ok(())
        })
    }

    async fn remove(&self, id: u64) -> AppResult<()> {
        self.transact(|s| {
            if s.user_roles.iter().any(|(_, r)| *r == id) {
                return Err(AppError::Internal("role is still referenced".into()));
            }
            s.roles.remove(&id);
            Ok(())
        })
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn find_by_id(&self, kind: CatalogKind, id: u64) -> AppResult<Option<CatalogEntry>> {
        self.read(|s| s.catalog(kind).get(&id).cloned())
    }

    async fn find_by_code(
        &self,
        kind: CatalogKind,
        code: &str,
    ) -> AppResult<Option<CatalogEntry>> {
        self.read(|s| s.catalog(kind).values().find(|e| e.code == code).cloned())
    }

    async fn list(
        &self,
        kind: CatalogKind,
        page: &PageRequest,
    ) -> AppResult<(Vec<CatalogEntry>, i64)> {
        self.read(|s| {
            let rows = s
                .catalog(kind)
                .values()
                .filter(|e| {
                    page.search
                        .as_deref()
                        .is_none_or(|t| contains(&e.name, t) || contains(&e.code, t))
                })
                .cloned()
                .collect();
            paginate(rows, page)
        })
    }

    async fn list_active(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>> {
        self.read(|s| {
            let mut rows: Vec<CatalogEntry> = s
                .catalog(kind)
                .values()
                .filter(|e| e.is_active)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            rows
        })
    }

    async fn create(
        &self,
        kind: CatalogKind,
        code: &str,
        name: &str,
        actor: &str,
    ) -> AppResult<u64> {
        self.transact(|s| {
            if s.catalog(kind).values().any(|e| e.code == code) {
                return Err(AppError::duplicate("record"));
            }
            let id = s.next_id();
            let now = Utc::now();
            s.catalog_mut(kind).insert(
                id,
                CatalogEntry {
                    id,
                    code: code.to_string(),
                    name: name.to_string(),
                    is_active: true,
                    created_at: now,
                    created_by: actor.to_string(),
                    updated_at: now,
                    updated_by: actor.to_string(),
                },
            );
            Ok(id)
        })
    }

    async fn update(&self, kind: CatalogKind, entry: &CatalogEntry, actor: &str) -> AppResult<()> {
        self.transact(|s| {
            if s
                .catalog(kind)
                .values()
                .any(|e| e.id != entry.id && e.code == entry.code)
            {
                return Err(AppError::duplicate("record"));
            }
            if let Some(e) = s.catalog_mut(kind).get_mut(&entry.id) {
                *e = entry.clone();
                e.updated_at = Utc::now();
                e.updated_by = actor.to_string();
            }
            Ok(())
        })
    }

    async fn count_members(&self, kind: CatalogKind, id: u64) -> AppResult<i64> {
        self.read(|s| {
            s.users
                .values()
                .filter(|u| match kind {
                    CatalogKind::Division => u.division_id == Some(id),
                    CatalogKind::Position => u.position_id == Some(id),
                })
                .count() as i64
        })
    }

    async fn deactivate(&self, kind: CatalogKind, id: u64, actor: &str) -> AppResult<()> {
        self.transact(|s| {
            if let Some(e) = s.catalog_mut(kind).get_mut(&id) {
                e.is_active = false;
                e.updated_by = actor.to_string();
            }
            Ok(())
        })
    }

    async fn remove(&self, kind: CatalogKind, id: u64) -> AppResult<()> {
        self.transact(|s| {
            s.catalog_mut(kind).remove(&id);
            Ok(())
        })
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn statistics(&self, month_start: NaiveDate) -> AppResult<Statistics> {
        self.read(|s| {
            let active: Vec<&User> = s.users.values().filter(|u| u.is_active).collect();

            let mut per_division: BTreeMap<String, i64> = BTreeMap::new();
            let mut per_position: BTreeMap<String, i64> = BTreeMap::new();
            for u in &active {
                if let Some(d) = u.division_id.and_then(|id| s.divisions.get(&id)) {
                    *per_division.entry(d.name.clone()).or_default() += 1;
                }
                if let Some(p) = u.position_id.and_then(|id| s.positions.get(&id)) {
                    *per_position.entry(p.name.clone()).or_default() += 1;
                }
            }

            Statistics {
                total_users: s.users.len() as i64,
                active_users: active.len() as i64,
                total_divisions: s.divisions.len() as i64,
                total_positions: s.positions.len() as i64,
                users_per_division: per_division
                    .into_iter()
                    .map(|(division, count)| DivisionCount { division, count })
                    .collect(),
                users_per_position: per_position
                    .into_iter()
                    .map(|(position, count)| PositionCount { position, count })
                    .collect(),
                new_users_this_month: s
                    .users
                    .values()
                    .filter(|u| u.join_date >= month_start)
                    .count() as i64,
            }
        })
    }
}
