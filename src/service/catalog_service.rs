use std::sync::Arc;

use tracing::info;

use crate::{
    error::{AppError, AppResult},
    model::catalog::{CatalogEntry, CatalogKind, CatalogRequest},
    models::{PageRequest, Paginated},
    repository::CatalogRepository,
    service::DeleteOutcome,
};

/// Divisions and positions. Every call names the catalog it works on.
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    pub async fn get(&self, kind: CatalogKind, id: u64) -> AppResult<CatalogEntry> {
        self.catalog
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| AppError::not_found(kind.as_ref()))
    }

    pub async fn list(
        &self,
        kind: CatalogKind,
        page: &PageRequest,
    ) -> AppResult<Paginated<CatalogEntry>> {
        let (items, total) = self.catalog.list(kind, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn list_active(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>> {
        self.catalog.list_active(kind).await
    }

    pub async fn create(
        &self,
        kind: CatalogKind,
        req: CatalogRequest,
        actor: &str,
    ) -> AppResult<CatalogEntry> {
        let (code, name) = validate(&req)?;

        if self.catalog.find_by_code(kind, code).await?.is_some() {
            return Err(AppError::duplicate(&format!("{} code", kind.as_ref())));
        }

        let id = self.catalog.create(kind, code, name, actor).await?;
        info!(kind = %kind, id, actor, "Catalog entry created");
        self.get(kind, id).await
    }

    pub async fn update(
        &self,
        kind: CatalogKind,
        id: u64,
        req: CatalogRequest,
        actor: &str,
    ) -> AppResult<CatalogEntry> {
        let mut entry = self.get(kind, id).await?;
        let (code, name) = validate(&req)?;

        if code != entry.code {
            if let Some(other) = self.catalog.find_by_code(kind, code).await? {
                if other.id != id {
                    return Err(AppError::duplicate(&format!("{} code", kind.as_ref())));
                }
            }
            entry.code = code.to_string();
        }
        entry.name = name.to_string();

        self.catalog.update(kind, &entry, actor).await?;
        self.get(kind, id).await
    }

    /// Deactivates instead of deleting while any user still references the entry.
    pub async fn delete(&self, kind: CatalogKind, id: u64, actor: &str) -> AppResult<DeleteOutcome> {
        self.get(kind, id).await?;

        let outcome = if self.catalog.count_members(kind, id).await? > 0 {
            self.catalog.deactivate(kind, id, actor).await?;
            DeleteOutcome::Deactivated
        } else {
            self.catalog.remove(kind, id).await?;
            DeleteOutcome::Deleted
        };

        info!(kind = %kind, id, actor, outcome = %outcome, "Catalog delete handled");
        Ok(outcome)
    }
}

fn validate(req: &CatalogRequest) -> AppResult<(&str, &str)> {
    let code = req.code.trim();
    let name = req.name.trim();
    if code.is_empty() || name.is_empty() {
        return Err(AppError::invalid("code and name are required"));
    }
    Ok((code, name))
}
