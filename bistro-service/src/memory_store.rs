use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::{
    CartItem, DocumentId, MenuItem, MenuItemInput, NewCartItem, NewUser, Review, User,
};
use crate::store::{
    CartStore, DeleteOutcome, InsertOutcome, MenuStore, ReviewStore, StoreError, StoreResult,
    UpdateOutcome, UserStore,
};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    menu: Vec<MenuItem>,
    reviews: Vec<Review>,
    carts: Vec<CartItem>,
}

/// Process-local store with the same observable results as the MongoDB backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }

    /// Insert a user directly, bypassing the duplicate-email check.
    pub fn seed_user(&self, email: &str, role: Option<&str>) -> StoreResult<DocumentId> {
        let id = DocumentId::new();
        self.write()?.users.push(User {
            id,
            email: email.to_string(),
            name: None,
            photo_url: None,
            role: role.map(str::to_owned),
        });
        Ok(id)
    }

    pub fn seed_review(&self, fields: Map<String, Value>) -> StoreResult<DocumentId> {
        let id = DocumentId::new();
        self.write()?.reviews.push(Review { id, fields });
        Ok(id)
    }

    pub fn count_users_with_email(&self, email: &str) -> StoreResult<usize> {
        Ok(self.read()?.users.iter().filter(|u| u.email == email).count())
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: DocumentId, key: impl Fn(&T) -> DocumentId) -> DeleteOutcome {
    match items.iter().position(|item| key(item) == id) {
        Some(index) => {
            items.remove(index);
            DeleteOutcome::new(1)
        }
        None => DeleteOutcome::new(0),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<InsertOutcome> {
        let id = DocumentId::new();
        self.write()?.users.push(User {
            id,
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            role: None,
        });
        Ok(InsertOutcome::inserted(id))
    }

    async fn delete_user(&self, id: DocumentId) -> StoreResult<DeleteOutcome> {
        Ok(remove_by_id(&mut self.write()?.users, id, |u| u.id))
    }

    async fn set_user_role(&self, id: DocumentId, role: &str) -> StoreResult<UpdateOutcome> {
        let mut guard = self.write()?;
        let Some(user) = guard.users.iter_mut().find(|u| u.id == id) else {
            return Ok(UpdateOutcome::new(0, 0));
        };
        if user.role.as_deref() == Some(role) {
            return Ok(UpdateOutcome::new(1, 0));
        }
        user.role = Some(role.to_string());
        Ok(UpdateOutcome::new(1, 1))
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.read()?.menu.clone())
    }

    async fn find_menu_item(&self, id: DocumentId) -> StoreResult<Option<MenuItem>> {
        Ok(self.read()?.menu.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_menu_item(&self, item: MenuItemInput) -> StoreResult<InsertOutcome> {
        let id = DocumentId::new();
        self.write()?.menu.push(item.into_item(id));
        Ok(InsertOutcome::inserted(id))
    }

    async fn update_menu_item(&self, id: DocumentId, item: MenuItemInput) -> StoreResult<UpdateOutcome> {
        let mut guard = self.write()?;
        let Some(existing) = guard.menu.iter_mut().find(|m| m.id == id) else {
            return Ok(UpdateOutcome::new(0, 0));
        };
        let replacement = item.into_item(id);
        if *existing == replacement {
            return Ok(UpdateOutcome::new(1, 0));
        }
        *existing = replacement;
        Ok(UpdateOutcome::new(1, 1))
    }

    async fn delete_menu_item(&self, id: DocumentId) -> StoreResult<DeleteOutcome> {
        Ok(remove_by_id(&mut self.write()?.menu, id, |m| m.id))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.read()?.reviews.clone())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<InsertOutcome> {
        let id = DocumentId::new();
        self.write()?.carts.push(item.into_item(id));
        Ok(InsertOutcome::inserted(id))
    }

    async fn list_cart_items(&self, user_email: &str) -> StoreResult<Vec<CartItem>> {
        Ok(self
            .read()?
            .carts
            .iter()
            .filter(|c| c.user_email == user_email)
            .cloned()
            .collect())
    }

    async fn delete_cart_item(&self, id: DocumentId) -> StoreResult<DeleteOutcome> {
        Ok(remove_by_id(&mut self.write()?.carts, id, |c| c.id))
    }
}
