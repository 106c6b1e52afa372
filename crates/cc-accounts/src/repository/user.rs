//! User Repository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::{Collection, Database, bson::{doc, Document}};

use crate::domain::{NewUser, UserAccount};
use crate::error::{AccountsError, Result};
use crate::repository::CredentialStore;
use crate::service::PasswordService;

pub struct UserRepository {
    collection: Collection<UserAccount>,
    passwords: Arc<PasswordService>,
}

impl UserRepository {
    pub fn new(db: &Database, passwords: Arc<PasswordService>) -> Self {
        Self {
            collection: db.collection("users"),
            passwords,
        }
    }

    /// Targeted `$set` update plus `updatedAt`, erroring when the account
    /// does not exist, then returns the fresh record.
    async fn apply_update(&self, id: &str, fields: Document) -> Result<UserAccount> {
        let mut set = fields;
        set.insert("updatedAt", bson::to_bson(&Utc::now())?);

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        if result.matched_count == 0 {
            return Err(AccountsError::not_found("UserAccount", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AccountsError::not_found("UserAccount", id))
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserAccount>> {
        let mut or = Vec::new();
        if let Some(username) = username {
            or.push(doc! { "username": username.trim().to_lowercase() });
        }
        if let Some(email) = email {
            or.push(doc! { "email": email.trim() });
        }
        if or.is_empty() {
            return Ok(None);
        }
        Ok(self.collection.find_one(doc! { "$or": or }).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn create(&self, new_user: NewUser) -> Result<UserAccount> {
        let password_hash = self.passwords.hash_password(&new_user.password)?;
        let account = UserAccount::new(&new_user, password_hash);
        self.collection.insert_one(&account).await?;
        Ok(account)
    }

    async fn verify_password(&self, account: &UserAccount, plaintext: &str) -> Result<bool> {
        self.passwords.verify_password(plaintext, &account.password_hash)
    }

    async fn set_refresh_token(&self, id: &str, token: Option<&str>) -> Result<()> {
        // Rotation and logout are lightweight writes: the refresh token is
        // the only account field they may touch.
        let update = match token {
            Some(token) => doc! { "$set": { "refreshToken": token } },
            None => doc! { "$unset": { "refreshToken": "" } },
        };
        self.collection.update_one(doc! { "_id": id }, update).await?;
        Ok(())
    }

    async fn update_password(&self, id: &str, new_password: &str) -> Result<()> {
        let password_hash = self.passwords.hash_password(new_password)?;
        self.apply_update(id, doc! { "passwordHash": password_hash }).await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        fullname: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserAccount> {
        let mut fields = Document::new();
        if let Some(fullname) = fullname {
            fields.insert("fullname", fullname.trim());
        }
        if let Some(email) = email {
            fields.insert("email", email.trim());
        }
        self.apply_update(id, fields).await
    }

    async fn set_avatar_url(&self, id: &str, url: &str) -> Result<UserAccount> {
        self.apply_update(id, doc! { "avatarUrl": url }).await
    }

    async fn set_cover_image_url(&self, id: &str, url: &str) -> Result<UserAccount> {
        self.apply_update(id, doc! { "coverImageUrl": url }).await
    }
}
