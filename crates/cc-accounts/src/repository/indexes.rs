//! Index Bootstrap
//!
//! Unique indexes backing the username/email uniqueness invariant. Run once
//! at server startup.

use mongodb::{Database, IndexModel, bson::doc, options::IndexOptions};
use tracing::info;

use crate::domain::UserAccount;
use crate::error::Result;

pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let users = db.collection::<UserAccount>("users");

    let unique = IndexOptions::builder().unique(true).build();

    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(unique.clone())
                .build(),
        )
        .await?;

    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique)
                .build(),
        )
        .await?;

    info!("User collection indexes ensured");
    Ok(())
}
