//! Rewrites stored image references after the files on disk were converted
//! to another format.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
    TransactionTrait,
};
use serde_json::Value;
use tracing::info;

use crate::entities::{about, brand, cart_item, category, client, product, service, slide};

#[derive(Clone, Debug)]
pub struct RewriteOptions {
    pub from: Vec<String>,
    pub to: String,
    pub dry_run: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct RewriteReport {
    /// Rows changed per table, in processing order.
    pub tables: Vec<(&'static str, u64)>,
}

impl RewriteReport {
    pub fn total(&self) -> u64 {
        self.tables.iter().map(|(_, count)| count).sum()
    }
}

/// Normalizes a command line extension (`.WebP` becomes `webp`).
pub fn parse_extension(raw: &str) -> Result<String, String> {
    let ext = raw.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() {
        return Err("extension must not be empty".to_string());
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("invalid extension '{raw}'"));
    }
    Ok(ext)
}

/// Returns the rewritten path when its extension is one of `from`.
pub fn rewrite_extension(path: &str, from: &[String], to: &str) -> Option<String> {
    let (stem, ext) = path.rsplit_once('.')?;
    if stem.is_empty() || stem.ends_with('/') || ext.contains('/') {
        return None;
    }
    if ext.eq_ignore_ascii_case(to) || !from.iter().any(|candidate| candidate.eq_ignore_ascii_case(ext)) {
        return None;
    }
    Some(format!("{stem}.{to}"))
}

fn rewrite_optional(value: &Option<String>, options: &RewriteOptions) -> Option<String> {
    value
        .as_deref()
        .and_then(|path| rewrite_extension(path, &options.from, &options.to))
}

/// Rewrites every path inside a JSON array, `None` when nothing changed.
fn rewrite_json_list(value: &Value, options: &RewriteOptions) -> Option<Value> {
    let items = value.as_array()?;
    let mut changed = false;
    let rewritten: Vec<Value> = items
        .iter()
        .map(|item| match item.as_str() {
            Some(path) => match rewrite_extension(path, &options.from, &options.to) {
                Some(new_path) => {
                    changed = true;
                    Value::String(new_path)
                }
                None => item.clone(),
            },
            None => item.clone(),
        })
        .collect();
    changed.then_some(Value::Array(rewritten))
}

pub async fn rewrite_image_refs(
    db: &DatabaseConnection,
    options: &RewriteOptions,
) -> Result<RewriteReport, DbErr> {
    if options.to.is_empty() {
        return Err(DbErr::Custom("Target extension must not be empty".to_string()));
    }
    let txn = db.begin().await?;
    let mut report = RewriteReport::default();

    report.tables.push(("category", rewrite_categories(&txn, options).await?));
    report.tables.push(("products", rewrite_products(&txn, options).await?));
    report.tables.push(("slide", rewrite_slides(&txn, options).await?));
    report.tables.push(("brand", rewrite_brands(&txn, options).await?));
    report.tables.push(("service", rewrite_services(&txn, options).await?));
    report.tables.push(("client", rewrite_clients(&txn, options).await?));
    report.tables.push(("about", rewrite_about(&txn, options).await?));
    report.tables.push(("cart_item", rewrite_cart_items(&txn, options).await?));

    if options.dry_run {
        txn.rollback().await?;
    } else {
        txn.commit().await?;
    }

    for (table, count) in &report.tables {
        info!(table = %table, rows = count, dry_run = options.dry_run, "Image references");
    }
    Ok(report)
}

async fn rewrite_categories<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in category::Entity::find().all(conn).await? {
        if let Some(image) = rewrite_optional(&model.image, options) {
            let mut entry: category::ActiveModel = model.into();
            entry.image = Set(Some(image));
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rewrite_products<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in product::Entity::find().all(conn).await? {
        let image = rewrite_optional(&model.image, options);
        let images = rewrite_json_list(&model.images, options);
        if image.is_none() && images.is_none() {
            continue;
        }

        let mut entry: product::ActiveModel = model.into();
        if let Some(image) = image {
            entry.image = Set(Some(image));
        }
        if let Some(images) = images {
            entry.images = Set(images);
        }
        entry.update(conn).await?;
        changed += 1;
    }
    Ok(changed)
}

async fn rewrite_slides<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in slide::Entity::find().all(conn).await? {
        if let Some(image) = rewrite_extension(&model.image, &options.from, &options.to) {
            let mut entry: slide::ActiveModel = model.into();
            entry.image = Set(image);
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rewrite_brands<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in brand::Entity::find().all(conn).await? {
        if let Some(logo) = rewrite_optional(&model.logo, options) {
            let mut entry: brand::ActiveModel = model.into();
            entry.logo = Set(Some(logo));
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rewrite_services<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in service::Entity::find().all(conn).await? {
        if let Some(image) = rewrite_optional(&model.image, options) {
            let mut entry: service::ActiveModel = model.into();
            entry.image = Set(Some(image));
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rewrite_clients<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in client::Entity::find().all(conn).await? {
        if let Some(logo) = rewrite_optional(&model.logo, options) {
            let mut entry: client::ActiveModel = model.into();
            entry.logo = Set(Some(logo));
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rewrite_about<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in about::Entity::find().all(conn).await? {
        if let Some(image) = rewrite_optional(&model.image, options) {
            let mut entry: about::ActiveModel = model.into();
            entry.image = Set(Some(image));
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rewrite_cart_items<C: ConnectionTrait>(
    conn: &C,
    options: &RewriteOptions,
) -> Result<u64, DbErr> {
    let mut changed = 0;
    for model in cart_item::Entity::find().all(conn).await? {
        if let Some(image) = rewrite_optional(&model.image, options) {
            let mut entry: cart_item::ActiveModel = model.into();
            entry.image = Set(Some(image));
            entry.update(conn).await?;
            changed += 1;
        }
    }
    Ok(changed)
}
