pub mod about;
pub mod brand;
pub mod cart;
pub mod cart_item;
pub mod category;
pub mod client;
pub mod inquiry;
pub mod newsletter_subscriber;
pub mod product;
pub mod service;
pub mod slide;
pub mod task;

use chrono::Utc;
use sea_orm::{
    sea_query::Index, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    Schema, Set, TransactionTrait,
};
use tracing::info;

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, category::Entity).await?;
    create_table(db, product::Entity).await?;
    create_table(db, slide::Entity).await?;
    create_table(db, brand::Entity).await?;
    create_table(db, service::Entity).await?;
    create_table(db, client::Entity).await?;
    create_table(db, about::Entity).await?;
    // cart must exist before cart_item references it
    create_table(db, cart::Entity).await?;
    create_table(db, cart_item::Entity).await?;
    create_cart_line_index(db).await?;
    create_table(db, inquiry::Entity).await?;
    create_table(db, newsletter_subscriber::Entity).await?;
    create_table(db, task::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// One line per product in a cart; concurrent adds upsert against it.
async fn create_cart_line_index(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let statement = Index::create()
        .name("idx_cart_item_cart_product")
        .table(cart_item::Entity)
        .col(cart_item::Column::CartId)
        .col(cart_item::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Inserts the default About row when the table is still empty.
pub async fn primary_settup(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    if about::Entity::find().count(&txn).await? > 0 {
        return Ok(());
    }

    let default_about = about::ActiveModel {
        title: Set("LB Premium".to_owned()),
        content: Set("Premium products for professionals.".to_owned()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    about::Entity::insert(default_about).exec(&txn).await?;
    txn.commit().await?;
    info!("Seeded default about section");
    Ok(())
}
