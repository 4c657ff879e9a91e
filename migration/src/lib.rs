pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users_table;
mod m20250901_000002_create_projects_table;
mod m20250901_000003_create_bids_table;
mod m20250901_000004_create_services_table;
mod m20250901_000005_create_orders_table;
mod m20250901_000006_create_payments_table;
mod m20250901_000007_create_chats_table;
mod m20250901_000008_create_messages_table;
mod m20250905_000001_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users_table::Migration),
            Box::new(m20250901_000002_create_projects_table::Migration),
            Box::new(m20250901_000003_create_bids_table::Migration),
            Box::new(m20250901_000004_create_services_table::Migration),
            Box::new(m20250901_000005_create_orders_table::Migration),
            Box::new(m20250901_000006_create_payments_table::Migration),
            Box::new(m20250901_000007_create_chats_table::Migration),
            Box::new(m20250901_000008_create_messages_table::Migration),
            Box::new(m20250905_000001_add_lookup_indexes::Migration),
        ]
    }
}
