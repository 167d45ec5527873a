pub use sea_orm_migration::prelude::*;

mod m20250610_000001_create_movies;
mod m20250610_000002_create_theaters;
mod m20250610_000003_create_showtimes;
mod m20250610_000004_create_users;
mod m20250610_000005_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250610_000001_create_movies::Migration),
            Box::new(m20250610_000002_create_theaters::Migration),
            Box::new(m20250610_000003_create_showtimes::Migration),
            Box::new(m20250610_000004_create_users::Migration),
            Box::new(m20250610_000005_create_bookings::Migration),
        ]
    }
}
