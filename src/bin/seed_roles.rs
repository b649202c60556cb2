//! Seeds the role catalog. Safe to run repeatedly; existing roles are left
//! untouched.

use tracing::{error, info};

use teamhive::{create_db_pool, init_tracing, seeder, Config};

fn main() {
    let config = Config::from_env();
    init_tracing(&config);

    let pool = create_db_pool(&config);
    let mut conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "Could not obtain a database connection");
            std::process::exit(1);
        }
    };

    match seeder::seed_roles(&mut conn) {
        Ok(created) => info!(created, "Role seeding complete"),
        Err(e) => {
            error!(error = %e, "Role seeding failed");
            std::process::exit(1);
        }
    }
}
