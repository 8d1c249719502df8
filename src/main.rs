use std::io;

use dotenvy::dotenv;
use storefront::config::Settings;
use storefront::{build_server, create_pool, run_migrations, session_key, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&settings.database).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let key = session_key(&settings)?;
    let state = AppState::new(pool, &settings).map_err(io::Error::other)?;

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(state, key, settings.cookie_secure, &settings.host, settings.port)?.await
}
