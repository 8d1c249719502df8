pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod session;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::auth_service::AuthService;
use application::cart_service::CartService;
use application::notifications::NotificationDispatcher;
use application::order_service::OrderService;
use config::Settings;
use domain::errors::DomainError;
use domain::ports::{CartRepository, OrderRepository, ProductCatalog, UserRepository};
use errors::AppError;
use infrastructure::cart_repo::DieselCartRepository;
use infrastructure::catalog_repo::DieselProductCatalog;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::password::PasswordHasher;
use infrastructure::user_repo::DieselUserRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Services shared by every worker through `web::Data`.
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    pub carts: CartService,
    pub orders: OrderService,
    pub auth: AuthService,
}

impl AppState {
    /// Wires the Diesel repositories, the password hasher and the email
    /// dispatcher from `settings`.
    pub fn new(pool: DbPool, settings: &Settings) -> Result<Self, DomainError> {
        let hasher = PasswordHasher::new(settings.password)?;
        let notifications = NotificationDispatcher::from_settings(&settings.email);

        Ok(Self::from_parts(
            Arc::new(DieselProductCatalog::new(pool.clone())),
            Arc::new(DieselCartRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool)),
            hasher,
            notifications,
        ))
    }

    pub fn from_parts(
        catalog: Arc<dyn ProductCatalog>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            catalog,
            carts: CartService::new(carts),
            orders: OrderService::new(orders, notifications),
            auth: AuthService::new(users, hasher),
        }
    }
}

/// Routes, extractor configuration and API docs. Shared by the server and
/// the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {err}");
        AppError::BadRequest("Invalid request format".into()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path: {err}");
        AppError::BadRequest("Invalid path parameter".into()).into()
    }))
    .service(
        web::scope("/api")
            .route("/register", web::post().to(handlers::auth::register))
            .route("/login", web::post().to(handlers::auth::login))
            .route("/logout", web::post().to(handlers::auth::logout))
            .route("/user", web::get().to(handlers::auth::current_user))
            .route("/products", web::get().to(handlers::products::list_products))
            .service(
                web::resource("/cart")
                    .route(web::get().to(handlers::cart::get_cart))
                    .route(web::post().to(handlers::cart::add_to_cart))
                    .route(web::delete().to(handlers::cart::clear_cart)),
            )
            .service(
                web::resource("/cart/{id}")
                    .route(web::put().to(handlers::cart::update_cart_item))
                    .route(web::delete().to(handlers::cart::remove_from_cart)),
            )
            .service(
                web::resource("/orders")
                    .route(web::post().to(handlers::orders::place_order))
                    .route(web::get().to(handlers::orders::list_orders)),
            ),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    );
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Signing key from `SESSION_KEY`, or a random one that invalidates every
/// session on restart.
pub fn session_key(settings: &Settings) -> std::io::Result<Key> {
    match &settings.session_key {
        Some(bytes) => Key::try_from(bytes.as_slice()).map_err(std::io::Error::other),
        None => {
            log::warn!("SESSION_KEY not set - using a random key, sessions end on restart");
            Ok(Key::generate())
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    key: Key,
    cookie_secure: bool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone(), cookie_secure))
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
