//! Basic example of the Tarkib DI container.
//!
//! Run with `RUST_LOG=tarkib_container=debug` to watch scopes come and go.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tarkib::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

#[derive(Default)]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Config {
    database_url: String,
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

/// One transaction per request scope.
struct Transaction {
    id: u64,
    db: Arc<Database>,
}

/// A fresh handler for every resolve, parameterised at resolve time.
struct UserQuery {
    user_id: u64,
    tx: Arc<Transaction>,
}

impl UserQuery {
    fn run(&self) -> String {
        self.tx
            .db
            .query(&format!("SELECT * FROM users WHERE id = {} -- tx {}", self.user_id, self.tx.id))
    }
}

struct InfrastructureModule;

impl Module for InfrastructureModule {
    fn load(&self, container: &Container<'_>) -> Result<()> {
        container
            .register(|_: &Container<'_>, ()| {
                Ok(Config {
                    database_url: "postgres://localhost/myapp".to_string(),
                })
            })?
            .global_singleton();

        container
            .register_default::<ConsoleLogger>()?
            .as_interface::<dyn Logger>(|logger| logger)
            .global_singleton();

        container
            .register(|scope: &Container<'_>, ()| {
                let config: Arc<Config> = scope.resolve()?;
                Ok(Database {
                    url: config.database_url.clone(),
                    logger: scope.resolve()?,
                })
            })?
            .global_singleton();

        Ok(())
    }
}

struct RequestModule;

impl Module for RequestModule {
    fn load(&self, container: &Container<'_>) -> Result<()> {
        let next_id = Arc::new(AtomicU64::new(1));
        container
            .register(move |scope: &Container<'_>, ()| {
                Ok(Transaction {
                    id: next_id.fetch_add(1, Ordering::SeqCst),
                    db: scope.resolve()?,
                })
            })?
            .instance_per_scope();

        container
            .register(|scope: &Container<'_>, user_id: u64| {
                Ok(UserQuery {
                    user_id,
                    tx: scope.resolve()?,
                })
            })?
            .instance_per_request();

        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tarkib_container=info")),
        )
        .init();

    let root = Container::new();
    root.register_module(&InfrastructureModule)?;
    root.register_module(&RequestModule)?;
    info!(?root, "Container ready");

    for request in 0..2 {
        let scope = root.new_scope();

        for user_id in [42, 7] {
            let query = scope.resolve_with::<UserQuery, u64>(user_id)?;
            println!("request {request}: {}", query.run());
        }

        info!(
            request,
            scoped = scope.scope_instance_count(),
            per_request = scope.request_instance_count(),
            "Request finished"
        );
    }

    let logger: Arc<dyn Logger> = root.resolve()?;
    logger.log("Everything works");
    Ok(())
}
