use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wrapp_injector::{signature, Fallible, Injector, InjectorError};

fn main() -> Result<(), InjectorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let mut injector = Injector::new();
    injector
        .value("host", "localhost".to_string())?
        .value("port", 5432_u16)?
        .service_with(
            "db",
            ["host", "port"],
            Fallible(|host: Arc<String>, port: Arc<u16>| {
                if host.is_empty() {
                    return Err("host must not be empty");
                }
                Ok(Db {
                    url: format!("postgres://{host}:{port}"),
                })
            }),
        )?
        .service(
            "repo",
            signature!(fn repo(db: Arc<Db>) -> Repo {
                Repo { db }
            }),
        )?;

    println!("{:?}", injector);
    if let Some(repo) = injector.get_as::<Repo>("repo")? {
        tracing::info!("Repo connected to {}", repo.db.url);
    }
    println!("{:?}", injector);

    Ok(())
}

struct Db {
    url: String,
}

struct Repo {
    db: Arc<Db>,
}
