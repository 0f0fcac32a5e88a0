use std::sync::Arc;

use supplyline_api::{
    config::AppConfig,
    db::{self, DbPool},
    events::{self, EventSender},
    services::AppServices,
};
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct TestApp {
    #[allow(dead_code)]
    pub db: Arc<DbPool>,
    #[allow(dead_code)]
    pub events: Arc<EventSender>,
    pub services: AppServices,
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
}

/// Fresh in-memory database with migrations applied and a drained event
/// channel. Single connection so every query sees the same database.
pub async fn spawn_app() -> TestApp {
    let cfg = AppConfig::for_tests("sqlite::memory:");
    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .expect("database connects");
    db::run_migrations(&pool).await.expect("migrations apply");

    let (tx, rx) = mpsc::channel(1024);
    tokio::spawn(events::process_events(rx));
    let events = Arc::new(EventSender::new(tx));
    let db = Arc::new(pool);
    let services = AppServices::new(db.clone(), events.clone(), &cfg);

    TestApp {
        db,
        events,
        services,
        tenant_id: Uuid::new_v4(),
        actor_id: Uuid::new_v4(),
    }
}
