//! Process entry point: wire up persistence and the broker, then run
//! the discovery consumer loop until Ctrl-C.

use std::sync::Arc;
use topo_db::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let db_config = topo_db::Config::from_env();
    let queue_config = topo_queue::Config::from_env();

    let store = Store::connect(&db_config).await?;
    let store = Arc::new(store);
    let queue_config = Arc::new(queue_config);

    topo_queue::consumer::run(&queue_config.clone(), move |job| {
        let store = store.clone();
        let queue_config = queue_config.clone();
        async move {
            topo_orchestrator::run_discovery_job(&store, &queue_config, job).await;
        }
    })
    .await;

    Ok(())
}
