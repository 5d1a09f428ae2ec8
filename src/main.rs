use switchyard::config::Config;
use switchyard::http::handler::RequestHandler;
use switchyard::server::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let handler = RequestHandler::from_config(&cfg)?;
    let mut server = Server::bind(&cfg, handler)?;
    let handle = server.handle();

    // The poll loop blocks its thread; keep it off the runtime.
    let mut serving = tokio::task::spawn_blocking(move || server.run());

    tokio::select! {
        res = &mut serving => {
            res??;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            handle.shutdown()?;
            serving.await??;
        }
    }

    Ok(())
}
