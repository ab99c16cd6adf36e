use drawer_search::config::RuntimeConfig;
use drawer_search::error::SearchError;
use drawer_search::formatting::{format_event, format_stats};
use drawer_search::service::DrawerSearchService;
use drawer_search::types::Viewport;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<(), SearchError> {
    let config = RuntimeConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.clone())
        .with_writer(std::io::stderr)
        .init();

    let service = DrawerSearchService::new(config)?;
    let limits = service.config().result_limits;

    let mut events = service.session().subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("{}", format_event(&event, Viewport::Desktop, &limits)),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    service.open_drawer();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|error| SearchError::Internal(format!("stdin: {error}")))?
    {
        let session = service.session();
        match line.as_str() {
            ":enter" => {
                session.submit();
            }
            ":esc" => session.escape(),
            ":cancel" => {
                session.cancel();
            }
            ":close" => service.close_drawer(),
            ":clear" => {
                service.cache().clear();
            }
            ":stats" => println!("{}", format_stats(&service.stats())),
            ":quit" => break,
            text => session.input(text),
        }
    }

    Ok(())
}
