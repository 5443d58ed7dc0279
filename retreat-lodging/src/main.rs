use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let ax = retreat_lodging::build()?;
    let http = retreat_lodging::config::http_config(ax.app.as_ref())?;

    tracing::info!(addr = %http.addr(), "starting retreat-lodging");

    ax.listen(http.addr()).await?;

    Ok(())
}
