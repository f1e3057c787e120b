//! Example of signing map tile URLs with environment credentials.
//!
//! Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY (and optionally
//! AWS_SESSION_TOKEN) before running.

use geosign_core::{Context, OsEnv};
use geosign_http_send_reqwest::ReqwestHttpSend;
use geosign_location::{EnvCredentialProvider, MapAuthHelper, ResourceKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let helper = MapAuthHelper::new(ctx, EnvCredentialProvider::new(), "us-west-2").await?;

    let url = "https://maps.geo.us-west-2.amazonaws.com/v2/tiles/8/43/89";
    let signed = helper.transform_request(url, Some(ResourceKind::Tile))?;
    println!("signed tile URL:\n{signed}");

    // Style documents on the standalone maps API are public and pass through.
    let style = "https://maps.geo.us-west-2.amazonaws.com/v2/styles/Standard/descriptor";
    let unsigned = helper.transform_request(style, Some(ResourceKind::Style))?;
    println!("style URL (unchanged):\n{unsigned}");

    Ok(())
}
