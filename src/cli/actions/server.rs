use crate::api;
use crate::cli::actions::Action;
use crate::credentials::AuthConfig;
use anyhow::Result;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            issuer,
            otp_window,
        } => {
            // Fail fast on a malformed DSN instead of inside the pool
            if let Some(dsn) = &dsn {
                Url::parse(dsn)?;
            }

            let config = AuthConfig::new(issuer).with_otp_window(otp_window);

            api::new(port, dsn, config).await?;
        }
    }

    Ok(())
}
