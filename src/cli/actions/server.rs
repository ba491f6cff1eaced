use crate::api;
use crate::api::handlers::auth::AuthConfig;
use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

/// Validated server configuration assembled by dispatch.
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub secret: SecretString,
    pub refresh_token_ttl_seconds: i64,
    pub access_token_ttl_seconds: i64,
    pub session_cookie_ttl_seconds: i64,
    pub production: bool,
}

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server(args) => {
            let auth_config = AuthConfig::new(args.secret)
                .with_refresh_token_ttl_seconds(args.refresh_token_ttl_seconds)
                .with_access_token_ttl_seconds(args.access_token_ttl_seconds)
                .with_session_cookie_ttl_seconds(args.session_cookie_ttl_seconds)
                .with_production(args.production);

            api::new(args.port, args.dsn, auth_config).await?;
        }
    }

    Ok(())
}
