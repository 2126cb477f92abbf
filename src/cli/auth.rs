use super::spinner;
use crate::{
    config::{self, Config},
    error,
    spotify::auth::AuthorizationFlow,
    success,
};

pub async fn auth(config: &Config, scope: Option<String>) {
    let scope = scope.unwrap_or_else(|| config.scope.clone());
    let flow = AuthorizationFlow::from_config(config);

    let pb = spinner("Waiting for the authorization redirect...");
    let result = flow.run(&scope).await;
    pb.finish_and_clear();

    match result {
        Ok(code) => {
            success!("Authorization code obtained.");
            println!("{}={}", config::AUTH_CODE, code);
            success!(
                "Add the line above to {} to use it for playlist commands.",
                config::env_path().display()
            );
        }
        Err(e) => error!("Authorization code not obtained. Err: {}", e),
    }
}
