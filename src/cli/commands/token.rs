use anyhow::anyhow;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::fixtures::demo_login;

pub fn handle(user_id: i64, login: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let login = login
        .or_else(|| demo_login(user_id).map(str::to_string))
        .ok_or_else(|| anyhow!("No login given and user {} is not a demo user", user_id))?;

    let claims = Claims::new(login.as_str(), user_id);
    let token = generate_jwt(&claims)?;

    output_success(
        &output_format,
        &format!("Token issued for {} (id {})", login, user_id),
        Some(json!({
            "token": token,
            "expires_at": claims.exp,
        })),
    )
}
