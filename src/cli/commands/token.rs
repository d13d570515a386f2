use clap::Subcommand;
use serde_json::json;

use crate::auth::token;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Verify a token and print its claims")]
    Decode {
        #[arg(help = "Identity token string")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Decode { token } => {
            let claims = token::verify(&token)?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "user_id": claims.user_id,
                            "issued_at": claims.iat,
                            "expires_at": claims.expires_at(),
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("user_id   : {}", claims.user_id);
                    println!("issued_at : {}", claims.iat);
                    match claims.expires_at() {
                        Some(expires_at) => println!("expires_at: {}", expires_at),
                        None => println!("expires_at: (invalid timestamp)"),
                    }
                }
            }
            Ok(())
        }
    }
}
