//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::MoloniClient;
use crate::config::MoloniConfig;
use crate::error::{Error, Result};
use crate::resources::{self, Endpoint};
use crate::types::{Id, JsonValue};
use serde_json::json;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Token => self.token().await,
            Commands::Endpoints { resource } => self.endpoints(resource.as_deref()),
            Commands::Companies => self.companies().await,
            Commands::Call {
                resource,
                action,
                params,
                company_id,
            } => {
                self.call(resource, action, params.as_deref(), *company_id)
                    .await
            }
        }
    }

    /// Config file (if given) overridden by the environment
    fn load_config(&self) -> Result<MoloniConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                MoloniConfig::from_file(path)?
            }
            None => MoloniConfig::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn client(&self) -> Result<MoloniClient> {
        MoloniClient::new(self.load_config()?)
    }

    async fn token(&self) -> Result<()> {
        let client = self.client()?;
        let token = client.authenticator().token().await?;

        self.output_message(&json!({
            "type": "TOKEN",
            "token": {
                "access_token": redact(&token.access_token),
                "expires_at": token.expires_at.map(|t| t.to_rfc3339()),
                "expires_in": token.remaining_secs(),
                "has_refresh_token": token.refresh_token.is_some()
            }
        }));
        Ok(())
    }

    fn endpoints(&self, resource: Option<&str>) -> Result<()> {
        let endpoints: Vec<Endpoint> = resources::all_endpoints()
            .into_iter()
            .filter(|e| resource.map_or(true, |r| e.resource.eq_ignore_ascii_case(r)))
            .collect();

        if let (Some(resource), true) = (resource, endpoints.is_empty()) {
            return Err(Error::UnknownEndpoint {
                resource: resource.to_string(),
                action: "*".to_string(),
            });
        }

        let listed: Vec<JsonValue> = endpoints
            .iter()
            .map(|e| {
                json!({
                    "resource": e.resource,
                    "action": e.action,
                    "template": e.template()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "ENDPOINTS",
            "endpoints": listed
        }));
        Ok(())
    }

    async fn companies(&self) -> Result<()> {
        let client = self.client()?;
        let companies = client.companies().get_all().await?;

        let listed: Vec<JsonValue> = companies
            .iter()
            .map(|c| {
                json!({
                    "company_id": c.company_id,
                    "name": c.name,
                    "vat": c.vat
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "COMPANIES",
            "companies": listed
        }));
        Ok(())
    }

    async fn call(
        &self,
        resource: &str,
        action: &str,
        params: Option<&str>,
        company_id: Option<Id>,
    ) -> Result<()> {
        let endpoint = resources::resolve_endpoint(resource, action)?;
        let client = self.client()?;

        let company_id = company_id.or(client.config().company_id);
        let params = prepare_params(endpoint, params, company_id)?;
        debug!("Calling {endpoint} with {params}");

        let data = client.call_raw(endpoint, params).await?;

        self.output_message(&json!({
            "type": "RESULT",
            "endpoint": endpoint.name(),
            "data": data
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Parse `--params` and add `company_id` when the object lacks it.
///
/// Endpoints outside a company scope (`companies/getAll`, global data) are
/// left untouched.
fn prepare_params(endpoint: Endpoint, raw: Option<&str>, company_id: Option<Id>) -> Result<JsonValue> {
    let mut params: JsonValue = match raw {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
        _ => json!({}),
    };

    let Some(object) = params.as_object_mut() else {
        return Err(Error::validation(
            "RawParams",
            "params",
            "must be a JSON object",
        ));
    };

    if let Some(company_id) = company_id {
        if needs_company(endpoint) && !object.contains_key("company_id") {
            object.insert("company_id".to_string(), json!(company_id));
        }
    }

    Ok(params)
}

fn needs_company(endpoint: Endpoint) -> bool {
    !(endpoint == resources::companies::GET_ALL
        || resources::global_data::ENDPOINTS.contains(&endpoint))
}

/// Keep only a short prefix of a secret
fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}***")
}
