//! Turn `RESOURCE OPERATION key=value...` into a typed-client call

use tracing::{debug, info};

use melange_client::{Arguments, CapabilityRegistry, ClientFactory, FactoryConfig, ResourceClient};

use crate::cli::Cli;
use crate::config;
use crate::error::CliError;
use crate::output;

const TENANT_REQUIRED: &str =
    "Please provide a tenant id for this action. You can use option '-t' to provide the tenant id.";

/// Run one command line to completion
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::load(&cli.global)?;
    debug!("resolved settings for {}:{}", settings.host, settings.port);

    let Some(resource) = cli.resource else {
        return output::print_output(&list_resources());
    };

    let factory = ClientFactory::new(FactoryConfig::from(settings));
    let client = factory.resolve(&resource)?;

    let Some(operation) = cli.operation else {
        return output::print_output(&describe_operations(&resource, client.as_ref()));
    };

    let args = parse_arguments(&cli.args)?;
    if client.tenant_required() && factory.config().tenant_id.is_none() {
        return Err(CliError::Usage(TENANT_REQUIRED.to_string()));
    }

    info!("{} {} {:?}", resource, operation, args);
    let registry = CapabilityRegistry::new(client.as_ref());
    match registry.invoke(&operation, &args).await? {
        Some(value) => {
            let rendered = output::render(cli.global.output, client.envelope_key(&operation), value)?;
            output::print_output(&rendered)
        }
        None => Ok(()),
    }
}

/// Parse `key=value` words; anything else is a usage error
pub fn parse_arguments(raw: &[String]) -> Result<Arguments, CliError> {
    raw.iter()
        .map(|word| {
            word.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| CliError::Usage(format!("Action arguments should be of the form of field=value, got '{word}'")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// Help text listing every resource
pub fn list_resources() -> String {
    let mut lines = vec!["Available resources:".to_string()];
    lines.extend(ClientFactory::resource_names().map(|name| format!("    {name}")));
    lines.join("\n")
}

/// Help text listing the operations of one resource
pub fn describe_operations(resource: &str, client: &dyn ResourceClient) -> String {
    let registry = CapabilityRegistry::new(client);
    let mut lines = vec![format!("Available operations for {resource}:")];
    lines.extend(
        registry
            .describe()
            .into_iter()
            .map(|usage| format!("    {resource} {usage}")),
    );
    lines.join("\n")
}
