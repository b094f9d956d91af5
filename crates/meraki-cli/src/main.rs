use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use meraki_dashboard::{EndpointRegistry, HttpTransport};
use meraki_gateway::DynamicExecutor;
use meraki_tools::{register_api_tools, register_common_tools, McpServer, ToolRegistry};
use meraki_types::Settings;

/// Meraki MCP -- policy-gated MCP server for the Meraki Dashboard API.
#[derive(Parser, Debug)]
#[command(name = "meraki-mcp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP stdio server (the default when no command is given)
    Serve,

    /// List the API sections the gateway exposes
    Sections,

    /// List the methods of one API section with their classification
    Methods {
        /// Section name (e.g. devices, organizations, wireless)
        section: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the MCP protocol; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Sections => {
            let registry = EndpointRegistry::new();
            for (section, count) in registry.sections() {
                println!("{section} ({count} methods)");
            }
            Ok(())
        }
        Commands::Methods { section } => {
            let registry = EndpointRegistry::new();
            let methods = registry
                .methods(&section)
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            for capability in methods {
                let tag = if capability.is_mutating() { "mutating" } else { "read-only" };
                println!("{} [{tag}]", capability.name());
            }
            Ok(())
        }
    }
}

async fn serve() -> Result<()> {
    let settings = Arc::new(Settings::from_env());
    let registry = Arc::new(EndpointRegistry::new());
    let tools = ToolRegistry::new();

    if settings.api_key.is_empty() {
        tracing::warn!("MERAKI_API_KEY not set; dashboard tools not registered");
    } else {
        let transport: Arc<dyn meraki_dashboard::DashboardTransport> =
            Arc::new(HttpTransport::new(settings.api_key.clone())?);
        let executor = Arc::new(DynamicExecutor::new(
            Arc::clone(&registry),
            Arc::clone(&transport),
            Arc::clone(&settings),
        ));

        register_api_tools(&tools, executor, Arc::clone(&registry))?;
        register_common_tools(&tools, &registry, transport)?;

        tracing::info!(
            sections = registry.sections().len(),
            capabilities = registry.capability_count(),
            tools = tools.tool_count(),
            mutations_allowed = settings.allow_mutations,
            "meraki-mcp ready"
        );
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    McpServer::new(tools).run(stdin, stdout).await
}
