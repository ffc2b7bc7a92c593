mod preview;
mod serve;
mod server_utils;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use labsite::{
    BuildOptions, DataServiceOptions, HttpSource, SiteMeta, build, logging::init_logging,
    routes::ROUTES,
};
use log::error;
use preview::start_preview_web_server;
use serve::{AppState, start_server};
use server_utils::DEFAULT_PORT;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the data service, e.g. `https://api.lab.example`
    #[arg(long, global = true, env = "LABSITE_API_URL")]
    api_url: Option<String>,

    /// Timeout of every request to the data service, in seconds
    #[arg(long, global = true, env = "LABSITE_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Only print errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pre-render every page of the site
    Build {
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,

        /// Keep files from a previous build
        #[arg(long)]
        no_clean: bool,

        #[command(flatten)]
        site: SiteArgs,
    },
    /// Render pages on request from the data service
    Serve {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        site: SiteArgs,
    },
    /// Serve the output of a previous build
    Preview {
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args)]
struct SiteArgs {
    /// Public URL of the site, used for canonical links
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    #[arg(long, default_value = "Research Lab")]
    site_name: String,

    /// Keywords added to every page, comma separated
    #[arg(long = "keywords", value_delimiter = ',')]
    keywords: Vec<String>,
}

impl SiteArgs {
    fn site_meta(&self) -> SiteMeta {
        SiteMeta {
            name: self.site_name.clone(),
            keywords: self.keywords.clone(),
            ..SiteMeta::default()
        }
    }
}

#[derive(Args)]
struct ServerArgs {
    /// Expose the server to your network
    #[arg(long)]
    host: bool,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "labsite", "{}", err.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Build {
            out_dir,
            no_clean,
            site,
        } => {
            let source = HttpSource::new(&data_service_options(cli.api_url, cli.timeout)?);
            let options = BuildOptions {
                base_url: site.base_url.clone(),
                output_dir: out_dir,
                static_dir: site.static_dir.clone(),
                clean_output_dir: !no_clean,
                site: site.site_meta(),
            };

            build(ROUTES, &source, &options)?;
        }
        Commands::Serve { server, site } => {
            let source = HttpSource::new(&data_service_options(cli.api_url, cli.timeout)?);
            let state = AppState {
                source: Arc::new(source),
                routes: ROUTES,
                site: Arc::new(site.site_meta()),
                base_url: site.base_url.as_deref().map(Arc::from),
            };

            runtime()?.block_on(start_server(state, site.static_dir, server.host, server.port))?;
        }
        Commands::Preview { out_dir, server } => {
            if !out_dir.exists() {
                return Err(format!(
                    "The output directory {} does not exist. Please run `labsite build` first.",
                    out_dir.display()
                )
                .into());
            }

            runtime()?.block_on(start_preview_web_server(out_dir, server.host, server.port))?;
        }
    }

    Ok(())
}

fn data_service_options(
    api_url: Option<String>,
    timeout: u64,
) -> Result<DataServiceOptions, Box<dyn std::error::Error>> {
    let api_url = api_url.ok_or("Missing data service URL, pass --api-url or set LABSITE_API_URL")?;

    Ok(DataServiceOptions {
        timeout: Duration::from_secs(timeout),
        ..DataServiceOptions::new(api_url)
    })
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}
