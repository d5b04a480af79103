use clap::Parser;
use orthotree::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("orthotree=debug,info")
    } else {
        EnvFilter::new("orthotree=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = cli::load_config(cli.config.as_deref(), cli.threads)?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
        .ok();

    match cli.command {
        cli::Commands::Download(args) => {
            cli::download::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Cluster(args) => {
            cli::cluster::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Orthologs(args) => {
            cli::orthologs::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Extract(args) => {
            cli::extract::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Trees(args) => {
            cli::trees::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Consensus(args) => {
            cli::consensus::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Supertree(args) => {
            cli::supertree::run(args, &config, cli.format, cli.verbose)?;
        }
        cli::Commands::Config => {
            cli::config::run(&config, cli.format)?;
        }
    }

    Ok(())
}
