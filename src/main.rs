//! agent-answer binary entry point.

use std::io::Read;

use agent_answer::cli::{AskArgs, Cli, Commands};
use agent_answer::config::AnswerConfig;
use agent_answer::handler::{handle_body, into_envelope};
use agent_answer::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(&cli.log);

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AnswerConfig::load(cli.config.as_deref())?;
    let pipeline = Pipeline::from_config(&config)?;

    match cli.command {
        Commands::Ask(args) => handle_ask(&pipeline, args).await,
        Commands::Handle => handle_stdin(&pipeline).await,
    }
}

async fn handle_ask(pipeline: &Pipeline, args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session_id = args.session_id();
    let response = pipeline.handle(&args.query, &session_id).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn handle_stdin(pipeline: &Pipeline) -> Result<(), Box<dyn std::error::Error>> {
    let mut body = String::new();
    std::io::stdin().read_to_string(&mut body)?;
    let envelope = into_envelope(handle_body(pipeline, &body).await);
    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}
