use clap::Parser;
use clara_chat::app;
use clara_chat::output::print_usage_instructions;
use clara_chat::{ClaraClient, DEFAULT_ENDPOINT};
use colored::*;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Terminal chat client for Clara
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The question to ask Clara
    #[arg(index = 1)]
    question: Option<String>,

    /// Enter interactive chat mode
    #[arg(short, long, default_value_t = false)]
    interactive: bool,

    /// URL of the Query Service's /consulta endpoint
    #[arg(long, env = "CLARA_API_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = ClaraClient::new(args.endpoint);

    if args.interactive {
        if let Err(e) = app::run_interactive_chat(&client).await {
            error!(error = %e, "Interactive chat failed");
            eprintln!("{}", format!("Interactive chat failed: {}", e).red());
            return Err(e);
        }
    } else if let Some(question) = args.question {
        app::run_single_query(question, &client).await?;
    } else {
        print_usage_instructions();
    }

    Ok(())
}
