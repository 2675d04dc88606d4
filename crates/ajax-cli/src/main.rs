use ajax_common::{AjaxConfig, DEFAULT_CONVERSATION_ID, Mode};
use ajax_core::ChatService;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Command-line arguments for the Ajax CLI
#[derive(Parser)]
#[command(name = "ajax", about = "Ajax - your assistant while you're here, you while you're away")]
pub struct Args {
    /// Path to the TOML config file
    #[clap(short, long, default_value = "ajax.toml")]
    config: PathBuf,

    /// Enable debug mode
    #[clap(short, long)]
    debug: bool,

    /// Path to the data directory
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// Completion model; without one replies are framed locally
    #[clap(long)]
    model: Option<String>,

    /// Conversation to chat in
    #[clap(long, default_value = DEFAULT_CONVERSATION_ID)]
    conversation: String,

    /// Who is typing; a principal username switches to assistant mode
    #[clap(long)]
    user: Option<String>,

    /// Keep everything in memory instead of the data directory
    #[clap(long)]
    ephemeral: bool,

    /// List registered agents and exit
    #[clap(long)]
    list_agents: bool,
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow().bold());
    println!("  {}  show the status board", "/status".bright_blue());
    println!("  {}   show the task queue", "/tasks".bright_blue());
    println!("  {}  list agents", "/agents".bright_blue());
    println!("  {}    leave", "quit".bright_blue());
    println!();
}

fn speaker(mode: Mode, display_name: &str) -> ColoredString {
    match mode {
        Mode::Assistant => "Ajax: ".bright_green().bold(),
        Mode::Principal => format!("Ajax (as {}): ", display_name).bright_magenta().bold(),
    }
}

/// Local commands handled without touching the chat service's router
async fn handle_local(service: &ChatService, input: &str) -> Result<bool> {
    match input.to_lowercase().as_str() {
        "/help" => print_help(),
        "/status" => {
            let snapshot = service.status().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?.bright_cyan());
        }
        "/tasks" => {
            let tasks = service.tasks().await?;
            if tasks.is_empty() {
                println!("{}", "No tasks queued.".white());
            }
            for task in tasks {
                println!(
                    "{} {} {}",
                    format!("#{}", task.id).bright_yellow(),
                    task.description,
                    format!("({:?})", task.status).to_lowercase().bright_blue()
                );
            }
        }
        "/agents" => {
            for name in service.list_agents().await {
                println!("• {}", name.bright_green());
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}

async fn conversation_loop(service: &ChatService, args: &Args, display_name: &str) -> Result<()> {
    println!(
        "{}",
        "💬 Ajax is listening. Type 'quit' or 'exit' to stop, '/help' for commands.".bright_green()
    );
    println!();

    loop {
        print!("{}", "You: ".bright_cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if matches!(input.to_lowercase().as_str(), "quit" | "exit") {
            println!("{}", "👋 Goodbye!".bright_green());
            break;
        }
        if handle_local(service, input).await? {
            continue;
        }

        match service
            .chat_as(Some(&args.conversation), input, args.user.as_deref())
            .await
        {
            Ok(reply) => {
                println!("{}{}", speaker(service.mode(), display_name), reply.reply);
            }
            Err(e) => {
                error!("Chat failed: {}", e);
                println!("{}", format!("❌ Error: {}", e).red());
            }
        }
        println!();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Setup tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AjaxConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(model) = &args.model {
        config.provider.model = Some(model.clone());
    }
    let display_name = config.principal.display_name.clone();

    let mut builder = ChatService::builder(config).with_configured_collaborators();
    if args.ephemeral {
        builder = builder.in_memory();
    }
    let service = builder.build().await?;

    if args.list_agents {
        println!("{}", "🤖 Registered agents:".bright_cyan().bold());
        println!();
        for name in service.list_agents().await {
            println!("• {}", name.bright_green().bold());
        }
        return Ok(());
    }

    info!("Starting Ajax CLI in conversation {}", args.conversation);
    conversation_loop(&service, &args, &display_name).await
}
