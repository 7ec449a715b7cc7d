//! CLI front end: transcribe files, chat about transcripts, manage config.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use transcriptor::{
    config, paths, run_pipeline, AppConfig, CancelFlag, ChatClient, ChatConfig, ChatError,
    ConversationMemory, LogObserver, PipelineOptions, PipelineOutcome, RemoteSttBackend,
    RemoteSttConfig, Summarizer,
};

#[derive(Parser)]
#[command(name = "transcriptor", version, about = "Convert audio/video to text and chat with an AI about it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a media file (.mp4, .ogg, .mp3, .wav) and summarize it
    Transcribe {
        /// Input media file
        input: PathBuf,
        /// Directory for the transcript artifact
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Segment length in seconds
        #[arg(long)]
        segment_length: Option<f64>,
        /// Recognition language code, e.g. "es" or "en"
        #[arg(long)]
        language: Option<String>,
        /// Skip the automatic summary request
        #[arg(long)]
        no_summary: bool,
    },
    /// Chat with the assistant, optionally about a transcript file
    Chat {
        /// Transcript file to discuss
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Show or update stored configuration
    Config {
        /// Chat API key (stored base64-encoded)
        #[arg(long)]
        api_key: Option<String>,
        /// Dedicated speech-to-text API key
        #[arg(long)]
        stt_api_key: Option<String>,
        /// Chat model name
        #[arg(long)]
        chat_model: Option<String>,
        /// Speech-to-text model name
        #[arg(long)]
        stt_model: Option<String>,
        /// Recognition language code
        #[arg(long)]
        language: Option<String>,
    },
}

fn init_logger() -> Result<(), fern::InitError> {
    let log_file = paths::log_dir()?.join("transcriptor.log");

    let format = |out: fern::FormatCallback<'_>, message: &std::fmt::Arguments<'_>, record: &log::Record| {
        out.finish(format_args!(
            "[{}][{}][{:?}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.target(),
            record.level(),
            message
        ))
    };

    fern::Dispatch::new()
        .format(format)
        .level(log::LevelFilter::Debug)
        .chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Info)
                .chain(std::io::stdout()),
        )
        .chain(fern::log_file(&log_file)?)
        .apply()?;
    Ok(())
}

fn load_or_default_config() -> AppConfig {
    match config::load_config(&paths::config_path()) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

fn chat_client(app_config: &AppConfig) -> Result<ChatClient, ChatError> {
    let api_key = app_config.api_key().ok_or(ChatError::NotConfigured)?;
    ChatClient::new(ChatConfig::new(
        app_config.chat_url.clone(),
        app_config.chat_model.clone(),
        api_key,
    ))
}

async fn run_transcribe(
    input: PathBuf,
    output_dir: PathBuf,
    segment_length: Option<f64>,
    language: Option<String>,
    no_summary: bool,
) -> Result<(), String> {
    let app_config = load_or_default_config();
    let options = PipelineOptions {
        input,
        output_dir,
        segment_length_secs: segment_length.unwrap_or(app_config.segment_length_secs),
        language: language.unwrap_or_else(|| app_config.language.clone()),
    };

    let backend = RemoteSttBackend::new(RemoteSttConfig::new(
        app_config.stt_url.clone(),
        app_config.stt_model.clone(),
        app_config.stt_api_key(),
    ))?;
    let chat = if no_summary {
        None
    } else {
        chat_client(&app_config).ok()
    };

    let cancel = CancelFlag::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Cancellation requested");
            ctrl_c_cancel.cancel();
        }
    });

    let summarizer = chat.as_ref().map(|client| client as &dyn Summarizer);
    let report = run_pipeline(&options, &backend, summarizer, &cancel, &LogObserver)
        .await
        .map_err(|e| e.to_string())?;

    match report.outcome {
        PipelineOutcome::Cancelled => {
            println!(
                "Cancelled after {}/{} segments; no transcript was saved.",
                report.ok_count + report.fail_count,
                report.total
            );
        }
        PipelineOutcome::Done => {
            println!(
                "Transcribed {} segments in {:.0}s ({} ok, {} failed).",
                report.total, report.elapsed_secs, report.ok_count, report.fail_count
            );
            if let Some(path) = &report.transcript_path {
                println!("Transcript: {}", path.display());
            }
            if let Some(summary) = &report.summary {
                println!("\n## Transcript summary\n{}", summary);
            }
        }
    }
    Ok(())
}

async fn run_chat(transcript: Option<PathBuf>) -> Result<(), String> {
    let app_config = load_or_default_config();
    let client = chat_client(&app_config).map_err(|e| e.to_string())?;
    let mut memory = ConversationMemory::new();

    if let Some(path) = transcript {
        let text = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
        // Seed the window so the assistant has the transcript in context
        // without spending a request on it.
        memory.record(
            format!("Here is the transcript we will talk about:\n\n{}", text),
            "Understood. Ask me anything about this transcript.".to_string(),
        );
        println!("Loaded transcript from {}", path.display());
    }

    println!("Chat ready. Type a message, or \"exit\" to quit.");
    let stdin = tokio::io::stdin();
    let mut lines = tokio::io::BufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await.map_err(|e| e.to_string())?;
        stdout.flush().await.map_err(|e| e.to_string())?;
        let line = match lines.next_line().await.map_err(|e| e.to_string())? {
            Some(line) => line,
            None => break,
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        match client.chat(&mut memory, message).await {
            Ok(reply) => println!("{}\n", reply),
            Err(e) => eprintln!("{}\n", e),
        }
    }
    Ok(())
}

fn run_config(
    api_key: Option<String>,
    stt_api_key: Option<String>,
    chat_model: Option<String>,
    stt_model: Option<String>,
    language: Option<String>,
) -> Result<(), String> {
    let path = paths::config_path();
    let mut app_config = load_or_default_config();
    let mut changed = false;

    if let Some(key) = api_key {
        app_config.set_api_key(&key);
        changed = true;
    }
    if let Some(key) = stt_api_key {
        app_config.set_stt_api_key(&key);
        changed = true;
    }
    if let Some(model) = chat_model {
        app_config.chat_model = model;
        changed = true;
    }
    if let Some(model) = stt_model {
        app_config.stt_model = model;
        changed = true;
    }
    if let Some(lang) = language {
        app_config.language = lang;
        changed = true;
    }

    if changed {
        config::save_config(&path, &app_config)?;
        println!("Configuration saved to {}", path.display());
    } else {
        println!("Config file: {}", path.display());
        println!("  chat model:     {}", app_config.chat_model);
        println!("  stt model:      {}", app_config.stt_model);
        println!("  language:       {}", app_config.language);
        println!("  segment length: {}s", app_config.segment_length_secs);
        println!(
            "  api key:        {}",
            if app_config.api_key().is_some() { "configured" } else { "not set" }
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logger() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Transcribe {
            input,
            output_dir,
            segment_length,
            language,
            no_summary,
        } => run_transcribe(input, output_dir, segment_length, language, no_summary).await,
        Command::Chat { transcript } => run_chat(transcript).await,
        Command::Config {
            api_key,
            stt_api_key,
            chat_model,
            stt_model,
            language,
        } => run_config(api_key, stt_api_key, chat_model, stt_model, language),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
