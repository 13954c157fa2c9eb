mod chat;
mod config;

use anyhow::{Context, Result};
use chat::MeshExport;
use clap::{Parser, Subcommand};
use config::{ChatConfig, ChatOverrides};
use meshchat_llm::{
    ChatSession, Conversation, GenerationParams, OllamaBackend, DEFAULT_TEMPERATURE,
    MAX_NEW_TOKENS_LIMIT,
};
use meshchat_mesh::{colorize_obj, load_glb, Axis};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshchat")]
#[command(about = "Chat with a mesh-generating model and export its meshes as GLB", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a reply from the model. Without MESSAGE, reads messages from stdin
    Chat {
        /// Message to send. Omit for an interactive session (`/clear` resets history)
        message: Option<String>,

        /// Sampling temperature in [0, 1]; 0 selects greedy decoding
        #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f32,

        /// Maximum number of generated tokens (at most 4096)
        #[arg(long, default_value_t = MAX_NEW_TOKENS_LIMIT)]
        max_new_tokens: u32,

        /// Seconds to wait for each fragment before truncating the reply.
        /// Defaults to MESHCHAT_FRAGMENT_TIMEOUT_SECS or 10
        #[arg(long)]
        timeout: Option<f64>,

        /// Model name. Defaults to MESHCHAT_MODEL or llama-mesh
        #[arg(short, long)]
        model: Option<String>,

        /// Backend URL. Defaults to MESHCHAT_ENDPOINT or http://localhost:11434
        #[arg(short, long)]
        endpoint: Option<String>,

        /// System prompt prepended to every request
        #[arg(long)]
        system: Option<String>,

        /// Colorize the mesh found in the reply and write it here as GLB
        #[arg(long)]
        mesh_out: Option<PathBuf>,

        /// Axis used for the color gradient of --mesh-out
        #[arg(long, default_value_t = Axis::Y)]
        axis: Axis,
    },

    /// Color an OBJ mesh from blue (low) to red (high) and save it as GLB
    Colorize {
        /// OBJ file to read
        input: PathBuf,

        /// GLB file to write
        #[arg(short, long, default_value = "gradient_mesh.glb")]
        output: PathBuf,

        /// Axis the gradient follows
        #[arg(long, default_value_t = Axis::Y)]
        axis: Axis,
    },

    /// Print vertex/face counts and extents of a GLB file
    Inspect {
        /// GLB file to read
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            temperature,
            max_new_tokens,
            timeout,
            model,
            endpoint,
            system,
            mesh_out,
            axis,
        } => {
            let config = ChatConfig::from_env(ChatOverrides {
                endpoint,
                model,
                timeout_secs: timeout,
            })?;

            let params = GenerationParams::new(temperature, max_new_tokens)?;
            let export = mesh_out.map(|path| MeshExport { path, axis });
            run_chat(config, params, message, system, export).await?;
        }
        Commands::Colorize {
            input,
            output,
            axis,
        } => {
            colorize(input, output, axis)?;
        }
        Commands::Inspect { file } => {
            inspect(file)?;
        }
    }

    Ok(())
}

async fn run_chat(
    config: ChatConfig,
    params: GenerationParams,
    message: Option<String>,
    system: Option<String>,
    export: Option<MeshExport>,
) -> Result<()> {
    let client_config = config.client_config();
    let backend = Arc::new(OllamaBackend::new(&client_config));
    tracing::info!(
        "chatting with {} at {} (timeout {:?})",
        config.model,
        backend.endpoint(),
        config.fragment_timeout
    );

    let mut conversation = Conversation::new();
    if let Some(system) = system {
        conversation = conversation.with_system_prompt(system);
    }
    let mut session = ChatSession::new(backend, client_config).with_conversation(conversation);
    let mut stdout = std::io::stdout();

    match message {
        Some(message) => {
            let reply = chat::run_turn(&mut session, &message, &params, &mut stdout).await?;
            if let Some(export) = &export {
                if chat::export_reply_mesh(&reply.text, export)? {
                    eprintln!("Mesh written to {}", export.path.display());
                } else {
                    tracing::warn!("reply contains no mesh; {} not written", export.path.display());
                }
            }
        }
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            chat::interactive(&mut session, &params, export.as_ref(), stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

fn colorize(input: PathBuf, output: PathBuf, axis: Axis) -> Result<()> {
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let glb = colorize_obj(&text, axis)
        .with_context(|| format!("failed to colorize {}", input.display()))?;
    chat::write_file(&output, &glb)?;

    tracing::info!("wrote {} bytes", glb.len());
    println!("{}", output.display());
    Ok(())
}

fn inspect(file: PathBuf) -> Result<()> {
    let colored =
        load_glb(&file).with_context(|| format!("failed to read {}", file.display()))?;
    let mesh = &colored.mesh;

    println!("{}", file.display());
    println!("  vertices: {}", mesh.vertex_count());
    println!("  faces:    {}", mesh.face_count());
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        if let Ok((min, max)) = mesh.extent(axis) {
            println!("  {axis}: {min} .. {max}");
        }
    }
    Ok(())
}
