use anyhow::Context;
use meshchat_llm::{ChatSession, GenerationParams, Reply, Termination};
use meshchat_mesh::{colorize_obj, extract_obj_text, Axis};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Resets the conversation in interactive mode.
pub const CLEAR_COMMAND: &str = "/clear";

/// Where and how to export meshes found in replies.
#[derive(Debug, Clone)]
pub struct MeshExport {
    pub path: PathBuf,
    pub axis: Axis,
}

/// Send one message and write the reply to `out` as it grows
///
/// A reply that failed before producing any text is an error. Truncated
/// replies are returned as they are.
pub async fn run_turn<W: Write>(
    session: &mut ChatSession,
    message: &str,
    params: &GenerationParams,
    out: &mut W,
) -> anyhow::Result<Reply> {
    let mut printed = 0;
    let mut write_error = None;
    let reply = session
        .respond(message, params.clone(), |text| {
            let delta = text.get(printed..).unwrap_or_default();
            if let Err(e) = out.write_all(delta.as_bytes()).and_then(|_| out.flush()) {
                write_error.get_or_insert(e);
            }
            printed = text.len();
        })
        .await?;
    if let Some(e) = write_error {
        return Err(e).context("failed to write reply");
    }
    writeln!(out)?;

    match &reply.termination {
        Termination::Failed(msg) if reply.text.is_empty() => {
            anyhow::bail!("generation failed: {msg}")
        }
        Termination::Disconnected if reply.text.is_empty() => {
            anyhow::bail!("generation worker stopped without a reply")
        }
        termination if !reply.is_complete() => {
            tracing::warn!("reply truncated: {}", termination);
        }
        _ => {}
    }
    Ok(reply)
}

/// Colorize the mesh contained in `reply` and write it to the export path
///
/// Returns `Ok(false)` when the reply holds no mesh.
pub fn export_reply_mesh(reply: &str, export: &MeshExport) -> anyhow::Result<bool> {
    let Some(obj) = extract_obj_text(reply) else {
        return Ok(false);
    };
    let glb = colorize_obj(&obj, export.axis).context("reply does not contain a usable mesh")?;
    write_file(&export.path, &glb)?;
    Ok(true)
}

/// Read messages line by line until end of input
pub async fn interactive<R, W>(
    session: &mut ChatSession,
    params: &GenerationParams,
    export: Option<&MeshExport>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == CLEAR_COMMAND {
            session.clear();
            writeln!(out, "(history cleared)")?;
            continue;
        }

        let reply = match run_turn(session, message, params, out).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("{:#}", e);
                continue;
            }
        };

        if let Some(export) = export {
            match export_reply_mesh(&reply.text, export) {
                Ok(true) => writeln!(out, "(mesh written to {})", export.path.display())?,
                Ok(false) => {}
                Err(e) => tracing::warn!("{:#}", e),
            }
        }
    }
}

pub fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshchat_llm::{ClientConfig, FinishReason, ScriptedBackend};
    use std::sync::Arc;
    use std::time::Duration;

    const TRIANGLE_REPLY: [&str; 5] = [
        "Here you go:\n",
        "v 0 0 0\n",
        "v 1 0 0\n",
        "v 0 1 0\n",
        "f 1 2 3\n",
    ];

    fn session(backend: ScriptedBackend, timeout: Duration) -> ChatSession {
        let config = ClientConfig::new("test").with_fragment_timeout(timeout);
        ChatSession::new(Arc::new(backend), config)
    }

    #[tokio::test]
    async fn test_run_turn_prints_reply() {
        let mut session = session(
            ScriptedBackend::new(["Hello", ", ", "mesh"]),
            Duration::from_secs(1),
        );
        let mut out = Vec::new();
        let reply = run_turn(&mut session, "hi", &GenerationParams::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(reply.text, "Hello, mesh");
        assert_eq!(String::from_utf8(out).unwrap(), "Hello, mesh\n");
        assert_eq!(session.conversation().exchanges().len(), 1);
    }

    #[tokio::test]
    async fn test_run_turn_keeps_truncated_reply() {
        let backend = ScriptedBackend::new(["partial", " never"]).with_stall_after(1);
        let mut session = session(backend, Duration::from_millis(50));
        let mut out = Vec::new();
        let reply = run_turn(&mut session, "hi", &GenerationParams::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(reply.text, "partial");
        assert!(matches!(reply.termination, Termination::TimedOut(_)));
    }

    #[tokio::test]
    async fn test_run_turn_fails_without_text() {
        let mut session = session(ScriptedBackend::failing("offline"), Duration::from_secs(1));
        let mut out = Vec::new();
        let err = run_turn(&mut session, "hi", &GenerationParams::default(), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(session.conversation().pending().is_none());
    }

    #[tokio::test]
    async fn test_interactive_clear_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let export = MeshExport {
            path: dir.path().join("out").join("mesh.glb"),
            axis: Axis::Y,
        };
        let backend = ScriptedBackend::new(TRIANGLE_REPLY).with_finish_reason(FinishReason::Stop);
        let mut session = session(backend, Duration::from_secs(1));

        let input: &[u8] = b"a triangle please\n\n/clear\n";
        let mut out = Vec::new();
        interactive(
            &mut session,
            &GenerationParams::default(),
            Some(&export),
            input,
            &mut out,
        )
        .await
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("f 1 2 3"));
        assert!(out.contains("(mesh written to"));
        assert!(out.contains("(history cleared)"));
        assert!(session.conversation().is_empty());

        let mesh = meshchat_mesh::load_glb(&export.path).unwrap();
        assert_eq!(mesh.mesh.face_count(), 1);
    }

    #[test]
    fn test_export_without_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let export = MeshExport {
            path: dir.path().join("mesh.glb"),
            axis: Axis::Y,
        };
        assert!(!export_reply_mesh("I can't draw that.", &export).unwrap());
        assert!(!export.path.exists());
    }

    #[test]
    fn test_export_flat_mesh_fails() {
        let dir = tempfile::tempdir().unwrap();
        let export = MeshExport {
            path: dir.path().join("mesh.glb"),
            axis: Axis::Y,
        };
        let reply = "v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n";
        assert!(export_reply_mesh(reply, &export).is_err());
    }
}
