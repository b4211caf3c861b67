//! Agent-side runner
//!
//! Reads harness lines, keeps a [`RemoteState`] mirror of the game and answers
//! decision requests with the agent's choice. Generic over the transport so the
//! binary can use stdio while tests use in-memory pipes.

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::core::Agent;
use crate::protocol::{encode_decision, parse_inbound, Inbound, RemoteState, INIT, OK};

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Serve one session until the harness closes the stream.
///
/// The first line must be `INIT`. Any malformed line ends the session with an
/// error. Returns the final mirror state.
pub async fn run_agent<R, W, A>(reader: R, mut writer: W, agent: &mut A) -> Result<RemoteState>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    A: Agent + ?Sized,
{
    let mut lines = reader.lines();
    let mut state = RemoteState::new();

    let first = lines
        .next_line()
        .await?
        .context("stream closed before handshake")?;
    if first.trim() != INIT {
        bail!("expected {}, received {:?}", INIT, first);
    }
    write_line(&mut writer, OK).await?;
    eprintln!("[Runner] Handshake complete");

    let mut decisions = 0u64;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let inbound = parse_inbound(&line).with_context(|| format!("bad line: {:?}", line))?;
        match inbound {
            Inbound::Init => bail!("unexpected second {}", INIT),
            Inbound::Move => {
                let actions = agent.play_move(state.board()).into_actions();
                write_line(&mut writer, &encode_decision(&actions)).await?;
                decisions += 1;
            }
            other => state.apply(&other),
        }
    }

    eprintln!(
        "[Runner] Session closed after {} decisions, score {}",
        decisions,
        state.score()
    );
    Ok(state)
}
