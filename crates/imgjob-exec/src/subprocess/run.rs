use std::{io, process::ExitStatus, process::Stdio};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::{
    ExecError,
    subprocess::{LogConfig, SubprocessConfig},
};

/// Exit status and collected output of a captured run.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `cfg` to completion, collecting stdout and stderr.
pub async fn run_captured(
    cfg: &SubprocessConfig,
    cancel: CancellationToken,
) -> Result<CapturedOutput, ExecError> {
    cfg.validate()?;
    cfg.trace_state();

    let mut cmd = cfg.command();
    cmd.stdin(stdin_mode(cfg))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = spawn(cfg, cmd)?;
    let in_pipe = child.stdin.take();
    let out_pipe = child.stdout.take();
    let err_pipe = child.stderr.take();

    let result = tokio::select! {
        res = async {
            tokio::try_join!(
                child.wait(),
                feed_stdin(in_pipe, cfg.stdin.as_deref(), &cfg.run_id),
                read_all(out_pipe),
                read_all(err_pipe),
            )
        } => res
            .map(|(status, (), stdout, stderr)| (status, stdout, stderr))
            .map_err(ExecError::from),
        _ = cancel.cancelled() => Err(ExecError::Canceled),
    };

    match result {
        Ok((status, stdout, stderr)) => {
            debug!(task = %cfg.run_id, status = %describe_status(&status), "subprocess exited");
            Ok(CapturedOutput {
                status,
                stdout,
                stderr,
            })
        }
        Err(ExecError::Canceled) => {
            kill(&mut child, &cfg.run_id).await;
            Err(ExecError::Canceled)
        }
        Err(e) => Err(e),
    }
}

/// Run `cfg` to completion, letting its output through.
///
/// With [`LogConfig::capture`] each line is re-emitted as a tracing event
/// tagged with the run id; otherwise the child inherits our stdout/stderr.
pub async fn run_streamed(
    cfg: &SubprocessConfig,
    log: &LogConfig,
    cancel: CancellationToken,
) -> Result<ExitStatus, ExecError> {
    cfg.validate()?;
    cfg.trace_state();

    let mut cmd = cfg.command();
    cmd.stdin(stdin_mode(cfg));
    if log.capture {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }

    let mut child = spawn(cfg, cmd)?;
    let in_pipe = child.stdin.take();
    let out_pipe = child.stdout.take();
    let err_pipe = child.stderr.take();

    let result = tokio::select! {
        res = async {
            let (status, (), _, _) = tokio::try_join!(
                child.wait(),
                feed_stdin(in_pipe, cfg.stdin.as_deref(), &cfg.run_id),
                forward_lines(out_pipe, log, &cfg.run_id, Stream::Stdout),
                forward_lines(err_pipe, log, &cfg.run_id, Stream::Stderr),
            )?;
            Ok::<_, io::Error>(status)
        } => res.map_err(ExecError::from),
        _ = cancel.cancelled() => Err(ExecError::Canceled),
    };

    match result {
        Ok(status) => {
            debug!(task = %cfg.run_id, status = %describe_status(&status), "subprocess exited");
            Ok(status)
        }
        Err(ExecError::Canceled) => {
            kill(&mut child, &cfg.run_id).await;
            Err(ExecError::Canceled)
        }
        Err(e) => Err(e),
    }
}

/// Human-readable exit status: `exit code N` or `signal N`.
pub fn describe_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit code {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return format!("signal {sig}");
        }
    }
    "unknown status".to_string()
}

/// Exit status as a shell reports it: the exit code, or `128 + N` for a
/// child killed by signal `N`.
pub fn status_code(status: &ExitStatus) -> Option<i32> {
    if let Some(code) = status.code() {
        return Some(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return Some(128 + sig);
        }
    }
    None
}

fn stdin_mode(cfg: &SubprocessConfig) -> Stdio {
    if cfg.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

fn spawn(cfg: &SubprocessConfig, mut cmd: tokio::process::Command) -> Result<Child, ExecError> {
    trace!(task = %cfg.run_id, command = %cfg, "spawning subprocess");
    cmd.spawn().map_err(|source| ExecError::Spawn {
        command: cfg.command.clone(),
        source,
    })
}

/// Write `input` and close the pipe.
///
/// A child that exits without reading all of it closes the pipe early; that
/// is not an error here, the exit status and stderr tell what happened.
async fn feed_stdin(pipe: Option<ChildStdin>, input: Option<&str>, run_id: &str) -> io::Result<()> {
    let (Some(mut stdin), Some(input)) = (pipe, input) else {
        return Ok(());
    };
    let res = async {
        stdin.write_all(input.as_bytes()).await?;
        stdin.shutdown().await
    }
    .await;
    match res {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!(task = %run_id, "subprocess closed stdin early");
            Ok(())
        }
        other => other,
    }
}

async fn kill(child: &mut Child, run_id: &str) {
    debug!(task = %run_id, "cancellation requested; killing subprocess");
    if let Err(e) = child.kill().await {
        debug!(task = %run_id, "failed to kill subprocess: {e}");
    }
}

async fn read_all<R>(pipe: Option<R>) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

async fn forward_lines<R>(
    pipe: Option<R>,
    log: &LogConfig,
    run_id: &str,
    stream: Stream,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(());
    };
    let mut lines = BufReader::new(pipe).lines();
    while let Some(line) = lines.next_line().await? {
        let line = log.truncate(&line);
        match stream {
            Stream::Stdout if log.stdout_info => info!(task = %run_id, stream = "stdout", "{line}"),
            Stream::Stderr if log.stderr_warn => warn!(task = %run_id, stream = "stderr", "{line}"),
            Stream::Stdout => debug!(task = %run_id, stream = "stdout", "{line}"),
            Stream::Stderr => debug!(task = %run_id, stream = "stderr", "{line}"),
        }
    }
    Ok(())
}
