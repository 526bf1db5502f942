use std::io::{self, BufRead, Write};

/// Prompts until the user types `Q`/`q` or input ends.
pub fn read_until_quit<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    let mut line = String::new();
    loop {
        writeln!(output, "Press Q to quit")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        if matches!(line.trim_end_matches(['\r', '\n']), "Q" | "q") {
            writeln!(output, "Quitting...")?;
            return Ok(());
        }
    }
}

/// Runs the blocking console prompt on a worker thread.
pub async fn wait_for_quit() {
    let result = tokio::task::spawn_blocking(|| {
        let stdin = io::stdin();
        read_until_quit(stdin.lock(), io::stdout())
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "console read failed"),
        Err(e) => tracing::warn!(error = %e, "console listener panicked"),
    }
}
