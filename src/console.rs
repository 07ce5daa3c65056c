//! Interactive Console
//!
//! A line-oriented shell over the same [`CommandHandler`] the network
//! transport uses. The binary runs it on stdin/stdout next to the TCP server.
//!
//! ```text
//! Type "exit" to leave
//! > SET foo bar
//!   true
//! > GET foo
//!   "bar"
//! > SEY foo
//! Command failed: invalid command "SEY foo"
//! > exit
//! Exiting...
//! ```

use crate::commands::CommandHandler;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const HINT: &str = "Type \"exit\" to leave\n";
const PROMPT: &str = "> ";

/// Runs the console until `exit` or end of input.
///
/// Input lines are trimmed. Blank lines are ignored, replies are printed as
/// JSON indented by two spaces, and failures print `Command failed: <error>`.
pub async fn run_console<R, W>(handler: &CommandHandler, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(HINT.as_bytes()).await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("Console input closed");
            output.write_all(b"\n").await?;
            break;
        };

        match line.trim() {
            "" => {}
            "exit" => {
                output.write_all(b"Exiting...\n").await?;
                break;
            }
            command => {
                let text = match handler.execute(command) {
                    Ok(reply) => format!("  {}\n", reply),
                    Err(e) => format!("Command failed: {}\n", e),
                };
                output.write_all(text.as_bytes()).await?;
            }
        }
    }

    output.flush().await
}
