//! Test client.
//!
//! Provides a line-oriented client for integration testing that can send
//! commands and assert on received lines.

use relay_proto::Command;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        // Split stream for reading and writing
        let (read_half, write_half) = stream.into_split();
        let reader = BufReader::new(read_half);
        let writer = BufWriter::new(write_half);

        Ok(Self {
            reader,
            writer,
            nick: nick.to_string(),
        })
    }

    /// The nickname this client registers with.
    #[allow(dead_code)]
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Send a raw line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send a command.
    #[allow(dead_code)]
    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_raw(&cmd.to_line()).await
    }

    /// Receive a single command from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Command> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a command with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Command> {
        let line = self.recv_line_timeout(dur).await?;
        line.parse::<Command>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Receive one raw line (without CRLF). Fails on EOF.
    pub async fn recv_line_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed by server");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// True if the server closed the connection within `dur`, skipping any
    /// lines still in flight.
    #[allow(dead_code)]
    pub async fn expect_closed(&mut self, dur: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + dur;
        loop {
            let mut line = String::new();
            match tokio::time::timeout_at(deadline, self.reader.read_line(&mut line)).await {
                Ok(Ok(0)) | Ok(Err(_)) => return true,
                Ok(Ok(_)) => continue,
                Err(_) => return false,
            }
        }
    }

    /// Receive commands until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Command>>
    where
        F: FnMut(&Command) -> bool,
    {
        let mut commands = Vec::new();
        loop {
            let cmd = self.recv().await?;
            let done = predicate(&cmd);
            commands.push(cmd);
            if done {
                break;
            }
        }
        Ok(commands)
    }

    /// Register with the server (NICK + USER) and consume the welcome burst.
    pub async fn register(&mut self) -> anyhow::Result<Vec<Command>> {
        let nick = self.nick.clone();
        self.send_raw(&format!("NICK {nick}")).await?;
        self.send_raw(&format!("USER {nick} 0 localhost :Test User {nick}"))
            .await?;

        // The burst ends with RPL_ENDOFMOTD (376)
        let burst = self.recv_until(|cmd| cmd.name == "376").await?;
        if burst.first().map(|cmd| cmd.name.as_str()) == Some("001") {
            Ok(burst)
        } else {
            anyhow::bail!("Registration failed: burst did not start with RPL_WELCOME")
        }
    }

    /// Join a channel.
    #[allow(dead_code)]
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("JOIN {channel}")).await
    }

    /// Send a PRIVMSG.
    #[allow(dead_code)]
    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG {target} :{text}")).await
    }

    /// Send QUIT.
    #[allow(dead_code)]
    pub async fn quit(&mut self, reason: Option<&str>) -> anyhow::Result<()> {
        match reason {
            Some(reason) => self.send_raw(&format!("QUIT :{reason}")).await,
            None => self.send_raw("QUIT").await,
        }
    }
}

/// Text of a relayed message, whether it arrived as trailing or as the
/// final plain parameter.
#[allow(dead_code)]
pub fn message_text(cmd: &Command) -> Option<&str> {
    cmd.trailing
        .as_deref()
        .or_else(|| cmd.params.get(1).map(String::as_str))
}
