//! Printer adapters for sending print data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Spooler queues (CUPS `lp`/`lpstat`)

use crate::error::{PrintError, PrintResult};
use std::io::Write;
use std::net::SocketAddr;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send a finished print job to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from an address string
    ///
    /// Accepts `"192.168.1.100:9100"` or a bare `"192.168.1.100"`, in which
    /// case port 9100 is used.
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr = addr.trim();
        let parsed: SocketAddr = addr
            .parse()
            .or_else(|_| format!("{}:{}", addr, DEFAULT_PORT).parse())
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr: parsed,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        tokio::time::timeout(self.timeout, stream.write_all(data))
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))?
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })?;

        stream.flush().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// Printer reached through the system print spooler
///
/// The job is written to a temporary file and submitted with
/// `lp -d <queue> [-o key=value]... <file>`. Spooler stderr is kept as the
/// diagnostic of a failed submission.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    queue: String,
    options: Vec<(String, String)>,
    submit_cmd: String,
    status_cmd: String,
    timeout: Duration,
}

impl SpoolPrinter {
    /// Create a spooler printer for the named queue
    pub fn new(queue: &str) -> PrintResult<Self> {
        let queue = queue.trim();
        if queue.is_empty() {
            return Err(PrintError::InvalidConfig(
                "Spooler queue name is empty".to_string(),
            ));
        }
        Ok(Self {
            queue: queue.to_string(),
            options: Vec::new(),
            submit_cmd: "lp".to_string(),
            status_cmd: "lpstat".to_string(),
            timeout: Duration::from_secs(10),
        })
    }

    /// Add a `-o key=value` job option
    pub fn with_option(mut self, key: &str, value: impl ToString) -> Self {
        self.options.push((key.to_string(), value.to_string()));
        self
    }

    /// Submit the job as raw bytes (ESC/POS through a raw queue)
    pub fn raw(self) -> Self {
        self.with_option("raw", "true")
    }

    /// Override the submit and status commands
    pub fn with_commands(mut self, submit: &str, status: &str) -> Self {
        self.submit_cmd = submit.to_string();
        self.status_cmd = status.to_string();
        self
    }

    /// Set the spooler timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the queue name
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Arguments passed to the submit command, without the file path
    pub fn submit_args(&self) -> Vec<String> {
        let mut args = vec!["-d".to_string(), self.queue.clone()];
        for (key, value) in &self.options {
            args.push("-o".to_string());
            if key == "raw" {
                args.push(key.clone());
            } else {
                args.push(format!("{}={}", key, value));
            }
        }
        args
    }

    async fn run(&self, program: &str, args: &[String]) -> PrintResult<std::process::Output> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    PrintError::SpoolerUnavailable(format!("'{}' command not found", program))
                }
                _ => PrintError::Io(e),
            })?;

        tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                PrintError::Timeout(format!(
                    "'{}' did not finish within {}s",
                    program,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(PrintError::Io)
    }
}

impl Printer for SpoolPrinter {
    #[instrument(skip(data), fields(queue = %self.queue, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut file = tempfile::Builder::new()
            .prefix("comptoir-")
            .suffix(".prn")
            .tempfile()?;
        file.write_all(data)?;
        file.flush()?;

        let mut args = self.submit_args();
        args.push(file.path().to_string_lossy().into_owned());

        info!("Submitting job to spooler");
        let output = self.run(&self.submit_cmd, &args).await?;

        if output.status.success() {
            info!("Print job accepted by spooler");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(status = ?output.status.code(), stderr = %stderr, "Spooler rejected job");

        let lower = stderr.to_lowercase();
        if lower.contains("does not exist") || lower.contains("unknown destination") {
            return Err(PrintError::PrinterNotFound(self.queue.clone()));
        }
        Err(PrintError::Spooler {
            status: output.status.code(),
            stderr,
        })
    }

    #[instrument(fields(queue = %self.queue))]
    async fn is_online(&self) -> bool {
        let args = vec!["-p".to_string(), self.queue.clone()];
        match self.run(&self.status_cmd, &args).await {
            Ok(output) if output.status.success() => {
                info!("Printer known to spooler");
                true
            }
            Ok(output) => {
                warn!(status = ?output.status.code(), "Printer not found in spooler");
                false
            }
            Err(e) => {
                warn!(error = %e, "Printer status check failed");
                false
            }
        }
    }
}

/// Printer chosen at runtime from configuration
#[derive(Debug, Clone)]
pub enum AnyPrinter {
    Network(NetworkPrinter),
    Spool(SpoolPrinter),
}

impl AnyPrinter {
    /// Human-readable destination, for logs and messages
    pub fn destination(&self) -> String {
        match self {
            AnyPrinter::Network(p) => p.addr().to_string(),
            AnyPrinter::Spool(p) => p.queue().to_string(),
        }
    }
}

impl Printer for AnyPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            AnyPrinter::Network(p) => p.print(data).await,
            AnyPrinter::Spool(p) => p.print(data).await,
        }
    }

    async fn is_online(&self) -> bool {
        match self {
            AnyPrinter::Network(p) => p.is_online().await,
            AnyPrinter::Spool(p) => p.is_online().await,
        }
    }
}
