//! Printer transports for sending ESC/POS data
//!
//! Supports:
//! - Network printers (TCP port 9100)
//! - In-memory capture (previews and tests)

use crate::config::PrinterConfig;
use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer transports
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;

    /// Send a real-time status request and read the one-byte reply
    async fn query(&self, request: &[u8]) -> PrintResult<u8>;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
    status_timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        Self::from_addr(&addr_str)
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
            status_timeout: Duration::from_millis(500),
        })
    }

    /// Create from a loaded configuration
    pub fn from_config(config: &PrinterConfig) -> PrintResult<Self> {
        Ok(Self::new(&config.host, config.port)?
            .with_timeout(Duration::from_millis(config.timeout_ms))
            .with_status_timeout(Duration::from_millis(config.status_timeout_ms)))
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout for status replies
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn connect(&self) -> PrintResult<TcpStream> {
        tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");
        let mut stream = self.connect().await?;

        info!("Connected, sending {} bytes", data.len());
        stream.write_all(data).await.map_err(|e| {
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

    #[instrument(skip(request), fields(addr = %self.addr))]
    async fn query(&self, request: &[u8]) -> PrintResult<u8> {
        let mut stream = self.connect().await?;
        stream.write_all(request).await?;
        stream.flush().await?;

        let mut reply = [0u8; 1];
        tokio::time::timeout(self.status_timeout, stream.read_exact(&mut reply))
            .await
            .map_err(|_| PrintError::Timeout(format!("Status reply timeout: {}", self.addr)))??;

        info!(status = reply[0], "Status received");
        Ok(reply[0])
    }
}

/// In-memory printer
///
/// Keeps every job it receives and answers status queries with a fixed
/// byte. Clones share the same job list.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrinter {
    jobs: Arc<Mutex<Vec<Vec<u8>>>>,
    status: u8,
    offline: bool,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte returned from status queries
    pub fn with_status(mut self, status: u8) -> Self {
        self.status = status;
        self
    }

    /// Make every operation fail as if the device were unreachable
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Jobs received so far
    pub fn jobs(&self) -> Vec<Vec<u8>> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

impl Printer for MemoryPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        if self.offline {
            return Err(PrintError::Offline("memory printer".to_string()));
        }
        self.jobs
            .lock()
            .map_err(|_| PrintError::Connection("job list poisoned".to_string()))?
            .push(data.to_vec());
        Ok(())
    }

    async fn is_online(&self) -> bool {
        !self.offline
    }

    async fn query(&self, _request: &[u8]) -> PrintResult<u8> {
        if self.offline {
            return Err(PrintError::Offline("memory printer".to_string()));
        }
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_network_printer_from_addr() {
        let printer = NetworkPrinter::from_addr("192.168.1.100:9100").unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        let result = NetworkPrinter::from_addr("invalid");
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_network_print_and_query() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            // print job
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            sock.read_to_end(&mut received).await.unwrap();

            // status query
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut req = [0u8; 3];
            sock.read_exact(&mut req).await.unwrap();
            sock.write_all(&[0x16]).await.unwrap();
            (received, req)
        });

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        printer.print(b"hello").await.unwrap();
        let status = printer.query(&[0x10, 0x04, 0x01]).await.unwrap();
        assert_eq!(status, 0x16);

        let (received, req) = server.await.unwrap();
        assert_eq!(received, b"hello");
        assert_eq!(req, [0x10, 0x04, 0x01]);
    }

    #[tokio::test]
    async fn test_memory_printer() {
        let printer = MemoryPrinter::new().with_status(0x04);
        printer.print(&[1, 2]).await.unwrap();
        assert_eq!(printer.jobs(), vec![vec![1, 2]]);
        assert_eq!(printer.query(&[]).await.unwrap(), 0x04);
        assert!(printer.is_online().await);

        let offline = MemoryPrinter::new().offline();
        assert!(offline.print(&[1]).await.is_err());
        assert!(!offline.is_online().await);
    }
}
