//! Test server management.
//!
//! Runs relayd in-process on an ephemeral port for integration testing.

use relayd::config::Config;
use relayd::liveness::spawn_liveness_task;
use relayd::network::Gateway;
use relayd::state::Matrix;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Server name every test server advertises.
pub const SERVER_NAME: &str = "test.server";

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    matrix: Arc<Matrix>,
    tasks: Vec<JoinHandle<()>>,
}

impl TestServer {
    /// Spawn a test server with default timings.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with_config(test_config()).await
    }

    /// Spawn a test server with the given configuration.
    ///
    /// The listen address is always replaced with an ephemeral local port.
    pub async fn spawn_with_config(mut config: Config) -> anyhow::Result<Self> {
        config.listen.address = SocketAddr::from(([127, 0, 0, 1], 0));

        let matrix = Arc::new(Matrix::new(&config));
        let gateway = Gateway::bind(&config.listen, Arc::clone(&matrix)).await?;
        let addr = gateway.local_addr()?;

        let liveness = spawn_liveness_task(Arc::clone(&matrix));
        let listener = tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self {
            addr,
            matrix,
            tasks: vec![liveness, listener],
        })
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Shared server state, for asserting on registries.
    #[allow(dead_code)]
    pub fn matrix(&self) -> &Arc<Matrix> {
        &self.matrix
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Configuration shared by integration tests.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.name = SERVER_NAME.to_string();
    config.server.motd = vec!["Test Server".to_string()];
    config
}
