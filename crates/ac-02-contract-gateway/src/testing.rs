//! Shared fixtures for the unit tests: an environment over the scripted
//! chain client and a log capture.

use std::future::Future;
use std::io;
use std::sync::Arc;

use ac_01_web3_transport::testing::{Reply, Scripted, ScriptedConnection};
use ac_01_web3_transport::{abi, Bytes};
use parking_lot::Mutex;
use shared_types::EthereumAddress;
use tracing::Level;

use crate::environment::ContractEnvironment;
use crate::settings::GatewaySettings;
use crate::sources::ContractSources;

pub const ACTIONS_ABI: &str = r#"[
    {"type":"function","name":"lastActionId","stateMutability":"view","inputs":[],
     "outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"remove","stateMutability":"nonpayable",
     "inputs":[{"name":"id","type":"uint256"}],"outputs":[]},
    {"type":"function","name":"authorize","stateMutability":"nonpayable",
     "inputs":[{"name":"id","type":"uint256"}],"outputs":[]},
    {"type":"function","name":"destroy","stateMutability":"nonpayable","inputs":[],"outputs":[]}
]"#;

pub fn sender() -> EthereumAddress {
    EthereumAddress::of("0x5F2c3A1E6bD5A6D4c22E4a4bDA3f1F1AfF0aB1c2").unwrap()
}

pub fn contract_address() -> EthereumAddress {
    EthereumAddress::of("0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c").unwrap()
}

pub fn environment(chain: Arc<Scripted>) -> ContractEnvironment {
    let mut sources = ContractSources::new();
    sources.register_inline("Actions", ACTIONS_ABI, "0x6080");
    let settings = GatewaySettings {
        receipt_poll_interval_ms: 1,
        receipt_max_attempts: 3,
        ..Default::default()
    };
    ContractEnvironment::new(
        Arc::new(ScriptedConnection(chain)),
        sender(),
        Arc::new(sources),
        settings,
    )
}

/// A single `uint256` return word.
pub fn word(n: u64) -> Reply {
    Reply::Data(Bytes::from(abi::uint256(n).abi_encode()))
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Everything logged at `level` or above while `run` executes.
pub async fn captured<F, Fut>(level: Level, run: F) -> String
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    run().await;
    drop(guard);
    let bytes = capture.0.lock().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
