mod client;

pub use client::{RpcClient, DEFAULT_TIMEOUT};
