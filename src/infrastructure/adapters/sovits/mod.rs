//! GPT-SoVITS Adapter - 远程 HTTP 克隆引擎

mod http_client;

pub use http_client::{SovitsClientConfig, SovitsHttpClient};
