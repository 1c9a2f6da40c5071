pub mod client;
pub mod engine;
pub mod inference;
pub mod loader;
pub mod metrics;
pub mod mock;

pub use client::{ClientError, NlpClient, NlpClientConfig};
pub use engine::{CompileError, RuleBasedModel};
pub use inference::{run_inference, ModelError, NluModel};
pub use loader::{LoadError, ModelLoader};
pub use metrics::{get_metrics, init_metrics};
pub use mock::{FailingModel, PanickingModel, StaticModel};
