pub mod app;
pub mod counter;
pub mod orchestrator;

pub use crate::domain::model::{ChaincodeRequest, ChaincodeResponse, ChannelContext};
pub use crate::domain::ports::{ChannelClient, LedgerClient, MspClient, ResourceClient, SdkProvider};
pub use crate::utils::error::Result;
