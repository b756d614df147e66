pub mod adapter;
pub mod client;
pub mod error;
pub mod types;

pub use adapter::{JobsAdapter, SunoAdapter, VeoAdapter};
pub use client::KieClient;
pub use error::KieError;
pub use types::{Envelope, SunoGenerateRequest, SunoTrack, VeoGenerateRequest};
