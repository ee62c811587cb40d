pub mod batch;
pub mod dispatcher;
pub mod dto;
pub mod engine;
pub mod error;
pub mod item;
pub mod packager;
pub mod service;
pub mod voice;

pub use batch::{run_batch, BatchEntry, BatchProgress};
pub use dispatcher::{EngineDispatcher, EnginePolicy, EngineReadiness, Synthesizer};
pub use dto::{SynthesisOptions, TtsRequest};
pub use engine::Engine;
pub use error::TtsServiceError;
pub use item::{mp3_name, parse_csv_items, TextItem, DEFAULT_MAX_CHARS};
pub use packager::{AudioBlob, DeliveryPayload};
pub use service::{TtsService, TtsServiceApi};
pub use voice::{VoiceInfo, VoiceParams, VoicePreference};
