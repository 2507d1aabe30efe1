// src/application/ports/mod.rs
pub mod credentials;
pub mod document_store;
pub mod platform;
pub mod report_sink;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type ClockPort = dyn time::Clock;
pub type DocumentStorePort = dyn document_store::DocumentStore;
pub type PlatformPublisherPort = dyn platform::PlatformPublisher;
pub type CredentialSourcePort = dyn credentials::CredentialSource;
pub type SyncReportSinkPort = dyn report_sink::SyncReportSink;
