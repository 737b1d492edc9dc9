//! Background lane processors (§4.4, §4.5): the job-specific logic spawned
//! onto [`wa_core::queue::Worker`] by `main`.

pub mod campaign;
pub mod incoming;
pub mod outgoing;

pub use campaign::CampaignWorker;
pub use incoming::IncomingProcessor;
pub use outgoing::OutgoingProcessor;