/// Application layer - Use cases, DTOs and output factories
///
/// The use cases orchestrate the discovery services and reach
/// infrastructure only through the outbound ports.
pub mod dto;
pub mod factories;
pub mod use_cases;
