pub mod readings;

pub use readings::ReadingService;
