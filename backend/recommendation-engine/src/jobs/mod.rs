/// Batch Jobs
///
/// One-shot ranking requests read as JSON and answered as JSON. The binary
/// wires this to a file or stdin; the core itself never touches I/O.
pub mod batch;

pub use batch::{BatchRequest, BatchResponse, BatchRunner};
