pub mod blob_gateway;
pub mod memory_blob;

pub use blob_gateway::{BlobGateway, SupabaseBlobGateway};
pub use memory_blob::MemoryBlobGateway;
