pub mod header;

pub use header::{
    decompressed_size, patch_pool_offset, ContainerHeader, HEADER_SIZE, POOL_OFFSET_BIAS,
};
