use crc32fast::Hasher;

use crate::types::Chunk;

/// CRC-32 (IEEE) of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    update_checksum(0, data)
}

/// Continue a running CRC-32 with more bytes.
pub fn update_checksum(crc: u32, data: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(crc);
    hasher.update(data);
    hasher.finalize()
}

// Helper function to flatten chunks into a single blob
pub fn chunks_to_bytes(chunks: &[Chunk]) -> Vec<u8> {
    chunks.iter()
        .flat_map(|c| c.data.iter())
        .copied()
        .collect()
}
