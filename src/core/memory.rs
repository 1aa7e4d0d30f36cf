/// Byte breakdown of a loaded graph, taken from actual allocation sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryFootprint {
    pub offsets: usize,
    pub adjacency: usize,
    pub id_map: usize,
}

impl MemoryFootprint {
    pub fn total(&self) -> usize {
        self.offsets + self.adjacency + self.id_map
    }
}

pub fn vec_bytes<T>(v: &Vec<T>) -> usize {
    v.capacity() * size_of::<T>()
}

pub fn megabytes(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
