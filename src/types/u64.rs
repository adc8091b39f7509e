/// Index type used for vertices and edges
pub type IndexType = u64;
