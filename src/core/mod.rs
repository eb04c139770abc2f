/// Reader and writer abstractions shared by every source and sink
pub mod item;

/// Chunk-oriented step piping a reader into a writer
pub mod step;
