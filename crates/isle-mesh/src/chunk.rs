//! Chunk-grid coordinates.

use std::fmt;

/// Position of a chunk in the chunk grid (not in world units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Column in the chunk grid.
    pub x: u32,
    /// Row in the chunk grid.
    pub z: u32,
}

impl ChunkCoord {
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Row-major chunk id in a grid `chunks_per_row` wide.
    pub fn chunk_id(self, chunks_per_row: usize) -> usize {
        self.z as usize * chunks_per_row + self.x as usize
    }

    /// Inverse of [`chunk_id`](Self::chunk_id).
    pub fn from_chunk_id(chunk_id: usize, chunks_per_row: usize) -> Self {
        Self {
            x: (chunk_id % chunks_per_row) as u32,
            z: (chunk_id / chunks_per_row) as u32,
        }
    }

    /// The neighbouring coordinate across `edge`, if it is non-negative.
    pub fn neighbor(self, edge: ChunkEdge) -> Option<Self> {
        match edge {
            ChunkEdge::MinX => self.x.checked_sub(1).map(|x| Self::new(x, self.z)),
            ChunkEdge::MaxX => Some(Self::new(self.x + 1, self.z)),
            ChunkEdge::MinZ => self.z.checked_sub(1).map(|z| Self::new(self.x, z)),
            ChunkEdge::MaxZ => Some(Self::new(self.x, self.z + 1)),
        }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// One of the four boundary lines of a chunk's vertex grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkEdge {
    /// Local `x == 0` column.
    MinX,
    /// Local `x == chunk_size` column.
    MaxX,
    /// Local `z == 0` row.
    MinZ,
    /// Local `z == chunk_size` row.
    MaxZ,
}

impl ChunkEdge {
    pub const ALL: [ChunkEdge; 4] = [
        ChunkEdge::MinX,
        ChunkEdge::MaxX,
        ChunkEdge::MinZ,
        ChunkEdge::MaxZ,
    ];

    /// The edge a neighbour shares with this one.
    pub fn opposite(self) -> Self {
        match self {
            ChunkEdge::MinX => ChunkEdge::MaxX,
            ChunkEdge::MaxX => ChunkEdge::MinX,
            ChunkEdge::MinZ => ChunkEdge::MaxZ,
            ChunkEdge::MaxZ => ChunkEdge::MinZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_round_trip() {
        for id in 0..25 {
            let coord = ChunkCoord::from_chunk_id(id, 5);
            assert_eq!(coord.chunk_id(5), id);
        }
        assert_eq!(ChunkCoord::new(2, 3).chunk_id(5), 17);
    }

    #[test]
    fn test_neighbors() {
        let c = ChunkCoord::new(0, 2);
        assert_eq!(c.neighbor(ChunkEdge::MinX), None);
        assert_eq!(c.neighbor(ChunkEdge::MaxX), Some(ChunkCoord::new(1, 2)));
        assert_eq!(c.neighbor(ChunkEdge::MinZ), Some(ChunkCoord::new(0, 1)));
        assert_eq!(c.neighbor(ChunkEdge::MaxZ), Some(ChunkCoord::new(0, 3)));
    }

    #[test]
    fn test_opposite_edges() {
        for edge in ChunkEdge::ALL {
            assert_eq!(edge.opposite().opposite(), edge);
            assert_ne!(edge.opposite(), edge);
        }
    }
}
