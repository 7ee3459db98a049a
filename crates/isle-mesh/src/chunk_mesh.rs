//! Chunk mesh records and the builder that tessellates them from a shared height field.
//!
//! Every chunk reads its `(chunk_size + 1)^2` heights straight out of the one
//! field produced for the run, indexed by global cell position. Adjacent
//! chunks therefore read the same cells along their shared edge and their
//! boundary vertices match exactly.

use glam::Vec3;
use isle_terrain::HeightField;

use crate::chunk::{ChunkCoord, ChunkEdge};

/// Errors raised when a chunk cannot be built from a field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    /// The coordinate lies outside the chunk grid.
    #[error("chunk {coord} is outside a {chunks_per_row}x{chunks_per_row} grid")]
    CoordOutOfGrid {
        coord: ChunkCoord,
        chunks_per_row: usize,
    },

    /// The field does not cover the chunk's vertex grid.
    #[error("field of {field:?} cells cannot cover {required}x{required} vertices")]
    FieldTooSmall {
        field: (usize, usize),
        required: usize,
    },
}

/// The mesh data of one chunk, handed to the consumer by value.
///
/// Vertex positions are chunk-local; place the chunk at
/// [`world_placement`](Self::world_placement). Normals are left to the
/// consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMeshRecord {
    /// Row-major chunk index.
    pub chunk_id: usize,
    /// Chunk-grid coordinate.
    pub origin: ChunkCoord,
    /// Chunk side in cells.
    pub chunk_size: usize,
    /// `(chunk_size + 1)^2` positions, row-major by local `z` then `x`.
    pub vertices: Vec<[f32; 3]>,
    /// `chunk_size^2 * 2` triangles indexing into `vertices`.
    pub triangles: Vec<[u32; 3]>,
    /// One UV per vertex, spanning `[0, 1]` across the chunk.
    pub uvs: Vec<[f32; 2]>,
}

impl ChunkMeshRecord {
    /// World position of the chunk's local origin: `(x * size, 0, z * size)`.
    pub fn world_placement(&self) -> Vec3 {
        let size = self.chunk_size as f32;
        Vec3::new(self.origin.x as f32 * size, 0.0, self.origin.z as f32 * size)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of entries in a flat index buffer (3 per triangle).
    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Vertex height at local `(x, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `z` exceeds `chunk_size`.
    pub fn height_at(&self, x: usize, z: usize) -> f32 {
        let stride = self.chunk_size + 1;
        assert!(x < stride && z < stride);
        self.vertices[z * stride + x][1]
    }

    /// Heights along one boundary, ordered by increasing local coordinate.
    pub fn edge_heights(&self, edge: ChunkEdge) -> Vec<f32> {
        let n = self.chunk_size;
        (0..=n)
            .map(|i| match edge {
                ChunkEdge::MinX => self.height_at(0, i),
                ChunkEdge::MaxX => self.height_at(n, i),
                ChunkEdge::MinZ => self.height_at(i, 0),
                ChunkEdge::MaxZ => self.height_at(i, n),
            })
            .collect()
    }

    /// Positions as raw bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle indices as raw bytes (`u32` index buffer).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// UVs as raw bytes.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

/// Builds [`ChunkMeshRecord`]s for one chunk grid.
///
/// UVs and triangle indices are the same for every chunk of a grid, so they
/// are computed once here and cloned into each record.
#[derive(Clone, Debug)]
pub struct ChunkMeshBuilder {
    chunk_size: usize,
    chunks_per_row: usize,
    uvs: Vec<[f32; 2]>,
    triangles: Vec<[u32; 3]>,
}

impl ChunkMeshBuilder {
    /// Precompute the shared UV and index buffers for `chunk_size` chunks in a
    /// grid `chunks_per_row` wide.
    pub fn new(chunk_size: usize, chunks_per_row: usize) -> Self {
        let stride = chunk_size + 1;

        let mut uvs = Vec::with_capacity(stride * stride);
        for z in 0..stride {
            for x in 0..stride {
                uvs.push([x as f32 / chunk_size as f32, z as f32 / chunk_size as f32]);
            }
        }

        // Two triangles per cell. The winding is fixed: consumers derive
        // normals from it.
        let mut triangles = Vec::with_capacity(chunk_size * chunk_size * 2);
        let row = stride as u32;
        for z in 0..chunk_size {
            for x in 0..chunk_size {
                let v = (z * stride + x) as u32;
                triangles.push([v, v + row, v + 1]);
                triangles.push([v + 1, v + row, v + row + 1]);
            }
        }

        Self {
            chunk_size,
            chunks_per_row,
            uvs,
            triangles,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks_per_row(&self) -> usize {
        self.chunks_per_row
    }

    /// Total chunks in the grid.
    pub fn chunk_count(&self) -> usize {
        self.chunks_per_row * self.chunks_per_row
    }

    /// Chunk coordinates in emission order: row-major by `z`, then `x`.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        (0..self.chunk_count()).map(|id| ChunkCoord::from_chunk_id(id, self.chunks_per_row))
    }

    /// Tessellate the chunk at `coord`.
    ///
    /// Vertex `(x, z)` sits at `(x, field[gz][gx] * height_scale, z)` with
    /// `gx = coord.x * chunk_size + x` and `gz = coord.z * chunk_size + z`.
    pub fn build(
        &self,
        field: &HeightField,
        coord: ChunkCoord,
        height_scale: f32,
    ) -> Result<ChunkMeshRecord, MeshError> {
        let cpr = self.chunks_per_row;
        if coord.x as usize >= cpr || coord.z as usize >= cpr {
            return Err(MeshError::CoordOutOfGrid {
                coord,
                chunks_per_row: cpr,
            });
        }

        let size = self.chunk_size;
        let required = cpr * size + 1;
        if field.width() < required || field.height() < required {
            return Err(MeshError::FieldTooSmall {
                field: field.dimensions(),
                required,
            });
        }

        let base_x = coord.x as usize * size;
        let base_z = coord.z as usize * size;
        let mut vertices = Vec::with_capacity((size + 1) * (size + 1));
        for z in 0..=size {
            let row = field.row(base_z + z);
            for x in 0..=size {
                vertices.push([x as f32, row[base_x + x] * height_scale, z as f32]);
            }
        }

        tracing::trace!(%coord, vertices = vertices.len(), "built chunk mesh");

        Ok(ChunkMeshRecord {
            chunk_id: coord.chunk_id(cpr),
            origin: coord,
            chunk_size: size,
            vertices,
            triangles: self.triangles.clone(),
            uvs: self.uvs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_field(side: usize) -> HeightField {
        let values = (0..side * side)
            .map(|i| {
                let (x, z) = (i % side, i / side);
                ((x * 7 + z * 13) % 97) as f32 / 96.0
            })
            .collect();
        HeightField::new(side, side, values).unwrap()
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        let builder = ChunkMeshBuilder::new(20, 5);
        let record = builder
            .build(&ramp_field(105), ChunkCoord::new(2, 3), 2.0)
            .unwrap();
        assert_eq!(record.vertex_count(), 441);
        assert_eq!(record.triangle_count(), 800);
        assert_eq!(record.index_count(), 2400);
        assert_eq!(record.uvs.len(), 441);
        assert_eq!(record.chunk_id, 17);
        assert_eq!(record.origin, ChunkCoord::new(2, 3));
        assert_eq!(record.world_placement(), Vec3::new(40.0, 0.0, 60.0));
    }

    #[test]
    fn test_triangle_winding_of_first_cell() {
        let builder = ChunkMeshBuilder::new(4, 1);
        let record = builder
            .build(&ramp_field(5), ChunkCoord::new(0, 0), 1.0)
            .unwrap();
        assert_eq!(record.triangles[0], [0, 5, 1]);
        assert_eq!(record.triangles[1], [1, 5, 6]);
        // Second row starts one vertex past the end of the first cell row.
        assert_eq!(record.triangles[8], [5, 10, 6]);
        let max_index = record.triangles.iter().flatten().copied().max().unwrap();
        assert_eq!(max_index as usize, record.vertex_count() - 1);
    }

    #[test]
    fn test_positions_index_global_cells() {
        let field = ramp_field(11);
        let builder = ChunkMeshBuilder::new(5, 2);
        let record = builder.build(&field, ChunkCoord::new(1, 1), 3.0).unwrap();
        let [x, y, z] = record.vertices[2 * 6 + 4];
        assert_eq!((x, z), (4.0, 2.0));
        assert_eq!(y, field.get(9, 7) * 3.0);
    }

    #[test]
    fn test_uvs_span_unit_square() {
        let builder = ChunkMeshBuilder::new(4, 1);
        let record = builder
            .build(&ramp_field(5), ChunkCoord::new(0, 0), 1.0)
            .unwrap();
        assert_eq!(record.uvs[0], [0.0, 0.0]);
        assert_eq!(record.uvs[4], [1.0, 0.0]);
        assert_eq!(record.uvs[24], [1.0, 1.0]);
        assert_eq!(record.uvs[7], [0.5, 0.25]);
    }

    #[test]
    fn test_adjacent_chunks_share_edges() {
        let field = ramp_field(13);
        let builder = ChunkMeshBuilder::new(4, 3);
        for coord in builder.coords() {
            let record = builder.build(&field, coord, 5.0).unwrap();
            for edge in [ChunkEdge::MaxX, ChunkEdge::MaxZ] {
                let Some(next) = coord.neighbor(edge) else {
                    continue;
                };
                if next.x >= 3 || next.z >= 3 {
                    continue;
                }
                let neighbor = builder.build(&field, next, 5.0).unwrap();
                assert_eq!(
                    record.edge_heights(edge),
                    neighbor.edge_heights(edge.opposite()),
                    "seam mismatch between {coord} and {next}"
                );
            }
        }
    }

    #[test]
    fn test_coords_are_row_major() {
        let builder = ChunkMeshBuilder::new(2, 3);
        let coords: Vec<_> = builder.coords().collect();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], ChunkCoord::new(0, 0));
        assert_eq!(coords[1], ChunkCoord::new(1, 0));
        assert_eq!(coords[3], ChunkCoord::new(0, 1));
        assert_eq!(coords[8], ChunkCoord::new(2, 2));
    }

    #[test]
    fn test_out_of_grid_and_small_field_rejected() {
        let builder = ChunkMeshBuilder::new(4, 2);
        assert_eq!(
            builder.build(&ramp_field(9), ChunkCoord::new(2, 0), 1.0),
            Err(MeshError::CoordOutOfGrid {
                coord: ChunkCoord::new(2, 0),
                chunks_per_row: 2
            })
        );
        assert_eq!(
            builder.build(&ramp_field(8), ChunkCoord::new(0, 0), 1.0),
            Err(MeshError::FieldTooSmall {
                field: (8, 8),
                required: 9
            })
        );
    }

    #[test]
    fn test_byte_views() {
        let builder = ChunkMeshBuilder::new(2, 1);
        let record = builder
            .build(&ramp_field(3), ChunkCoord::new(0, 0), 1.0)
            .unwrap();
        assert_eq!(record.position_bytes().len(), 9 * 12);
        assert_eq!(record.index_bytes().len(), 8 * 12);
        assert_eq!(record.uv_bytes().len(), 9 * 8);
    }
}
