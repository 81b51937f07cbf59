//! Spatial hashing using Morton encoding (Z-order curve).
//!
//! The grid is rebuilt every frame from the pre-update position snapshot.
//! Each entry is tagged with the Morton code of its cell and the list is
//! sorted by code, so all particles of one cell are contiguous and a cell
//! lookup is a binary search.
//!
//! With `cell_size` equal to the interaction radius, every neighbor within
//! that radius lies in the 3×3×3 block of cells around the query.

use glam::Vec3;

/// Configuration for the spatial hashing grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialConfig {
    /// Size of each cell in world units.
    pub cell_size: f32,
    /// Number of cells per dimension (grid is resolution³).
    pub grid_resolution: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: 2.0,
            grid_resolution: 1024,
        }
    }
}

impl SpatialConfig {
    /// # Panics
    ///
    /// Panics if `grid_resolution` is not a power of two no larger than
    /// 1024, or `cell_size` is not positive.
    pub fn new(cell_size: f32, grid_resolution: u32) -> Self {
        assert!(grid_resolution.is_power_of_two(), "Grid resolution must be power of 2");
        assert!(grid_resolution <= 1024, "Grid resolution must be <= 1024 for 30-bit Morton codes");
        assert!(cell_size > 0.0, "Cell size must be positive");
        Self {
            cell_size,
            grid_resolution,
        }
    }

    /// Grid with the given cell size at full resolution.
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self::new(cell_size, 1024)
    }

    /// Total number of cells in the grid.
    pub fn total_cells(&self) -> u64 {
        let r = self.grid_resolution as u64;
        r * r * r
    }

    /// Cell coordinates of a world position.
    ///
    /// The grid is centered on the origin. Positions outside it are clamped
    /// into the border cells, which keeps lookups correct at the cost of
    /// denser border cells.
    pub fn cell_of(&self, position: Vec3) -> [i32; 3] {
        let half = self.grid_resolution as f32 * self.cell_size * 0.5;
        let max = (self.grid_resolution - 1) as f32;
        let n = (position + Vec3::splat(half)) / self.cell_size;
        // NaN maps to 0 through the saturating float cast.
        [
            n.x.clamp(0.0, max) as i32,
            n.y.clamp(0.0, max) as i32,
            n.z.clamp(0.0, max) as i32,
        ]
    }

    fn in_bounds(&self, cell: [i32; 3]) -> bool {
        let res = self.grid_resolution as i32;
        cell.iter().all(|&c| (0..res).contains(&c))
    }
}

/// Spread the low 10 bits of `v` so there are two zero bits between each.
#[inline]
pub fn expand_bits(v: u32) -> u32 {
    let mut x = v & 0x0000_03FF;
    x = (x | (x << 16)) & 0x0300_00FF;
    x = (x | (x << 8)) & 0x0300_F00F;
    x = (x | (x << 4)) & 0x030C_30C3;
    x = (x | (x << 2)) & 0x0924_9249;
    x
}

/// Inverse of [`expand_bits`].
#[inline]
pub fn compact_bits(v: u32) -> u32 {
    let mut x = v & 0x0924_9249;
    x = (x | (x >> 2)) & 0x030C_30C3;
    x = (x | (x >> 4)) & 0x0300_F00F;
    x = (x | (x >> 8)) & 0x0300_00FF;
    x = (x | (x >> 16)) & 0x0000_03FF;
    x
}

/// 30-bit Morton code for cell coordinates in 0..1024.
#[inline]
pub fn morton_encode(x: u32, y: u32, z: u32) -> u32 {
    expand_bits(x) | (expand_bits(y) << 1) | (expand_bits(z) << 2)
}

#[inline]
pub fn morton_decode(code: u32) -> [u32; 3] {
    [compact_bits(code), compact_bits(code >> 1), compact_bits(code >> 2)]
}

/// Sorted (Morton code, item index) table for neighbor queries.
#[derive(Clone, Debug, Default)]
pub struct SpatialGrid {
    config: SpatialConfig,
    entries: Vec<(u32, u32)>,
}

impl SpatialGrid {
    pub fn new(config: SpatialConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Change the cell size. Takes effect on the next rebuild.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        if cell_size > 0.0 {
            self.config.cell_size = cell_size;
        }
    }

    /// Replace the contents with `positions`, indexed by their position in the slice.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        self.entries.clear();
        self.entries.reserve(positions.len());
        for (index, &position) in positions.iter().enumerate() {
            let [x, y, z] = self.config.cell_of(position);
            self.entries
                .push((morton_encode(x as u32, y as u32, z as u32), index as u32));
        }
        self.entries.sort_unstable();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call `f` with the index of every item in the 27 cells around `position`.
    ///
    /// Candidates may lie up to two cells away; callers filter by distance.
    pub fn for_each_candidate<F: FnMut(usize)>(&self, position: Vec3, mut f: F) {
        let center = self.config.cell_of(position);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let cell = [center[0] + dx, center[1] + dy, center[2] + dz];
                    if !self.config.in_bounds(cell) {
                        continue;
                    }
                    let code = morton_encode(cell[0] as u32, cell[1] as u32, cell[2] as u32);
                    let start = self.entries.partition_point(|&(c, _)| c < code);
                    for &(c, index) in &self.entries[start..] {
                        if c != code {
                            break;
                        }
                        f(index as usize);
                    }
                }
            }
        }
    }
}
