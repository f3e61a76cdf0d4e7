use bevy::math::{UVec3, Vec3};
use ndshape::{RuntimeShape, Shape};
use std::fmt::Debug;

use crate::error::{GeoDictError, Result};

/// The size of a regular voxel lattice and the physical size of its voxels.
///
/// Built once from a parsed header and never modified afterwards.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GridDimensions {
    /// Voxel counts along X, Y and Z (`Nx`, `Ny`, `Nz`).
    pub size: UVec3,
    /// Physical edge lengths of a voxel along X, Y and Z (`VoxelLength`).
    pub voxel_length: Vec3,
}

impl GridDimensions {
    /// Creates grid dimensions, rejecting zero voxel counts.
    pub fn new(size: UVec3, voxel_length: Vec3) -> Option<Self> {
        if size.min_element() == 0 {
            return None;
        }
        Some(Self { size, voxel_length })
    }

    /// Number of voxels in the lattice.
    pub fn voxel_count(&self) -> Result<usize> {
        let count = self.size.x as u64 * self.size.y as u64 * self.size.z as u64;
        // linearization happens in u32
        if count > u32::MAX as u64 {
            return Err(self.too_large());
        }
        usize::try_from(count).map_err(|_| self.too_large())
    }

    /// Number of 4-byte floats in one field block of the payload.
    pub fn block_floats(&self, is_vector: bool) -> Result<usize> {
        let components = if is_vector { 3 } else { 1 };
        self.voxel_count()?
            .checked_mul(components)
            .ok_or_else(|| self.too_large())
    }

    /// Physical extent of the grid, `N * voxel_length * scale` per axis.
    ///
    /// GeoDict readers have historically passed a scale of 1,000,000 here. The unit this
    /// converts between is not documented by the format.
    pub fn extent(&self, scale: f32) -> Vec3 {
        self.size.as_vec3() * self.voxel_length * scale
    }

    fn too_large(&self) -> GeoDictError {
        GeoDictError::GridTooLarge {
            nx: self.size.x,
            ny: self.size.y,
            nz: self.size.z,
        }
    }
}

/// Grid values as they accumulate while header lines are read.
///
/// Any of them may still be unset when the header ends.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct GridHeader {
    /// `Nx`, if seen.
    pub nx: Option<u32>,
    /// `Ny`, if seen.
    pub ny: Option<u32>,
    /// `Nz`, if seen.
    pub nz: Option<u32>,
    /// `VoxelLength`, if seen.
    pub voxel_length: Option<Vec3>,
}

impl GridHeader {
    /// Returns the finished [`GridDimensions`], or [`GeoDictError::IncompleteHeader`] naming
    /// every value that was never set.
    pub fn complete(&self) -> Result<GridDimensions> {
        if let (Some(nx), Some(ny), Some(nz), Some(voxel_length)) =
            (self.nx, self.ny, self.nz, self.voxel_length)
        {
            if let Some(dimensions) = GridDimensions::new(UVec3::new(nx, ny, nz), voxel_length) {
                return Ok(dimensions);
            }
        }
        let missing = [
            ("Nx", self.nx.is_none_or(|n| n == 0)),
            ("Ny", self.ny.is_none_or(|n| n == 0)),
            ("Nz", self.nz.is_none_or(|n| n == 0)),
            ("VoxelLength", self.voxel_length.is_none()),
        ]
        .into_iter()
        .filter_map(|(keyword, unset)| unset.then_some(keyword))
        .collect();
        Err(GeoDictError::IncompleteHeader { missing })
    }
}

/// Maps voxel coordinates to flat indices in the two orders a field passes through.
///
/// * File order, X fastest: `w*Ny*Nx + v*Nx + u` (times 3, plus the component, for vectors).
/// * Grid order, Z fastest: `u*Ny*Nz + v*Nz + w`.
///
/// The axis order is reversed between the two, so a field has to be copied voxel by voxel.
#[derive(Clone)]
pub struct IndexTransposer {
    file_shape: RuntimeShape<u32, 3>,
    grid_shape: RuntimeShape<u32, 3>,
}

impl Debug for IndexTransposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexTransposer")
            .field("file_shape", &self.file_shape.as_array())
            .field("grid_shape", &self.grid_shape.as_array())
            .finish()
    }
}

impl IndexTransposer {
    /// Creates the transposer for a grid.
    pub fn new(dimensions: &GridDimensions) -> Self {
        let UVec3 { x, y, z } = dimensions.size;
        Self {
            file_shape: RuntimeShape::<u32, 3>::new([x, y, z]),
            grid_shape: RuntimeShape::<u32, 3>::new([z, y, x]),
        }
    }

    /// Voxel counts `[Nx, Ny, Nz]`.
    pub fn size(&self) -> [u32; 3] {
        self.file_shape.as_array()
    }

    /// Number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.file_shape.size() as usize
    }

    /// Flat index of voxel `[u, v, w]` in grid order.
    pub fn grid_index(&self, [u, v, w]: [u32; 3]) -> usize {
        self.grid_shape.linearize([w, v, u]) as usize
    }

    /// Flat index of voxel `[u, v, w]` in the file order of a scalar field.
    pub fn file_index(&self, voxel: [u32; 3]) -> usize {
        self.file_shape.linearize(voxel) as usize
    }

    /// Flat index of component `component` (0, 1, 2 for x, y, z) of voxel `[u, v, w]` in the
    /// file order of a vector field.
    pub fn file_index_vec(&self, voxel: [u32; 3], component: usize) -> usize {
        self.file_index(voxel) * 3 + component
    }

    /// Reorders a scalar field block from file order to grid order.
    ///
    /// `staging` must hold exactly one float per voxel.
    pub fn transpose_scalar(&self, staging: &[f32]) -> Vec<f32> {
        debug_assert_eq!(staging.len(), self.voxel_count());
        let [nx, ny, nz] = self.size();
        let mut output = vec![0.0; self.voxel_count()];
        for u in 0..nx {
            for v in 0..ny {
                for w in 0..nz {
                    output[self.grid_index([u, v, w])] = staging[self.file_index([u, v, w])];
                }
            }
        }
        output
    }

    /// Reorders an interleaved vector field block from file order into three grid-ordered
    /// component arrays.
    ///
    /// `staging` must hold exactly three floats per voxel.
    pub fn transpose_vector(&self, staging: &[f32]) -> [Vec<f32>; 3] {
        debug_assert_eq!(staging.len(), self.voxel_count() * 3);
        let [nx, ny, nz] = self.size();
        let mut output = [
            vec![0.0; self.voxel_count()],
            vec![0.0; self.voxel_count()],
            vec![0.0; self.voxel_count()],
        ];
        for u in 0..nx {
            for v in 0..ny {
                for w in 0..nz {
                    let grid_index = self.grid_index([u, v, w]);
                    for (component, values) in output.iter_mut().enumerate() {
                        values[grid_index] = staging[self.file_index_vec([u, v, w], component)];
                    }
                }
            }
        }
        output
    }
}
