//! Fixed-stride output buffers handed to the renderer.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use glam::{Mat4, Quat, Vec3};

use crate::motion::DisplayPose;
use crate::population::Population;

/// GPU-compatible instance record: 48 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRecord {
    pub position: [f32; 3],    // 12 bytes
    pub visibility: f32,       //  4 bytes
    pub orientation: [f32; 4], // 16 bytes, xyzw
    pub scale: [f32; 3],       // 12 bytes
    pub _pad: f32,             //  4 bytes
}

const _: () = assert!(std::mem::size_of::<InstanceRecord>() == InstanceRecord::STRIDE);

impl InstanceRecord {
    pub const STRIDE: usize = 48;

    /// Record for a display pose. Non-finite input yields a collapsed,
    /// invisible record instead of NaNs.
    pub fn from_display(display: &DisplayPose) -> Self {
        let finite = display.position.is_finite()
            && display.orientation.is_finite()
            && display.scale.is_finite()
            && display.visibility.is_finite();
        if !finite {
            return Self::hidden();
        }
        Self {
            position: display.position.to_array(),
            visibility: display.visibility,
            orientation: display.orientation.to_array(),
            scale: [display.scale; 3],
            _pad: 0.0,
        }
    }

    /// Zero-scale record at the origin.
    pub fn hidden() -> Self {
        Self {
            position: [0.0; 3],
            visibility: 0.0,
            orientation: Quat::IDENTITY.to_array(),
            scale: [0.0; 3],
            _pad: 0.0,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from_array(self.scale),
            Quat::from_array(self.orientation),
            Vec3::from_array(self.position),
        )
    }
}

/// Dense per-population instance buffer, sized once.
#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    records: Vec<InstanceRecord>,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn new(count: usize) -> Self {
        Self {
            records: vec![InstanceRecord::hidden(); count],
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stride(&self) -> usize {
        InstanceRecord::STRIDE
    }

    pub fn records(&self) -> &[InstanceRecord] {
        &self.records
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    pub fn byte_len(&self) -> usize {
        self.records.len() * InstanceRecord::STRIDE
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Report and clear the needs-upload flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Write model matrices into `out`; returns how many were written.
    pub fn write_matrices(&self, out: &mut [Mat4]) -> usize {
        let n = out.len().min(self.records.len());
        for (dst, record) in out.iter_mut().zip(&self.records) {
            *dst = record.model_matrix();
        }
        n
    }
}

/// Flat position / color / size arrays for point-cloud populations.
#[derive(Clone, Debug)]
pub struct PointCloudBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    dirty: bool,
}

impl PointCloudBuffer {
    pub fn new(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            colors: vec![0.0; count * 3],
            sizes: vec![0.0; count],
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Entity tint faded by visibility.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Serializes display poses into output buffers, in population order.
pub struct InstanceWriter;

impl InstanceWriter {
    /// Refresh `buffer` from `population`. Marks the buffer dirty when any
    /// record changed and returns whether one did.
    pub fn write(population: &Population, buffer: &mut InstanceBuffer) -> bool {
        let runtime = population.runtime();
        if runtime.len() != buffer.records.len() {
            log::warn!(
                "instance buffer holds {} records for {} entities",
                buffer.records.len(),
                runtime.len()
            );
        }

        #[cfg(feature = "parallel")]
        let changed = buffer
            .records
            .par_iter_mut()
            .zip(runtime.par_iter())
            .map(|(slot, pose)| store(slot, InstanceRecord::from_display(pose.display())))
            .reduce(|| false, |a, b| a | b);

        #[cfg(not(feature = "parallel"))]
        let changed = buffer
            .records
            .iter_mut()
            .zip(runtime)
            .fold(false, |acc, (slot, pose)| {
                store(slot, InstanceRecord::from_display(pose.display())) | acc
            });

        buffer.dirty |= changed;
        changed
    }

    /// Refresh a point-cloud buffer from `population`.
    pub fn write_points(population: &Population, buffer: &mut PointCloudBuffer) -> bool {
        let mut changed = false;
        let rows = population
            .entities()
            .iter()
            .zip(population.runtime())
            .zip(buffer.positions.chunks_exact_mut(3))
            .zip(buffer.colors.chunks_exact_mut(3))
            .zip(buffer.sizes.iter_mut());
        for ((((entity, pose), position), color), size) in rows {
            let display = pose.display();
            let record = InstanceRecord::from_display(display);
            let tint = entity.tint.map(|c| c * record.visibility);
            changed |= store_slice(position, &record.position);
            changed |= store_slice(color, &tint);
            changed |= store(size, record.scale[0]);
        }
        buffer.dirty |= changed;
        changed
    }
}

#[inline]
fn store<T: PartialEq + Copy>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[inline]
fn store_slice(slot: &mut [f32], value: &[f32; 3]) -> bool {
    if slot == value.as_slice() {
        false
    } else {
        slot.copy_from_slice(value);
        true
    }
}
