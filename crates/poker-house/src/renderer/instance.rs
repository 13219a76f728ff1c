use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// What a renderer should draw for an instance.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Prop = 0,
    Wall = 1,
    Floor = 2,
    Ceiling = 3,
    Table = 4,
    Person = 5,
    Card = 6,
    Chip = 7,
    Weapon = 8,
    Substance = 9,
}

/// Per-instance draw data handed to the renderer.
/// 24 words = 96 bytes stride, no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct RenderInstance {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// Linear RGBA tint.
    pub color: [f32; 4],
    /// [`RenderKind`] discriminant.
    pub kind: u32,
    /// 1 when the instance is lit, 0 when unlit.
    pub lighting: u32,
    /// Kind-specific detail: card face index, chip value, person role.
    pub variant: u32,
    pub _pad: u32,
}

impl RenderInstance {
    pub const WORDS: usize = 24;
    pub const STRIDE_BYTES: usize = Self::WORDS * 4;

    pub fn new(kind: RenderKind, model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [1.0; 4],
            kind: kind as u32,
            lighting: 1,
            variant: 0,
            _pad: 0,
        }
    }

    pub fn with_color(mut self, rgb: [f32; 3]) -> Self {
        self.color = [rgb[0], rgb[1], rgb[2], 1.0];
        self
    }

    pub fn with_lighting(mut self, lit: bool) -> Self {
        self.lighting = lit as u32;
        self
    }

    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = variant;
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Draw list for one frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn count_kind(&self, kind: RenderKind) -> usize {
        self.instances.iter().filter(|i| i.kind == kind as u32).count()
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_stride() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
        assert_eq!(RenderInstance::STRIDE_BYTES, 96);
    }

    #[test]
    fn render_buffer_push_and_bytes() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::new(RenderKind::Card, Mat4::IDENTITY));
        buf.push(RenderInstance::new(RenderKind::Chip, Mat4::IDENTITY));
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.as_bytes().len(), 192);
        assert_eq!(buf.count_kind(RenderKind::Card), 1);
    }
}
