use anyhow::Result;
use glam::{Mat4, Vec3, Vec4};
use image::RgbaImage;

use super::{
    locations, AttribLocation, BufferHandle, Graphics, Primitive, TextureHandle, UniformLocation,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginFrame([f32; 4]),
    EndFrame,
    Resize(u32, u32),
    SetAttribute { location: AttribLocation, components: u32, buffer: BufferHandle },
    DisableAttribute(AttribLocation),
    BindIndexBuffer(BufferHandle),
    BindTexture(TextureHandle),
    Matrix4(UniformLocation, Mat4),
    Vec3(UniformLocation, Vec3),
    Vec4(UniformLocation, Vec4),
    Int(UniformLocation, i32),
    DrawIndexed(Primitive, u32),
    DrawArrays(Primitive, u32),
}

#[derive(Debug, Clone)]
enum BufferData {
    Vertex(Vec<f32>),
    Index(Vec<u16>),
}

/// One submitted draw together with the pipeline state it saw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub primitive: Primitive,
    pub count: u32,
    pub indexed: bool,
    pub model: Option<Mat4>,
    pub normal: Option<Mat4>,
    pub texture: Option<TextureHandle>,
    pub fragment_color: Option<Vec4>,
    pub has_normals: bool,
    pub has_colors: bool,
}

/// [`Graphics`] implementation that keeps every call for later inspection.
///
/// Uniform state is interpreted with the standard [`locations`].
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<Command>,
    buffers: Vec<BufferData>,
    textures: Vec<(u32, u32)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_data(&self, buffer: BufferHandle) -> Option<&[f32]> {
        match self.buffers.get(buffer.0 as usize)? {
            BufferData::Vertex(data) => Some(data),
            BufferData::Index(_) => None,
        }
    }

    pub fn index_data(&self, buffer: BufferHandle) -> Option<&[u16]> {
        match self.buffers.get(buffer.0 as usize)? {
            BufferData::Index(data) => Some(data),
            BufferData::Vertex(_) => None,
        }
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(texture.0 as usize).copied()
    }

    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::EndFrame))
            .count()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Replays the command stream and returns one record per draw call.
    pub fn draws(&self) -> Vec<DrawRecord> {
        let mut model = None;
        let mut normal = None;
        let mut texture = None;
        let mut use_texture = false;
        let mut fragment_color = None;
        let mut has_normals = false;
        let mut has_colors = false;
        let mut draws = Vec::new();

        for command in &self.commands {
            match command {
                Command::Matrix4(location, value) if *location == locations::MODEL_MATRIX => {
                    model = Some(*value)
                }
                Command::Matrix4(location, value) if *location == locations::NORMAL_MATRIX => {
                    normal = Some(*value)
                }
                Command::Int(location, value) if *location == locations::USE_TEXTURE => {
                    use_texture = *value != 0
                }
                Command::Vec4(location, value) if *location == locations::FRAGMENT_COLOR => {
                    fragment_color = Some(*value)
                }
                Command::BindTexture(handle) => texture = Some(*handle),
                Command::SetAttribute { location, .. } | Command::DisableAttribute(location) => {
                    let enabled = matches!(command, Command::SetAttribute { .. });
                    if *location == locations::VERTEX_NORMAL {
                        has_normals = enabled;
                    } else if *location == locations::VERTEX_COLOR {
                        has_colors = enabled;
                    }
                }
                Command::DrawIndexed(primitive, count) | Command::DrawArrays(primitive, count) => {
                    draws.push(DrawRecord {
                        primitive: *primitive,
                        count: *count,
                        indexed: matches!(command, Command::DrawIndexed(..)),
                        model,
                        normal,
                        texture: texture.filter(|_| use_texture),
                        fragment_color,
                        has_normals,
                        has_colors,
                    });
                }
                _ => {}
            }
        }
        draws
    }
}

impl Graphics for Recorder {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle {
        self.buffers.push(BufferData::Vertex(data.to_vec()));
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> BufferHandle {
        self.buffers.push(BufferData::Index(data.to_vec()));
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle> {
        self.textures.push(image.dimensions());
        Ok(TextureHandle(self.textures.len() as u32 - 1))
    }

    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.commands.push(Command::BeginFrame(clear_color));
    }

    fn end_frame(&mut self) -> Result<()> {
        self.commands.push(Command::EndFrame);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.commands.push(Command::Resize(width, height));
    }

    fn set_vertex_attribute(&mut self, location: AttribLocation, components: u32, buffer: BufferHandle) {
        self.commands.push(Command::SetAttribute { location, components, buffer });
    }

    fn disable_vertex_attribute(&mut self, location: AttribLocation) {
        self.commands.push(Command::DisableAttribute(location));
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        self.commands.push(Command::BindIndexBuffer(buffer));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.commands.push(Command::BindTexture(texture));
    }

    fn set_uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4) {
        self.commands.push(Command::Matrix4(location, *value));
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        self.commands.push(Command::Vec3(location, value));
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        self.commands.push(Command::Vec4(location, value));
    }

    fn set_uniform_int(&mut self, location: UniformLocation, value: i32) {
        self.commands.push(Command::Int(location, value));
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: u32) {
        self.commands.push(Command::DrawIndexed(primitive, count));
    }

    fn draw_arrays(&mut self, primitive: Primitive, count: u32) {
        self.commands.push(Command::DrawArrays(primitive, count));
    }
}
