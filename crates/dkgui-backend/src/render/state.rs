use crate::coords::ColorRgba;
use crate::device::state::{
    AttribFormat, BlendState, ColorState, ColorWriteState, CullMode, DepthStencilState,
    IndexFormat, RasterizerState, Scissor, Shader, ShaderStage, VertexAttrib, VertexBufferLayout, Viewport,
};
use crate::device::{BufferRange, Command, DeviceError, Encoder, GpuDevice, Image};
use crate::gui::DrawVert;

use super::uniforms::{FragUniforms, UniformBlock, VertUniforms};

// pos @0, uv @8, col @16; see `DrawVert`.
const VERTEX_ATTRIBS: [VertexAttrib; 3] = [
    VertexAttrib {
        buffer: 0,
        offset: 0,
        format: AttribFormat::Float32x2,
    },
    VertexAttrib {
        buffer: 0,
        offset: 8,
        format: AttribFormat::Float32x2,
    },
    VertexAttrib {
        buffer: 0,
        offset: 16,
        format: AttribFormat::Unorm8x4,
    },
];

/// Static pipeline configuration shared by every frame.
#[derive(Debug)]
pub struct Pipeline {
    pub vertex: Shader,
    pub fragment: Shader,
    pub uniforms: UniformBlock,
    pub clear_color: ColorRgba,
    pub width: u32,
    pub height: u32,
}

/// Geometry buffers bound for the draws that follow.
#[derive(Debug, Copy, Clone)]
pub struct GeometryBinding {
    pub vertices: BufferRange,
    pub indices: BufferRange,
}

impl Pipeline {
    /// Binds the slot's framebuffer plus the shared depth buffer and clears both.
    pub fn begin_pass<D: GpuDevice>(
        &self,
        enc: &mut Encoder<'_, D>,
        color: Image,
        depth: Image,
    ) -> Result<(), DeviceError> {
        enc.push(Command::BindRenderTargets {
            color,
            depth: Some(depth),
        })?;
        enc.push(Command::SetViewports(vec![Viewport::full(self.width, self.height)]))?;
        enc.push(Command::SetScissors(vec![Scissor::new(0, 0, self.width, self.height)]))?;
        enc.push(Command::ClearColor {
            target: 0,
            color: self.clear_color,
        })?;
        enc.push(Command::ClearDepthStencil {
            depth: 1.0,
            stencil: 0,
        })
    }

    /// Emits everything a GUI draw depends on besides textures and scissors.
    ///
    /// Called once per frame and again whenever a draw list asks for its
    /// render state to be reset. Unlike [`Pipeline::begin_pass`] it never
    /// clears, so it is safe in the middle of a frame.
    pub fn bind_state<D: GpuDevice>(
        &self,
        enc: &mut Encoder<'_, D>,
        proj: &VertUniforms,
        geometry: Option<GeometryBinding>,
    ) -> Result<(), DeviceError> {
        enc.push(Command::SetViewports(vec![Viewport::full(self.width, self.height)]))?;
        enc.push(Command::BindShaders(vec![self.vertex, self.fragment]))?;
        enc.push(Command::BindRasterizerState(RasterizerState {
            cull_mode: CullMode::None,
        }))?;
        enc.push(Command::BindColorState(ColorState {
            blend_enable_mask: 1,
        }))?;
        enc.push(Command::BindColorWriteState(ColorWriteState::default()))?;
        enc.push(Command::BindBlendStates {
            first: 0,
            states: vec![BlendState::ALPHA],
        })?;
        enc.push(Command::BindDepthStencilState(DepthStencilState {
            depth_test: false,
            depth_write: false,
        }))?;

        let vert = self.uniforms.vert();
        enc.push(Command::BindUniformBuffer {
            stage: ShaderStage::Vertex,
            slot: 0,
            range: vert,
        })?;
        enc.push(Command::PushConstants {
            range: vert,
            offset: 0,
            data: bytemuck::bytes_of(proj).to_vec(),
        })?;
        let frag = self.uniforms.frag();
        enc.push(Command::BindUniformBuffer {
            stage: ShaderStage::Fragment,
            slot: 0,
            range: frag,
        })?;

        enc.push(Command::BindVertexAttribs(VERTEX_ATTRIBS.to_vec()))?;
        enc.push(Command::BindVertexBufferLayouts(vec![VertexBufferLayout {
            stride: size_of::<DrawVert>() as u32,
        }]))?;

        match geometry {
            Some(geometry) => self.bind_geometry(enc, geometry),
            None => Ok(()),
        }
    }

    pub fn bind_geometry<D: GpuDevice>(
        &self,
        enc: &mut Encoder<'_, D>,
        geometry: GeometryBinding,
    ) -> Result<(), DeviceError> {
        enc.push(Command::BindVertexBuffer {
            slot: 0,
            range: geometry.vertices,
        })?;
        enc.push(Command::BindIndexBuffer {
            format: IndexFormat::Uint16,
            range: geometry.indices,
        })
    }

    /// Sets the fragment "font" flag for the texture about to be bound.
    pub fn push_texture_kind<D: GpuDevice>(
        &self,
        enc: &mut Encoder<'_, D>,
        is_alpha: bool,
    ) -> Result<(), DeviceError> {
        enc.push(Command::PushConstants {
            range: self.uniforms.frag(),
            offset: 0,
            data: bytemuck::bytes_of(&FragUniforms::for_texture(is_alpha)).to_vec(),
        })
    }
}
