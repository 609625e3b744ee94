use crate::coords::ColorRgba;

use super::state::{
    Barrier, BlendState, ColorState, ColorWriteState, DepthStencilState, IndexFormat, Primitive,
    RasterizerState, Scissor, Shader, ShaderStage, TextureBinding, VertexAttrib,
    VertexBufferLayout, Viewport,
};
use super::{BufferRange, Image};

/// A single GPU command.
///
/// Commands are recorded into a [`CmdBuf`](super::CmdBuf), finished into a
/// [`CmdList`] and handed to `GpuDevice::submit_commands`. State set by one
/// list persists on the queue for the lists that follow it.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BindRenderTargets {
        color: Image,
        depth: Option<Image>,
    },
    SetViewports(Vec<Viewport>),
    SetScissors(Vec<Scissor>),
    ClearColor {
        target: u32,
        color: ColorRgba,
    },
    ClearDepthStencil {
        depth: f32,
        stencil: u8,
    },
    DiscardDepthStencil,
    BindShaders(Vec<Shader>),
    BindRasterizerState(RasterizerState),
    BindColorState(ColorState),
    BindColorWriteState(ColorWriteState),
    BindBlendStates {
        first: u32,
        states: Vec<BlendState>,
    },
    BindDepthStencilState(DepthStencilState),
    BindUniformBuffer {
        stage: ShaderStage,
        slot: u32,
        range: BufferRange,
    },
    /// Writes `data` into `range` at `offset` in command-stream order, so
    /// earlier draws still observe the previous contents.
    PushConstants {
        range: BufferRange,
        offset: u32,
        data: Vec<u8>,
    },
    BindVertexAttribs(Vec<VertexAttrib>),
    BindVertexBufferLayouts(Vec<VertexBufferLayout>),
    BindVertexBuffer {
        slot: u32,
        range: BufferRange,
    },
    BindIndexBuffer {
        format: IndexFormat,
        range: BufferRange,
    },
    BindSamplerDescriptorSet {
        range: BufferRange,
        count: u32,
    },
    BindImageDescriptorSet {
        range: BufferRange,
        count: u32,
    },
    BindTextures {
        stage: ShaderStage,
        first: u32,
        textures: Vec<TextureBinding>,
    },
    DrawIndexed {
        primitive: Primitive,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    },
    CopyBufferToImage {
        src: BufferRange,
        dst: Image,
        row_pitch: u32,
    },
    Barrier(Barrier),
}

impl Command {
    /// Bytes of command memory the encoded command occupies.
    ///
    /// Commands are encoded as a one-word header plus payload words; variable
    /// length payloads are charged per element.
    pub fn footprint(&self) -> u32 {
        const WORD: u32 = 4;
        let payload_words = match self {
            Command::BindRenderTargets { depth, .. } => 6 + if depth.is_some() { 6 } else { 0 },
            Command::SetViewports(v) => 6 * v.len() as u32,
            Command::SetScissors(s) => 4 * s.len() as u32,
            Command::ClearColor { .. } => 5,
            Command::ClearDepthStencil { .. } => 2,
            Command::DiscardDepthStencil => 0,
            Command::BindShaders(s) => 3 * s.len() as u32,
            Command::BindRasterizerState(_)
            | Command::BindColorState(_)
            | Command::BindColorWriteState(_)
            | Command::BindDepthStencilState(_)
            | Command::Barrier(_) => 1,
            Command::BindBlendStates { states, .. } => 1 + 2 * states.len() as u32,
            Command::BindUniformBuffer { .. } => 4,
            Command::PushConstants { data, .. } => 3 + data.len().div_ceil(4) as u32,
            Command::BindVertexAttribs(a) => a.len() as u32,
            Command::BindVertexBufferLayouts(l) => l.len() as u32,
            Command::BindVertexBuffer { .. } | Command::BindIndexBuffer { .. } => 4,
            Command::BindSamplerDescriptorSet { .. } | Command::BindImageDescriptorSet { .. } => 4,
            Command::BindTextures { textures, .. } => 2 + textures.len() as u32,
            Command::DrawIndexed { .. } => 6,
            Command::CopyBufferToImage { .. } => 10,
        };
        WORD * (1 + payload_words)
    }
}

/// A finished, immutable sequence of commands ready for submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CmdList {
    commands: Vec<Command>,
}

impl CmdList {
    #[inline]
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_includes_header_word() {
        assert_eq!(Command::DiscardDepthStencil.footprint(), 4);
        assert_eq!(Command::Barrier(Barrier::Fragments).footprint(), 8);
    }

    #[test]
    fn push_constants_charged_per_word() {
        let block = super::super::MemBlock { id: 0, generation: 0 };
        let cmd = Command::PushConstants {
            range: BufferRange::whole(block, 256),
            offset: 0,
            data: vec![0; 64],
        };
        assert_eq!(cmd.footprint(), 4 * (1 + 3 + 16));
    }
}
