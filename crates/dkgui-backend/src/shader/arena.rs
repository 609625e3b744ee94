use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::device::state::{Shader, ShaderStage};
use crate::device::{GpuContext, GpuDevice, MemBlock, MemBlockFlags, align, is_aligned};

use super::ShaderError;

/// Where a precompiled shader binary comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderCode {
    /// A file in the bundled resources, read at startup.
    File(PathBuf),
    /// Bytes already in memory (embedded or generated).
    Bytes(Vec<u8>),
}

impl ShaderCode {
    fn read(&self) -> Result<Cow<'_, [u8]>, ShaderError> {
        match self {
            ShaderCode::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| ShaderError::Io {
                    path: path.clone(),
                    source,
                }),
            ShaderCode::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

impl fmt::Display for ShaderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderCode::File(path) => write!(f, "{}", path.display()),
            ShaderCode::Bytes(bytes) => write!(f, "<{} embedded bytes>", bytes.len()),
        }
    }
}

/// Fixed-budget code memory with bump allocation.
///
/// Shaders are packed back to back at the device's code alignment; the last
/// `shader_code_unusable_size` bytes of the block are never handed out.
#[derive(Debug)]
pub struct CodeArena {
    block: MemBlock,
    capacity: u32,
    offset: u32,
}

impl CodeArena {
    /// Allocates `capacity` bytes of code memory.
    ///
    /// `capacity` must already be a multiple of the device block alignment.
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        capacity: u32,
    ) -> Result<Self, ShaderError> {
        let alignment = gpu.limits().memblock_alignment;
        if capacity == 0 || !is_aligned(capacity, alignment) {
            return Err(ShaderError::UnalignedBudget {
                size: capacity,
                alignment,
            });
        }
        let (block, capacity) = gpu.create_block(
            capacity,
            MemBlockFlags::CPU_UNCACHED | MemBlockFlags::GPU_CACHED | MemBlockFlags::CODE,
        )?;
        Ok(Self {
            block,
            capacity,
            offset: 0,
        })
    }

    /// Copies a shader binary to the next free offset and returns the shader
    /// bound there. The arena advances by the shader's aligned size.
    pub fn load<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
        stage: ShaderStage,
        code: &ShaderCode,
    ) -> Result<Shader, ShaderError> {
        let bytes = code.read()?;
        if bytes.is_empty() {
            return Err(ShaderError::Empty(code.to_string()));
        }

        let limits = gpu.limits();
        let size = bytes.len() as u32;
        let aligned_size = align(size, limits.shader_code_alignment);
        let needed = self.offset + aligned_size + limits.shader_code_unusable_size;
        if needed > self.capacity {
            return Err(ShaderError::BudgetExceeded {
                needed,
                budget: self.capacity,
            });
        }

        gpu.write_block(self.block, self.offset, &bytes)?;
        let shader = Shader {
            stage,
            block: self.block,
            offset: self.offset,
            size,
            aligned_size,
        };
        self.offset += aligned_size;

        log::debug!(
            "{:?} shader loaded from {} at {:#x} ({} bytes)",
            stage,
            code,
            shader.offset,
            size
        );
        Ok(shader)
    }

    /// Bytes handed out so far.
    #[inline]
    pub fn used(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn block(&self) -> MemBlock {
        self.block
    }

    /// Frees the code memory. No queued work may still use its shaders.
    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), ShaderError> {
        gpu.destroy_block(self.block)?;
        Ok(())
    }
}
