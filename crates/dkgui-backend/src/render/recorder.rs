use std::collections::HashSet;

use crate::device::state::{Barrier, Primitive, ShaderStage, TextureBinding};
use crate::device::{Command, DeviceError, Encoder, GpuContext, GpuDevice};
use crate::gui::{DrawCmd, DrawData, DrawElements, DrawIdx, DrawVert, TextureId};
use crate::swapchain::SwapchainResources;
use crate::texture::TextureManager;

use super::slot::FrameSlot;
use super::state::{GeometryBinding, Pipeline};
use super::uniforms::VertUniforms;

/// Distinct unknown texture ids reported before further ones go unlogged.
const MAX_WARNED_IDS: usize = 64;

/// What one call to [`FrameRecorder::render`] did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub slot: u32,
    pub draw_calls: u32,
    pub texture_binds: u32,
    /// Draw commands dropped for an empty scissor, zero elements or an unknown texture.
    pub skipped: u32,
    /// Vertex or index blocks replaced to fit this frame.
    pub reallocations: u32,
    pub vertex_bytes: u32,
    pub index_bytes: u32,
}

/// Translates GUI draw data into command lists, one frame slot at a time.
#[derive(Debug)]
pub struct FrameRecorder {
    pipeline: Pipeline,
    slots: Vec<FrameSlot>,
    min_buffer_size: u32,
    warned: HashSet<TextureId>,
}

/// State of one pass over the draw lists.
struct Walk<'a> {
    pipeline: &'a Pipeline,
    textures: &'a TextureManager,
    warned: &'a mut HashSet<TextureId>,
    draw_data: &'a DrawData,
    proj: VertUniforms,
    geometry: GeometryBinding,
    bound: Option<u32>,
    stats: FrameStats,
}

impl FrameRecorder {
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        pipeline: Pipeline,
        slot_count: usize,
        cmd_mem_size: u32,
        min_buffer_size: u32,
    ) -> Result<Self, DeviceError> {
        let mut slots = Vec::with_capacity(slot_count);
        for _ in 0..slot_count {
            slots.push(FrameSlot::create(gpu, cmd_mem_size)?);
        }
        Ok(Self {
            pipeline,
            slots,
            min_buffer_size,
            warned: HashSet::new(),
        })
    }

    #[inline]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    #[inline]
    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    /// Records, submits and presents one frame.
    ///
    /// Blocks in `acquire` until the next slot's previous frame has retired.
    /// The frame is submitted as two lists: the pass setup, then the draws.
    ///
    /// Geometry sizes are checked before acquiring. A device error after the
    /// acquire leaves the slot unpresented and its command buffer partially
    /// recorded; the backend treats such errors as fatal.
    pub fn render<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
        targets: &SwapchainResources,
        textures: &TextureManager,
        draw_data: &DrawData,
    ) -> Result<FrameStats, DeviceError> {
        let vertex_bytes =
            byte_size("vertex data", draw_data.total_vtx_count(), size_of::<DrawVert>())?;
        let index_bytes =
            byte_size("index data", draw_data.total_idx_count(), size_of::<DrawIdx>())?;

        let slot = gpu.acquire(targets.swapchain())?;
        let color = targets
            .framebuffer(slot)
            .ok_or(DeviceError::UnknownHandle("swapchain slot"))?;
        let frame = self
            .slots
            .get_mut(slot as usize)
            .ok_or(DeviceError::UnknownHandle("frame slot"))?;
        frame.cmdbuf.clear();

        let proj = VertUniforms::ortho(draw_data.display_pos, draw_data.display_size);
        {
            let mut enc = Encoder::new(gpu, &mut frame.cmdbuf);
            self.pipeline.begin_pass(&mut enc, color, targets.depth())?;
            self.pipeline.bind_state(&mut enc, &proj, None)?;
            enc.submit()?;
        }

        let mut stats = FrameStats {
            slot,
            vertex_bytes,
            index_bytes,
            ..FrameStats::default()
        };

        let geometry = if vertex_bytes > 0 && index_bytes > 0 {
            let before = frame.reallocations();
            frame.vertices.ensure(gpu, vertex_bytes, self.min_buffer_size)?;
            frame.indices.ensure(gpu, index_bytes, self.min_buffer_size)?;
            stats.reallocations = frame.reallocations() - before;

            let (mut vtx_offset, mut idx_offset) = (0u32, 0u32);
            for list in &draw_data.lists {
                frame
                    .vertices
                    .write(gpu, vtx_offset, bytemuck::cast_slice(&list.vertices))?;
                frame
                    .indices
                    .write(gpu, idx_offset, bytemuck::cast_slice(&list.indices))?;
                vtx_offset +=
                    byte_size("vertex data", list.vertices.len(), size_of::<DrawVert>())?;
                idx_offset += byte_size("index data", list.indices.len(), size_of::<DrawIdx>())?;
            }

            match (frame.vertices.range(), frame.indices.range()) {
                (Some(vertices), Some(indices)) => Some(GeometryBinding { vertices, indices }),
                _ => None,
            }
        } else {
            None
        };

        let mut enc = Encoder::new(gpu, &mut frame.cmdbuf);
        if let Some(geometry) = geometry {
            self.pipeline.bind_geometry(&mut enc, geometry)?;
            let mut walk = Walk {
                pipeline: &self.pipeline,
                textures,
                warned: &mut self.warned,
                draw_data,
                proj,
                geometry,
                bound: None,
                stats,
            };
            walk.run(&mut enc)?;
            stats = walk.stats;
        }

        enc.push(Command::Barrier(Barrier::Fragments))?;
        enc.push(Command::DiscardDepthStencil)?;
        enc.submit()?;
        gpu.present(targets.swapchain(), slot)?;

        log::trace!("frame presented: {:?}", stats);
        Ok(stats)
    }

    /// Releases every slot and hands back the pipeline, whose uniform block
    /// the caller destroys. The queue must be idle.
    pub fn release_slots<D: GpuDevice>(
        self,
        gpu: &mut GpuContext<D>,
    ) -> Result<Pipeline, DeviceError> {
        for slot in self.slots {
            slot.destroy(gpu)?;
        }
        Ok(self.pipeline)
    }
}

/// `count * stride` as a device byte size.
fn byte_size(what: &'static str, count: usize, stride: usize) -> Result<u32, DeviceError> {
    count
        .checked_mul(stride)
        .and_then(|bytes| u32::try_from(bytes).ok())
        .ok_or(DeviceError::SizeOverflow { what, count })
}

impl Walk<'_> {
    fn run<D: GpuDevice>(&mut self, enc: &mut Encoder<'_, D>) -> Result<(), DeviceError> {
        let draw_data = self.draw_data;
        let (mut vtx_base, mut idx_base) = (0u32, 0u32);
        for list in &draw_data.lists {
            for cmd in &list.commands {
                match cmd {
                    DrawCmd::ResetRenderState => {
                        self.pipeline
                            .bind_state(enc, &self.proj, Some(self.geometry))?;
                        self.bound = None;
                    }
                    DrawCmd::Elements(elements) => {
                        if !self.draw(enc, elements, vtx_base, idx_base)? {
                            self.stats.skipped += 1;
                        }
                    }
                }
            }
            // Totals fit in 32-bit byte sizes, so element counts do too.
            vtx_base += list.vertices.len() as u32;
            idx_base += list.indices.len() as u32;
        }
        Ok(())
    }

    /// Records one draw. Returns `false` when the command had to be skipped.
    fn draw<D: GpuDevice>(
        &mut self,
        enc: &mut Encoder<'_, D>,
        elements: &DrawElements,
        vtx_base: u32,
        idx_base: u32,
    ) -> Result<bool, DeviceError> {
        if elements.elem_count == 0 {
            return Ok(false);
        }
        let Some(scissor) = elements.clip_rect.to_scissor(
            self.draw_data.display_pos,
            self.draw_data.framebuffer_scale,
            self.pipeline.width,
            self.pipeline.height,
        ) else {
            return Ok(false);
        };
        let Some(texture) = self.textures.lookup(elements.texture_id) else {
            if self.warned.len() < MAX_WARNED_IDS && self.warned.insert(elements.texture_id) {
                log::warn!(
                    "draw command references unknown texture id {:#x}; skipped",
                    elements.texture_id.raw()
                );
            }
            return Ok(false);
        };

        enc.push(Command::SetScissors(vec![scissor]))?;
        if self.bound != Some(texture.descriptor_index) {
            self.pipeline.push_texture_kind(enc, texture.is_alpha)?;
            enc.push(Command::BindTextures {
                stage: ShaderStage::Fragment,
                first: 0,
                textures: vec![TextureBinding {
                    image: texture.descriptor_index,
                    sampler: texture.descriptor_index,
                }],
            })?;
            self.bound = Some(texture.descriptor_index);
            self.stats.texture_binds += 1;
        }
        enc.push(Command::DrawIndexed {
            primitive: Primitive::Triangles,
            index_count: elements.elem_count,
            instance_count: 1,
            first_index: elements.idx_offset + idx_base,
            vertex_offset: (elements.vtx_offset + vtx_base) as i32,
            first_instance: 0,
        })?;
        self.stats.draw_calls += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ClipRect, ColorRgba, Vec2};
    use crate::device::{HeadlessDevice, Submission};
    use crate::gui::{DrawList, MAX_VERTICES_PER_CMD};
    use crate::render::UniformBlock;
    use crate::shader::{CodeArena, ShaderCode};

    const CLEAR: ColorRgba = ColorRgba::new(0.125, 0.294, 0.478, 1.0);
    const FULL: ClipRect = ClipRect::new(0.0, 0.0, 1280.0, 720.0);

    struct Rig {
        gpu: GpuContext<HeadlessDevice>,
        targets: SwapchainResources,
        textures: TextureManager,
        recorder: FrameRecorder,
        font: TextureId,
        user: TextureId,
    }

    fn rig() -> Rig {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let mut code = CodeArena::create(&mut gpu, 0x1000).unwrap();
        let vertex = code
            .load(&mut gpu, ShaderStage::Vertex, &ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Vertex, 0x100)))
            .unwrap();
        let fragment = code
            .load(&mut gpu, ShaderStage::Fragment, &ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Fragment, 0x100)))
            .unwrap();
        let targets = SwapchainResources::create(&mut gpu, 1280, 720).unwrap();

        let mut textures = TextureManager::create(&mut gpu, 4).unwrap();
        let font = textures.create_texture(&mut gpu, &[0xFF; 64], 8, 8).unwrap();
        let user = textures.create_texture(&mut gpu, &[0xFF; 16], 2, 2).unwrap();
        textures.bind_descriptors(&mut gpu).unwrap();

        let pipeline = Pipeline {
            vertex,
            fragment,
            uniforms: UniformBlock::create(&mut gpu, 0x1000).unwrap(),
            clear_color: CLEAR,
            width: 1280,
            height: 720,
        };
        let recorder = FrameRecorder::create(&mut gpu, pipeline, 2, 0x4000, 0x10000).unwrap();
        gpu.device_mut().take_submissions();

        Rig {
            font: textures.texture_id(font),
            user: textures.texture_id(user),
            gpu,
            targets,
            textures,
            recorder,
        }
    }

    impl Rig {
        fn render(&mut self, data: &DrawData) -> (FrameStats, Vec<Submission>) {
            let stats = self
                .recorder
                .render(&mut self.gpu, &self.targets, &self.textures, data)
                .unwrap();
            (stats, self.gpu.device_mut().take_submissions())
        }
    }

    fn quad(list: &mut DrawList, clip: ClipRect, texture: TextureId) {
        list.add_quad(
            Vec2::new(10.0, 10.0),
            Vec2::new(50.0, 50.0),
            Vec2::zero(),
            Vec2::splat(1.0),
            ColorRgba::white(),
            clip,
            texture,
        );
    }

    fn frame(lists: Vec<DrawList>) -> DrawData {
        let mut data = DrawData::new(Vec2::new(1280.0, 720.0));
        data.lists = lists;
        data
    }

    fn count(subs: &[Submission], pred: impl Fn(&Command) -> bool) -> usize {
        subs.iter()
            .flat_map(|s| s.list.commands())
            .filter(|c| pred(c))
            .count()
    }

    fn draw_calls(subs: &[Submission]) -> Vec<(u32, u32, i32)> {
        subs.iter()
            .flat_map(|s| s.list.commands())
            .filter_map(|c| match c {
                Command::DrawIndexed {
                    index_count,
                    first_index,
                    vertex_offset,
                    ..
                } => Some((*index_count, *first_index, *vertex_offset)),
                _ => None,
            })
            .collect()
    }

    // ── frame structure ───────────────────────────────────────────────────

    #[test]
    fn empty_frame_clears_and_presents() {
        let mut rig = rig();
        let (stats, subs) = rig.render(&frame(Vec::new()));

        assert_eq!(stats.draw_calls, 0);
        assert_eq!(subs.len(), 2);
        assert!(subs[0].list.commands().contains(&Command::ClearColor { target: 0, color: CLEAR }));
        let last = subs[1].list.commands();
        assert_eq!(last[last.len() - 2], Command::Barrier(Barrier::Fragments));
        assert_eq!(last[last.len() - 1], Command::DiscardDepthStencil);
        assert_eq!(rig.gpu.device().presented(), &[0]);
    }

    #[test]
    fn slots_alternate_between_frames() {
        let mut rig = rig();
        let slots: Vec<u32> = (0..3).map(|_| rig.render(&frame(Vec::new())).0.slot).collect();
        assert_eq!(slots, [0, 1, 0]);
    }

    #[test]
    fn state_batch_disables_depth_and_culling() {
        let mut rig = rig();
        let (_, subs) = rig.render(&frame(Vec::new()));
        let state = subs[0].list.commands();
        assert!(state.contains(&Command::BindDepthStencilState(
            crate::device::state::DepthStencilState::default()
        )));
        assert!(state.contains(&Command::BindRasterizerState(
            crate::device::state::RasterizerState {
                cull_mode: crate::device::state::CullMode::None
            }
        )));
    }

    // ── texture coalescing ────────────────────────────────────────────────

    #[test]
    fn same_texture_is_bound_once() {
        let mut rig = rig();
        let mut list = DrawList::new();
        for x in 0..3 {
            let clip = ClipRect::new(x as f32 * 100.0, 0.0, x as f32 * 100.0 + 90.0, 90.0);
            quad(&mut list, clip, rig.font);
        }
        let (stats, subs) = rig.render(&frame(vec![list]));

        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.texture_binds, 1);
        assert_eq!(count(&subs, |c| matches!(c, Command::BindTextures { .. })), 1);
    }

    #[test]
    fn texture_switches_rebind() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, FULL, rig.font);
        quad(&mut list, FULL, rig.user);
        quad(&mut list, FULL, rig.font);
        let (stats, _) = rig.render(&frame(vec![list]));
        assert_eq!(stats.texture_binds, 3);
    }

    #[test]
    fn alpha_flag_follows_texture_kind() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, FULL, rig.font);
        quad(&mut list, FULL, rig.user);
        let (_, subs) = rig.render(&frame(vec![list]));

        let frag = rig.recorder.pipeline().uniforms.frag();
        let flags: Vec<u8> = subs
            .iter()
            .flat_map(|s| s.list.commands())
            .filter_map(|c| match c {
                Command::PushConstants { range, data, .. } if *range == frag => Some(data[0]),
                _ => None,
            })
            .collect();
        assert_eq!(flags, [1, 0]);
    }

    #[test]
    fn reset_render_state_forgets_bound_texture() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, FULL, rig.font);
        list.commands.push(DrawCmd::ResetRenderState);
        quad(&mut list, FULL, rig.font);
        let (stats, subs) = rig.render(&frame(vec![list]));

        assert_eq!(stats.texture_binds, 2);
        assert_eq!(count(&subs[1..], |c| matches!(c, Command::BindShaders(_))), 1);
        assert_eq!(count(&subs, |c| matches!(c, Command::ClearColor { .. })), 1);
    }

    // ── offsets and skipping ──────────────────────────────────────────────

    #[test]
    fn later_lists_are_offset_by_earlier_geometry() {
        let mut rig = rig();
        let mut a = DrawList::new();
        quad(&mut a, FULL, rig.font);
        let mut b = DrawList::new();
        quad(&mut b, FULL, rig.font);
        let (_, subs) = rig.render(&frame(vec![a, b]));
        assert_eq!(draw_calls(&subs), [(6, 0, 0), (6, 6, 4)]);
    }

    #[test]
    fn empty_and_unknown_commands_are_skipped() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, FULL, rig.font);
        list.commands.push(DrawCmd::Elements(DrawElements {
            clip_rect: FULL,
            texture_id: rig.font,
            elem_count: 0,
            idx_offset: 0,
            vtx_offset: 0,
        }));
        quad(&mut list, ClipRect::new(2000.0, 0.0, 2100.0, 100.0), rig.user);
        quad(&mut list, FULL, TextureId::from_descriptor_index(3));

        let (stats, subs) = rig.render(&frame(vec![list]));
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.skipped, 3);
        assert_eq!(draw_calls(&subs).len(), 1);
    }

    #[test]
    fn unknown_id_warnings_are_bounded() {
        let mut rig = rig();
        let mut list = DrawList::new();
        for i in 0..(MAX_WARNED_IDS as u32 + 16) {
            quad(&mut list, FULL, TextureId::from_descriptor_index(100 + i));
        }
        let data = frame(vec![list]);
        rig.render(&data);
        rig.render(&data);
        assert_eq!(rig.recorder.warned.len(), MAX_WARNED_IDS);
    }

    #[test]
    fn scissor_tracks_clip_rect() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, ClipRect::new(10.0, 20.0, 110.0, 70.0), rig.font);
        let (_, subs) = rig.render(&frame(vec![list]));
        let scissor = crate::device::state::Scissor::new(10, 20, 100, 50);
        assert_eq!(count(&subs[1..], |c| *c == Command::SetScissors(vec![scissor])), 1);
    }

    #[test]
    fn split_vertex_window_reaches_draw_offset() {
        let mut rig = rig();
        let mut list = DrawList::new();
        let quads = MAX_VERTICES_PER_CMD / 4;
        for _ in 0..=quads {
            quad(&mut list, FULL, rig.font);
        }
        let (stats, subs) = rig.render(&frame(vec![list]));

        let first = (quads * 6) as u32;
        assert_eq!(
            draw_calls(&subs),
            [(first, 0, 0), (6, first, MAX_VERTICES_PER_CMD as i32)]
        );
        assert_eq!(stats.texture_binds, 1);
    }

    #[test]
    fn byte_size_rejects_overflow() {
        assert_eq!(byte_size("vertex data", 3, 20), Ok(60));
        assert_eq!(
            byte_size("index data", u32::MAX as usize, 2),
            Err(DeviceError::SizeOverflow { what: "index data", count: u32::MAX as usize })
        );
        assert!(byte_size("vertex data", usize::MAX, 20).is_err());
    }

    // ── buffers ───────────────────────────────────────────────────────────

    #[test]
    fn buffers_grow_once_per_slot() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, FULL, rig.font);
        let data = frame(vec![list]);

        let reallocs: Vec<u32> = (0..4).map(|_| rig.render(&data).0.reallocations).collect();
        assert_eq!(reallocs, [2, 2, 0, 0]);
    }

    #[test]
    fn geometry_is_uploaded_to_slot_buffers() {
        let mut rig = rig();
        let mut list = DrawList::new();
        quad(&mut list, FULL, rig.font);
        let expected: Vec<u8> = bytemuck::cast_slice(&list.indices).to_vec();
        rig.render(&frame(vec![list]));

        let indices = rig.recorder.slots()[0].indices.range().unwrap();
        let bytes = rig.gpu.device().block_bytes(indices.block).unwrap();
        assert_eq!(&bytes[..expected.len()], expected.as_slice());
    }
}
