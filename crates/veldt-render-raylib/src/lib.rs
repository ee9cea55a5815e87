//! Raylib-based GPU boundary: cell mesh upload and instanced grass.

use raylib::prelude::*;
use veldt_cell::{CellCoord, CellMeshCpu};
use veldt_geom::Mat4;
use veldt_scatter::MAX_INSTANCES_PER_BATCH;

pub mod conv {
    use veldt_geom::{Aabb, Vec3};

    pub fn vec3_to_rl(v: Vec3) -> raylib::prelude::Vector3 {
        raylib::prelude::Vector3::new(v.x, v.y, v.z)
    }

    pub fn vec3_from_rl(v: raylib::prelude::Vector3) -> Vec3 {
        Vec3 {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub fn aabb_to_rl(bb: Aabb) -> raylib::core::math::BoundingBox {
        raylib::core::math::BoundingBox::new(vec3_to_rl(bb.min), vec3_to_rl(bb.max))
    }

    /// Column-major [f32; 16] to raylib's field-per-element matrix.
    pub fn mat4_to_rl(m: &veldt_geom::Mat4) -> raylib::ffi::Matrix {
        raylib::ffi::Matrix {
            m0: m[0],
            m1: m[1],
            m2: m[2],
            m3: m[3],
            m4: m[4],
            m5: m[5],
            m6: m[6],
            m7: m[7],
            m8: m[8],
            m9: m[9],
            m10: m[10],
            m11: m[11],
            m12: m[12],
            m13: m[13],
            m14: m[14],
            m15: m[15],
        }
    }
}

/// GPU-side resources for one loaded cell.
pub struct CellRender {
    pub coord: CellCoord,
    pub model: raylib::core::models::Model,
    pub bbox: raylib::core::math::BoundingBox,
}

/// Upload a CPU cell mesh as a single-material model with per-vertex
/// colors. The streaming config guarantees the vertex count fits u16
/// indices, so no splitting is needed here.
pub fn upload_cell_mesh(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    coord: CellCoord,
    cpu: &CellMeshCpu,
) -> Option<CellRender> {
    let v_count = cpu.positions.len() / 3;
    if v_count == 0 {
        return None;
    }
    let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
    raw.vertexCount = v_count as i32;
    raw.triangleCount = (cpu.indices.len() / 3) as i32;
    unsafe {
        let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
        let cbytes = (v_count * 4 * std::mem::size_of::<u8>()) as u32;
        let ibytes = (cpu.indices.len() * std::mem::size_of::<u16>()) as u32;
        raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.normals = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.colors = raylib::ffi::MemAlloc(cbytes) as *mut u8;
        raw.indices = raylib::ffi::MemAlloc(ibytes) as *mut u16;
        std::ptr::copy_nonoverlapping(cpu.positions.as_ptr(), raw.vertices, v_count * 3);
        std::ptr::copy_nonoverlapping(cpu.normals.as_ptr(), raw.normals, v_count * 3);
        std::ptr::copy_nonoverlapping(cpu.colors.as_ptr(), raw.colors, v_count * 4);
        std::ptr::copy_nonoverlapping(cpu.indices.as_ptr(), raw.indices, cpu.indices.len());
    }
    let mut mesh = unsafe { raylib::core::models::Mesh::from_raw(raw) };
    unsafe {
        mesh.upload(false);
    }
    let model = rl
        .load_model_from_mesh(thread, unsafe { mesh.make_weak() })
        .ok()?;
    Some(CellRender {
        coord,
        model,
        bbox: conv::aabb_to_rl(cpu.bbox),
    })
}

// Minimal GLSL 330 pair for per-instance transforms; raylib's default
// shader ignores the instance attribute entirely.
const GRASS_VS: &str = r"#version 330
in vec3 vertexPosition;
in vec4 vertexColor;
in mat4 instanceTransform;
uniform mat4 mvp;
out vec4 fragColor;
void main()
{
    fragColor = vertexColor;
    gl_Position = mvp * instanceTransform * vec4(vertexPosition, 1.0);
}
";

const GRASS_FS: &str = r"#version 330
in vec4 fragColor;
out vec4 finalColor;
void main()
{
    finalColor = fragColor;
}
";

/// Instanced grass drawing: one uploaded blade mesh, redrawn every frame
/// for each batch of transforms. No per-blade state exists on the GPU
/// side; the transform arrays live with the dense placer.
pub struct GrassRenderer {
    mesh: raylib::ffi::Mesh,
    material: raylib::ffi::Material,
    pub shader: raylib::shaders::WeakShader,
}

impl GrassRenderer {
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread) -> Self {
        let shader_strong = rl.load_shader_from_memory(thread, Some(GRASS_VS), Some(GRASS_FS));
        let shader = unsafe { shader_strong.make_weak() };
        let mut material = unsafe { raylib::ffi::LoadMaterialDefault() };
        material.shader = *shader.as_ref();
        unsafe {
            // The instanced draw path reads per-instance transforms from
            // whatever attribute is wired to the model-matrix slot.
            let name = std::ffi::CString::new("instanceTransform").unwrap_or_default();
            let loc = raylib::ffi::GetShaderLocationAttrib(*shader.as_ref(), name.as_ptr());
            let slot = raylib::consts::ShaderLocationIndex::SHADER_LOC_MATRIX_MODEL as usize;
            *material.shader.locs.add(slot) = loc;
        }
        let mesh = upload_blade_mesh();
        Self {
            mesh,
            material,
            shader,
        }
    }

    /// Draw one batch of instance transforms. Call inside 3D mode, once
    /// per batch from the dense placer.
    pub fn draw_batch(&self, batch: &[Mat4]) {
        debug_assert!(batch.len() <= MAX_INSTANCES_PER_BATCH);
        if batch.is_empty() {
            return;
        }
        let transforms: Vec<raylib::ffi::Matrix> = batch.iter().map(conv::mat4_to_rl).collect();
        unsafe {
            raylib::ffi::DrawMeshInstanced(
                self.mesh,
                self.material,
                transforms.as_ptr(),
                transforms.len() as i32,
            );
        }
    }
}

impl Drop for GrassRenderer {
    fn drop(&mut self) {
        unsafe {
            raylib::ffi::UnloadMesh(self.mesh);
        }
    }
}

/// A unit-height crossed pair of tapering quads, origin at the root.
/// Instance transforms supply position, yaw, and size.
fn upload_blade_mesh() -> raylib::ffi::Mesh {
    const ROOT: [u8; 4] = [62, 102, 44, 255];
    const TIP: [u8; 4] = [118, 168, 74, 255];
    let mut positions: Vec<f32> = Vec::new();
    let mut normals: Vec<f32> = Vec::new();
    let mut colors: Vec<u8> = Vec::new();
    let mut indices: Vec<u16> = Vec::new();
    // Two quads at right angles, each 0.12 wide and 1.0 tall, tapering
    // to a third of the width at the tip.
    for (nx, nz) in [(0.0f32, 1.0f32), (1.0, 0.0)] {
        let base = positions.len() as u16 / 3;
        let (tx, tz) = (nz, nx);
        let w0 = 0.06;
        let w1 = 0.02;
        for (dx, y, w, col) in [
            (-1.0f32, 0.0f32, w0, ROOT),
            (1.0, 0.0, w0, ROOT),
            (1.0, 1.0, w1, TIP),
            (-1.0, 1.0, w1, TIP),
        ] {
            positions.extend_from_slice(&[dx * w * tx, y, dx * w * tz]);
            normals.extend_from_slice(&[nx, 0.0, nz]);
            colors.extend_from_slice(&col);
        }
        // Both windings so the blade is visible from either side.
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        indices.extend_from_slice(&[base + 2, base + 1, base, base + 3, base + 2, base]);
    }

    let v_count = positions.len() / 3;
    let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
    raw.vertexCount = v_count as i32;
    raw.triangleCount = (indices.len() / 3) as i32;
    unsafe {
        let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
        let cbytes = (v_count * 4 * std::mem::size_of::<u8>()) as u32;
        let ibytes = (indices.len() * std::mem::size_of::<u16>()) as u32;
        raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.normals = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.colors = raylib::ffi::MemAlloc(cbytes) as *mut u8;
        raw.indices = raylib::ffi::MemAlloc(ibytes) as *mut u16;
        std::ptr::copy_nonoverlapping(positions.as_ptr(), raw.vertices, v_count * 3);
        std::ptr::copy_nonoverlapping(normals.as_ptr(), raw.normals, v_count * 3);
        std::ptr::copy_nonoverlapping(colors.as_ptr(), raw.colors, v_count * 4);
        std::ptr::copy_nonoverlapping(indices.as_ptr(), raw.indices, indices.len());
        raylib::ffi::UploadMesh(&mut raw, false);
    }
    raw
}
