use bytemuck::{Pod, Zeroable};

/// Number of vertices in the shared cube: 6 faces × 2 triangles × 3.
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Interleaved cube vertex.
///
/// `color` holds three normalized channels; the fourth byte is padding so the
/// attribute maps onto an 8-bit four-component vertex format.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

const fn v(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Vertex {
    Vertex {
        position,
        color: [0, 0, 255, 0],
        uv,
        normal,
    }
}

const P: f32 = 0.5;
const N: f32 = -0.5;

const BACK: [f32; 3] = [0.0, 0.0, -1.0];
const FRONT: [f32; 3] = [0.0, 0.0, 1.0];
const LEFT: [f32; 3] = [-1.0, 0.0, 0.0];
const RIGHT: [f32; 3] = [1.0, 0.0, 0.0];
const TOP: [f32; 3] = [0.0, 1.0, 0.0];
const BOTTOM: [f32; 3] = [0.0, -1.0, 0.0];

#[rustfmt::skip]
const CUBE: [Vertex; CUBE_VERTEX_COUNT as usize] = [
    // -Z
    v([N, N, N], [0.0, 0.0], BACK),
    v([P, N, N], [1.0, 0.0], BACK),
    v([P, P, N], [1.0, 1.0], BACK),
    v([P, P, N], [1.0, 1.0], BACK),
    v([N, P, N], [0.0, 1.0], BACK),
    v([N, N, N], [0.0, 0.0], BACK),
    // +Z
    v([N, N, P], [0.0, 0.0], FRONT),
    v([P, N, P], [1.0, 0.0], FRONT),
    v([P, P, P], [1.0, 1.0], FRONT),
    v([P, P, P], [1.0, 1.0], FRONT),
    v([N, P, P], [0.0, 1.0], FRONT),
    v([N, N, P], [0.0, 0.0], FRONT),
    // -X
    v([N, N, N], [0.0, 0.0], LEFT),
    v([N, N, P], [1.0, 0.0], LEFT),
    v([N, P, P], [1.0, 1.0], LEFT),
    v([N, P, P], [1.0, 1.0], LEFT),
    v([N, P, N], [0.0, 1.0], LEFT),
    v([N, N, N], [0.0, 0.0], LEFT),
    // +X
    v([P, N, N], [0.0, 0.0], RIGHT),
    v([P, N, P], [1.0, 0.0], RIGHT),
    v([P, P, P], [1.0, 1.0], RIGHT),
    v([P, P, P], [1.0, 1.0], RIGHT),
    v([P, P, N], [0.0, 1.0], RIGHT),
    v([P, N, N], [0.0, 0.0], RIGHT),
    // +Y
    v([N, P, P], [0.0, 0.0], TOP),
    v([P, P, P], [1.0, 0.0], TOP),
    v([P, P, N], [1.0, 1.0], TOP),
    v([P, P, N], [1.0, 1.0], TOP),
    v([N, P, N], [0.0, 1.0], TOP),
    v([N, P, P], [0.0, 0.0], TOP),
    // -Y
    v([N, N, P], [0.0, 0.0], BOTTOM),
    v([P, N, P], [1.0, 0.0], BOTTOM),
    v([P, N, N], [1.0, 1.0], BOTTOM),
    v([P, N, N], [1.0, 1.0], BOTTOM),
    v([N, N, N], [0.0, 1.0], BOTTOM),
    v([N, N, P], [0.0, 0.0], BOTTOM),
];

/// The unit cube centred on the origin, as a flat triangle list.
pub fn cube_vertices() -> &'static [Vertex] {
    &CUBE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(cube_vertices()).len(), 36 * 36);
    }

    #[test]
    fn cube_has_six_faces_of_six_vertices() {
        let verts = cube_vertices();
        assert_eq!(verts.len(), CUBE_VERTEX_COUNT as usize);
        for face in verts.chunks(6) {
            let normal = face[0].normal;
            assert!(face.iter().all(|v| v.normal == normal));
            // every vertex of a face lies on the plane its normal points at
            let axis = normal.iter().position(|c| *c != 0.0).unwrap();
            assert!(face.iter().all(|v| v.position[axis] == 0.5 * normal[axis]));
        }
    }

    #[test]
    fn positions_stay_inside_unit_cube() {
        for v in cube_vertices() {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
            assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)));
            assert_eq!(v.color[..3], [0, 0, 255]);
        }
    }
}
