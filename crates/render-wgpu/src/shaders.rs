/// Declarations shared by both chamber shaders: per-frame uniforms, the four
/// texture slots, and the vertex/instance layout.
const COMMON: &str = r#"
struct Frame {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    light_pos: vec4<f32>,
    view_pos: vec4<f32>,
    light_color: vec4<f32>,
    object_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0) var tex0: texture_2d<f32>;
@group(1) @binding(1) var tex1: texture_2d<f32>;
@group(1) @binding(2) var tex2: texture_2d<f32>;
@group(1) @binding(3) var tex3: texture_2d<f32>;
@group(1) @binding(4) var tex_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) normal: vec3<f32>,
};

struct InstanceInput {
    @location(4) model_0: vec4<f32>,
    @location(5) model_1: vec4<f32>,
    @location(6) model_2: vec4<f32>,
    @location(7) model_3: vec4<f32>,
    @location(8) normal_0: vec4<f32>,
    @location(9) normal_1: vec4<f32>,
    @location(10) normal_2: vec4<f32>,
    @location(11) tex: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) @interpolate(flat) tex: u32,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let normal_matrix = mat3x3<f32>(
        instance.normal_0.xyz,
        instance.normal_1.xyz,
        instance.normal_2.xyz,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.projection * frame.view * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normal_matrix * vertex.normal;
    out.uv = vertex.uv;
    out.tex = instance.tex;
    return out;
}

// Sample every slot, then pick; sampling must stay in uniform control flow.
fn sample_slot(slot: u32, uv: vec2<f32>) -> vec4<f32> {
    let c0 = textureSample(tex0, tex_sampler, uv);
    let c1 = textureSample(tex1, tex_sampler, uv);
    let c2 = textureSample(tex2, tex_sampler, uv);
    let c3 = textureSample(tex3, tex_sampler, uv);
    var color = c0;
    color = select(color, c1, slot == 1u);
    color = select(color, c2, slot == 2u);
    color = select(color, c3, slot == 3u);
    return color;
}
"#;

/// Phong lighting from the single point light over the slot texture.
const LIT_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = sample_slot(in.tex, in.uv).rgb;
    let light = frame.light_color.rgb;

    let ambient = 0.1 * light;

    let n = normalize(in.world_normal);
    let l = normalize(frame.light_pos.xyz - in.world_pos);
    let diffuse = max(dot(n, l), 0.0) * light;

    let v = normalize(frame.view_pos.xyz - in.world_pos);
    let r = reflect(-l, n);
    let specular = 0.5 * pow(max(dot(v, r), 0.0), 32.0) * light;

    let color = (ambient + diffuse + specular) * texel + frame.object_color.rgb;
    return vec4<f32>(color, 1.0);
}
"#;

/// Unlit: the marker glows with the light's color.
const MARKER_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = sample_slot(in.tex, in.uv).rgb;
    return vec4<f32>(texel * frame.light_color.rgb, 1.0);
}
"#;

pub fn lit_shader() -> String {
    format!("{COMMON}{LIT_FRAGMENT}")
}

pub fn marker_shader() -> String {
    format!("{COMMON}{MARKER_FRAGMENT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shaders_have_entry_points() {
        for src in [lit_shader(), marker_shader()] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
            assert_eq!(src.matches("@fragment").count(), 1);
        }
    }

    #[test]
    fn only_lit_shader_uses_object_color() {
        assert!(lit_shader().contains("frame.object_color"));
        assert!(!marker_shader().contains("frame.object_color"));
    }
}
