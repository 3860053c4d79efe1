/// Shared per-frame uniforms, included at the top of every scene shader.
const FRAME_UNIFORMS: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    light_matrix: mat4x4<f32>,
    // xyz: direction the light travels in.
    light_dir: vec4<f32>,
    // x: ambient scale, y: shadow texel size, z: depth bias.
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct Instance {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

fn model_matrix(instance: Instance) -> mat4x4<f32> {
    return mat4x4<f32>(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
}
"#;

const DIFFUSE_BODY: &str = r#"
@group(1) @binding(0)
var shadow_map: texture_depth_2d;
@group(1) @binding(1)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct Material {
    @location(6) ambient: vec4<f32>,
    @location(7) diffuse: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) light_space: vec4<f32>,
    @location(2) ambient: vec3<f32>,
    @location(3) diffuse: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: Instance, material: Material) -> VertexOutput {
    let model = model_matrix(instance);
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.light_space = frame.light_matrix * world_pos;
    out.ambient = material.ambient.rgb;
    out.diffuse = material.diffuse.rgb;
    return out;
}

// 3x3 percentage-closer filter; fragments outside the light volume are lit.
fn shadow_factor(light_space: vec4<f32>) -> f32 {
    let ndc = light_space.xyz / light_space.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5);
    if (any(uv < vec2<f32>(0.0)) || any(uv > vec2<f32>(1.0)) || ndc.z > 1.0) {
        return 1.0;
    }
    let depth = ndc.z - frame.params.z;
    let texel = frame.params.y;
    var lit = 0.0;
    for (var y = -1; y <= 1; y++) {
        for (var x = -1; x <= 1; x++) {
            let offset = vec2<f32>(f32(x), f32(y)) * texel;
            lit += textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, depth);
        }
    }
    return lit / 9.0;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let to_light = normalize(-frame.light_dir.xyz);
    let lambert = max(dot(normal, to_light), 0.0);
    let shadow = select(1.0, shadow_factor(in.light_space), lambert > 0.0);
    let color = in.ambient * frame.params.x + in.diffuse * lambert * shadow;
    return vec4<f32>(color, 1.0);
}
"#;

const LINE_BODY: &str = r#"
struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_line(vertex: LineInput, instance: Instance) -> LineOutput {
    var out: LineOutput;
    out.clip_position = frame.view_proj * model_matrix(instance) * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

const SHADOW_BODY: &str = r#"
@vertex
fn vs_shadow(@location(0) position: vec3<f32>, instance: Instance) -> @builtin(position) vec4<f32> {
    return frame.light_matrix * model_matrix(instance) * vec4<f32>(position, 1.0);
}
"#;

/// Full-screen view of the shadow depth texture.
pub const QUAD_COPY_SHADER: &str = r#"
@group(0) @binding(0)
var shadow_map: texture_depth_2d;

struct QuadOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_quad(@location(0) position: vec3<f32>) -> QuadOutput {
    var out: QuadOutput;
    out.clip_position = vec4<f32>(position.xy, 0.0, 1.0);
    out.uv = vec2<f32>(position.x * 0.5 + 0.5, 0.5 - position.y * 0.5);
    return out;
}

@fragment
fn fs_quad(in: QuadOutput) -> @location(0) vec4<f32> {
    let size = vec2<f32>(textureDimensions(shadow_map));
    let texel = clamp(vec2<i32>(in.uv * size), vec2<i32>(0), vec2<i32>(size) - 1);
    let depth = textureLoad(shadow_map, texel, 0);
    return vec4<f32>(vec3<f32>(depth), 1.0);
}
"#;

/// Lit meshes with shadow-map lookups.
pub fn diffuse_shader() -> String {
    format!("{FRAME_UNIFORMS}{DIFFUSE_BODY}")
}

/// Unlit per-vertex colored lines.
pub fn line_shader() -> String {
    format!("{FRAME_UNIFORMS}{LINE_BODY}")
}

/// Depth-only geometry seen from the light camera.
pub fn shadow_shader() -> String {
    format!("{FRAME_UNIFORMS}{SHADOW_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_shaders_share_frame_uniforms() {
        for source in [diffuse_shader(), line_shader(), shadow_shader()] {
            assert!(source.contains("var<uniform> frame: Frame;"));
            assert!(source.contains("fn model_matrix"));
        }
    }

    #[test]
    fn entry_points_present() {
        assert!(diffuse_shader().contains("fn vs_main") && diffuse_shader().contains("fn fs_main"));
        assert!(line_shader().contains("fn vs_line") && line_shader().contains("fn fs_line"));
        assert!(shadow_shader().contains("fn vs_shadow"));
        assert!(QUAD_COPY_SHADER.contains("fn vs_quad") && QUAD_COPY_SHADER.contains("fn fs_quad"));
    }
}
